use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const HEADERS: [&str; 8] = [
    "Year",
    "Country",
    "Avg_Temp (°C)",
    "Min_Temp (°C)",
    "Max_Temp (°C)",
    "Precipitation (mm)",
    "Humidity (%)",
    "Wind_Speed (m/s)",
];

const COUNTRIES: [(&str, f64); 5] = [
    ("Norway", 2.0),
    ("Chile", 12.0),
    ("India", 25.0),
    ("Canada", -1.0),
    ("Brazil", 23.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// One CSV row; `None` cells are written empty.
type Row = Vec<Option<String>>;

fn cell(v: f64) -> Option<String> {
    Some(format!("{v:.1}"))
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();

    for year in 2000..=2023 {
        let warming = (year - 2000) as f64 * 0.03;
        for &(country, base) in &COUNTRIES {
            for _ in 0..4 {
                let avg = rng.gauss(base + warming, 1.5);
                let spread = rng.uniform(4.0, 12.0);
                rows.push(vec![
                    Some(year.to_string()),
                    Some(country.to_string()),
                    cell(avg),
                    cell(avg - spread),
                    cell(avg + spread),
                    cell(rng.uniform(50.0, 3000.0)),
                    cell(rng.uniform(20.0, 95.0)),
                    cell(rng.uniform(0.5, 20.0)),
                ]);
            }
        }
    }

    // A handful of dirty rows the viewer is expected to skip or tolerate.
    rows.push(vec![
        Some("n/a".into()),
        Some("Chile".into()),
        cell(14.0),
        cell(9.0),
        cell(20.0),
        cell(900.0),
        cell(60.0),
        cell(4.0),
    ]);
    rows.push(vec![
        Some("2010".into()),
        Some("India".into()),
        None,
        None,
        cell(31.0),
        cell(15_000.0),
        None,
        cell(3.0),
    ]);
    rows.push(vec![
        Some("2015".into()),
        Some("Norway".into()),
        cell(3.0),
        cell(-4.0),
        cell(9.0),
        Some("heavy".into()),
        cell(88.0),
        Some("calm".into()),
    ]);

    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

/// All columns are written as nullable strings so dirty cells survive.
fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .map(|h| Field::new(*h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let columns: Vec<ArrayRef> = (0..HEADERS.len())
        .map(|col| {
            let values: Vec<Option<&str>> = rows.iter().map(|r| r[col].as_deref()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = out_dir.join("climate_change_dataset.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = out_dir.join("climate_change_dataset.parquet");
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
