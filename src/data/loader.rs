use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::RawRow;

// ---------------------------------------------------------------------------
// Source formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Parquet,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("file has no extension")]
    MissingExtension,
    #[error("unsupported file extension: .{0}")]
    Unsupported(String),
}

impl SourceFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(FormatError::MissingExtension)?
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            "parquet" | "pq" => Ok(SourceFormat::Parquet),
            _ => Err(FormatError::Unsupported(ext)),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read every row of a climate data file as column name → cell text.
///
/// Supported formats:
/// * `.csv`     – header row followed by data rows
/// * `.json`    – `[{ "Year": "2000", "Avg_Temp (°C)": 14.2, ... }, ...]`
/// * `.parquet` – any flat schema of string, integer, float or bool columns
///
/// Rows are read fresh on every call.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    let format = SourceFormat::from_path(path)
        .with_context(|| format!("cannot load {}", path.display()))?;

    let rows = match format {
        SourceFormat::Csv => load_csv(path),
        SourceFormat::Json => load_json(path),
        SourceFormat::Parquet => load_parquet(path),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every header becomes a key; empty cells are kept as empty strings and
/// treated as absent later on. Cells are decoded lossily so a stray
/// non-UTF-8 byte only garbles that cell.
fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .byte_headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), String::from_utf8_lossy(v).into_owned()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON: a top-level array of flat objects. Strings are kept
/// verbatim, numbers and bools are stringified, nulls are omitted.
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .filter_map(|(key, val)| json_cell(val).map(|cell| (key.clone(), cell)))
                .collect())
        })
        .collect()
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by e.g. `df.to_parquet()`. Scalar columns are
/// stringified so the same parsing rules apply as for CSV; null cells are
/// omitted from the row.
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();

        for row in 0..batch.num_rows() {
            let mut raw = RawRow::new();
            for (col_idx, name) in names.iter().enumerate() {
                if let Some(cell) = extract_cell(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{name}'"))?
                {
                    raw.insert(name.clone(), cell);
                }
            }
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// Extract one cell as text. `Ok(None)` for nulls.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row)
            .to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row)
            .to_string(),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row)
            .to_string(),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row)
            .to_string(),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row)
            .to_string(),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .context("expected BooleanArray")?
            .value(row)
            .to_string(),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(Path::new("data/climate.CSV")),
            Ok(SourceFormat::Csv)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("x.pq")),
            Ok(SourceFormat::Parquet)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("notes.txt")),
            Err(FormatError::Unsupported("txt".to_string()))
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("README")),
            Err(FormatError::MissingExtension)
        );
    }

    #[test]
    fn test_load_csv_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "climate.csv",
            "Year,Country,Avg_Temp (°C),Precipitation (mm)\n\
             2000,Norway,5.5,\n\
             abc,Chile,12.0,800\n",
        );

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Year"], "2000");
        assert_eq!(rows[0]["Avg_Temp (°C)"], "5.5");
        assert_eq!(rows[0]["Precipitation (mm)"], "");
        assert_eq!(rows[1]["Year"], "abc");
    }

    #[test]
    fn test_load_csv_tolerates_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.csv");
        std::fs::write(
            &path,
            b"Year,Country,Avg_Temp (\xc2\xb0C)\n2000,Norway,10\n2001,S\xe3o Paulo,20\n",
        )
        .unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Year"], "2000");
        assert_eq!(rows[1]["Year"], "2001");
        assert_eq!(rows[1]["Avg_Temp (°C)"], "20");
        assert_eq!(rows[1]["Country"], "S\u{fffd}o Paulo");
    }

    #[test]
    fn test_load_json_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "climate.json",
            r#"[{"Year": 2001, "Humidity (%)": 55.5, "Country": "Peru", "Wind_Speed (m/s)": null}]"#,
        );

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Year"], "2001");
        assert_eq!(rows[0]["Humidity (%)"], "55.5");
        assert_eq!(rows[0]["Country"], "Peru");
        assert!(!rows[0].contains_key("Wind_Speed (m/s)"));
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.json", r#"{"Year": 2001}"#);
        assert!(load_rows(&path).is_err());
    }

    #[test]
    fn test_load_parquet_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("climate.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Year", DataType::Int64, false),
            Field::new("Avg_Temp (°C)", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1999, 2000])),
                Arc::new(Float64Array::from(vec![Some(14.25), None])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Year"], "1999");
        assert_eq!(rows[0]["Avg_Temp (°C)"], "14.25");
        assert!(!rows[1].contains_key("Avg_Temp (°C)"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_rows(&dir.path().join("missing.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("missing.csv"));
    }
}
