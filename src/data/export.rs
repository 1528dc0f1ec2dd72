use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::loader::SourceFormat;
use super::model::{SummaryField, YearlySummary};

/// Write summaries to `path` as CSV or JSON, chosen by extension.
///
/// CSV has a `year` column plus one column per field; a field with no value
/// is written as an empty cell. JSON is an array of flat objects with `null`
/// for missing values.
pub fn write_summaries(
    path: &Path,
    fields: &[SummaryField],
    summaries: &[YearlySummary],
) -> Result<()> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Csv => write_csv(path, fields, summaries),
        SourceFormat::Json => write_json(path, summaries),
        SourceFormat::Parquet => anyhow::bail!("export to parquet is not supported"),
    }
    .with_context(|| format!("exporting to {}", path.display()))
}

fn write_csv(path: &Path, fields: &[SummaryField], summaries: &[YearlySummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;

    let header = std::iter::once("year").chain(fields.iter().map(|f| f.key()));
    writer.write_record(header)?;

    for summary in summaries {
        let mut record = vec![summary.year.to_string()];
        record.extend(
            fields
                .iter()
                .map(|f| summary.get(*f).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, summaries: &[YearlySummary]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summaries)?;
    writer.flush().context("flushing JSON file")?;
    Ok(())
}
