use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawRow – one row exactly as the row source produced it
// ---------------------------------------------------------------------------

/// A raw input row: column name → cell text. Absent cells are simply missing.
pub type RawRow = BTreeMap<String, String>;

/// Header of the year column in the climate dataset.
pub const YEAR_COLUMN: &str = "Year";

/// Default sanity ceiling for yearly precipitation readings (mm).
pub const PRECIPITATION_CEILING: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Measure – the closed set of source measurement fields
// ---------------------------------------------------------------------------

/// A numeric measurement column of the climate dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Measure {
    AvgTemp,
    MinTemp,
    MaxTemp,
    Precipitation,
    Humidity,
    WindSpeed,
}

impl Measure {
    /// Column header as it appears in the CSV file.
    pub fn header(self) -> &'static str {
        match self {
            Measure::AvgTemp => "Avg_Temp (°C)",
            Measure::MinTemp => "Min_Temp (°C)",
            Measure::MaxTemp => "Max_Temp (°C)",
            Measure::Precipitation => "Precipitation (mm)",
            Measure::Humidity => "Humidity (%)",
            Measure::WindSpeed => "Wind_Speed (m/s)",
        }
    }
}

// ---------------------------------------------------------------------------
// ValidRecord – a row that survived parsing and filtering
// ---------------------------------------------------------------------------

/// A parsed row whose year is a valid integer and whose required
/// measurements passed the scene's filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord {
    pub year: i32,
    /// Parsed measurements; `None` marks an absent or unparsable cell.
    pub values: BTreeMap<Measure, Option<f64>>,
}

impl ValidRecord {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, measure: Measure, value: Option<f64>) -> Self {
        self.values.insert(measure, value);
        self
    }

    /// The parsed value of `measure`, if present.
    pub fn get(&self, measure: Measure) -> Option<f64> {
        self.values.get(&measure).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// SummaryField – the closed set of per-year aggregate outputs
// ---------------------------------------------------------------------------

/// A named statistic carried by a [`YearlySummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryField {
    AvgTemp,
    MinTemp,
    MaxTemp,
    /// Total precipitation over the year.
    Total,
    AvgHumidity,
    AvgWindSpeed,
}

impl SummaryField {
    /// Field name used in exports.
    pub fn key(self) -> &'static str {
        match self {
            SummaryField::AvgTemp => "avgTemp",
            SummaryField::MinTemp => "minTemp",
            SummaryField::MaxTemp => "maxTemp",
            SummaryField::Total => "total",
            SummaryField::AvgHumidity => "avgHumidity",
            SummaryField::AvgWindSpeed => "avgWindSpeed",
        }
    }

    /// Human readable label with unit, for axes and tooltips.
    pub fn label(self) -> &'static str {
        match self {
            SummaryField::AvgTemp => "Avg Temp (°C)",
            SummaryField::MinTemp => "Min Temp (°C)",
            SummaryField::MaxTemp => "Max Temp (°C)",
            SummaryField::Total => "Precipitation (mm)",
            SummaryField::AvgHumidity => "Humidity (%)",
            SummaryField::AvgWindSpeed => "Wind Speed (m/s)",
        }
    }
}

// ---------------------------------------------------------------------------
// YearlySummary – aggregate output for one year
// ---------------------------------------------------------------------------

/// Per-year statistics. A field mapped to `None` has no value for that year,
/// which is distinct from `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySummary {
    pub year: i32,
    #[serde(flatten)]
    pub fields: BTreeMap<SummaryField, Option<f64>>,
}

impl YearlySummary {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: SummaryField) -> Option<f64> {
        self.fields.get(&field).copied().flatten()
    }
}

/// Sort summaries chronologically (ascending year).
pub fn sort_by_year(summaries: &mut [YearlySummary]) {
    summaries.sort_by_key(|s| s.year);
}
