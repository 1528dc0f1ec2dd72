use std::fmt;

use crate::data::aggregate::{aggregate_by_year, Reducer, ReducerSpec};
use crate::data::filter::{parse_and_filter, FieldSpec, Retain};
use crate::data::model::{Measure, RawRow, SummaryField, YearlySummary};

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// The four slides of the show, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    Introduction,
    TemperatureDetails,
    Precipitation,
    ClimateFactors,
}

static INTRODUCTION_REDUCERS: [ReducerSpec; 1] = [ReducerSpec::new(
    SummaryField::AvgTemp,
    Measure::AvgTemp,
    Reducer::Mean,
)];

static TEMPERATURE_REDUCERS: [ReducerSpec; 3] = [
    ReducerSpec::new(SummaryField::AvgTemp, Measure::AvgTemp, Reducer::Mean),
    ReducerSpec::new(SummaryField::MinTemp, Measure::MinTemp, Reducer::Min),
    ReducerSpec::new(SummaryField::MaxTemp, Measure::MaxTemp, Reducer::Max),
];

static PRECIPITATION_REDUCERS: [ReducerSpec; 1] = [ReducerSpec::new(
    SummaryField::Total,
    Measure::Precipitation,
    Reducer::Sum,
)];

static CLIMATE_FACTOR_REDUCERS: [ReducerSpec; 2] = [
    ReducerSpec::new(SummaryField::AvgHumidity, Measure::Humidity, Reducer::Mean),
    ReducerSpec::new(SummaryField::AvgWindSpeed, Measure::WindSpeed, Reducer::Mean),
];

impl Scene {
    pub const ALL: [Scene; 4] = [
        Scene::Introduction,
        Scene::TemperatureDetails,
        Scene::Precipitation,
        Scene::ClimateFactors,
    ];

    /// 1-based position in the show.
    pub fn number(self) -> usize {
        match self {
            Scene::Introduction => 1,
            Scene::TemperatureDetails => 2,
            Scene::Precipitation => 3,
            Scene::ClimateFactors => 4,
        }
    }

    pub fn from_number(n: usize) -> Option<Self> {
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Scene::Introduction => "Introduction",
            Scene::TemperatureDetails => "Temperature Details by Year",
            Scene::Precipitation => "Yearly Precipitation Trends",
            Scene::ClimateFactors => "Climate Factors: Humidity and Wind Speed",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scene::Introduction => "Overview of global temperature trends.",
            Scene::TemperatureDetails => "Select the type of temperature to display:",
            Scene::Precipitation => "Explore precipitation changes over the years.",
            Scene::ClimateFactors => {
                "Explore how humidity and wind speed levels have changed over the years."
            }
        }
    }

    /// Columns this scene parses and the retention rule for each.
    pub fn field_specs(self, precipitation_ceiling: f64) -> Vec<FieldSpec> {
        match self {
            Scene::Introduction => vec![FieldSpec::float(Measure::AvgTemp, Retain::Required)],
            Scene::TemperatureDetails => vec![
                FieldSpec::float(Measure::AvgTemp, Retain::Optional),
                FieldSpec::float(Measure::MinTemp, Retain::Optional),
                FieldSpec::float(Measure::MaxTemp, Retain::Optional),
            ],
            Scene::Precipitation => vec![FieldSpec::float(
                Measure::Precipitation,
                Retain::Below(precipitation_ceiling),
            )],
            Scene::ClimateFactors => vec![
                FieldSpec::float(Measure::Humidity, Retain::Required),
                FieldSpec::float(Measure::WindSpeed, Retain::Required),
            ],
        }
    }

    pub fn reducers(self) -> &'static [ReducerSpec] {
        match self {
            Scene::Introduction => &INTRODUCTION_REDUCERS,
            Scene::TemperatureDetails => &TEMPERATURE_REDUCERS,
            Scene::Precipitation => &PRECIPITATION_REDUCERS,
            Scene::ClimateFactors => &CLIMATE_FACTOR_REDUCERS,
        }
    }

    /// Summary fields produced for this scene, in reducer order.
    pub fn summary_fields(self) -> Vec<SummaryField> {
        self.reducers().iter().map(|r| r.output).collect()
    }

    /// Run the whole filter + aggregate pipeline for this scene.
    pub fn summarize(self, rows: &[RawRow], precipitation_ceiling: f64) -> SceneData {
        let filtered = parse_and_filter(rows, &self.field_specs(precipitation_ceiling));
        let summaries = aggregate_by_year(&filtered.records, self.reducers());
        SceneData {
            scene: self,
            summaries,
            rows: rows.len(),
            dropped: filtered.dropped,
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scene {}", self.number())
    }
}

/// Aggregated data ready for a scene's chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneData {
    pub scene: Scene,
    pub summaries: Vec<YearlySummary>,
    /// Rows read from the source.
    pub rows: usize,
    /// Rows discarded during filtering.
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// Scene 2 temperature selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureKind {
    #[default]
    Average,
    Minimum,
    Maximum,
}

impl TemperatureKind {
    pub const ALL: [TemperatureKind; 3] = [
        TemperatureKind::Average,
        TemperatureKind::Minimum,
        TemperatureKind::Maximum,
    ];

    pub fn field(self) -> SummaryField {
        match self {
            TemperatureKind::Average => SummaryField::AvgTemp,
            TemperatureKind::Minimum => SummaryField::MinTemp,
            TemperatureKind::Maximum => SummaryField::MaxTemp,
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            TemperatureKind::Average => "Average Temp",
            TemperatureKind::Minimum => "Minimum Temp",
            TemperatureKind::Maximum => "Maximum Temp",
        }
    }
}

// ---------------------------------------------------------------------------
// Navigator: explicit state machine over the four scenes
// ---------------------------------------------------------------------------

/// Owns the current scene. Transitions past either end are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNavigator {
    current: Scene,
}

impl Default for SceneNavigator {
    fn default() -> Self {
        Self::new(Scene::Introduction)
    }
}

impl SceneNavigator {
    pub fn new(start: Scene) -> Self {
        Self { current: start }
    }

    pub fn current(&self) -> Scene {
        self.current
    }

    pub fn can_advance(&self) -> bool {
        self.current.number() < Scene::ALL.len()
    }

    pub fn can_retreat(&self) -> bool {
        self.current.number() > 1
    }

    /// Move to the next scene. Returns the new scene, or `None` at the last one.
    pub fn advance(&mut self) -> Option<Scene> {
        self.step(1)
    }

    /// Move to the previous scene. Returns the new scene, or `None` at the first one.
    pub fn retreat(&mut self) -> Option<Scene> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<Scene> {
        let target = self.current.number().checked_add_signed(delta)?;
        let next = Scene::from_number(target)?;
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_navigator_clamps_at_bounds() {
        let mut nav = SceneNavigator::default();
        assert!(!nav.can_retreat());
        assert_eq!(nav.retreat(), None);
        assert_eq!(nav.current(), Scene::Introduction);

        assert_eq!(nav.advance(), Some(Scene::TemperatureDetails));
        assert_eq!(nav.advance(), Some(Scene::Precipitation));
        assert_eq!(nav.advance(), Some(Scene::ClimateFactors));
        assert!(!nav.can_advance());
        assert_eq!(nav.advance(), None);
        assert_eq!(nav.current(), Scene::ClimateFactors);

        assert_eq!(nav.retreat(), Some(Scene::Precipitation));
    }

    #[test]
    fn test_scene_numbers_round_trip() {
        for scene in Scene::ALL {
            assert_eq!(Scene::from_number(scene.number()), Some(scene));
        }
        assert_eq!(Scene::from_number(0), None);
        assert_eq!(Scene::from_number(5), None);
        assert_eq!(Scene::Precipitation.to_string(), "Scene 3");
    }

    #[test]
    fn test_introduction_drops_rows_without_average() {
        let rows = vec![
            row(&[("Year", "2000"), ("Avg_Temp (°C)", "10")]),
            row(&[("Year", "2000"), ("Avg_Temp (°C)", "")]),
            row(&[("Year", "2000"), ("Avg_Temp (°C)", "20")]),
        ];
        let data = Scene::Introduction.summarize(&rows, 10_000.0);
        assert_eq!(data.rows, 3);
        assert_eq!(data.dropped, 1);
        assert_eq!(data.summaries[0].get(SummaryField::AvgTemp), Some(15.0));
    }

    #[test]
    fn test_temperature_details_keeps_partial_rows() {
        let rows = vec![
            row(&[("Year", "2000"), ("Avg_Temp (°C)", "10"), ("Max_Temp (°C)", "30")]),
            row(&[("Year", "2000"), ("Avg_Temp (°C)", "14"), ("Max_Temp (°C)", "25")]),
        ];
        let data = Scene::TemperatureDetails.summarize(&rows, 10_000.0);
        let summary = &data.summaries[0];
        assert_eq!(summary.get(TemperatureKind::Average.field()), Some(12.0));
        assert_eq!(summary.get(TemperatureKind::Minimum.field()), None);
        assert_eq!(summary.get(TemperatureKind::Maximum.field()), Some(30.0));
    }

    #[test]
    fn test_precipitation_uses_configured_ceiling() {
        let rows = vec![
            row(&[("Year", "1999"), ("Precipitation (mm)", "5")]),
            row(&[("Year", "1999"), ("Precipitation (mm)", "700")]),
        ];
        let data = Scene::Precipitation.summarize(&rows, 500.0);
        assert_eq!(data.dropped, 1);
        assert_eq!(data.summaries[0].get(SummaryField::Total), Some(5.0));
    }

    #[test]
    fn test_precipitation_reads_values_with_units() {
        let rows = vec![row(&[("Year", "1999"), ("Precipitation (mm)", "12mm")])];
        let data = Scene::Precipitation.summarize(&rows, 10_000.0);
        assert_eq!(data.dropped, 0);
        assert_eq!(data.summaries[0].get(SummaryField::Total), Some(12.0));
    }

    #[test]
    fn test_climate_factors_average_both_series() {
        let rows = vec![
            row(&[("Year", "2020"), ("Humidity (%)", "40"), ("Wind_Speed (m/s)", "2")]),
            row(&[("Year", "2020"), ("Humidity (%)", "60"), ("Wind_Speed (m/s)", "4")]),
            row(&[("Year", "2020"), ("Humidity (%)", "90")]),
        ];
        let data = Scene::ClimateFactors.summarize(&rows, 10_000.0);
        assert_eq!(data.dropped, 1);
        assert_eq!(data.summaries[0].get(SummaryField::AvgHumidity), Some(50.0));
        assert_eq!(data.summaries[0].get(SummaryField::AvgWindSpeed), Some(3.0));
        assert_eq!(
            Scene::ClimateFactors.summary_fields(),
            vec![SummaryField::AvgHumidity, SummaryField::AvgWindSpeed]
        );
    }
}
