use std::collections::BTreeMap;

use super::model::{Measure, SummaryField, ValidRecord, YearlySummary};

// ---------------------------------------------------------------------------
// Reducers
// ---------------------------------------------------------------------------

/// Aggregation function applied to the values of one year group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Min,
    Max,
    Sum,
}

impl Reducer {
    /// Reduce `values`. `Mean`, `Min` and `Max` of nothing are `None`;
    /// `Sum` of nothing is `0.0`.
    pub fn apply(self, values: impl IntoIterator<Item = f64>) -> Option<f64> {
        let values = values.into_iter();
        match self {
            Reducer::Sum => Some(values.fold(0.0, |acc, v| acc + v)),
            Reducer::Min => values.reduce(f64::min),
            Reducer::Max => values.reduce(f64::max),
            Reducer::Mean => {
                let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                (n > 0).then(|| sum / n as f64)
            }
        }
    }
}

/// One output field of a yearly summary: `output = reducer(source)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducerSpec {
    pub output: SummaryField,
    pub source: Measure,
    pub reducer: Reducer,
}

impl ReducerSpec {
    pub const fn new(output: SummaryField, source: Measure, reducer: Reducer) -> Self {
        Self {
            output,
            source,
            reducer,
        }
    }
}

// ---------------------------------------------------------------------------
// Group-by-year
// ---------------------------------------------------------------------------

/// Produce one [`YearlySummary`] per distinct year among `records`.
///
/// Absent values are skipped by every reducer. The result happens to be in
/// ascending year order; callers that need chronological order should still
/// go through [`super::model::sort_by_year`].
pub fn aggregate_by_year(records: &[ValidRecord], reducers: &[ReducerSpec]) -> Vec<YearlySummary> {
    let mut groups: BTreeMap<i32, Vec<&ValidRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.year).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(year, group)| {
            let mut summary = YearlySummary::new(year);
            for spec in reducers {
                let values = group.iter().filter_map(|r| r.get(spec.source));
                summary.fields.insert(spec.output, spec.reducer.apply(values));
            }
            summary
        })
        .collect()
}
