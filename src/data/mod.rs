/// Data layer: row loading, per-scene filtering, yearly aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  parse year + fields, drop invalid rows → Vec<ValidRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group by year, apply reducers → Vec<YearlySummary>
///   └───────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
