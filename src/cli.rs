//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::data::model::PRECIPITATION_CEILING;
use crate::scene::Scene;

/// Climate Slides - a four-scene slideshow of yearly climate charts
///
/// Examples:
///   climate-slides
///   climate-slides --data data/climate_change_dataset.parquet --scene 3
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Climate data file (.csv, .json or .parquet)
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "data/climate_change_dataset.csv",
        env = "CLIMATE_SLIDES_DATA"
    )]
    pub data: PathBuf,

    /// Scene to open first (1-4)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub scene: u8,

    /// Precipitation readings at or above this value (mm) are discarded
    #[arg(long, default_value_t = PRECIPITATION_CEILING, value_name = "MM")]
    pub precipitation_ceiling: f64,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn start_scene(&self) -> Scene {
        Scene::from_number(usize::from(self.scene)).unwrap_or(Scene::Introduction)
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["climate-slides"]).unwrap();
        assert_eq!(args.start_scene(), Scene::Introduction);
        assert_eq!(args.precipitation_ceiling, 10_000.0);
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_scene_and_data_flags() {
        let args = Args::try_parse_from([
            "climate-slides",
            "--data",
            "rows.parquet",
            "--scene",
            "3",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.data, PathBuf::from("rows.parquet"));
        assert_eq!(args.start_scene(), Scene::Precipitation);
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_scene_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["climate-slides", "--scene", "5"]).is_err());
        assert!(Args::try_parse_from(["climate-slides", "--scene", "0"]).is_err());
    }
}
