use std::path::PathBuf;

use crate::data::model::{sort_by_year, SummaryField};
use crate::request::{DrawQueue, DrawRequest, DrawResult};
use crate::scene::{Scene, SceneData, SceneNavigator, TemperatureKind};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Data file every draw request reads.
    pub data_path: PathBuf,

    pub precipitation_ceiling: f64,

    pub navigator: SceneNavigator,

    /// Temperature series shown on the temperature details scene.
    pub temperature: TemperatureKind,

    /// Series of the climate factors chart that are currently hidden.
    pub hidden_series: Vec<SummaryField>,

    /// Data behind the chart currently on screen (None while empty).
    pub chart: Option<SceneData>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    draws: DrawQueue,
}

impl AppState {
    pub fn new(data_path: PathBuf, start: Scene, precipitation_ceiling: f64) -> Self {
        Self {
            data_path,
            precipitation_ceiling,
            navigator: SceneNavigator::new(start),
            temperature: TemperatureKind::default(),
            hidden_series: Vec::new(),
            chart: None,
            status_message: None,
            draws: DrawQueue::default(),
        }
    }

    pub fn scene(&self) -> Scene {
        self.navigator.current()
    }

    /// Whether a draw request is still running.
    pub fn loading(&self) -> bool {
        self.draws.is_pending()
    }

    /// Start loading and aggregating for the current scene. Any request
    /// already in flight is superseded.
    pub fn request_draw<F>(&mut self, wake: F)
    where
        F: Fn() + Send + 'static,
    {
        let request = DrawRequest {
            scene: self.scene(),
            path: self.data_path.clone(),
            precipitation_ceiling: self.precipitation_ceiling,
        };
        self.draws.submit(request, wake);
    }

    /// Tear down the current chart and draw the current scene from scratch.
    pub fn enter_scene<F>(&mut self, wake: F)
    where
        F: Fn() + Send + 'static,
    {
        log::info!("showing {}: {}", self.scene(), self.scene().title());
        self.chart = None;
        self.status_message = None;
        self.hidden_series.clear();
        self.request_draw(wake);
    }

    pub fn advance<F>(&mut self, wake: F)
    where
        F: Fn() + Send + 'static,
    {
        if self.navigator.advance().is_some() {
            self.enter_scene(wake);
        }
    }

    pub fn retreat<F>(&mut self, wake: F)
    where
        F: Fn() + Send + 'static,
    {
        if self.navigator.retreat().is_some() {
            self.enter_scene(wake);
        }
    }

    /// Switch the temperature series; like every redraw this reloads the file.
    pub fn select_temperature<F>(&mut self, kind: TemperatureKind, wake: F)
    where
        F: Fn() + Send + 'static,
    {
        self.temperature = kind;
        self.request_draw(wake);
    }

    /// Point at a different data file and redraw the current scene.
    pub fn set_data_path<F>(&mut self, path: PathBuf, wake: F)
    where
        F: Fn() + Send + 'static,
    {
        log::info!("using data file {}", path.display());
        self.data_path = path;
        self.enter_scene(wake);
    }

    /// Show or hide one series of the climate factors chart.
    pub fn toggle_series(&mut self, field: SummaryField) {
        if let Some(pos) = self.hidden_series.iter().position(|f| *f == field) {
            self.hidden_series.remove(pos);
        } else {
            self.hidden_series.push(field);
        }
    }

    pub fn is_visible(&self, field: SummaryField) -> bool {
        !self.hidden_series.contains(&field)
    }

    /// Apply a finished draw request, if one has arrived.
    pub fn poll_draws(&mut self) {
        if let Some(result) = self.draws.poll() {
            self.apply(result);
        }
    }

    fn apply(&mut self, result: DrawResult) {
        match result.outcome {
            Ok(mut data) if data.scene == self.scene() => {
                sort_by_year(&mut data.summaries);
                log::info!(
                    "{}: {} years from {} rows ({} dropped)",
                    data.scene,
                    data.summaries.len(),
                    data.rows,
                    data.dropped
                );
                self.status_message = (data.dropped > 0)
                    .then(|| format!("{} of {} rows skipped as invalid", data.dropped, data.rows));
                self.chart = Some(data);
            }
            Ok(data) => {
                log::debug!("ignoring data for {} while on {}", data.scene, self.scene());
            }
            Err(e) => {
                // The previous chart, if any, stays on screen.
                log::error!("Failed to load data for {}: {e:#}", result.scene);
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, Instant};

    use tempfile::TempDir;

    fn write_csv(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("climate.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Year,Avg_Temp (°C),Humidity (%),Wind_Speed (m/s)").unwrap();
        writeln!(file, "2000,10,50,3").unwrap();
        writeln!(file, "2001,20,,4").unwrap();
        writeln!(file, "bad,30,60,5").unwrap();
        path
    }

    fn settle(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.loading() {
            assert!(Instant::now() < deadline, "draw request timed out");
            std::thread::sleep(Duration::from_millis(5));
            state.poll_draws();
        }
    }

    #[test]
    fn test_enter_scene_draws_chart() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(write_csv(&dir), Scene::Introduction, 10_000.0);

        state.enter_scene(|| {});
        settle(&mut state);

        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.scene, Scene::Introduction);
        assert_eq!(chart.summaries.len(), 2);
        assert_eq!(
            state.status_message.as_deref(),
            Some("1 of 3 rows skipped as invalid")
        );
    }

    #[test]
    fn test_navigation_clears_chart_and_redraws() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(write_csv(&dir), Scene::Precipitation, 10_000.0);
        state.enter_scene(|| {});
        settle(&mut state);
        assert!(state.chart.is_some());

        state.advance(|| {});
        assert_eq!(state.scene(), Scene::ClimateFactors);
        assert!(state.chart.is_none());
        settle(&mut state);

        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.scene, Scene::ClimateFactors);
        assert_eq!(chart.summaries.len(), 1);

        // Clamped: no new request, chart stays.
        state.advance(|| {});
        assert!(!state.loading());
        assert!(state.chart.is_some());
    }

    #[test]
    fn test_load_failure_keeps_previous_chart() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(write_csv(&dir), Scene::TemperatureDetails, 10_000.0);
        state.enter_scene(|| {});
        settle(&mut state);
        let before = state.chart.clone();
        assert!(before.is_some());

        state.data_path = dir.path().join("gone.csv");
        state.select_temperature(TemperatureKind::Maximum, || {});
        settle(&mut state);

        assert_eq!(state.chart, before);
        assert_eq!(state.temperature, TemperatureKind::Maximum);
        assert!(state.status_message.unwrap().starts_with("Error:"));
    }

    #[test]
    fn test_toggle_series() {
        let mut state = AppState::new(PathBuf::from("unused.csv"), Scene::ClimateFactors, 10_000.0);
        assert!(state.is_visible(SummaryField::AvgHumidity));
        state.toggle_series(SummaryField::AvgHumidity);
        assert!(!state.is_visible(SummaryField::AvgHumidity));
        assert!(state.is_visible(SummaryField::AvgWindSpeed));
        state.toggle_series(SummaryField::AvgHumidity);
        assert!(state.is_visible(SummaryField::AvgHumidity));
    }
}
