use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::Context;

use crate::data::loader::load_rows;
use crate::scene::{Scene, SceneData};

// ---------------------------------------------------------------------------
// Tickets: latest request wins
// ---------------------------------------------------------------------------

/// Identifies one draw request. Later requests carry larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out tickets and remembers which one is still wanted.
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
    /// Ticket whose result has not arrived yet.
    pending: Option<Ticket>,
}

impl RequestTracker {
    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some(ticket);
        ticket
    }

    /// Whether a result for `ticket` should be shown. Marks it delivered.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// ---------------------------------------------------------------------------
// Background draw requests
// ---------------------------------------------------------------------------

/// What a draw request needs to run off the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub scene: Scene,
    pub path: PathBuf,
    pub precipitation_ceiling: f64,
}

impl DrawRequest {
    /// Load rows fresh from disk and aggregate them for the scene.
    pub fn run(&self) -> anyhow::Result<SceneData> {
        let rows = load_rows(&self.path)
            .with_context(|| format!("Error loading the data file for {}", self.scene))?;
        Ok(self.scene.summarize(&rows, self.precipitation_ceiling))
    }
}

/// Completed draw request, posted back to the UI thread.
#[derive(Debug)]
pub struct DrawResult {
    pub ticket: Ticket,
    pub scene: Scene,
    pub outcome: anyhow::Result<SceneData>,
}

/// Runs draw requests on worker threads and delivers only the newest result.
pub struct DrawQueue {
    tracker: RequestTracker,
    tx: Sender<DrawResult>,
    rx: Receiver<DrawResult>,
}

impl Default for DrawQueue {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tracker: RequestTracker::default(),
            tx,
            rx,
        }
    }
}

impl DrawQueue {
    /// Start `request` on a worker thread. `wake` is called once the result
    /// is queued, typically to repaint the UI.
    pub fn submit<F>(&mut self, request: DrawRequest, wake: F) -> Ticket
    where
        F: Fn() + Send + 'static,
    {
        let ticket = self.tracker.issue();
        let scene = request.scene;
        log::debug!("draw request {ticket:?} for {scene}");

        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("draw-{}", ticket.0))
            .spawn(move || {
                let outcome = request.run();
                // Receiver gone means the app is shutting down.
                let _ = tx.send(DrawResult {
                    ticket,
                    scene,
                    outcome,
                });
                wake();
            });

        if let Err(e) = spawned {
            let _ = self.tx.send(DrawResult {
                ticket,
                scene,
                outcome: Err(anyhow::Error::new(e).context("spawning draw worker")),
            });
        }
        ticket
    }

    /// Drain finished requests and return the one matching the latest ticket,
    /// if it has arrived. Superseded results are dropped.
    pub fn poll(&mut self) -> Option<DrawResult> {
        let mut latest = None;
        while let Ok(result) = self.rx.try_recv() {
            if self.tracker.accept(result.ticket) {
                latest = Some(result);
            } else {
                log::debug!("discarding stale draw result {:?}", result.ticket);
            }
        }
        latest
    }

    pub fn is_pending(&self) -> bool {
        self.tracker.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, Instant};

    use tempfile::TempDir;

    use crate::data::model::SummaryField;

    fn wait_for(queue: &mut DrawQueue) -> DrawResult {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = queue.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "draw request timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_only_latest_ticket_is_accepted() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(first < second);

        assert!(!tracker.accept(first));
        assert!(tracker.is_pending());
        assert!(tracker.accept(second));
        assert!(!tracker.is_pending());
        assert!(!tracker.accept(second));
    }

    #[test]
    fn test_queue_delivers_latest_result() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("climate.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Year,Avg_Temp (°C),Precipitation (mm)").unwrap();
        writeln!(file, "2000,10,5").unwrap();
        writeln!(file, "2000,20,7").unwrap();
        drop(file);

        let mut queue = DrawQueue::default();
        queue.submit(
            DrawRequest {
                scene: Scene::Introduction,
                path: path.clone(),
                precipitation_ceiling: 10_000.0,
            },
            || {},
        );
        let latest = queue.submit(
            DrawRequest {
                scene: Scene::Precipitation,
                path,
                precipitation_ceiling: 10_000.0,
            },
            || {},
        );

        let result = wait_for(&mut queue);
        assert_eq!(result.ticket, latest);
        assert_eq!(result.scene, Scene::Precipitation);
        let data = result.outcome.unwrap();
        assert_eq!(data.summaries[0].get(SummaryField::Total), Some(12.0));
        assert!(!queue.is_pending());
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let dir = TempDir::new().unwrap();
        let mut queue = DrawQueue::default();
        queue.submit(
            DrawRequest {
                scene: Scene::ClimateFactors,
                path: dir.path().join("nope.csv"),
                precipitation_ceiling: 10_000.0,
            },
            || {},
        );

        let result = wait_for(&mut queue);
        let err = result.outcome.unwrap_err();
        assert!(format!("{err:#}").contains("Scene 4"));
    }
}
