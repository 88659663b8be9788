//! Background threads: one-shot predictions and the periodic stats poller.

use crate::api::{PredictionResponse, StatsSnapshot};
use crate::client::ClassifierApi;
use crate::error::ClassifierError;
use crate::input::{PickedFile, SelectedImage};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Results delivered to the UI thread.
#[derive(Debug)]
pub enum WorkerMessage {
    /// A picked file finished decoding. `ticket` comes from
    /// `Session::begin_selection`.
    Selection {
        ticket: u64,
        outcome: Result<SelectedImage, ClassifierError>,
    },
    Prediction(Result<PredictionResponse, ClassifierError>),
    Stats(StatsSnapshot),
}

/// Callback used to wake the UI after a message was sent.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// Reads, validates and decodes a picked file off the UI thread.
pub fn spawn_selection(
    file: PickedFile,
    ticket: u64,
    tx: Sender<WorkerMessage>,
    notify: Notify,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let name = file.name();
        let start = Instant::now();
        let outcome = file.load();
        tracing::debug!("Decoded {name} in {:.1?}", start.elapsed());
        if tx.send(WorkerMessage::Selection { ticket, outcome }).is_err() {
            tracing::debug!("UI gone before {name} was decoded");
            return;
        }
        notify();
    })
}

/// Runs one prediction on its own thread and reports the outcome on `tx`.
pub fn spawn_prediction(
    api: Arc<dyn ClassifierApi>,
    image: SelectedImage,
    tx: Sender<WorkerMessage>,
    notify: Notify,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let start = Instant::now();
        let outcome = api.predict(&image);
        match &outcome {
            Ok(resp) => tracing::info!(
                "Prediction for {}: {} ({:.3}) in {:.1?}",
                image.name,
                resp.prediction.fruit,
                resp.prediction.confidence,
                start.elapsed()
            ),
            Err(e) => tracing::warn!("Prediction for {} failed: {e}", image.name),
        }
        if tx.send(WorkerMessage::Prediction(outcome)).is_err() {
            tracing::debug!("UI gone before prediction finished");
            return;
        }
        notify();
    })
}

enum PollCommand {
    Refresh,
    Stop,
}

/// Fetches statistics immediately and then on a fixed interval until stopped
/// or dropped.
pub struct StatsPoller {
    control: Sender<PollCommand>,
    handle: Option<JoinHandle<()>>,
}

impl StatsPoller {
    pub fn spawn(
        api: Arc<dyn ClassifierApi>,
        interval: Duration,
        tx: Sender<WorkerMessage>,
        notify: Notify,
    ) -> Self {
        let (control, commands) = mpsc::channel();
        let handle = thread::spawn(move || {
            let mut next_due = Instant::now();
            loop {
                let wait = next_due.saturating_duration_since(Instant::now());
                match commands.recv_timeout(wait) {
                    Ok(PollCommand::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                    Ok(PollCommand::Refresh) => {}
                    Err(RecvTimeoutError::Timeout) => next_due = Instant::now() + interval,
                }
                match api.fetch_stats() {
                    Ok(stats) => {
                        if tx.send(WorkerMessage::Stats(stats)).is_err() {
                            break;
                        }
                        notify();
                    }
                    Err(e) => tracing::warn!("Error fetching stats: {e}"),
                }
            }
            tracing::debug!("Stats poller stopped");
        });
        Self {
            control,
            handle: Some(handle),
        }
    }

    /// Requests an out-of-band fetch without disturbing the cadence.
    pub fn refresh_now(&self) {
        let _ = self.control.send(PollCommand::Refresh);
    }

    /// Stops the thread and waits for it. No fetch starts after this returns.
    pub fn stop(&mut self) {
        let _ = self.control.send(PollCommand::Stop);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("Stats poller panicked");
        }
    }
}

impl Drop for StatsPoller {
    // Signals without joining: a fetch stuck on an unresponsive server must not
    // block shutdown. The thread exits before starting another fetch.
    fn drop(&mut self) {
        let _ = self.control.send(PollCommand::Stop);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::api::Prediction;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory service that counts calls.
    #[derive(Default)]
    pub struct FakeApi {
        pub predict_calls: AtomicUsize,
        pub stats_calls: AtomicUsize,
        pub fail_stats: bool,
        pub predict_error: Mutex<Option<ClassifierError>>,
    }

    impl FakeApi {
        pub fn predictions(&self) -> usize {
            self.predict_calls.load(Ordering::SeqCst)
        }

        pub fn stats_fetches(&self) -> usize {
            self.stats_calls.load(Ordering::SeqCst)
        }
    }

    impl ClassifierApi for FakeApi {
        fn predict(&self, image: &SelectedImage) -> Result<PredictionResponse, ClassifierError> {
            self.predict_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.predict_error.lock().unwrap().take() {
                return Err(err);
            }
            Ok(PredictionResponse {
                prediction: Prediction {
                    fruit: format!("fruit-of-{}", image.name),
                    confidence: 0.873,
                    ..Default::default()
                },
                processing_time: "123ms".into(),
                ..Default::default()
            })
        }

        fn fetch_stats(&self) -> Result<StatsSnapshot, ClassifierError> {
            let n = self.stats_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_stats {
                return Err(ClassifierError::Server {
                    status: 503,
                    message: None,
                });
            }
            Ok(StatsSnapshot {
                total_predictions: n as u64,
                ..Default::default()
            })
        }
    }
}
