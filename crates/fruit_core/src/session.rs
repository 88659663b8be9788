//! UI state of one classifier window, independent of the toolkit.
//!
//! The GUI forwards user intents (select, reset, submit, switch tab, clear
//! history) and worker results here, and renders whatever this holds. All
//! user-visible errors go through a single slot: a new one replaces the old.

use crate::api::{PredictionResponse, StatsSnapshot};
use crate::error::ClassifierError;
use crate::history::History;
use crate::input::SelectedImage;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Predict,
    History,
    Stats,
}

/// Error shown to the user. Localized by the GUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    InvalidFileType,
    MissingFile,
    Decode,
    /// Server-supplied message, or `None` for the generic fallback.
    Prediction(Option<String>),
}

impl From<&ClassifierError> for UiError {
    fn from(err: &ClassifierError) -> Self {
        match err {
            ClassifierError::InvalidFileType { .. } => UiError::InvalidFileType,
            ClassifierError::MissingFile => UiError::MissingFile,
            ClassifierError::Decode(_) | ClassifierError::Image(_) => UiError::Decode,
            ClassifierError::Server { message, .. } => UiError::Prediction(message.clone()),
            other => UiError::Prediction(Some(other.to_string())),
        }
    }
}

/// What the GUI should do after a prediction finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionFollowUp {
    RefreshStats,
    Nothing,
}

#[derive(Debug, Default)]
pub struct Session {
    selected: Option<SelectedImage>,
    /// Ticket of the selection currently being decoded.
    decoding: Option<u64>,
    next_ticket: u64,
    result: Option<PredictionResponse>,
    error: Option<UiError>,
    loading: bool,
    history: History,
    stats: Option<StatsSnapshot>,
    tab: Tab,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a picked file as being decoded and returns its ticket. A newer
    /// selection supersedes any that is still in flight.
    pub fn begin_selection(&mut self) -> u64 {
        self.next_ticket += 1;
        self.decoding = Some(self.next_ticket);
        self.next_ticket
    }

    /// Applies a decoded selection if `ticket` is still the latest one.
    /// Returns whether it was applied.
    pub fn finish_selection(
        &mut self,
        ticket: u64,
        picked: Result<SelectedImage, ClassifierError>,
    ) -> bool {
        if self.decoding != Some(ticket) {
            tracing::debug!("Discarding superseded selection {ticket}");
            return false;
        }
        self.decoding = None;
        self.select(picked);
        true
    }

    /// Applies the outcome of reading a picked or dropped file.
    pub fn select(&mut self, picked: Result<SelectedImage, ClassifierError>) {
        match picked {
            Ok(image) => {
                tracing::info!("Selected {} ({})", image.name, image.mime);
                self.selected = Some(image);
                self.error = None;
            }
            Err(e) => {
                tracing::info!("Rejected selection: {e}");
                self.error = Some(UiError::from(&e));
            }
        }
    }

    /// Clears file, preview, result and error together, and abandons any
    /// pending decode.
    pub fn reset(&mut self) {
        self.selected = None;
        self.decoding = None;
        self.result = None;
        self.error = None;
    }

    /// Starts a submission. Returns the image to upload, or `None` (with the
    /// missing-file error set) when nothing is selected.
    pub fn begin_prediction(&mut self) -> Option<SelectedImage> {
        let Some(image) = self.selected.clone() else {
            self.error = Some(UiError::MissingFile);
            return None;
        };
        self.loading = true;
        self.error = None;
        self.result = None;
        Some(image)
    }

    /// Applies a finished prediction. Loading is cleared on every path.
    pub fn finish_prediction(
        &mut self,
        outcome: Result<PredictionResponse, ClassifierError>,
        now: DateTime<Local>,
    ) -> PredictionFollowUp {
        self.loading = false;
        match outcome {
            Ok(resp) => {
                let preview = self.selected.as_ref().map(SelectedImage::preview);
                self.history.record(&resp, preview, now);
                self.result = Some(resp);
                PredictionFollowUp::RefreshStats
            }
            Err(e) => {
                self.error = Some(UiError::from(&e));
                PredictionFollowUp::Nothing
            }
        }
    }

    pub fn set_stats(&mut self, stats: StatsSnapshot) {
        self.stats = Some(stats);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResponse> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&UiError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_decoding(&self) -> bool {
        self.decoding.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && self.decoding.is_none() && self.selected.is_some()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn stats(&self) -> Option<&StatsSnapshot> {
        self.stats.as_ref()
    }
}
