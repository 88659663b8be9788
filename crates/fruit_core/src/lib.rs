//! Core of the FruitAI desktop client: wire types, the HTTP client for the
//! prediction service, image selection, bounded history, exports,
//! configuration, background workers and the toolkit-independent session.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod history;
pub mod input;
pub mod session;
pub mod worker;

pub use api::{Alternative, Prediction, PredictionResponse, StatsSnapshot};
pub use client::{ClassifierApi, HttpClassifier};
pub use config::AppConfig;
pub use error::{ClassifierError, Result};
pub use export::{
    CardLabels, card_file_name, export_result_card, export_result_json, json_file_name,
    result_json,
};
pub use format::{format_clock, format_percent};
pub use history::{HISTORY_CAPACITY, History, HistoryEntry, export_history_csv};
pub use input::{PickedFile, SelectedImage};
pub use session::{PredictionFollowUp, Session, Tab, UiError};
pub use worker::{Notify, StatsPoller, WorkerMessage, spawn_prediction, spawn_selection};
