//! Wire types exchanged with the prediction service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ranked label with its confidence in [0,1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub fruit: String,
    pub confidence: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Top label plus ranked alternatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub fruit: String,
    /// Model confidence in [0,1].
    pub confidence: f64,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Successful answer of `POST /predict`. Unknown fields are kept at every
/// level so exports write back what the server sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: Prediction,
    /// Server-formatted duration such as `"123ms"`; shown as-is.
    #[serde(default)]
    pub processing_time: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Body of a failed request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Aggregate counters reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_predictions: u64,
    #[serde(default)]
    pub uptime_formatted: String,
    /// ISO 8601 timestamp of service start.
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub predictions_by_class: BTreeMap<String, u64>,
}

impl StatsSnapshot {
    /// Date part of `start_time`.
    pub fn start_date(&self) -> &str {
        crate::format::start_date(&self.start_time)
    }
}

/// Envelope of `GET /stats`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope {
    pub stats: StatsSnapshot,
}
