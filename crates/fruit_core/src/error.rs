use thiserror::Error;

/// Errors produced by the classifier client and its helpers.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("not an image file (detected type: {mime})")]
    InvalidFileType { mime: String },
    #[error("no image selected")]
    MissingFile,
    #[error("image could not be decoded: {0}")]
    Decode(String),
    /// Non-2xx answer from the prediction service. `message` is the `error`
    /// field of the response body when the server supplied one.
    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Server {
        status: u16,
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("font could not be loaded: {0}")]
    Font(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = ClassifierError> = std::result::Result<T, E>;
