//! Application configuration: defaults, optional `config.toml`, env override.

use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_STATS_INTERVAL_SECS: u64 = 5;
/// Environment variable that overrides `api_url`.
pub const API_URL_ENV: &str = "FRUITAI_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the prediction service.
    pub api_url: String,
    pub stats_interval_secs: u64,
    /// `None` waits for the server indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// `"system"`, `"es"` or `"en"`.
    pub language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            stats_interval_secs: DEFAULT_STATS_INTERVAL_SECS,
            request_timeout_secs: None,
            language: "system".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(raw).map_err(|e| ClassifierError::Config(e.to_string()))?;
        cfg.validated()
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Applies an explicit override value for `api_url` (normally read from
    /// [`API_URL_ENV`]). The result is validated like a config file.
    pub fn with_api_url_override(mut self, value: Option<String>) -> Result<Self> {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        self.validated()
    }

    /// Reads the environment override.
    pub fn apply_env(self) -> Result<Self> {
        self.with_api_url_override(std::env::var(API_URL_ENV).ok())
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn validated(self) -> Result<Self> {
        if self.stats_interval_secs == 0 {
            return Err(ClassifierError::Config(
                "stats_interval_secs must be at least 1".into(),
            ));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ClassifierError::Config(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_original_service() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api_url, "http://localhost:5000");
        assert_eq!(cfg.stats_interval(), Duration::from_secs(5));
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<()> {
        let cfg = AppConfig::from_toml_str("api_url = \"https://fruit.example\"\n")?;
        assert_eq!(cfg.api_url, "https://fruit.example");
        assert_eq!(cfg.stats_interval_secs, 5);
        assert_eq!(cfg.language, "system");
        Ok(())
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = AppConfig::from_toml_str("stats_interval_secs = 0").unwrap_err();
        assert!(matches!(err, ClassifierError::Config(_)));
    }

    #[test]
    fn non_http_url_is_rejected() {
        assert!(AppConfig::from_toml_str("api_url = \"localhost:5000\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = AppConfig::load_from(dir.path().join("config.toml"))?;
        assert_eq!(cfg, AppConfig::default());
        Ok(())
    }

    #[test]
    fn file_is_read_when_present() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "request_timeout_secs = 30\nlanguage = \"en\"\n")?;
        let cfg = AppConfig::load_from(&path)?;
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.language, "en");
        Ok(())
    }

    #[test]
    fn override_replaces_url_unless_blank() -> Result<()> {
        let cfg = AppConfig::default().with_api_url_override(Some("http://10.0.0.2:8080".into()))?;
        assert_eq!(cfg.api_url, "http://10.0.0.2:8080");
        let cfg = cfg.with_api_url_override(Some("   ".into()))?;
        assert_eq!(cfg.api_url, "http://10.0.0.2:8080");
        let cfg = cfg.with_api_url_override(None)?;
        assert_eq!(cfg.api_url, "http://10.0.0.2:8080");
        Ok(())
    }

    #[test]
    fn override_is_validated_like_the_file() {
        let err = AppConfig::default()
            .with_api_url_override(Some("localhost:5000".into()))
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Config(_)));
    }
}
