mod app;
mod i18n;

use app::UiApp;
use directories_next::ProjectDirs;
use eframe::{App, NativeOptions, egui};
use fruit_core::AppConfig;
use fruit_core::config::API_URL_ENV;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config();
    tracing::info!(
        "FruitAI {} using {}",
        env!("FRUITAI_VERSION"),
        config.api_url
    );

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "FruitAI Classifier",
        options,
        Box::new(move |cc| {
            let app = UiApp::new(cc, config)?;
            Ok::<Box<dyn App>, Box<dyn std::error::Error + Send + Sync>>(Box::new(app))
        }),
    ) {
        tracing::error!("Application stopped with error: {e}");
    }
}

fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "fruitai", "FruitAI").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Defaults, then `config.toml`, then the environment override. Invalid
/// layers are logged and skipped.
fn load_config() -> AppConfig {
    let base = match config_path() {
        Some(path) => AppConfig::load_from(&path).unwrap_or_else(|e| {
            tracing::error!("Ignoring {}: {e}", path.display());
            AppConfig::default()
        }),
        None => AppConfig::default(),
    };
    base.clone().apply_env().unwrap_or_else(|e| {
        tracing::error!("Ignoring {API_URL_ENV}: {e}");
        base
    })
}
