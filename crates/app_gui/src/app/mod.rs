//! eframe application: owns the session, the workers and the textures.

mod export;
mod history;
mod predict;
mod stats;

use crate::i18n::{Language, LanguagePreference};
use eframe::{App, Frame, egui};
use fruit_core::{
    AppConfig, ClassifierApi, HttpClassifier, Notify, PickedFile, PredictionFollowUp,
    SelectedImage, Session, StatsPoller, Tab, WorkerMessage, spawn_prediction, spawn_selection,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

/// File extensions offered in the picker; validation still checks the content.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

pub struct UiApp {
    session: Session,
    api: Arc<dyn ClassifierApi>,
    api_url: String,
    // Dropping the app stops polling.
    poller: StatsPoller,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    notify: Notify,
    language: Language,
    language_preference: LanguagePreference,
    status: String,
    preview_texture: Option<egui::TextureHandle>,
    history_textures: HashMap<u64, egui::TextureHandle>,
    app_version: String,
}

impl UiApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        let client = HttpClassifier::new(&config.api_url, config.request_timeout())?;
        let api_url = client.base_url().to_string();
        let api: Arc<dyn ClassifierApi> = Arc::new(client);
        let (tx, rx) = mpsc::channel();
        let ctx = cc.egui_ctx.clone();
        let notify: Notify = Arc::new(move || ctx.request_repaint());
        let poller = StatsPoller::spawn(
            api.clone(),
            config.stats_interval(),
            tx.clone(),
            notify.clone(),
        );
        let language_preference = LanguagePreference::from_config(&config.language);
        Ok(Self {
            session: Session::new(),
            api,
            api_url,
            poller,
            tx,
            rx,
            notify,
            language: language_preference.resolve(),
            language_preference,
            status: String::new(),
            preview_texture: None,
            history_textures: HashMap::new(),
            app_version: env!("FRUITAI_VERSION").to_string(),
        })
    }

    fn tr<'a>(&self, spanish: &'a str, english: &'a str) -> &'a str {
        self.language.pick(spanish, english)
    }

    fn drain_worker_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                WorkerMessage::Selection { ticket, outcome } => {
                    let accepted = outcome.is_ok();
                    if self.session.finish_selection(ticket, outcome) && accepted {
                        self.preview_texture = None;
                    }
                }
                WorkerMessage::Stats(stats) => self.session.set_stats(stats),
                WorkerMessage::Prediction(outcome) => {
                    let follow_up = self.session.finish_prediction(outcome, chrono::Local::now());
                    if follow_up == PredictionFollowUp::RefreshStats {
                        self.poller.refresh_now();
                    }
                    self.sync_history_textures();
                }
            }
        }
    }

    /// Decodes the file on a worker; the result arrives through `drain_worker_messages`.
    fn select_file(&mut self, file: PickedFile) {
        let ticket = self.session.begin_selection();
        spawn_selection(file, ticket, self.tx.clone(), self.notify.clone());
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(self.tr("Imágenes", "Images"), IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.select_file(PickedFile::Path(path));
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if self.session.tab() != Tab::Predict || self.session.is_loading() {
            tracing::debug!("Ignoring drop outside the predict view");
            return;
        }
        let picked = match (file.path, file.bytes) {
            (Some(path), _) => PickedFile::Path(path),
            (None, Some(bytes)) => PickedFile::Bytes {
                name: file.name,
                bytes,
                mime_hint: (!file.mime.is_empty()).then_some(file.mime),
            },
            (None, None) => return,
        };
        self.select_file(picked);
    }

    fn reset_image(&mut self) {
        self.session.reset();
        self.preview_texture = None;
    }

    fn submit(&mut self) {
        let Some(image) = self.session.begin_prediction() else {
            return;
        };
        spawn_prediction(self.api.clone(), image, self.tx.clone(), self.notify.clone());
    }

    fn clear_history(&mut self) {
        self.session.clear_history();
        self.history_textures.clear();
    }

    fn preview_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        if self.preview_texture.is_none() {
            let image = self.session.selected()?;
            let tex = load_rgba_texture(ctx, &format!("preview:{}", image.name), image.preview());
            self.preview_texture = Some(tex);
        }
        self.preview_texture.clone()
    }

    /// Drops textures of evicted history entries.
    fn sync_history_textures(&mut self) {
        let history = self.session.history();
        self.history_textures.retain(|id, _| history.contains(*id));
    }

    fn history_texture(&mut self, ctx: &egui::Context, id: u64) -> Option<egui::TextureHandle> {
        if let Some(tex) = self.history_textures.get(&id) {
            return Some(tex.clone());
        }
        let entry = self.session.history().iter().find(|e| e.id == id)?;
        let thumb = entry.thumbnail.as_ref()?;
        let tex = load_rgba_texture(ctx, format!("history:{id}"), thumb);
        self.history_textures.insert(id, tex.clone());
        Some(tex)
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading(egui::RichText::new("FruitAI Classifier").strong().size(26.0));
                ui.label(
                    egui::RichText::new(self.tr(
                        "Análisis inteligente de clasificación de frutas",
                        "Smart fruit classification analysis",
                    ))
                    .weak(),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.render_language_select(ui);
            });
        });
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let tabs = [
                (Tab::Predict, self.tr("Clasificar", "Classify")),
                (Tab::History, self.tr("Historial", "History")),
                (Tab::Stats, self.tr("Estadísticas", "Statistics")),
            ];
            for (tab, label) in tabs {
                if ui
                    .selectable_label(self.session.tab() == tab, label)
                    .clicked()
                {
                    self.session.set_tab(tab);
                }
            }
        });
        ui.add_space(4.0);
    }

    fn render_language_select(&mut self, ui: &mut egui::Ui) {
        let mut selected = self.language_preference;
        let option_label = |lang: LanguagePreference| match (self.language, lang) {
            (Language::Spanish, LanguagePreference::System) => "Sistema (automático)",
            (Language::English, LanguagePreference::System) => "System (auto)",
            (Language::Spanish, LanguagePreference::Spanish) => "Español",
            (Language::English, LanguagePreference::Spanish) => "Spanish",
            (Language::Spanish, LanguagePreference::English) => "Inglés",
            (Language::English, LanguagePreference::English) => "English",
        };
        egui::ComboBox::from_id_salt("language-select")
            .selected_text(option_label(selected))
            .show_ui(ui, |ui| {
                for pref in [
                    LanguagePreference::System,
                    LanguagePreference::Spanish,
                    LanguagePreference::English,
                ] {
                    ui.selectable_value(&mut selected, pref, option_label(pref));
                }
            });
        if selected != self.language_preference {
            self.language_preference = selected;
            self.language = selected.resolve();
            self.status = self.tr("Idioma cambiado.", "Language updated.").to_string();
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("v{} · {}", self.app_version, self.api_url))
                    .small()
                    .weak(),
            );
            if !self.status.is_empty() {
                ui.separator();
                ui.label(egui::RichText::new(&self.status).small());
            }
        });
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_worker_messages();
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.render_header(ui));
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| self.render_footer(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.session.tab() {
                    Tab::Predict => self.render_predict_panel(ctx, ui),
                    Tab::History => self.render_history_panel(ctx, ui),
                    Tab::Stats => self.render_stats_panel(ui),
                });
        });
    }
}

fn load_rgba_texture(
    ctx: &egui::Context,
    name: impl Into<String>,
    img: &image::RgbaImage,
) -> egui::TextureHandle {
    let (w, h) = img.dimensions();
    let color = egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], img.as_raw());
    ctx.load_texture(name, color, egui::TextureOptions::LINEAR)
}

/// Default directory for save dialogs: next to the selected image, if any.
fn default_save_dir(selected: Option<&SelectedImage>) -> Option<PathBuf> {
    selected
        .and_then(|s| s.path.as_ref())
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn save_dir_defaults_to_image_folder() {
        assert_eq!(default_save_dir(None), None);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, png()).unwrap();
        let image = SelectedImage::from_path(&path).unwrap();
        assert_eq!(default_save_dir(Some(&image)).as_deref(), Some(dir.path()));
    }

    fn png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn picker_extensions_are_images() {
        for ext in IMAGE_EXTENSIONS {
            let name = format!("x.{ext}");
            assert!(image::ImageFormat::from_path(Path::new(&name)).is_ok(), "{ext}");
        }
    }
}
