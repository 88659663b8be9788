//! Save dialogs and clipboard for the result and history exports.

use super::{UiApp, default_save_dir};
use eframe::egui;
use fruit_core::{
    card_file_name, export_history_csv, export_result_card, export_result_json, json_file_name,
    result_json,
};
use rfd::FileDialog;
use std::path::PathBuf;

impl UiApp {
    pub(super) fn render_export_buttons(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        if ui
            .add(
                egui::Button::new(self.tr("Descargar JSON", "Download JSON"))
                    .min_size(egui::vec2(width, 28.0)),
            )
            .clicked()
        {
            self.download_json();
        }
        if ui
            .add(
                egui::Button::new(self.tr("Descargar Imagen", "Download Image"))
                    .min_size(egui::vec2(width, 28.0)),
            )
            .clicked()
        {
            self.download_card();
        }
        if ui
            .add(
                egui::Button::new(self.tr("Copiar JSON", "Copy JSON"))
                    .min_size(egui::vec2(width, 28.0)),
            )
            .clicked()
        {
            self.copy_result_json();
        }
    }

    fn save_dialog(&self, filter: &str, extension: &str, file_name: String) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .add_filter(filter, &[extension])
            .set_file_name(file_name);
        if let Some(dir) = default_save_dir(self.session.selected()) {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }

    fn download_json(&mut self) {
        if self.session.result().is_none() {
            return;
        }
        let name = json_file_name(chrono::Utc::now().timestamp_millis());
        let Some(path) = self.save_dialog("JSON", "json", name) else {
            return;
        };
        match export_result_json(self.session.result(), &path) {
            Ok(true) => {
                self.status = format!("{}: {}", self.tr("Guardado", "Saved"), path.display());
            }
            Ok(false) => {}
            Err(e) => self.report_export_error(e),
        }
    }

    fn download_card(&mut self) {
        if self.session.result().is_none() || self.session.selected().is_none() {
            return;
        }
        let name = card_file_name(chrono::Utc::now().timestamp_millis());
        let Some(path) = self.save_dialog("PNG", "png", name) else {
            return;
        };
        let labels = self.language.card_labels();
        let preview = self.session.selected().map(|s| s.preview());
        match export_result_card(self.session.result(), preview, &labels, &path) {
            Ok(true) => {
                self.status = format!("{}: {}", self.tr("Guardado", "Saved"), path.display());
            }
            Ok(false) => {}
            Err(e) => self.report_export_error(e),
        }
    }

    fn copy_result_json(&mut self) {
        let Some(result) = self.session.result() else {
            return;
        };
        let copied = result_json(result)
            .map_err(anyhow::Error::from)
            .and_then(|json| {
                let mut clipboard = arboard::Clipboard::new()?;
                clipboard.set_text(json)?;
                Ok(())
            });
        match copied {
            Ok(()) => {
                self.status = self
                    .tr("Resultado copiado al portapapeles", "Result copied to clipboard")
                    .to_string();
            }
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {e}");
                self.status = format!("{}: {e}", self.tr("No se pudo copiar", "Copy failed"));
            }
        }
    }

    pub(super) fn download_history_csv(&mut self) {
        if self.session.history().is_empty() {
            return;
        }
        let name = format!("historial-{}.csv", chrono::Utc::now().timestamp_millis());
        let Some(path) = self.save_dialog("CSV", "csv", name) else {
            return;
        };
        match export_history_csv(self.session.history().iter(), &path) {
            Ok(()) => {
                self.status = format!(
                    "{}: {}",
                    self.tr("CSV exportado", "CSV exported"),
                    path.display()
                );
            }
            Err(e) => self.report_export_error(e),
        }
    }

    fn report_export_error(&mut self, err: impl std::fmt::Display) {
        tracing::error!("Export failed: {err}");
        self.status = format!("{}: {err}", self.tr("Error al exportar", "Export failed"));
    }
}
