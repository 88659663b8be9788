use super::UiApp;
use eframe::egui;
use fruit_core::format_percent;

// Same 4:3 aspect as the stored thumbnails.
const CARD_WIDTH: f32 = 168.0;
const THUMB_HEIGHT: f32 = 126.0;

impl UiApp {
    /// Cards of the most recent predictions, newest first.
    pub(super) fn render_history_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(self.tr("Historial de Predicciones", "Prediction History"));
            if !self.session.history().is_empty() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let clear = egui::Button::new(
                        egui::RichText::new(self.tr("Limpiar Historial", "Clear History"))
                            .color(egui::Color32::WHITE),
                    )
                    .fill(egui::Color32::from_rgb(0xdc, 0x26, 0x26));
                    if ui.add(clear).clicked() {
                        self.clear_history();
                    }
                    if ui.button(self.tr("Exportar CSV", "Export CSV")).clicked() {
                        self.download_history_csv();
                    }
                });
            }
        });
        ui.add_space(16.0);

        if self.session.history().is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new(self.tr("No hay predicciones aún", "No predictions yet"))
                        .size(18.0)
                        .weak(),
                );
            });
            return;
        }

        let cards: Vec<(u64, String, f64, String)> = self
            .session
            .history()
            .iter()
            .map(|e| (e.id, e.fruit.clone(), e.confidence, e.time.clone()))
            .collect();
        ui.horizontal_wrapped(|ui| {
            for (id, fruit, confidence, time) in cards {
                let thumb = self.history_texture(ctx, id);
                egui::Frame::group(ui.style()).inner_margin(8).show(ui, |ui| {
                    ui.set_width(CARD_WIDTH);
                    match thumb {
                        Some(tex) => {
                            ui.add(
                                egui::Image::new(&tex)
                                    .fit_to_exact_size(egui::vec2(CARD_WIDTH, THUMB_HEIGHT))
                                    .corner_radius(4),
                            );
                        }
                        None => {
                            let (rect, _) = ui.allocate_exact_size(
                                egui::vec2(CARD_WIDTH, THUMB_HEIGHT),
                                egui::Sense::hover(),
                            );
                            ui.painter()
                                .rect_filled(rect, 4.0, egui::Color32::from_gray(220));
                        }
                    }
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new(fruit).strong().size(17.0));
                    ui.label(
                        egui::RichText::new(format_percent(confidence))
                            .color(egui::Color32::from_rgb(0x05, 0x96, 0x69))
                            .strong(),
                    );
                    ui.label(egui::RichText::new(time).small().weak());
                });
            }
        });
    }
}
