//! Predict view: drop zone, preview, classify button and the result sidebar.

use super::UiApp;
use eframe::egui;
use fruit_core::{PredictionResponse, format_percent};

const DROP_ZONE_HEIGHT: f32 = 220.0;
const PREVIEW_MAX_HEIGHT: f32 = 384.0;
const RESULT_PANEL_WIDTH: f32 = 320.0;

const ACCENT_BLUE: egui::Color32 = egui::Color32::from_rgb(0x25, 0x63, 0xeb);
const SUCCESS_GREEN: egui::Color32 = egui::Color32::from_rgb(0x04, 0x78, 0x57);
const ALT_ORANGE: egui::Color32 = egui::Color32::from_rgb(0xfb, 0x92, 0x3c);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(0xb9, 0x1c, 0x1c);

impl UiApp {
    pub(super) fn render_predict_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let result = self.session.result().cloned();
        ui.horizontal_top(|ui| {
            let upload_width = if result.is_some() {
                (ui.available_width() - RESULT_PANEL_WIDTH - 16.0).max(240.0)
            } else {
                ui.available_width()
            };
            ui.allocate_ui(egui::vec2(upload_width, 0.0), |ui| {
                ui.vertical(|ui| self.render_upload_section(ctx, ui));
            });
            if let Some(result) = &result {
                ui.add_space(16.0);
                ui.allocate_ui(egui::vec2(RESULT_PANEL_WIDTH, 0.0), |ui| {
                    egui::Frame::group(ui.style())
                        .inner_margin(12)
                        .show(ui, |ui| self.render_result(ui, result));
                });
            }
        });
    }

    fn render_upload_section(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).inner_margin(16).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(self.tr("Cargar Imagen", "Upload Image"));
            ui.add_space(10.0);

            match self.preview_texture(ctx) {
                None => self.render_drop_zone(ctx, ui),
                Some(tex) => {
                    ui.vertical_centered(|ui| {
                        ui.add(
                            egui::Image::new(&tex)
                                .max_height(PREVIEW_MAX_HEIGHT)
                                .max_width(ui.available_width())
                                .corner_radius(6),
                        );
                    });
                    ui.add_space(8.0);
                    let change = egui::Button::new(self.tr("Cambiar Imagen", "Change Image"))
                        .min_size(egui::vec2(ui.available_width(), 32.0));
                    if ui.add_enabled(!self.session.is_loading(), change).clicked() {
                        self.reset_image();
                    }
                }
            }

            if self.session.is_decoding() {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(self.tr("Cargando imagen...", "Loading image..."));
                });
            }

            if let Some(err) = self.session.error() {
                ui.add_space(10.0);
                let text = self.language.error_text(err);
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0xfe, 0xf2, 0xf2))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0xfe, 0xca, 0xca)))
                    .corner_radius(6)
                    .inner_margin(10)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(egui::RichText::new(text).color(ERROR_RED).strong());
                    });
            }
        });

        ui.add_space(12.0);
        let label = if self.session.is_loading() {
            self.tr("Analizando...", "Analyzing...")
        } else {
            self.tr("Clasificar Imagen", "Classify Image")
        };
        let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
            .fill(ACCENT_BLUE)
            .min_size(egui::vec2(ui.available_width(), 44.0));
        if ui.add_enabled(self.session.can_submit(), button).clicked() {
            self.submit();
        }
        if self.session.is_loading() {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| ui.spinner());
        }
    }

    fn render_drop_zone(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let drag_active = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let size = egui::vec2(ui.available_width(), DROP_ZONE_HEIGHT);
        let response = ui.allocate_response(size, egui::Sense::click());
        let rect = response.rect;
        let visuals = ui.visuals();
        let (fill, stroke_color) = if drag_active {
            (egui::Color32::from_rgb(0xef, 0xf6, 0xff), ACCENT_BLUE)
        } else if response.hovered() {
            (visuals.faint_bg_color, egui::Color32::from_rgb(0x60, 0xa5, 0xfa))
        } else {
            (visuals.faint_bg_color, visuals.widgets.noninteractive.bg_stroke.color)
        };
        let painter = ui.painter();
        painter.rect_filled(rect, 8.0, fill);
        painter.rect_stroke(
            rect,
            8.0,
            egui::Stroke::new(2.0, stroke_color),
            egui::StrokeKind::Inside,
        );

        let text_color = ui.visuals().text_color();
        let weak = ui.visuals().weak_text_color();
        let center = rect.center();
        painter.text(
            center - egui::vec2(0.0, 50.0),
            egui::Align2::CENTER_CENTER,
            "▲",
            egui::FontId::proportional(34.0),
            weak,
        );
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            self.tr("Arrastra tu imagen aquí", "Drag your image here"),
            egui::FontId::proportional(19.0),
            text_color,
        );
        painter.text(
            center + egui::vec2(0.0, 26.0),
            egui::Align2::CENTER_CENTER,
            self.tr("O haz clic para seleccionar", "Or click to browse"),
            egui::FontId::proportional(14.0),
            weak,
        );
        painter.text(
            center + egui::vec2(0.0, 56.0),
            egui::Align2::CENTER_CENTER,
            self.tr(
                "Formatos soportados: PNG, JPG, GIF, WEBP",
                "Supported formats: PNG, JPG, GIF, WEBP",
            ),
            egui::FontId::proportional(12.0),
            weak,
        );

        if response
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .clicked()
        {
            self.pick_file();
        }
    }

    fn render_result(&mut self, ui: &mut egui::Ui, result: &PredictionResponse) {
        ui.set_width(ui.available_width());
        ui.heading(self.tr("Resultado", "Result"));
        ui.add_space(10.0);

        egui::Frame::new()
            .fill(egui::Color32::from_rgb(0xec, 0xfd, 0xf5))
            .corner_radius(6)
            .inner_margin(12)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(self.tr("Fruta Identificada", "Identified Fruit"))
                        .small()
                        .color(egui::Color32::DARK_GRAY),
                );
                ui.label(
                    egui::RichText::new(&result.prediction.fruit)
                        .size(28.0)
                        .strong()
                        .color(SUCCESS_GREEN),
                );
            });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(self.tr("Nivel de Confianza", "Confidence")).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format_percent(result.prediction.confidence))
                        .strong()
                        .color(SUCCESS_GREEN),
                );
            });
        });
        ui.add(
            egui::ProgressBar::new(result.prediction.confidence.clamp(0.0, 1.0) as f32)
                .fill(SUCCESS_GREEN)
                .desired_height(10.0),
        );

        ui.add_space(12.0);
        ui.label(
            egui::RichText::new(self.tr("Tiempo de Procesamiento", "Processing Time")).small(),
        );
        ui.label(
            egui::RichText::new(&result.processing_time)
                .monospace()
                .size(18.0),
        );

        if !result.prediction.alternatives.is_empty() {
            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new(self.tr("Alternativas", "Alternatives")).strong());
            for alt in &result.prediction.alternatives {
                ui.horizontal(|ui| {
                    ui.label(&alt.fruit);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(format_percent(alt.confidence)).strong());
                    });
                });
                ui.add(
                    egui::ProgressBar::new(alt.confidence.clamp(0.0, 1.0) as f32)
                        .fill(ALT_ORANGE)
                        .desired_height(6.0),
                );
            }
        }

        ui.add_space(8.0);
        ui.separator();
        self.render_export_buttons(ui);
    }
}
