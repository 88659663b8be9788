//! Statistics view: headline counters and per-class counts.

use super::UiApp;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use fruit_core::StatsSnapshot;

const TILE_WIDTH: f32 = 200.0;

impl UiApp {
    pub(super) fn render_stats_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.tr("Estadísticas del Sistema", "System Statistics"));
        ui.add_space(16.0);

        let Some(stats) = self.session.stats().cloned() else {
            ui.label(
                egui::RichText::new(self.tr(
                    "Esperando datos del servidor...",
                    "Waiting for server data...",
                ))
                .weak(),
            );
            return;
        };

        ui.horizontal_wrapped(|ui| {
            self.stat_tile(
                ui,
                self.tr("Predicciones Totales", "Total Predictions"),
                &stats.total_predictions.to_string(),
                egui::Color32::from_rgb(0x25, 0x63, 0xeb),
            );
            self.stat_tile(
                ui,
                self.tr("Tiempo Activo", "Uptime"),
                &stats.uptime_formatted,
                egui::Color32::from_rgb(0x93, 0x33, 0xea),
            );
            self.stat_tile(
                ui,
                self.tr("Fecha Inicio", "Start Date"),
                stats.start_date(),
                egui::Color32::from_rgb(0x05, 0x96, 0x69),
            );
            self.stat_tile(
                ui,
                self.tr("Estado", "Status"),
                self.tr("Activo", "Active"),
                egui::Color32::from_rgb(0x05, 0x96, 0x69),
            );
        });

        if !stats.predictions_by_class.is_empty() {
            ui.add_space(20.0);
            let caption = self.tr("Predicciones por clase", "Predictions by class");
            ui.label(egui::RichText::new(caption).strong());
            ui.add_space(6.0);
            self.render_class_table(ui, &stats);
        }
    }

    fn stat_tile(&self, ui: &mut egui::Ui, caption: &str, value: &str, color: egui::Color32) {
        egui::Frame::group(ui.style()).inner_margin(14).show(ui, |ui| {
            ui.set_width(TILE_WIDTH);
            ui.label(egui::RichText::new(caption).small());
            ui.label(egui::RichText::new(value).size(24.0).strong().color(color));
        });
    }

    fn render_class_table(&self, ui: &mut egui::Ui, stats: &StatsSnapshot) {
        let total: u64 = stats.predictions_by_class.values().sum();
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::initial(200.0).at_least(120.0))
            .column(Column::initial(100.0))
            .column(Column::remainder())
            .header(22.0, |mut header| {
                header.col(|ui| {
                    ui.strong(self.tr("Fruta", "Fruit"));
                });
                header.col(|ui| {
                    ui.strong(self.tr("Cantidad", "Count"));
                });
                header.col(|ui| {
                    ui.strong(self.tr("Proporción", "Share"));
                });
            })
            .body(|mut body| {
                for (fruit, count) in &stats.predictions_by_class {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.label(fruit);
                        });
                        row.col(|ui| {
                            ui.label(
                                egui::RichText::new(count.to_string())
                                    .strong()
                                    .color(egui::Color32::from_rgb(0xea, 0x58, 0x0c)),
                            );
                        });
                        row.col(|ui| {
                            let share = if total == 0 {
                                0.0
                            } else {
                                *count as f32 / total as f32
                            };
                            ui.add(egui::ProgressBar::new(share).show_percentage());
                        });
                    });
                }
            });
    }
}
