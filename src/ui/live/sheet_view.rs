use egui::{Frame, Image, Margin, RichText, ScrollArea, Vec2};

use homebound::RenderState;

use crate::ui::SHEET_COLOR;

use super::NavigationApp;

const PORTRAIT_SIZE: f32 = 50.;
const DIRECTIONS_MAX_HEIGHT: f32 = 140.;

impl NavigationApp {
    pub(crate) fn sheet_view(&mut self, ctx: &egui::Context, render: &RenderState) {
        egui::TopBottomPanel::bottom("eta-sheet")
            .frame(Frame::new().fill(SHEET_COLOR).inner_margin(Margin::same(10)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(url) = &self.app_config.driver_image_url {
                        ui.add(
                            Image::from_uri(url.clone())
                                .fit_to_exact_size(Vec2::splat(PORTRAIT_SIZE))
                                .corner_radius(PORTRAIT_SIZE / 2.),
                        );
                        ui.add_space(10.);
                    }
                    ui.vertical(|ui| {
                        ui.label(RichText::new("Arriving shortly").size(16.).strong());
                        ui.label(RichText::new(format!("ETA: {}", render.eta_text)).size(14.));
                    });
                });
            });

        // panels added later stack above the ETA sheet
        if !render.directions.is_empty() {
            egui::TopBottomPanel::bottom("directions")
                .frame(Frame::new().fill(egui::Color32::WHITE).inner_margin(Margin::same(8)))
                .show(ctx, |ui| {
                    ScrollArea::vertical()
                        .max_height(DIRECTIONS_MAX_HEIGHT)
                        .show(ui, |ui| {
                            for instruction in &render.directions {
                                ui.label(RichText::new(format!("• {}", instruction)).size(12.));
                            }
                        });
                });
        }
    }
}
