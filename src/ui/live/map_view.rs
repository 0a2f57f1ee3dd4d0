use egui::{Align2, Color32, Frame, Id, RichText};
use egui_plot::{Line, MarkerShape, PlotBounds, PlotPoints, Points};

use homebound::{Coordinate, RenderState};

use crate::ui::{
    DESTINATION_COLOR, DRIVER_COLOR, MARKER_BORDER, MARKER_RADIUS, ROUTE_COLOR, ROUTE_LINE_WIDTH,
};

use super::NavigationApp;

impl NavigationApp {
    pub(crate) fn map_view(&mut self, ctx: &egui::Context, render: &RenderState) {
        egui::Area::new(Id::new("zoom-controls"))
            .anchor(Align2::RIGHT_TOP, [-10., 40.])
            .show(ctx, |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    if ui.button(RichText::new("＋").size(24.).strong()).clicked() {
                        self.navigator.zoom_in();
                    }
                    if ui.button(RichText::new("－").size(24.).strong()).clicked() {
                        self.navigator.zoom_out();
                    }
                });
            });

        egui::CentralPanel::default()
            .frame(Frame::new())
            .show(ctx, |ui| {
                let camera = &render.camera;
                // ease the visible span toward the requested zoom level
                let span = ctx.animate_value_with_time(
                    Id::new("camera-span"),
                    camera.zoom.span_degrees() as f32,
                    camera.animation_ms as f32 / 1000.,
                ) as f64;
                let bounds = camera_bounds(camera.center, span);

                let plot = egui_plot::Plot::new("map")
                    .data_aspect(longitude_aspect(camera.center) as f32)
                    .allow_drag(false)
                    .allow_scroll(false)
                    .allow_zoom(false)
                    .allow_boxed_zoom(false)
                    .show_axes(false)
                    .show_grid(false);

                plot.show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds(bounds);

                    if let Some(route_line) = &render.route_line {
                        plot_ui.line(
                            Line::new("Route", PlotPoints::new(route_line.clone()))
                                .color(ROUTE_COLOR)
                                .width(ROUTE_LINE_WIDTH),
                        );
                    }

                    plot_ui.points(marker("Destination", render.destination_marker, DESTINATION_COLOR));
                    if let Some(driver) = render.driver_marker {
                        plot_ui.points(
                            marker("Driver border", driver, Color32::WHITE)
                                .radius(MARKER_RADIUS + MARKER_BORDER),
                        );
                        plot_ui.points(marker("Driver", driver, DRIVER_COLOR));
                    }
                });
            });
    }
}

fn marker(name: &str, coordinate: Coordinate, color: Color32) -> Points<'static> {
    Points::new(name.to_string(), PlotPoints::new(vec![coordinate.lon_lat()]))
        .shape(MarkerShape::Circle)
        .filled(true)
        .radius(MARKER_RADIUS)
        .color(color)
}

/// Screen ratio between a degree of longitude and a degree of latitude.
fn longitude_aspect(center: Coordinate) -> f64 {
    1. / center.latitude.to_radians().cos().max(0.01)
}

fn camera_bounds(center: Coordinate, span: f64) -> PlotBounds {
    let half_lon = span / 2.;
    let half_lat = half_lon / longitude_aspect(center);
    PlotBounds::from_min_max(
        [center.longitude - half_lon, center.latitude - half_lat],
        [center.longitude + half_lon, center.latitude + half_lat],
    )
}
