use egui::Color32;

pub(crate) mod live;

pub(crate) const ROUTE_COLOR: Color32 = Color32::from_rgb(0x1D, 0x6E, 0xD3);
pub(crate) const DRIVER_COLOR: Color32 = Color32::from_rgb(0x1D, 0x6E, 0xD3);
pub(crate) const DESTINATION_COLOR: Color32 = Color32::from_rgb(0xD3, 0x3A, 0x1D);
pub(crate) const SHEET_COLOR: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 221);

pub(crate) const ROUTE_LINE_WIDTH: f32 = 5.;
pub(crate) const MARKER_RADIUS: f32 = 8.;
pub(crate) const MARKER_BORDER: f32 = 2.;
