use iced::Color;

pub mod live;
pub mod trail;

/// Both views draw onto pure black: the composite accumulates light, so
/// anything brighter behind it would wash the trails out.
pub const CANVAS_BG: Color = Color::BLACK;
