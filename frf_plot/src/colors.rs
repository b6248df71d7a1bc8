use plotters::style::RGBColor;

/// Frequency response line and primary axis
pub const LIGHT_BLUE: RGBColor = RGBColor(0x1d, 0xa5, 0xe2);
/// Damping markers and secondary axis
pub const MARKER_ORANGE: RGBColor = RGBColor(0xf2, 0x8c, 0x28);
pub const GRID_GREY: RGBColor = RGBColor(0x3a, 0x3a, 0x3a);
