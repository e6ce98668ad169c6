// src/constants.rs

use plotters::style::RGBColor;

// Figure sizes in pixels, per panel layout.
pub const FIGURE_GEOMETRY: (u32, u32) = (500, 500);
pub const FIGURE_GEOMETRY_WITH_BARS: (u32, u32) = (1500, 600);
pub const FIGURE_BARS: (u32, u32) = (1500, 600);

// Log container layout.
pub const LOG_GROUP_NAME: &str = "Log";
pub const DEFAULT_SIDE: &str = "AMR";

// Animation defaults.
pub const DEFAULT_FRAME_INTERVAL_MS: u32 = 300;
pub const DEFAULT_BEAM_LENGTH: f64 = 10.0;

// Bar summary: offset added after subtracting the row minimum so every bar stays visible.
pub const BAR_OFFSET: f64 = 0.01;
pub const BAR_TEXT_HEIGHT_FACTOR: f64 = 1.05;
pub const BAR_HEADROOM_FACTOR: f64 = 1.2;
pub const BAR_WIDTH_FRACTION: f64 = 0.5;
// Space below the baseline for beam names, as a fraction of the tallest bar.
pub const BAR_LABEL_ROOM_FACTOR: f64 = 0.2;

// Label formatting.
pub const ANGLE_LABEL_PRECISION: usize = 4;
pub const DEGREE_SIGN: char = '\u{00B0}';
pub const LEGEND_TITLE: &str = "Beam rotations:";

// Beam palette (red, blue, green, orange), picked cyclically by beam index.
pub const BEAM_PALETTE: [RGBColor; 4] = [
    RGBColor(255, 0, 0),
    RGBColor(0, 0, 255),
    RGBColor(0, 128, 0),
    RGBColor(255, 165, 0),
];
pub const COLOR_INIT_BEAM: RGBColor = RGBColor(0, 0, 255);
pub const COLOR_GRID: RGBColor = RGBColor(210, 210, 210);
pub const COLOR_TEXT: RGBColor = RGBColor(0, 0, 0);

// Stroke widths for lines
pub const LINE_WIDTH_BEAM: u32 = 3;
pub const LINE_WIDTH_LEGEND: u32 = 2;
pub const LINE_WIDTH_GRID: u32 = 1;
pub const LINE_WIDTH_SPINE: u32 = 1;

pub const GRID_DIVISIONS: usize = 5;
pub const PANEL_MARGIN_PX: u32 = 20;

// Legend placement inside the beam panel (pixels).
pub const LEGEND_ORIGIN_PX: (i32, i32) = (10, 10);
pub const LEGEND_LINE_HEIGHT_PX: i32 = 18;
pub const LEGEND_SWATCH_WIDTH_PX: i32 = 20;

// Font sizes
pub const FONT_SIZE_LEGEND: i32 = 13;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_BAR_VALUE: i32 = 12;

// src/constants.rs
