// src/font_config.rs

// Font styles shared by the beam and bar panels.

use crate::constants::{FONT_SIZE_AXIS_LABEL, FONT_SIZE_BAR_VALUE, FONT_SIZE_LEGEND};

/// Font family name for default system fonts.
/// When plotters renders with "sans-serif", it uses system fonts
pub const FONT_FAMILY_SYSTEM: &str = "sans-serif";

// Tuple representations for use with plotters' IntoFont trait
pub const FONT_TUPLE_LEGEND: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_LEGEND);
pub const FONT_TUPLE_AXIS_LABEL: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_AXIS_LABEL);
pub const FONT_TUPLE_BAR_VALUE: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_BAR_VALUE);
