// src/types.rs
// Type aliases shared across the reader and the animator

use ndarray::{Array2, ArrayView1};

use crate::beam_names::BEAM_COUNT;
use crate::error::BridgeError;

// The palette, legend and bar layout are all sized for four beams.
const _: () = assert!(BEAM_COUNT == 4, "BEAM_COUNT must be 4");

/// Rows are time steps, columns are beams; values in degrees.
pub type AngleMatrix = Array2<f64>;
pub type AngleRow<'a> = ArrayView1<'a, f64>;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Pixel-independent 2D point, `(x, y)`.
pub type Coord = (f64, f64);
