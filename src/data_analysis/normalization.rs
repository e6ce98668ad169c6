// src/data_analysis/normalization.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt; // Import QuantileExt for .min() on array views

use crate::constants::BAR_OFFSET;
use crate::error::BridgeError;
use crate::types::{AngleRow, BridgeResult};

/// Shifts one row of angles so the smallest becomes `BAR_OFFSET`:
/// `angle - min(row) + BAR_OFFSET`. Every bar ends up strictly positive.
pub fn normalize_for_bars(row: AngleRow) -> BridgeResult<Array1<f64>> {
    if let Some(bad) = row.iter().find(|a| !a.is_finite()) {
        return Err(BridgeError::InvalidData(format!(
            "cannot normalize non-finite angle {}",
            bad
        )));
    }
    let min = *row
        .min()
        .map_err(|e| BridgeError::InvalidData(format!("cannot normalize angle row: {}", e)))?;
    Ok(row.mapv(|angle| angle - min + BAR_OFFSET))
}
