// src/data_input/channel_table.rs

use std::io::Write;

use ndarray::Array2;

use crate::beam_names::{BEAM_COUNT, BEAM_NAMES};
use crate::error::BridgeError;
use crate::types::{AngleMatrix, BridgeResult};

/// Beam inclination samples, one column per beam (`B1..B4`), rows in acquisition order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTable {
    columns: [Vec<f64>; BEAM_COUNT],
}

impl ChannelTable {
    /// Builds a table; every column must be non-empty and of the same length.
    pub fn new(columns: [Vec<f64>; BEAM_COUNT]) -> BridgeResult<Self> {
        let rows = columns[0].len();
        if rows == 0 {
            return Err(BridgeError::ShapeMismatch(format!(
                "column {} has no samples",
                BEAM_NAMES[0]
            )));
        }
        if let Some((index, column)) = columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != rows)
        {
            return Err(BridgeError::ShapeMismatch(format!(
                "column {} has {} samples, expected {}",
                BEAM_NAMES[index],
                column.len(),
                rows
            )));
        }
        Ok(Self { columns })
    }

    pub fn column_names() -> [&'static str; BEAM_COUNT] {
        BEAM_NAMES
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        BEAM_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|index| self.columns[index].as_slice())
    }

    /// Number of time samples.
    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns[0].is_empty()
    }

    /// One row per sample, one column per beam.
    pub fn to_angle_matrix(&self) -> AngleMatrix {
        Array2::from_shape_fn((self.len(), BEAM_COUNT), |(row, beam)| self.columns[beam][row])
    }

    /// Writes the table as CSV with a `B1,B2,B3,B4` header.
    pub fn write_csv<W: Write>(&self, writer: W) -> BridgeResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(BEAM_NAMES)?;
        for row in 0..self.len() {
            csv_writer.write_record(self.columns.iter().map(|column| column[row].to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}


// src/data_input/channel_table.rs
