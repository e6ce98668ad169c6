// src/data_analysis/beam_geometry.rs

use nalgebra::{Point2, Rotation2};

use crate::types::Coord;

/// A straight beam drawn as a line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSegment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl BeamSegment {
    /// Unrotated beam: from `origin` to `origin + (length, 0)`.
    pub fn canonical(origin: Coord, length: f64) -> Self {
        Self {
            start: Point2::new(origin.0, origin.1),
            end: Point2::new(origin.0 + length, origin.1),
        }
    }

    /// Returns a copy rotated counter-clockwise by `degrees` about `pivot`.
    pub fn rotated_about(&self, pivot: Coord, degrees: f64) -> Self {
        let pivot = Point2::new(pivot.0, pivot.1);
        let rotation = Rotation2::new(degrees.to_radians());
        let turn = |p: &Point2<f64>| pivot + rotation * (p - pivot);
        Self {
            start: turn(&self.start),
            end: turn(&self.end),
        }
    }

    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.start, &self.end)
    }

    /// Endpoints as plain tuples, ready for plotting.
    pub fn points(&self) -> [Coord; 2] {
        [(self.start.x, self.start.y), (self.end.x, self.end.y)]
    }
}
