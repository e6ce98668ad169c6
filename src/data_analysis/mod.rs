// src/data_analysis/mod.rs

pub mod beam_geometry;
pub mod normalization;

// src/data_analysis/mod.rs
