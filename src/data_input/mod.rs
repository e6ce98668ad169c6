// src/data_input/mod.rs

pub mod channel_table;
pub mod log_reader;
pub mod tdms;

// src/data_input/mod.rs
