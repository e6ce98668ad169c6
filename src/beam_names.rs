/// Centralized beam naming utilities
///
/// Column names of the channel table double as bar labels in the summary panel.
pub const BEAM_COUNT: usize = 4;

/// Get all beam column names as a static array
pub const BEAM_NAMES: [&str; BEAM_COUNT] = ["B1", "B2", "B3", "B4"];

/// Get the column name for a given beam index
///
/// # Panics
/// Panics if index is greater than 3
pub fn beam_name(index: usize) -> &'static str {
    match BEAM_NAMES.get(index) {
        Some(&name) => name,
        None => panic!(
            "Invalid beam index: {}. Expected 0..{}",
            index,
            BEAM_COUNT - 1
        ),
    }
}

/// One-based display label used in legends ("Beam 1" for index 0).
pub fn beam_label(index: usize) -> String {
    format!("Beam {}", index + 1)
}

/// Name of the log channel holding beam `index` for the given side, e.g. `AMR-INC-BU1-01`.
pub fn channel_name(side: &str, index: usize) -> String {
    format!("{}-INC-BU{}-01", side, index + 1)
}
