// src/lib.rs - Library interface for the log reader and the beam animator

pub mod animation;
pub mod beam_names;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod font_config;
pub mod plot_framework;
pub mod types;

pub use animation::{
    select_frames, Animation, FrameAnimator, FrameState, PanelLayout, Playback, PlaybackState,
};
pub use data_analysis::beam_geometry::BeamSegment;
pub use data_analysis::normalization::normalize_for_bars;
pub use data_input::channel_table::ChannelTable;
pub use data_input::log_reader::{channel_names, read_channels, read_log, ChannelSource};
pub use error::{BridgeError, ErrorKind};
pub use types::{AngleMatrix, BridgeResult};

// Crate version reported by the CLI.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
