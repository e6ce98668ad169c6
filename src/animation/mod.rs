// src/animation/mod.rs

pub mod frame_animator;
pub mod playback;

#[cfg(test)]
pub(crate) mod recording_backend;

pub use frame_animator::{select_frames, Animation, FrameAnimator, FrameState, PanelLayout};
pub use playback::{Playback, PlaybackState};

// src/animation/mod.rs
