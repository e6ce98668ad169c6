// src/animation/playback.rs

use log::warn;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;

use crate::error::BridgeError;
use crate::types::BridgeResult;

use super::frame_animator::{FrameAnimator, FrameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Constructed,
    Initialized,
    /// Index of the frame presented last.
    Rendering(usize),
    Done,
}

/// Forward-only walk over a validated frame list. Any failed render ends the playback.
#[derive(Debug)]
pub struct Playback<'a> {
    animator: &'a FrameAnimator,
    frames: Vec<usize>,
    next: usize,
    state: PlaybackState,
}

impl<'a> Playback<'a> {
    pub(crate) fn new(animator: &'a FrameAnimator, frames: Vec<usize>) -> Self {
        Self {
            animator,
            frames,
            next: 0,
            state: PlaybackState::Constructed,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn remaining(&self) -> usize {
        match self.state {
            PlaybackState::Done => 0,
            _ => self.frames.len() - self.next,
        }
    }

    pub fn init<DB: DrawingBackend>(&mut self, area: &DrawingArea<DB, Shift>) -> BridgeResult<()> {
        if self.state != PlaybackState::Constructed {
            return Err(BridgeError::InvalidTransition(format!(
                "init is only allowed once, playback is {:?}",
                self.state
            )));
        }
        if let Err(e) = self.animator.init(area) {
            warn!("Initial view failed, stopping playback: {}", e);
            self.state = PlaybackState::Done;
            return Err(e);
        }
        self.state = PlaybackState::Initialized;
        Ok(())
    }

    /// Renders and presents the next frame. Returns `None` once every frame has been shown.
    pub fn advance<DB: DrawingBackend>(
        &mut self,
        area: &DrawingArea<DB, Shift>,
    ) -> BridgeResult<Option<FrameState>> {
        match self.state {
            PlaybackState::Done => return Ok(None),
            PlaybackState::Constructed => self.init(area)?,
            PlaybackState::Initialized | PlaybackState::Rendering(_) => {}
        }

        let Some(&index) = self.frames.get(self.next) else {
            self.state = PlaybackState::Done;
            return Ok(None);
        };

        let rendered = self.animator.render_frame(area, index).and_then(|state| {
            area.present()?;
            Ok(state)
        });
        match rendered {
            Ok(state) => {
                self.next += 1;
                self.state = PlaybackState::Rendering(index);
                Ok(Some(state))
            }
            Err(e) => {
                warn!("Frame {} failed, aborting playback: {}", index, e);
                self.state = PlaybackState::Done;
                Err(e)
            }
        }
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Done;
    }
}
