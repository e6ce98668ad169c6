// src/error.rs

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Coarse classification of every failure the crate can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    IndexOutOfRange,
    ShapeMismatch,
    InvalidData,
    Render,
    Playback,
}

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The requested group does not exist in the log container.
    #[error("Group '{group}' not found in log")]
    GroupNotFound { group: String },
    /// The requested channel does not exist in the group.
    #[error("Channel '{channel}' not found in group '{group}'")]
    ChannelNotFound { group: String, channel: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The container could be read but its structure is broken or unsupported.
    #[error("Malformed TDMS container at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Frame index {index} out of range for {len} frames")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Rendering failed: {0}")]
    Render(String),
    #[error("Invalid playback transition: {0}")]
    InvalidTransition(String),
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::GroupNotFound { .. } | Self::ChannelNotFound { .. } => ErrorKind::NotFound,
            Self::Io(_) | Self::Malformed { .. } | Self::Csv(_) => ErrorKind::Io,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
            Self::InvalidData(_) => ErrorKind::InvalidData,
            Self::Render(_) => ErrorKind::Render,
            Self::InvalidTransition(_) => ErrorKind::Playback,
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for BridgeError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Render(err.to_string())
    }
}
