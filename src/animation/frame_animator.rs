// src/animation/frame_animator.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use plotters::backend::{BitMapBackend, DrawingBackend};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::style::RGBColor;

use crate::beam_names::{beam_label, beam_name, BEAM_COUNT};
use crate::constants::{
    ANGLE_LABEL_PRECISION, BEAM_PALETTE, COLOR_INIT_BEAM, DEGREE_SIGN, FIGURE_BARS,
    FIGURE_GEOMETRY, FIGURE_GEOMETRY_WITH_BARS,
};
use crate::data_analysis::beam_geometry::BeamSegment;
use crate::data_analysis::normalization::normalize_for_bars;
use crate::error::BridgeError;
use crate::plot_framework::{
    clear_panel, draw_bar_panel, draw_beam_panel, draw_initial_view, BarEntry, BeamTrace,
};
use crate::types::{AngleMatrix, BridgeResult, Coord};

use super::playback::Playback;

/// Which panels a frame contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLayout {
    /// Rotated beams only.
    Geometry,
    /// Rotated beams on the left, bar summary on the right.
    GeometryWithBars,
    /// Bar summary only.
    Bars,
}

impl PanelLayout {
    pub fn figure_size(self) -> (u32, u32) {
        match self {
            Self::Geometry => FIGURE_GEOMETRY,
            Self::GeometryWithBars => FIGURE_GEOMETRY_WITH_BARS,
            Self::Bars => FIGURE_BARS,
        }
    }

    pub fn draws_bars(self) -> bool {
        matches!(self, Self::Bars | Self::GeometryWithBars)
    }

    pub fn default_degree_symbol(self) -> bool {
        matches!(self, Self::GeometryWithBars)
    }

    /// Short tag used in default output file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Geometry => "geometry",
            Self::GeometryWithBars => "geometry_bars",
            Self::Bars => "bars",
        }
    }
}

/// Geometry of one frame, computed without drawing anything.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub index: usize,
    pub angles: [f64; BEAM_COUNT],
    pub segments: [BeamSegment; BEAM_COUNT],
    /// Normalized bar heights, only for layouts with a bar panel.
    pub bar_heights: Option<[f64; BEAM_COUNT]>,
}

/// Handle to a finished GIF animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    path: PathBuf,
    frame_count: usize,
    interval_ms: u32,
}

impl Animation {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.frame_count as u64 * u64::from(self.interval_ms))
    }
}

/// Rotates four beams per time step and draws each step on an injected plotters surface.
#[derive(Debug, Clone)]
pub struct FrameAnimator {
    beam_length: f64,
    angles: AngleMatrix,
    origin: Coord,
    layout: PanelLayout,
    canonical: [BeamSegment; BEAM_COUNT],
    degree_symbol: bool,
}

impl FrameAnimator {
    pub fn new(
        beam_length: f64,
        angles: AngleMatrix,
        origin: Coord,
        layout: PanelLayout,
    ) -> BridgeResult<Self> {
        let (rows, cols) = angles.dim();
        if cols != BEAM_COUNT {
            return Err(BridgeError::ShapeMismatch(format!(
                "angle matrix has {} columns, expected {}",
                cols, BEAM_COUNT
            )));
        }
        if rows == 0 {
            return Err(BridgeError::ShapeMismatch(
                "angle matrix has no rows".to_string(),
            ));
        }
        if !(beam_length.is_finite() && beam_length > 0.0) {
            return Err(BridgeError::InvalidData(format!(
                "beam length must be positive and finite, got {}",
                beam_length
            )));
        }
        if !(origin.0.is_finite() && origin.1.is_finite()) {
            return Err(BridgeError::InvalidData(format!(
                "origin must be finite, got {:?}",
                origin
            )));
        }

        let canonical = std::array::from_fn(|_| BeamSegment::canonical(origin, beam_length));
        debug!(
            "Animator ready: {} frames, beam length {}, origin {:?}, layout {:?}",
            rows, beam_length, origin, layout
        );
        Ok(Self {
            beam_length,
            angles,
            origin,
            layout,
            canonical,
            degree_symbol: layout.default_degree_symbol(),
        })
    }

    /// Geometry-only animator pivoting at `(0, 0)`.
    pub fn with_defaults(beam_length: f64, angles: AngleMatrix) -> BridgeResult<Self> {
        Self::new(beam_length, angles, (0.0, 0.0), PanelLayout::Geometry)
    }

    pub fn with_degree_symbol(mut self, enabled: bool) -> Self {
        self.degree_symbol = enabled;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.angles.nrows()
    }

    pub fn layout(&self) -> PanelLayout {
        self.layout
    }

    pub fn beam_length(&self) -> f64 {
        self.beam_length
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn figure_size(&self) -> (u32, u32) {
        self.layout.figure_size()
    }

    pub fn beam_color(index: usize) -> RGBColor {
        BEAM_PALETTE[index % BEAM_PALETTE.len()]
    }

    pub fn angle_label(&self, angle: f64) -> String {
        if self.degree_symbol {
            format!("{:.*}{}", ANGLE_LABEL_PRECISION, angle, DEGREE_SIGN)
        } else {
            format!("{:.*}", ANGLE_LABEL_PRECISION, angle)
        }
    }

    pub fn frame_state(&self, index: usize) -> BridgeResult<FrameState> {
        let len = self.frame_count();
        if index >= len {
            return Err(BridgeError::IndexOutOfRange { index, len });
        }
        let row = self.angles.row(index);
        if let Some(bad) = row.iter().find(|a| !a.is_finite()) {
            return Err(BridgeError::InvalidData(format!(
                "frame {} holds non-finite angle {}",
                index, bad
            )));
        }

        let angles: [f64; BEAM_COUNT] = std::array::from_fn(|j| row[j]);
        let segments =
            std::array::from_fn(|j| self.canonical[j].rotated_about(self.origin, angles[j]));
        let bar_heights = if self.layout.draws_bars() {
            let normalized = normalize_for_bars(row)?;
            Some(std::array::from_fn(|j| normalized[j]))
        } else {
            None
        };

        Ok(FrameState {
            index,
            angles,
            segments,
            bar_heights,
        })
    }

    /// Clears `area` and draws frame `index`. Nothing is drawn for an invalid index.
    pub fn render_frame<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        index: usize,
    ) -> BridgeResult<FrameState> {
        let state = self.frame_state(index)?;
        self.draw_state(area, &state)?;
        Ok(state)
    }

    fn draw_state<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        state: &FrameState,
    ) -> BridgeResult<()> {
        clear_panel(area)?;
        match self.layout {
            PanelLayout::Geometry => self.draw_geometry(area, state)?,
            PanelLayout::Bars => self.draw_bars(area, state)?,
            PanelLayout::GeometryWithBars => {
                let panels = area.split_evenly((1, 2));
                self.draw_geometry(&panels[0], state)?;
                self.draw_bars(&panels[1], state)?;
            }
        }
        Ok(())
    }

    /// Initial static view drawn before the first frame.
    pub fn init<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> BridgeResult<()> {
        match self.layout {
            PanelLayout::Geometry => {
                let reference = BeamTrace {
                    points: self.canonical[0].points(),
                    color: COLOR_INIT_BEAM,
                    label: beam_label(0),
                };
                draw_initial_view(area, self.beam_length, &reference)?;
            }
            PanelLayout::GeometryWithBars | PanelLayout::Bars => clear_panel(area)?,
        }
        Ok(())
    }

    /// Playback over `frames` (all rows when `None`). Every index is checked here.
    pub fn playback(&self, frames: Option<Vec<usize>>) -> BridgeResult<Playback<'_>> {
        let len = self.frame_count();
        let frames = frames.unwrap_or_else(|| (0..len).collect());
        if frames.is_empty() {
            return Err(BridgeError::InvalidData("no frames selected".to_string()));
        }
        if let Some(&index) = frames.iter().find(|&&i| i >= len) {
            return Err(BridgeError::IndexOutOfRange { index, len });
        }
        Ok(Playback::new(self, frames))
    }

    /// Renders the selected frames into a GIF at `output`, one GIF frame every `interval_ms`.
    pub fn animate(
        &self,
        output: impl AsRef<Path>,
        interval_ms: u32,
        frames: Option<Vec<usize>>,
    ) -> BridgeResult<Animation> {
        let output = output.as_ref();
        let mut playback = self.playback(frames)?;
        let root = BitMapBackend::gif(output, self.figure_size(), interval_ms)
            .map_err(|e| BridgeError::Render(e.to_string()))?
            .into_drawing_area();

        playback.init(&root)?;
        let mut rendered = 0;
        while let Some(state) = playback.advance(&root)? {
            debug!("Rendered frame {}", state.index);
            rendered += 1;
        }
        info!(
            "Wrote {} frames to {} at {} ms per frame",
            rendered,
            output.display(),
            interval_ms
        );
        Ok(Animation {
            path: output.to_path_buf(),
            frame_count: rendered,
            interval_ms,
        })
    }

    /// Writes frame `index` as a single PNG.
    pub fn render_png(&self, output: impl AsRef<Path>, index: usize) -> BridgeResult<FrameState> {
        let output = output.as_ref();
        // The bitmap backend writes its file on drop, so the frame is checked first.
        let state = self.frame_state(index)?;
        let root = BitMapBackend::new(output, self.figure_size()).into_drawing_area();
        self.draw_state(&root, &state)?;
        root.present()?;
        info!("Wrote frame {} to {}", index, output.display());
        Ok(state)
    }

    fn draw_geometry<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        state: &FrameState,
    ) -> BridgeResult<()> {
        let beams: Vec<BeamTrace> = state
            .segments
            .iter()
            .zip(state.angles)
            .enumerate()
            .map(|(j, (segment, angle))| BeamTrace {
                points: segment.points(),
                color: Self::beam_color(j),
                label: format!("{}: {}", beam_label(j), self.angle_label(angle)),
            })
            .collect();
        draw_beam_panel(area, self.beam_length, &beams)?;
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        state: &FrameState,
    ) -> BridgeResult<()> {
        let Some(heights) = state.bar_heights else {
            return Err(BridgeError::InvalidData(format!(
                "frame {} has no bar heights",
                state.index
            )));
        };
        let bars: Vec<BarEntry> = heights
            .iter()
            .zip(state.angles)
            .enumerate()
            .map(|(j, (&height, angle))| BarEntry {
                name: beam_name(j),
                height,
                color: Self::beam_color(j),
                annotation: self.angle_label(angle),
            })
            .collect();
        draw_bar_panel(area, &bars)?;
        Ok(())
    }
}

/// Frame indices `start, start + step, ...` below `end` (or `total` when `end` is `None`).
pub fn select_frames(
    start: usize,
    end: Option<usize>,
    step: usize,
    total: usize,
) -> BridgeResult<Vec<usize>> {
    if step == 0 {
        return Err(BridgeError::InvalidData("frame step must be at least 1".to_string()));
    }
    let end = end.unwrap_or(total);
    if end > total {
        return Err(BridgeError::IndexOutOfRange {
            index: end - 1,
            len: total,
        });
    }
    if start >= end {
        return Err(BridgeError::InvalidData(format!(
            "empty frame selection {}..{}",
            start, end
        )));
    }
    Ok((start..end).step_by(step).collect())
}
