// src/animation/recording_backend.rs
// In-memory DrawingBackend for tests: records draw calls and never touches fonts or files.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        rgb: (u8, u8, u8),
        fill: bool,
    },
    Path {
        points: Vec<BackendCoord>,
        rgb: (u8, u8, u8),
        width: u32,
    },
    Text {
        text: String,
        pos: BackendCoord,
    },
    Present,
}

pub type DrawLog = Rc<RefCell<Vec<DrawOp>>>;

pub struct RecordingBackend {
    size: (u32, u32),
    log: DrawLog,
}

impl RecordingBackend {
    pub fn new(size: (u32, u32)) -> (Self, DrawLog) {
        let log = DrawLog::default();
        (
            Self {
                size,
                log: Rc::clone(&log),
            },
            log,
        )
    }
}

type OpResult = Result<(), DrawingErrorKind<Infallible>>;

impl DrawingBackend for RecordingBackend {
    type ErrorType = Infallible;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> OpResult {
        Ok(())
    }

    fn present(&mut self) -> OpResult {
        self.log.borrow_mut().push(DrawOp::Present);
        Ok(())
    }

    fn draw_pixel(&mut self, _point: BackendCoord, _color: BackendColor) -> OpResult {
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> OpResult {
        self.log.borrow_mut().push(DrawOp::Rect {
            upper_left,
            bottom_right,
            rgb: style.color().rgb,
            fill,
        });
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> OpResult {
        self.log.borrow_mut().push(DrawOp::Path {
            points: path.into_iter().collect(),
            rgb: style.color().rgb,
            width: style.stroke_width(),
        });
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        _style: &TStyle,
        pos: BackendCoord,
    ) -> OpResult {
        self.log.borrow_mut().push(DrawOp::Text {
            text: text.to_string(),
            pos,
        });
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        _style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Infallible>> {
        Ok((text.chars().count() as u32 * 7, 12))
    }
}

/// Every text drawn so far, in order.
pub fn texts(log: &DrawLog) -> Vec<String> {
    log.borrow()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Paths drawn with the given stroke width.
pub fn paths_with_width(log: &DrawLog, width: u32) -> Vec<(Vec<BackendCoord>, (u8, u8, u8))> {
    log.borrow()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Path { points, rgb, width: w } if *w == width => Some((points.clone(), *rgb)),
            _ => None,
        })
        .collect()
}

/// Colours of all filled rectangles, background fills included.
pub fn filled_rects(log: &DrawLog) -> Vec<(u8, u8, u8)> {
    log.borrow()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Rect { rgb, fill: true, .. } => Some(*rgb),
            _ => None,
        })
        .collect()
}
