// src/plot_framework.rs

use plotters::backend::DrawingBackend;
use plotters::chart::ChartBuilder;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, DrawingAreaErrorKind};
use plotters::element::{PathElement, Rectangle, Text};
use plotters::series::LineSeries;
use plotters::style::colors::WHITE;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color, FontTransform, IntoFont, RGBColor, TextStyle};

use crate::constants::{
    BAR_HEADROOM_FACTOR, BAR_LABEL_ROOM_FACTOR, BAR_OFFSET, BAR_TEXT_HEIGHT_FACTOR,
    BAR_WIDTH_FRACTION, COLOR_GRID, COLOR_TEXT, FONT_SIZE_LEGEND, GRID_DIVISIONS,
    LEGEND_LINE_HEIGHT_PX, LEGEND_ORIGIN_PX, LEGEND_SWATCH_WIDTH_PX, LEGEND_TITLE,
    LINE_WIDTH_BEAM, LINE_WIDTH_GRID, LINE_WIDTH_LEGEND, LINE_WIDTH_SPINE, PANEL_MARGIN_PX,
};
use crate::font_config::{FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_BAR_VALUE, FONT_TUPLE_LEGEND};
use crate::types::Coord;

pub type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// One beam line as it should appear in the beam panel.
#[derive(Debug, Clone)]
pub struct BeamTrace {
    pub points: [Coord; 2],
    pub color: RGBColor,
    pub label: String,
}

/// One bar of the summary panel. `annotation` is printed above the bar.
#[derive(Debug, Clone)]
pub struct BarEntry {
    pub name: &'static str,
    pub height: f64,
    pub color: RGBColor,
    pub annotation: String,
}

fn text_style(font: (&'static str, i32)) -> TextStyle<'static> {
    font.into_font().color(&COLOR_TEXT)
}

/// Clears a panel before a redraw.
pub fn clear_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
    area.fill(&WHITE)
}

/// First static view: grid over `[0, extent]`, x/y axis labels and one reference beam.
pub fn draw_initial_view<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    extent: f64,
    reference_beam: &BeamTrace,
) -> DrawResult<DB> {
    clear_panel(area)?;
    let mut chart = ChartBuilder::on(area)
        .margin(PANEL_MARGIN_PX)
        .build_cartesian_2d(0.0..extent, 0.0..extent)?;

    let grid_style = COLOR_GRID.stroke_width(LINE_WIDTH_GRID);
    let step = extent / GRID_DIVISIONS as f64;
    chart.draw_series((0..=GRID_DIVISIONS).flat_map(|k| {
        let v = k as f64 * step;
        [
            PathElement::new(vec![(v, 0.0), (v, extent)], grid_style),
            PathElement::new(vec![(0.0, v), (extent, v)], grid_style),
        ]
    }))?;
    chart.draw_series(LineSeries::new(
        reference_beam.points.iter().cloned(),
        reference_beam.color.stroke_width(LINE_WIDTH_BEAM),
    ))?;

    let (width, height) = area.dim_in_pixel();
    let margin = PANEL_MARGIN_PX as i32;
    let label_style = text_style(FONT_TUPLE_AXIS_LABEL);
    area.draw(&Text::new(
        "x",
        (width as i32 / 2, height as i32 - margin + 2),
        label_style.pos(Pos::new(HPos::Center, VPos::Top)),
    ))?;
    area.draw(&Text::new(
        "y",
        (margin / 2, height as i32 / 2),
        label_style.pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    Ok(())
}

/// Draws rotated beams with the view fixed to `[0, extent]` on both axes and no axis decorations.
pub fn draw_beam_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    extent: f64,
    beams: &[BeamTrace],
) -> DrawResult<DB> {
    let mut chart = ChartBuilder::on(area)
        .margin(PANEL_MARGIN_PX)
        .build_cartesian_2d(0.0..extent, 0.0..extent)?;

    for beam in beams {
        chart.draw_series(LineSeries::new(
            beam.points.iter().cloned(),
            beam.color.stroke_width(LINE_WIDTH_BEAM),
        ))?;
    }
    draw_legend(area, beams)
}

// Legend is laid out by hand in pixel space: a title line, then one swatch and label per beam.
fn draw_legend<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, beams: &[BeamTrace]) -> DrawResult<DB> {
    let (x0, y0) = LEGEND_ORIGIN_PX;
    let style = text_style(FONT_TUPLE_LEGEND);
    area.draw(&Text::new(LEGEND_TITLE, (x0, y0), style.clone()))?;

    for (row, beam) in beams.iter().enumerate() {
        let y = y0 + (row as i32 + 1) * LEGEND_LINE_HEIGHT_PX;
        let swatch_y = y + FONT_SIZE_LEGEND / 2;
        area.draw(&PathElement::new(
            vec![(x0, swatch_y), (x0 + LEGEND_SWATCH_WIDTH_PX, swatch_y)],
            beam.color.stroke_width(LINE_WIDTH_LEGEND),
        ))?;
        area.draw(&Text::new(
            beam.label.as_str(),
            (x0 + LEGEND_SWATCH_WIDTH_PX + 6, y),
            style.clone(),
        ))?;
    }
    Ok(())
}

/// Bar summary: one bar per entry, its annotation above it and its name below the baseline.
/// Only the bottom spine is drawn; y ticks are hidden.
pub fn draw_bar_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, bars: &[BarEntry]) -> DrawResult<DB> {
    let slots = bars.len() as f64;
    let top = bars.iter().map(|b| b.height).fold(BAR_OFFSET, f64::max) * BAR_HEADROOM_FACTOR;
    let bottom = -top * BAR_LABEL_ROOM_FACTOR;

    let mut chart = ChartBuilder::on(area)
        .margin(PANEL_MARGIN_PX)
        .build_cartesian_2d(-0.5..(slots - 0.5), bottom..top)?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(-0.5, 0.0), (slots - 0.5, 0.0)],
        COLOR_TEXT.stroke_width(LINE_WIDTH_SPINE),
    )))?;

    let half_width = BAR_WIDTH_FRACTION / 2.0;
    chart.draw_series(bars.iter().enumerate().map(|(slot, bar)| {
        let x = slot as f64;
        Rectangle::new([(x - half_width, 0.0), (x + half_width, bar.height)], bar.color.filled())
    }))?;

    let value_style = text_style(FONT_TUPLE_BAR_VALUE).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.iter().enumerate().map(|(slot, bar)| {
        Text::new(
            bar.annotation.clone(),
            (slot as f64, bar.height * BAR_TEXT_HEIGHT_FACTOR),
            value_style.clone(),
        )
    }))?;

    let name_style = text_style(FONT_TUPLE_AXIS_LABEL).pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(bars.iter().enumerate().map(|(slot, bar)| {
        Text::new(bar.name, (slot as f64, bottom * 0.15), name_style.clone())
    }))?;
    chart.draw_series(std::iter::once(Text::new(
        "beam rotation",
        ((slots - 1.0) / 2.0, bottom * 0.55),
        name_style.clone(),
    )))?;

    let (_, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        "angle",
        (PANEL_MARGIN_PX as i32 / 2, height as i32 / 2),
        text_style(FONT_TUPLE_AXIS_LABEL)
            .pos(Pos::new(HPos::Center, VPos::Center))
            .transform(FontTransform::Rotate270),
    ))?;
    Ok(())
}

// src/plot_framework.rs
