//! Standalone PNG line chart of projected revenue.
//!
//! Drawn with `tiny-skia`; labels are glyph outlines from the resolved report
//! font. Without a font the chart is still drawn, just without text.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tiny_skia::{
    FillRule, LineCap, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Stroke, StrokeDash,
    Transform,
};
use ttf_parser::{Face, OutlineBuilder};

use crate::content::projections;
use crate::error::ReportError;
use crate::fonts;
use crate::format::dollars;

/// File written by [`render_revenue_chart`], relative to the working directory.
pub const REVENUE_CHART_FILE: &str = "revenue_growth.png";

/// 8 x 5 inches at 300 dpi.
pub const WIDTH_PX: u32 = 2400;
pub const HEIGHT_PX: u32 = 1500;

const PX_PER_PT: f32 = 300.0 / 72.0;
const REVENUE_STEP: f64 = 100_000.0;

const LINE_RGB: (u8, u8, u8) = (0x02, 0x84, 0xc7);
const GRID_RGBA: (u8, u8, u8, u8) = (0xb0, 0xb0, 0xb0, 0xb3);

/// Plot rectangle in pixels.
#[derive(Clone, Copy, Debug)]
struct PlotArea {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl PlotArea {
    const DEFAULT: Self = Self {
        left: 340.0,
        top: 150.0,
        right: 2330.0,
        bottom: 1290.0,
    };

    fn x(&self, fraction: f64) -> f32 {
        self.left + (self.right - self.left) * fraction as f32
    }

    fn y(&self, fraction: f64) -> f32 {
        self.bottom - (self.bottom - self.top) * fraction as f32
    }
}

/// Rounds the data range outwards to whole steps.
fn value_bounds(values: &[f64], step: f64) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, step);
    }
    let low = (min / step).floor() * step;
    let mut high = (max / step).ceil() * step;
    if high <= low {
        high = low + step;
    }
    (low, high)
}

/// Fraction along the x axis for the zero-based point `index` of `count`,
/// leaving half a gap of padding on both sides.
fn x_fraction(index: usize, count: usize) -> f64 {
    const PAD: f64 = 0.05;
    if count < 2 {
        return 0.5;
    }
    PAD + (1.0 - 2.0 * PAD) * index as f64 / (count - 1) as f64
}

fn pt(points: f32) -> f32 {
    points * PX_PER_PT
}

fn paint(r: u8, g: u8, b: u8, a: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn black() -> Paint<'static> {
    paint(0, 0, 0, 255)
}

fn line_path(points: &[(f32, f32)]) -> Option<SkPath> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.0, first.1);
    for &(x, y) in rest {
        builder.line_to(x, y);
    }
    builder.finish()
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        ..Stroke::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
    End,
}

/// Converts glyph outlines (y up, font units) into pixmap paths (y down).
struct GlyphPath {
    builder: PathBuilder,
    x: f32,
    y: f32,
    scale: f32,
}

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder
            .move_to(self.x + x * self.scale, self.y - y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder
            .line_to(self.x + x * self.scale, self.y - y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.x + x1 * self.scale,
            self.y - y1 * self.scale,
            self.x + x * self.scale,
            self.y - y * self.scale,
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.x + x1 * self.scale,
            self.y - y1 * self.scale,
            self.x + x2 * self.scale,
            self.y - y2 * self.scale,
            self.x + x * self.scale,
            self.y - y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Regular and bold faces used for chart labels.
struct Labels<'a> {
    regular: Face<'a>,
    bold: Face<'a>,
}

impl<'a> Labels<'a> {
    fn parse(regular: &'a [u8], bold: &'a [u8]) -> Option<Self> {
        let regular = Face::parse(regular, 0).ok()?;
        let bold = Face::parse(bold, 0).ok()?;
        Some(Self { regular, bold })
    }
}

fn text_width(face: &Face<'_>, text: &str, size: f32) -> f32 {
    let scale = size / f32::from(face.units_per_em().max(1));
    text.chars()
        .map(|ch| {
            face.glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .map_or(size * 0.5, |advance| f32::from(advance) * scale)
        })
        .sum()
}

/// Draws `text` with its baseline at `y`, optionally rotated about the anchor.
#[allow(clippy::too_many_arguments)]
fn draw_text(
    pixmap: &mut Pixmap,
    face: &Face<'_>,
    text: &str,
    size: f32,
    x: f32,
    y: f32,
    anchor: Anchor,
    rotation: f32,
) {
    let width = text_width(face, text, size);
    let start = match anchor {
        Anchor::Start => x,
        Anchor::Middle => x - width / 2.0,
        Anchor::End => x - width,
    };
    let scale = size / f32::from(face.units_per_em().max(1));
    let transform = Transform::from_rotate_at(rotation, x, y);
    let ink = black();

    let mut pen = start;
    for ch in text.chars() {
        let Some(glyph) = face.glyph_index(ch) else {
            pen += size * 0.5;
            continue;
        };
        let mut outline = GlyphPath {
            builder: PathBuilder::new(),
            x: pen,
            y,
            scale,
        };
        if face.outline_glyph(glyph, &mut outline).is_some() {
            if let Some(path) = outline.builder.finish() {
                pixmap.fill_path(&path, &ink, FillRule::Winding, transform, None);
            }
        }
        pen += face
            .glyph_hor_advance(glyph)
            .map_or(size * 0.5, |advance| f32::from(advance) * scale);
    }
}

fn draw_grid(pixmap: &mut Pixmap, plot: PlotArea, x_fractions: &[f64], y_fractions: &[f64]) {
    let (r, g, b, a) = GRID_RGBA;
    let grid_paint = paint(r, g, b, a);
    let mut grid_stroke = stroke(pt(0.8));
    grid_stroke.line_cap = LineCap::Butt;
    grid_stroke.dash = StrokeDash::new(vec![pt(3.7), pt(1.6)], 0.0);

    let verticals = x_fractions
        .iter()
        .map(|&fx| [(plot.x(fx), plot.top), (plot.x(fx), plot.bottom)]);
    let horizontals = y_fractions
        .iter()
        .map(|&fy| [(plot.left, plot.y(fy)), (plot.right, plot.y(fy))]);
    for segment in verticals.chain(horizontals) {
        if let Some(path) = line_path(&segment) {
            pixmap.stroke_path(&path, &grid_paint, &grid_stroke, Transform::identity(), None);
        }
    }
}

fn draw_frame(pixmap: &mut Pixmap, plot: PlotArea) {
    let Some(rect) = Rect::from_ltrb(plot.left, plot.top, plot.right, plot.bottom) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut frame = stroke(pt(0.8));
    frame.line_cap = LineCap::Butt;
    pixmap.stroke_path(&path, &black(), &frame, Transform::identity(), None);
}

fn draw_series(pixmap: &mut Pixmap, points: &[(f32, f32)]) {
    let (r, g, b) = LINE_RGB;
    let series_paint = paint(r, g, b, 255);
    if let Some(path) = line_path(points) {
        pixmap.stroke_path(&path, &series_paint, &stroke(pt(2.0)), Transform::identity(), None);
    }
    for &(x, y) in points {
        if let Some(marker) = PathBuilder::from_circle(x, y, pt(4.0)) {
            pixmap.fill_path(&marker, &series_paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

fn draw_labels(
    pixmap: &mut Pixmap,
    labels: &Labels<'_>,
    plot: PlotArea,
    x_ticks: &[(f64, String)],
    y_ticks: &[(f64, String)],
) {
    let tick_size = pt(10.0);
    for (fx, label) in x_ticks {
        draw_text(
            pixmap,
            &labels.regular,
            label,
            tick_size,
            plot.x(*fx),
            plot.bottom + pt(3.5) + tick_size,
            Anchor::Middle,
            0.0,
        );
    }
    for (fy, label) in y_ticks {
        draw_text(
            pixmap,
            &labels.regular,
            label,
            tick_size,
            plot.left - pt(3.5),
            plot.y(*fy) + tick_size * 0.35,
            Anchor::End,
            0.0,
        );
    }

    let center_x = (plot.left + plot.right) / 2.0;
    let center_y = (plot.top + plot.bottom) / 2.0;
    draw_text(
        pixmap,
        &labels.bold,
        "Projected Revenue Growth",
        pt(14.0),
        center_x,
        plot.top - pt(8.0),
        Anchor::Middle,
        0.0,
    );
    draw_text(
        pixmap,
        &labels.regular,
        "Year",
        pt(12.0),
        center_x,
        plot.bottom + pt(34.0),
        Anchor::Middle,
        0.0,
    );
    draw_text(
        pixmap,
        &labels.regular,
        "Revenue ($)",
        pt(12.0),
        pt(16.0),
        center_y,
        Anchor::Middle,
        -90.0,
    );
}

/// Renders the revenue line chart for `revenue` (one value per year) as PNG bytes.
pub fn revenue_chart_png(revenue: &[f64]) -> Result<Vec<u8>, ReportError> {
    let mut pixmap = Pixmap::new(WIDTH_PX, HEIGHT_PX)
        .ok_or_else(|| ReportError::Chart(format!("cannot allocate a {WIDTH_PX}x{HEIGHT_PX} canvas")))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let plot = PlotArea::DEFAULT;
    let (low, high) = value_bounds(revenue, REVENUE_STEP);
    let steps = ((high - low) / REVENUE_STEP).round() as usize;
    let y_ticks: Vec<(f64, String)> = (0..=steps)
        .map(|step| {
            let value = low + step as f64 * REVENUE_STEP;
            ((value - low) / (high - low), dollars(value as i64))
        })
        .collect();
    let x_ticks: Vec<(f64, String)> = (0..revenue.len())
        .map(|index| (x_fraction(index, revenue.len()), (index + 1).to_string()))
        .collect();
    let points: Vec<(f32, f32)> = revenue
        .iter()
        .enumerate()
        .map(|(index, value)| {
            (
                plot.x(x_fraction(index, revenue.len())),
                plot.y((value - low) / (high - low)),
            )
        })
        .collect();

    let x_fractions: Vec<f64> = x_ticks.iter().map(|(fraction, _)| *fraction).collect();
    let y_fractions: Vec<f64> = y_ticks.iter().map(|(fraction, _)| *fraction).collect();
    draw_grid(&mut pixmap, plot, &x_fractions, &y_fractions);
    draw_frame(&mut pixmap, plot);
    draw_series(&mut pixmap, &points);

    match fonts::raster_font_bytes() {
        Ok((regular, bold)) => match Labels::parse(&regular, &bold) {
            Some(labels) => draw_labels(&mut pixmap, &labels, plot, &x_ticks, &y_ticks),
            None => warn!("Revenue chart font could not be parsed; drawing without labels"),
        },
        Err(err) => warn!("Drawing revenue chart without labels: {}", err),
    }

    pixmap
        .encode_png()
        .map_err(|err| ReportError::Chart(err.to_string()))
}

/// Writes the revenue chart to `path`, replacing any existing file.
pub fn render_revenue_chart_to(path: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
    let path = path.as_ref().to_path_buf();
    let png = revenue_chart_png(&projections::revenue_growth_series())?;
    fs::write(&path, png).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!("Revenue chart written to {}", path.display());
    Ok(path)
}

/// Writes the revenue chart to [`REVENUE_CHART_FILE`].
pub fn render_revenue_chart() -> Result<PathBuf, ReportError> {
    render_revenue_chart_to(REVENUE_CHART_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_round_outwards_to_whole_steps() {
        let series = projections::revenue_growth_series();
        assert_eq!(value_bounds(&series, REVENUE_STEP), (100_000.0, 800_000.0));
        assert_eq!(value_bounds(&[], REVENUE_STEP), (0.0, REVENUE_STEP));
        assert_eq!(value_bounds(&[300_000.0], REVENUE_STEP), (300_000.0, 400_000.0));
    }

    #[test]
    fn points_are_padded_inside_the_plot() {
        assert!((x_fraction(0, 4) - 0.05).abs() < 1e-9);
        assert!((x_fraction(3, 4) - 0.95).abs() < 1e-9);
        assert_eq!(x_fraction(0, 1), 0.5);
    }

    #[test]
    fn plot_y_grows_upwards() {
        let plot = PlotArea::DEFAULT;
        assert!(plot.y(1.0) < plot.y(0.0));
        assert_eq!(plot.y(0.0), plot.bottom);
    }

    #[test]
    fn series_is_drawn_in_line_colour() {
        let mut pixmap = Pixmap::new(200, 200).expect("pixmap");
        pixmap.fill(tiny_skia::Color::WHITE);
        draw_series(&mut pixmap, &[(20.0, 100.0), (180.0, 100.0)]);
        let pixel = pixmap.pixel(100, 100).expect("inside pixmap");
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), LINE_RGB);
    }
}
