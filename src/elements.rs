//! Custom element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` 0.2 can only stroke one-point lines through
//! [`render::Area::draw_line`]. [`Canvas`] emits every filled shape as an
//! outline whose first point is repeated; [`crate::fills`] turns those outlines
//! into fills after rendering. Lines of a given width are filled quads.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::error::Error;
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Mm, Position, RenderResult, Size};

use crate::model::{HorizontalAlignment, TableSpec};
use crate::styles;

const CELL_PADDING_X_MM: f64 = 2.1;
const GRID_THICKNESS_MM: f64 = 0.18;
const CIRCLE_STEPS: usize = 24;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Anchor used when placing a line of text relative to an x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Millimetre-based drawing helper over a render area.
///
/// Coordinates are relative to the area origin with y growing downwards.
pub(crate) struct Canvas<'a, 'p> {
    area: &'a render::Area<'p>,
    font_cache: &'a FontCache,
    origin: (f64, f64),
}

impl<'a, 'p> Canvas<'a, 'p> {
    pub(crate) fn new(area: &'a render::Area<'p>, font_cache: &'a FontCache) -> Self {
        Self {
            area,
            font_cache,
            origin: (0.0, 0.0),
        }
    }

    /// Returns a canvas whose origin is shifted by `(dx, dy)`.
    pub(crate) fn offset(&self, dx: f64, dy: f64) -> Canvas<'a, 'p> {
        Canvas {
            area: self.area,
            font_cache: self.font_cache,
            origin: (self.origin.0 + dx, self.origin.1 + dy),
        }
    }

    fn position(&self, x: f64, y: f64) -> Position {
        Position::new(
            mm_from_f64(self.origin.0 + x),
            mm_from_f64(self.origin.1 + y),
        )
    }

    /// Fills a closed polygon with `color`.
    pub(crate) fn fill_polygon(&self, points: &[(f64, f64)], color: Color) {
        let Some(&(x, y)) = points.first() else {
            return;
        };
        if points.len() < 3 {
            return;
        }
        let mut positions = Vec::with_capacity(points.len() + 1);
        positions.push(self.position(x, y));
        positions.extend(points.iter().map(|&(x, y)| self.position(x, y)));
        self.area.draw_line(positions, Style::new().with_color(color));
    }

    /// Strokes a polyline `thickness` millimetres wide with rounded joins.
    pub(crate) fn stroke(&self, points: &[(f64, f64)], thickness: f64, color: Color) {
        if thickness <= 0.0 {
            return;
        }
        for pair in points.windows(2) {
            if let Some(quad) = segment_quad(pair[0], pair[1], thickness) {
                self.fill_polygon(&quad, color);
            }
        }
        if points.len() > 2 {
            for &(x, y) in &points[1..points.len() - 1] {
                self.fill_circle(x, y, thickness / 2.0, color);
            }
        }
    }

    /// Fills an axis-aligned rectangle.
    pub(crate) fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.fill_polygon(
            &[(x, y), (x + width, y), (x + width, y + height), (x, y + height)],
            color,
        );
    }

    pub(crate) fn fill_circle(&self, cx: f64, cy: f64, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let points: Vec<(f64, f64)> = (0..CIRCLE_STEPS)
            .map(|step| {
                let angle = std::f64::consts::TAU * step as f64 / CIRCLE_STEPS as f64;
                (cx + radius * angle.sin(), cy - radius * angle.cos())
            })
            .collect();
        self.fill_polygon(&points, color);
    }

    pub(crate) fn text_width(&self, text: &str, style: Style) -> f64 {
        mm_to_f64(StyledString::new(text, style).width(self.font_cache))
    }

    pub(crate) fn line_height(&self, style: Style) -> f64 {
        mm_to_f64(style.line_height(self.font_cache))
    }

    /// Prints one line of text vertically centred on `y`.
    pub(crate) fn text(
        &self,
        x: f64,
        y: f64,
        text: &str,
        style: Style,
        anchor: TextAnchor,
    ) -> Result<(), Error> {
        let width = self.text_width(text, style);
        let left = match anchor {
            TextAnchor::Start => x,
            TextAnchor::Middle => x - width / 2.0,
            TextAnchor::End => x - width,
        };
        let top = y - self.line_height(style) / 2.0;
        self.area
            .print_str(self.font_cache, self.position(left, top), style, text)?;
        Ok(())
    }
}

/// Corners of the rectangle covering a segment of the given width.
fn segment_quad(from: (f64, f64), to: (f64, f64), thickness: f64) -> Option<[(f64, f64); 4]> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.hypot(dy);
    if length <= f64::EPSILON {
        return None;
    }
    let half = thickness / 2.0;
    let (nx, ny) = (-dy / length * half, dx / length * half);
    Some([
        (from.0 + nx, from.1 + ny),
        (to.0 + nx, to.1 + ny),
        (to.0 - nx, to.1 - ny),
        (from.0 - nx, from.1 - ny),
    ])
}

/// Breaks `text` into lines no wider than `max_width`.
///
/// Explicit newlines always start a new line. A single word wider than the
/// limit is kept whole on its own line.
pub fn wrap_text<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
            }
        }
        lines.push(current);
    }
    lines
}

/// A fixed vertical gap.
///
/// At the bottom of a page the gap is truncated to the remaining space instead
/// of being carried over to the next page.
pub struct VerticalSpace {
    height: f64,
}

impl VerticalSpace {
    pub fn new(height_mm: f64) -> Self {
        Self {
            height: height_mm.max(0.0),
        }
    }
}

impl Element for VerticalSpace {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = mm_to_f64(area.size().height);
        let mut result = RenderResult::default();
        result.size = Size::new(Mm::default(), mm_from_f64(self.height.min(available)));
        Ok(result)
    }
}

/// Records the page on which the wrapped element first prints something.
///
/// The page number is read from a counter that the page decorator advances,
/// so the recorded value matches the printed footer.
pub struct PageAnchor<E> {
    inner: E,
    page: Rc<Cell<usize>>,
    slot: Rc<Cell<Option<usize>>>,
}

impl<E: Element> PageAnchor<E> {
    pub fn new(inner: E, page: Rc<Cell<usize>>, slot: Rc<Cell<Option<usize>>>) -> Self {
        Self { inner, page, slot }
    }
}

impl<E: Element> Element for PageAnchor<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let result = self.inner.render(context, area, style)?;
        if self.slot.get().is_none() && mm_to_f64(result.size.height) > 0.0 {
            self.slot.set(Some(self.page.get()));
        }
        Ok(result)
    }
}

struct LaidOutCell {
    lines: Vec<String>,
    style: Style,
    background: Option<Color>,
    alignment: HorizontalAlignment,
}

/// A table with cell backgrounds, wrapped cell text and an optional grid.
///
/// Rows never split across pages; a row that does not fit is moved to the
/// next page together with everything after it.
pub struct GridTable {
    spec: TableSpec,
    next_row: usize,
}

impl GridTable {
    pub fn new(spec: TableSpec) -> Self {
        Self { spec, next_row: 0 }
    }

    fn column_widths(&self, available: f64) -> Vec<f64> {
        let columns = self.spec.column_count();
        if columns == 0 {
            return Vec::new();
        }
        let Some(fixed) = self.spec.column_widths() else {
            return vec![available / columns as f64; columns];
        };

        let mut widths: Vec<Option<f64>> = (0..columns).map(|i| fixed.get(i).copied()).collect();
        let used: f64 = widths.iter().flatten().sum();
        let open = widths.iter().filter(|width| width.is_none()).count();
        let share = if open > 0 {
            ((available - used) / open as f64).max(0.0)
        } else {
            0.0
        };
        for width in widths.iter_mut().filter(|width| width.is_none()) {
            *width = Some(share);
        }

        let mut widths: Vec<f64> = widths.into_iter().flatten().collect();
        let total: f64 = widths.iter().sum();
        if total > available && total > 0.0 {
            let scale = available / total;
            widths.iter_mut().for_each(|width| *width *= scale);
        }
        widths
    }

    fn lay_out_row(&self, canvas: &Canvas<'_, '_>, row: usize, widths: &[f64]) -> Vec<LaidOutCell> {
        let base = Style::new().with_font_size(self.spec.font_size());
        widths
            .iter()
            .enumerate()
            .map(|(column, width)| {
                let text = self
                    .spec
                    .rows()
                    .get(row)
                    .and_then(|cells| cells.get(column))
                    .map(String::as_str)
                    .unwrap_or("");
                let fill = self.spec.fill_for(row, column);
                let mut style = base.with_color(fill.map_or(self.spec.text_color(), |f| f.text));
                if fill.map_or(false, |f| f.bold) {
                    style.set_bold();
                }
                let alignment = if row == 0 && self.spec.has_header() {
                    HorizontalAlignment::Center
                } else {
                    self.spec.column_alignment(column)
                };
                let inner = (width - 2.0 * CELL_PADDING_X_MM).max(1.0);
                let lines = wrap_text(text, inner, |candidate| canvas.text_width(candidate, style));
                LaidOutCell {
                    lines,
                    style,
                    background: fill.map(|f| f.background),
                    alignment,
                }
            })
            .collect()
    }
}

impl Element for GridTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let available_width = mm_to_f64(area.size().width);
        let available_height = mm_to_f64(area.size().height);
        let widths = self.column_widths(available_width);
        let table_width: f64 = widths.iter().sum();
        let left = ((available_width - table_width) / 2.0).max(0.0);
        let canvas = Canvas::new(&area, &context.font_cache).offset(left, 0.0);
        let padding_y = styles::pt_to_mm(self.spec.cell_padding_pt());

        let mut cursor = 0.0;
        let mut row_edges = vec![0.0];
        while self.next_row < self.spec.rows().len() {
            let cells = self.lay_out_row(&canvas, self.next_row, &widths);
            let text_height = cells
                .iter()
                .map(|cell| canvas.line_height(cell.style) * cell.lines.len() as f64)
                .fold(0.0, f64::max);
            let row_height = text_height + 2.0 * padding_y;
            if cursor + row_height > available_height {
                result.has_more = true;
                break;
            }

            let mut x = 0.0;
            for (cell, width) in cells.iter().zip(&widths) {
                if let Some(background) = cell.background {
                    canvas.fill_rect(x, cursor, *width, row_height, background);
                }
                let line_height = canvas.line_height(cell.style);
                let block_height = line_height * cell.lines.len() as f64;
                let mut y = cursor + (row_height - block_height) / 2.0 + line_height / 2.0;
                for line in &cell.lines {
                    let (anchor_x, anchor) = match cell.alignment {
                        HorizontalAlignment::Left | HorizontalAlignment::Justified => {
                            (x + CELL_PADDING_X_MM, TextAnchor::Start)
                        }
                        HorizontalAlignment::Center => (x + width / 2.0, TextAnchor::Middle),
                        HorizontalAlignment::Right => (x + width - CELL_PADDING_X_MM, TextAnchor::End),
                    };
                    canvas.text(anchor_x, y, line, cell.style, anchor)?;
                    y += line_height;
                }
                x += width;
            }

            cursor += row_height;
            row_edges.push(cursor);
            self.next_row += 1;
        }

        if let Some(grid) = self.spec.grid() {
            if row_edges.len() > 1 {
                for edge in &row_edges {
                    canvas.stroke(&[(0.0, *edge), (table_width, *edge)], GRID_THICKNESS_MM, grid);
                }
                let mut x = 0.0;
                for width in std::iter::once(&0.0).chain(widths.iter()) {
                    x += width;
                    canvas.stroke(&[(x, 0.0), (x, cursor)], GRID_THICKNESS_MM, grid);
                }
            }
        }

        result.size = Size::new(mm_from_f64(left + table_width), mm_from_f64(cursor));
        Ok(result)
    }
}
