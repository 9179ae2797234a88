//! Chart value objects and their vector renderers.
//!
//! Charts are described in points on a fixed drawing canvas, matching the way
//! the report lays them out: a 500 x 250 pt drawing with a 400 x 150 pt plot
//! inset 50 pt from the left and bottom edges. [`ChartElement`] draws the
//! description straight onto the page; bars, wedges, markers and swatches are
//! filled shapes.

use std::f64::consts::TAU;

use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Element, RenderResult, Size};

use crate::elements::{mm_from_f64, mm_to_f64, Canvas, TextAnchor};
use crate::styles::{self, pt_to_mm};

const AXIS_THICKNESS_PT: f64 = 0.5;
const LABEL_FONT_SIZE: u8 = 8;
const LEGEND_SWATCH_PT: f64 = 8.0;
const LEGEND_ROW_PT: f64 = 12.0;
const ARC_CHORD_MM: f64 = 0.8;

/// How value-axis and bar labels are printed: whole numbers without
/// separators, optionally with a dollar sign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueFormat {
    #[default]
    Plain,
    Dollars,
}

impl ValueFormat {
    pub fn label(self, value: f64) -> String {
        let rounded = value.round() as i64;
        match self {
            ValueFormat::Plain => rounded.to_string(),
            ValueFormat::Dollars => format!("${rounded}"),
        }
    }
}

/// Point marker drawn on line chart vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Marker {
    #[default]
    None,
    Circle,
    Square,
}

/// Linear value axis with evenly spaced ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueAxis {
    min: f64,
    max: f64,
    step: f64,
    format: ValueFormat,
}

impl ValueAxis {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            format: ValueFormat::Plain,
        }
    }

    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> ValueFormat {
        self.format
    }

    /// Tick values from `min` to `max` inclusive.
    pub fn ticks(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.max <= self.min {
            return vec![self.min];
        }
        let count = ((self.max - self.min) / self.step + 1e-9).floor() as usize;
        (0..=count)
            .map(|index| self.min + self.step * index as f64)
            .collect()
    }

    /// Position of `value` as a fraction of the axis length, clamped to `0..=1`.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// One named data series.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    name: String,
    values: Vec<f64>,
    color: Color,
    marker: Marker,
}

impl Series {
    pub fn new(name: impl Into<String>, values: impl Into<Vec<f64>>, color: Color) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
            color,
            marker: Marker::None,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Vertical bar chart with grouped or stacked series.
#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
    categories: Vec<String>,
    series: Vec<Series>,
    axis: ValueAxis,
    stacked: bool,
    value_labels: bool,
    legend: bool,
}

impl BarChart {
    pub fn new<I, S>(categories: I, axis: ValueAxis) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            series: Vec::new(),
            axis,
            stacked: false,
            value_labels: false,
            legend: false,
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Stacks the series on top of each other instead of grouping them.
    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }

    /// Prints each bar's value above it.
    pub fn with_value_labels(mut self) -> Self {
        self.value_labels = true;
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.legend = true;
        self
    }

}

/// Line chart with one polyline per series over categorical x positions.
#[derive(Clone, Debug, PartialEq)]
pub struct LineChart {
    categories: Vec<String>,
    series: Vec<Series>,
    axis: ValueAxis,
    line_width_pt: f64,
    legend: bool,
}

impl LineChart {
    pub fn new<I, S>(categories: I, axis: ValueAxis) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            series: Vec::new(),
            axis,
            line_width_pt: 2.0,
            legend: false,
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.legend = true;
        self
    }
}

/// One wedge of a pie chart.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

/// Pie chart starting at 12 o'clock and running clockwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PieChart {
    slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slice(mut self, label: impl Into<String>, value: f64, color: Color) -> Self {
        self.slices.push(PieSlice {
            label: label.into(),
            value,
            color,
        });
        self
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    /// Start and end angle of every slice in radians, clockwise from 12 o'clock.
    pub fn angles(&self) -> Vec<(f64, f64)> {
        let total: f64 = self.slices.iter().map(|slice| slice.value.max(0.0)).sum();
        if total <= 0.0 {
            return vec![(0.0, 0.0); self.slices.len()];
        }
        let mut start = 0.0;
        self.slices
            .iter()
            .map(|slice| {
                let end = start + TAU * slice.value.max(0.0) / total;
                let span = (start, end);
                start = end;
                span
            })
            .collect()
    }
}

/// Any chart the report can embed.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartSpec {
    Pie(PieChart),
    Bar(BarChart),
    Line(LineChart),
}

impl ChartSpec {
    /// Drawing size in points.
    pub fn size_pt(&self) -> (f64, f64) {
        match self {
            ChartSpec::Pie(_) => (400.0, 200.0),
            ChartSpec::Bar(_) | ChartSpec::Line(_) => (500.0, 250.0),
        }
    }
}

impl From<PieChart> for ChartSpec {
    fn from(chart: PieChart) -> Self {
        ChartSpec::Pie(chart)
    }
}

impl From<BarChart> for ChartSpec {
    fn from(chart: BarChart) -> Self {
        ChartSpec::Bar(chart)
    }
}

impl From<LineChart> for ChartSpec {
    fn from(chart: LineChart) -> Self {
        ChartSpec::Line(chart)
    }
}

/// Plot rectangle in millimetres, relative to the drawing's top-left corner.
#[derive(Clone, Copy, Debug)]
struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Plot {
    fn standard() -> Self {
        Self {
            left: pt_to_mm(50.0),
            top: pt_to_mm(50.0),
            width: pt_to_mm(400.0),
            height: pt_to_mm(150.0),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn y_for(&self, axis: &ValueAxis, value: f64) -> f64 {
        self.bottom() - axis.fraction(value) * self.height
    }

    fn band(&self, categories: usize) -> f64 {
        self.width / categories.max(1) as f64
    }
}

fn label_style() -> Style {
    Style::new()
        .with_font_size(LABEL_FONT_SIZE)
        .with_color(styles::BLACK)
}

fn draw_axes(
    canvas: &Canvas<'_, '_>,
    plot: Plot,
    axis: &ValueAxis,
    categories: &[String],
) -> Result<(), Error> {
    let thickness = pt_to_mm(AXIS_THICKNESS_PT);
    let tick = pt_to_mm(4.0);
    let style = label_style();

    canvas.stroke(
        &[(plot.left, plot.top), (plot.left, plot.bottom())],
        thickness,
        styles::BLACK,
    );
    for value in axis.ticks() {
        let y = plot.y_for(axis, value);
        canvas.stroke(&[(plot.left - tick, y), (plot.left, y)], thickness, styles::BLACK);
        canvas.text(
            plot.left - tick - pt_to_mm(2.0),
            y,
            &axis.format().label(value),
            style,
            TextAnchor::End,
        )?;
    }

    canvas.stroke(
        &[(plot.left, plot.bottom()), (plot.left + plot.width, plot.bottom())],
        thickness,
        styles::BLACK,
    );
    let band = plot.band(categories.len());
    for (index, category) in categories.iter().enumerate() {
        let x = plot.left + band * index as f64;
        canvas.stroke(&[(x, plot.bottom()), (x, plot.bottom() + tick)], thickness, styles::BLACK);
        canvas.text(
            x + band / 2.0,
            plot.bottom() + tick + pt_to_mm(6.0),
            category,
            style,
            TextAnchor::Middle,
        )?;
    }
    let right = plot.left + plot.width;
    canvas.stroke(&[(right, plot.bottom()), (right, plot.bottom() + tick)], thickness, styles::BLACK);
    Ok(())
}

/// Legend in the top right corner of the drawing, one swatch per series.
fn draw_legend(canvas: &Canvas<'_, '_>, plot: Plot, series: &[Series]) -> Result<(), Error> {
    let style = label_style();
    let swatch = pt_to_mm(LEGEND_SWATCH_PT);
    let gap = pt_to_mm(4.0);
    let widest = series
        .iter()
        .map(|entry| canvas.text_width(entry.name(), style))
        .fold(0.0, f64::max);
    let left = plot.left + plot.width - widest - swatch - gap;
    let mut y = pt_to_mm(8.0);
    for entry in series {
        canvas.fill_rect(left, y - swatch / 2.0, swatch, swatch, entry.color());
        canvas.text(left + swatch + gap, y, entry.name(), style, TextAnchor::Start)?;
        y += pt_to_mm(LEGEND_ROW_PT);
    }
    Ok(())
}

fn draw_bar_chart(canvas: &Canvas<'_, '_>, chart: &BarChart) -> Result<(), Error> {
    let plot = Plot::standard();
    let band = plot.band(chart.categories.len());
    let group = band * 0.6;
    let style = label_style();

    for index in 0..chart.categories.len() {
        let group_left = plot.left + band * index as f64 + (band - group) / 2.0;
        let mut stack_base = 0.0;
        for (series_index, series) in chart.series.iter().enumerate() {
            let Some(&value) = series.values.get(index) else {
                continue;
            };
            let (x, width, low, high) = if chart.stacked {
                let low = stack_base;
                stack_base += value;
                (group_left, group, low, stack_base)
            } else {
                let width = group / chart.series.len() as f64;
                (group_left + width * series_index as f64, width, 0.0, value)
            };
            let top = plot.y_for(&chart.axis, high);
            let bottom = plot.y_for(&chart.axis, low);
            canvas.fill_rect(x, top, width, bottom - top, series.color);
            if chart.value_labels && !chart.stacked {
                canvas.text(
                    x + width / 2.0,
                    top - pt_to_mm(6.0),
                    &chart.axis.format().label(value),
                    style,
                    TextAnchor::Middle,
                )?;
            }
        }
    }

    draw_axes(canvas, plot, &chart.axis, &chart.categories)?;
    if chart.legend {
        draw_legend(canvas, plot, &chart.series)?;
    }
    Ok(())
}

fn draw_line_chart(canvas: &Canvas<'_, '_>, chart: &LineChart) -> Result<(), Error> {
    let plot = Plot::standard();
    let band = plot.band(chart.categories.len());
    draw_axes(canvas, plot, &chart.axis, &chart.categories)?;

    for series in &chart.series {
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .take(chart.categories.len())
            .enumerate()
            .map(|(index, &value)| {
                (
                    plot.left + band * (index as f64 + 0.5),
                    plot.y_for(&chart.axis, value),
                )
            })
            .collect();
        canvas.stroke(&points, pt_to_mm(chart.line_width_pt), series.color);

        let size = pt_to_mm(5.0);
        for &(x, y) in &points {
            match series.marker {
                Marker::None => {}
                Marker::Circle => canvas.fill_circle(x, y, size / 2.0, series.color),
                Marker::Square => {
                    canvas.fill_rect(x - size / 2.0, y - size / 2.0, size, size, series.color)
                }
            }
        }
    }

    if chart.legend {
        draw_legend(canvas, plot, &chart.series)?;
    }
    Ok(())
}

fn arc_points(cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> Vec<(f64, f64)> {
    let steps = ((end - start) * radius / ARC_CHORD_MM).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|step| {
            let angle = start + (end - start) * step as f64 / steps as f64;
            (cx + radius * angle.sin(), cy - radius * angle.cos())
        })
        .collect()
}

/// Outline of a pie wedge: the centre followed by its arc.
fn wedge_points(cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> Vec<(f64, f64)> {
    let mut points = vec![(cx, cy)];
    points.extend(arc_points(cx, cy, radius, start, end));
    points
}

fn draw_pie_chart(canvas: &Canvas<'_, '_>, chart: &PieChart) -> Result<(), Error> {
    let radius = pt_to_mm(75.0);
    let (cx, cy) = (pt_to_mm(225.0), pt_to_mm(100.0));
    let style = label_style().with_font_size(9);

    for (slice, (start, end)) in chart.slices.iter().zip(chart.angles()) {
        if end > start {
            canvas.fill_polygon(&wedge_points(cx, cy, radius, start, end), slice.color);
        }
    }

    for (slice, (start, end)) in chart.slices.iter().zip(chart.angles()) {
        canvas.stroke(
            &[(cx, cy), (cx + radius * start.sin(), cy - radius * start.cos())],
            pt_to_mm(0.5),
            styles::WHITE,
        );
        let middle = (start + end) / 2.0;
        let label_radius = radius * 1.2;
        let x = cx + label_radius * middle.sin();
        let y = cy - label_radius * middle.cos();
        let anchor = if middle.sin() >= 0.0 {
            TextAnchor::Start
        } else {
            TextAnchor::End
        };
        canvas.text(x, y, &slice.label, style, anchor)?;
    }
    Ok(())
}

/// Renders a [`ChartSpec`] centred horizontally in the available width.
pub struct ChartElement {
    spec: ChartSpec,
}

impl ChartElement {
    pub fn new(spec: ChartSpec) -> Self {
        Self { spec }
    }
}

impl Element for ChartElement {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let (width_pt, height_pt) = self.spec.size_pt();
        let (width, height) = (pt_to_mm(width_pt), pt_to_mm(height_pt));
        if height > mm_to_f64(area.size().height) {
            result.has_more = true;
            return Ok(result);
        }

        let left = ((mm_to_f64(area.size().width) - width) / 2.0).max(0.0);
        let canvas = Canvas::new(&area, &context.font_cache).offset(left, 0.0);
        match &self.spec {
            ChartSpec::Pie(chart) => draw_pie_chart(&canvas, chart)?,
            ChartSpec::Bar(chart) => draw_bar_chart(&canvas, chart)?,
            ChartSpec::Line(chart) => draw_line_chart(&canvas, chart)?,
        }

        result.size = Size::new(mm_from_f64(left + width), mm_from_f64(height));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ticks_include_both_ends() {
        let axis = ValueAxis::new(0.0, 800_000.0, 200_000.0);
        assert_eq!(
            axis.ticks(),
            vec![0.0, 200_000.0, 400_000.0, 600_000.0, 800_000.0]
        );
        assert_eq!(axis.fraction(400_000.0), 0.5);
        assert_eq!(axis.fraction(900_000.0), 1.0);
    }

    #[test]
    fn labels_print_whole_numbers_without_separators() {
        assert_eq!(ValueFormat::Dollars.label(200_000.0), "$200000");
        assert_eq!(ValueFormat::Dollars.label(159_360.4), "$159360");
        assert_eq!(ValueFormat::Plain.label(250.0), "250");
    }

    #[test]
    fn pie_angles_run_clockwise_and_close() {
        let pie = PieChart::new()
            .with_slice("a", 40.0, styles::PRIMARY)
            .with_slice("b", 25.0, styles::SECONDARY)
            .with_slice("c", 20.0, styles::ACCENT)
            .with_slice("d", 15.0, styles::LIGHT);
        let angles = pie.angles();
        assert_eq!(angles[0].0, 0.0);
        assert!((angles[0].1 - TAU * 0.4).abs() < 1e-12);
        for pair in angles.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert!((angles[3].1 - TAU).abs() < 1e-9);
    }

    #[test]
    fn wedges_are_closed_at_the_centre() {
        let points = wedge_points(10.0, 10.0, 5.0, 0.0, TAU / 4.0);
        assert_eq!(points[0], (10.0, 10.0));
        assert!(points.len() >= 3);
        let last = points[points.len() - 1];
        assert!((last.0 - 15.0).abs() < 1e-9 && (last.1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn arcs_start_at_twelve_o_clock() {
        let points = arc_points(10.0, 10.0, 5.0, 0.0, TAU / 4.0);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.0 - 10.0).abs() < 1e-9 && (first.1 - 5.0).abs() < 1e-9);
        assert!((last.0 - 15.0).abs() < 1e-9 && (last.1 - 10.0).abs() < 1e-9);
    }
}
