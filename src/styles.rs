//! Named paragraph presets and the report colour palette.
//!
//! Sizes are given in points and spacing in millimetres so the presets can be
//! compared directly with the typographic scale of the printed report.

use genpdf::style::{Color, Style};

use crate::model::HorizontalAlignment;

/// Brand blue used for headings, table headers and the first chart series.
pub const PRIMARY: Color = Color::Rgb(0x02, 0x84, 0xc7);
/// Second chart series colour.
pub const SECONDARY: Color = Color::Rgb(0x0e, 0xa5, 0xe9);
/// Third chart series colour.
pub const ACCENT: Color = Color::Rgb(0x7d, 0xd3, 0xfc);
/// Pale blue used for the first column of data tables.
pub const LIGHT: Color = Color::Rgb(0xf0, 0xf9, 0xff);
/// Title and heading brown.
pub const DARK_BROWN: Color = Color::Rgb(0x5a, 0x3e, 0x00);
pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const BLACK: Color = Color::Rgb(0x00, 0x00, 0x00);
/// Grid lines and total-row shading.
pub const LIGHT_GREY: Color = Color::Rgb(0xd3, 0xd3, 0xd3);
/// Caption text.
pub const DARK_GREY: Color = Color::Rgb(0xa9, 0xa9, 0xa9);
/// Footer and chart axis text.
pub const MID_GREY: Color = Color::Rgb(0x6b, 0x6b, 0x6b);

const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Converts typographic points to millimetres.
pub fn pt_to_mm(points: f64) -> f64 {
    points * MM_PER_POINT
}

/// The named text presets used across the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Title,
    Subtitle,
    Heading2,
    Heading3,
    Normal,
    Emphasis,
    Quote,
    Caption,
}

/// Resolved formatting for a [`TextStyle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: u8,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub space_before_mm: f64,
    pub space_after_mm: f64,
    pub alignment: HorizontalAlignment,
    pub left_indent_mm: f64,
    pub right_indent_mm: f64,
}

impl ParagraphStyle {
    const fn body(font_size: u8, color: Color) -> Self {
        Self {
            font_size,
            bold: false,
            italic: false,
            color,
            space_before_mm: 0.0,
            space_after_mm: 0.0,
            alignment: HorizontalAlignment::Justified,
            left_indent_mm: 0.0,
            right_indent_mm: 0.0,
        }
    }

    /// Builds the `genpdf` character style for this preset.
    pub fn text_style(&self) -> Style {
        let mut style = Style::new()
            .with_font_size(self.font_size)
            .with_color(self.color);
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

impl TextStyle {
    /// Returns the formatting associated with the preset.
    pub fn preset(self) -> ParagraphStyle {
        let normal = ParagraphStyle {
            space_before_mm: pt_to_mm(3.0),
            space_after_mm: pt_to_mm(3.0),
            ..ParagraphStyle::body(11, BLACK)
        };

        match self {
            TextStyle::Title => ParagraphStyle {
                bold: true,
                space_after_mm: pt_to_mm(24.0),
                alignment: HorizontalAlignment::Center,
                ..ParagraphStyle::body(24, DARK_BROWN)
            },
            TextStyle::Subtitle => ParagraphStyle {
                space_after_mm: pt_to_mm(12.0),
                alignment: HorizontalAlignment::Center,
                ..ParagraphStyle::body(18, PRIMARY)
            },
            TextStyle::Heading2 => ParagraphStyle {
                bold: true,
                space_before_mm: pt_to_mm(12.0),
                space_after_mm: pt_to_mm(8.0),
                alignment: HorizontalAlignment::Left,
                ..ParagraphStyle::body(16, DARK_BROWN)
            },
            TextStyle::Heading3 => ParagraphStyle {
                bold: true,
                space_before_mm: pt_to_mm(10.0),
                space_after_mm: pt_to_mm(6.0),
                alignment: HorizontalAlignment::Left,
                ..ParagraphStyle::body(14, PRIMARY)
            },
            TextStyle::Normal => normal,
            TextStyle::Emphasis => ParagraphStyle {
                bold: true,
                color: DARK_BROWN,
                ..normal
            },
            TextStyle::Quote => ParagraphStyle {
                font_size: 12,
                italic: true,
                color: PRIMARY,
                space_before_mm: pt_to_mm(12.0),
                space_after_mm: pt_to_mm(12.0),
                left_indent_mm: pt_to_mm(20.0),
                right_indent_mm: pt_to_mm(20.0),
                ..normal
            },
            TextStyle::Caption => ParagraphStyle {
                font_size: 10,
                italic: true,
                color: DARK_GREY,
                space_before_mm: pt_to_mm(4.0),
                space_after_mm: pt_to_mm(16.0),
                alignment: HorizontalAlignment::Center,
                ..normal
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_are_larger_than_body_text() {
        let normal = TextStyle::Normal.preset().font_size;
        assert!(TextStyle::Heading3.preset().font_size > normal);
        assert!(TextStyle::Heading2.preset().font_size > TextStyle::Heading3.preset().font_size);
        assert!(TextStyle::Title.preset().font_size > TextStyle::Subtitle.preset().font_size);
    }

    #[test]
    fn quote_is_indented_on_both_sides() {
        let quote = TextStyle::Quote.preset();
        assert!(quote.left_indent_mm > 7.0 && quote.left_indent_mm < 7.1);
        assert_eq!(quote.left_indent_mm, quote.right_indent_mm);
        assert!(quote.text_style().is_italic());
    }

    #[test]
    fn emphasis_inherits_normal_spacing() {
        let normal = TextStyle::Normal.preset();
        let emphasis = TextStyle::Emphasis.preset();
        assert_eq!(normal.space_after_mm, emphasis.space_after_mm);
        assert!(emphasis.text_style().is_bold());
        assert_eq!(emphasis.text_style().color(), Some(DARK_BROWN));
    }
}
