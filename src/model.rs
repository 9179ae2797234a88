//! Data structures describing the logical content of the report.
//!
//! The model does not reference `genpdf` elements directly. Content modules
//! build [`Cover`] and [`Section`] values out of [`Block`]s and the layout
//! layer turns them into renderable elements.

use genpdf::style::Color;

use crate::charts::ChartSpec;
use crate::richtext::{self, ParseError, Span};
use crate::styles::{self, TextStyle};

/// Horizontal placement of paragraphs and table cells.
///
/// `genpdf` has no justified text, so [`HorizontalAlignment::Justified`] is
/// laid out flush left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left | HorizontalAlignment::Justified => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Rich text paragraph rendered with one of the named text presets.
#[derive(Clone, Debug, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    style: TextStyle,
}

impl RichParagraph {
    /// Creates a paragraph from the provided spans using the given preset.
    pub fn new(spans: impl Into<Vec<Span>>, style: TextStyle) -> Self {
        Self {
            spans: spans.into(),
            style,
        }
    }

    /// Parses inline markup into a paragraph.
    pub fn markup(text: &str, style: TextStyle) -> Result<Self, ParseError> {
        Ok(Self::new(richtext::parse_markup(text)?, style))
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Alignment of the paragraph's preset.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.style.preset().alignment
    }
}

/// A bulleted list where each item is a run of spans.
#[derive(Clone, Debug, PartialEq)]
pub struct BulletList {
    items: Vec<Vec<Span>>,
}

impl BulletList {
    /// Parses every item as inline markup.
    pub fn from_markup<'a, I>(items: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let items = items
            .into_iter()
            .map(richtext::parse_markup)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Vec<Span>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Background and text colour of a highlighted table region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFill {
    pub background: Color,
    pub text: Color,
    pub bold: bool,
}

impl CellFill {
    pub const fn new(background: Color, text: Color, bold: bool) -> Self {
        Self {
            background,
            text,
            bold,
        }
    }
}

/// A rectangular data table.
///
/// The first row of `rows` is the header. Highlighting is applied in the
/// order header, first column, last column, last row, so a later region
/// overrides an earlier one where they overlap.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    rows: Vec<Vec<String>>,
    column_widths: Option<Vec<f64>>,
    column_alignments: Vec<HorizontalAlignment>,
    header: Option<CellFill>,
    first_column: Option<CellFill>,
    last_column: Option<CellFill>,
    last_row: Option<CellFill>,
    grid: Option<Color>,
    text_color: Color,
    font_size: u8,
    cell_padding_pt: f64,
}

impl TableSpec {
    /// Creates a table with a styled header row and a light grey grid.
    pub fn new<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut column_alignments = vec![HorizontalAlignment::Center; columns];
        if let Some(first) = column_alignments.first_mut() {
            *first = HorizontalAlignment::Left;
        }
        Self {
            rows,
            column_widths: None,
            column_alignments,
            header: Some(CellFill::new(styles::PRIMARY, styles::WHITE, true)),
            first_column: None,
            last_column: None,
            last_row: None,
            grid: Some(styles::LIGHT_GREY),
            text_color: styles::BLACK,
            font_size: 10,
            cell_padding_pt: 3.0,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.column_alignments.len()
    }

    /// Fixed column widths in millimetres, if set.
    pub fn column_widths(&self) -> Option<&[f64]> {
        self.column_widths.as_deref()
    }

    pub fn column_alignment(&self, column: usize) -> HorizontalAlignment {
        self.column_alignments
            .get(column)
            .copied()
            .unwrap_or_default()
    }

    pub fn grid(&self) -> Option<Color> {
        self.grid
    }

    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Padding above and below the text of every cell, in points.
    pub fn cell_padding_pt(&self) -> f64 {
        self.cell_padding_pt
    }

    /// Whether the first row is drawn as a header.
    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Resolves the highlight for one cell, if any region covers it.
    pub fn fill_for(&self, row: usize, column: usize) -> Option<CellFill> {
        let last_row = self.rows.len().saturating_sub(1);
        let last_column = self.column_count().saturating_sub(1);
        let body = row > 0 || self.header.is_none();
        let mut fill = None;
        if row == 0 {
            fill = self.header.or(fill);
        }
        if column == 0 && body {
            fill = self.first_column.or(fill);
        }
        if column == last_column && body {
            fill = self.last_column.or(fill);
        }
        if row == last_row && row > 0 {
            fill = self.last_row.or(fill);
        }
        fill
    }

    /// Text colour for a cell without a highlight.
    pub fn text_color(&self) -> Color {
        self.text_color
    }

    /// Fixes the column widths in inches. The table is centred when narrower
    /// than the frame; missing columns share the remaining frame width.
    pub fn with_column_widths_in(mut self, widths: &[f64]) -> Self {
        self.column_widths = Some(widths.iter().map(|inches| inches * 25.4).collect());
        self
    }

    pub fn with_column_alignments(mut self, alignments: &[HorizontalAlignment]) -> Self {
        for (slot, alignment) in self.column_alignments.iter_mut().zip(alignments) {
            *slot = *alignment;
        }
        self
    }

    /// Replaces the header styling; `None` renders the first row like the body.
    pub fn with_header(mut self, fill: Option<CellFill>) -> Self {
        self.header = fill;
        self
    }

    pub fn with_first_column(mut self, fill: CellFill) -> Self {
        self.first_column = Some(fill);
        self
    }

    pub fn with_last_column(mut self, fill: CellFill) -> Self {
        self.last_column = Some(fill);
        self
    }

    pub fn with_last_row(mut self, fill: CellFill) -> Self {
        self.last_row = Some(fill);
        self
    }

    pub fn with_grid(mut self, grid: Option<Color>) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_cell_padding_pt(mut self, padding: f64) -> Self {
        self.cell_padding_pt = padding.max(0.0);
        self
    }
}

/// Individual content blocks that make up sections and the cover.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    BulletList(BulletList),
    Table(TableSpec),
    /// Vector chart drawn directly onto the page.
    Chart(ChartSpec),
    /// Fixed vertical gap in millimetres.
    Spacer(f64),
    /// Explicit page break request.
    PageBreak,
    /// Placeholder filled with the section titles and their page numbers.
    TableOfContents,
}

impl Block {
    /// Convenience helper for building a paragraph block from spans.
    pub fn paragraph(spans: impl Into<Vec<Span>>, style: TextStyle) -> Self {
        Self::Paragraph(RichParagraph::new(spans, style))
    }

    /// Parses markup into a paragraph block.
    pub fn markup(text: &str, style: TextStyle) -> Result<Self, ParseError> {
        RichParagraph::markup(text, style).map(Self::Paragraph)
    }

    /// Parses every item into a bullet list block.
    pub fn bullets<'a, I>(items: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        BulletList::from_markup(items).map(Self::BulletList)
    }

    pub fn spacer(height_mm: f64) -> Self {
        Self::Spacer(height_mm)
    }
}

/// The title page of the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    title: String,
    blocks: Vec<Block>,
}

impl Cover {
    /// Creates a new cover with the given document title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Returns the document title stored in the PDF metadata.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }
}

/// Logical representation of a document section.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    identifier: Option<String>,
    title: String,
    in_toc: bool,
    blocks: Vec<Block>,
}

impl Section {
    /// Returns the section identifier used for bookmarks.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the section is listed in the table of contents.
    pub fn in_toc(&self) -> bool {
        self.in_toc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Creates a builder that can inject an initial page break.
    pub fn builder(title: impl Into<String>) -> SectionBuilder {
        SectionBuilder::new(title)
    }
}

/// Builder for [`Section`] values.
///
/// Every section opens with a `Heading2` paragraph carrying its title;
/// callers can opt in to a page break before it via
/// [`SectionBuilder::start_on_new_page`].
#[derive(Clone, Debug, Default)]
pub struct SectionBuilder {
    identifier: Option<String>,
    title: String,
    blocks: Vec<Block>,
    start_on_new_page: bool,
    in_toc: bool,
}

impl SectionBuilder {
    /// Creates a builder for a section with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Marks the section to start on a new page.
    pub fn start_on_new_page(mut self, start_on_new_page: bool) -> Self {
        self.start_on_new_page = start_on_new_page;
        self
    }

    /// Lists the section in the table of contents.
    pub fn in_toc(mut self, in_toc: bool) -> Self {
        self.in_toc = in_toc;
        self
    }

    pub fn identifier(mut self, identifier: impl Into<Option<String>>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Pushes an additional block into the section.
    pub fn push_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn extend_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Builds the final section.
    pub fn build(self) -> Section {
        let mut blocks = Vec::with_capacity(self.blocks.len() + 2);
        if self.start_on_new_page {
            blocks.push(Block::PageBreak);
        }
        blocks.push(Block::paragraph(
            vec![Span::new(self.title.clone())],
            TextStyle::Heading2,
        ));
        blocks.extend(self.blocks);

        Section {
            identifier: self.identifier,
            title: self.title,
            in_toc: self.in_toc,
            blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_inserts_page_break_before_heading() {
        let section = Section::builder("Intro")
            .start_on_new_page(true)
            .push_block(Block::paragraph(Vec::new(), TextStyle::Normal))
            .build();

        assert!(matches!(section.blocks().first(), Some(Block::PageBreak)));
        match &section.blocks()[1] {
            Block::Paragraph(paragraph) => {
                assert_eq!(paragraph.style(), TextStyle::Heading2);
                assert_eq!(richtext::plain_text(paragraph.spans()), "Intro");
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn sections_flow_on_unless_asked_to_break() {
        let section = Section::builder("Conclusion")
            .identifier(Some("conclusion".to_owned()))
            .push_block(Block::spacer(12.7))
            .build();

        assert_eq!(section.identifier(), Some("conclusion"));
        assert!(!section.in_toc());
        assert_eq!(section.blocks().len(), 2);
        assert!(matches!(section.blocks()[0], Block::Paragraph(_)));
        assert_eq!(section.blocks()[1], Block::Spacer(12.7));
    }

    #[test]
    fn justified_paragraphs_fall_back_to_left() {
        let alignment: genpdf::Alignment = HorizontalAlignment::Justified.into();
        assert!(matches!(alignment, genpdf::Alignment::Left));
        let caption = RichParagraph::new(Vec::new(), TextStyle::Caption);
        assert_eq!(caption.alignment(), HorizontalAlignment::Center);
    }

    #[test]
    fn later_table_regions_override_earlier_ones() {
        let total = CellFill::new(styles::LIGHT_GREY, styles::BLACK, true);
        let label = CellFill::new(styles::LIGHT, styles::BLACK, false);
        let table = TableSpec::new(vec![
            vec!["Item", "Cost"],
            vec!["Venue", "$1"],
            vec!["Total", "$1"],
        ])
        .with_first_column(label)
        .with_last_row(total);

        assert_eq!(table.fill_for(1, 0), Some(label));
        assert_eq!(table.fill_for(2, 0), Some(total));
        assert_eq!(table.fill_for(1, 1), None);
        assert!(table.fill_for(0, 1).map(|fill| fill.bold).unwrap_or(false));
    }

    #[test]
    fn headerless_tables_highlight_the_whole_first_column() {
        let label = CellFill::new(styles::PRIMARY, styles::WHITE, true);
        let table = TableSpec::new(vec![vec!["Month 1", "Plan"], vec!["Month 2", "Build"]])
            .with_header(None)
            .with_first_column(label);

        assert!(!table.has_header());
        assert_eq!(table.fill_for(0, 0), Some(label));
        assert_eq!(table.fill_for(0, 1), None);
    }

    #[test]
    fn column_widths_are_stored_in_millimetres() {
        let table = TableSpec::new(vec![vec!["a", "b", "c"]]).with_column_widths_in(&[2.0, 0.5]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.column_widths(), Some(&[50.8, 12.7][..]));
        assert_eq!(table.column_alignment(5), HorizontalAlignment::Left);
    }

    #[test]
    fn bullet_markup_errors_propagate() {
        assert!(BulletList::from_markup(["**ok**", "**open"]).is_err());
        let list = BulletList::from_markup(["one", "two"]).expect("parse bullets");
        assert_eq!(list.len(), 2);
    }
}
