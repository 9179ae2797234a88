//! Converts model blocks into `genpdf` elements.

use genpdf::elements::{LinearLayout, PageBreak, Paragraph, UnorderedList};
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Context, Element, Margins, RenderResult};

use crate::charts::ChartElement;
use crate::elements::{mm_from_f64, GridTable, VerticalSpace};
use crate::model::{Block, BulletList, HorizontalAlignment, RichParagraph, TableSpec};
use crate::richtext::Span;
use crate::styles::{self, pt_to_mm, TextStyle};

const BULLET: &str = "\u{2022}";
const LIST_INDENT_PT: f64 = 20.0;

/// A table of contents line: section title and the page it starts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub page: Option<usize>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, page: Option<usize>) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }
}

fn margins(top: f64, right: f64, bottom: f64, left: f64) -> Margins {
    Margins::trbl(
        mm_from_f64(top),
        mm_from_f64(right),
        mm_from_f64(bottom),
        mm_from_f64(left),
    )
}

fn spans_paragraph(spans: &[Span], alignment: HorizontalAlignment) -> Paragraph {
    let mut paragraph = Paragraph::default();
    for span in spans {
        paragraph.push(span.to_styled_string());
    }
    paragraph.set_alignment(alignment.into());
    paragraph
}

/// Builds a paragraph with its preset spacing, indents and character style.
pub fn paragraph_element(paragraph: &RichParagraph) -> impl Element {
    let preset = paragraph.style().preset();
    spans_paragraph(paragraph.spans(), paragraph.alignment())
        .styled(preset.text_style())
        .padded(margins(
            preset.space_before_mm,
            preset.right_indent_mm,
            preset.space_after_mm,
            preset.left_indent_mm,
        ))
}

/// Builds a bulleted list in body text style.
pub fn bullet_list_element(list: &BulletList) -> impl Element {
    let normal = TextStyle::Normal.preset();
    let mut bullets = UnorderedList::with_bullet(BULLET);
    for item in list.items() {
        bullets.push(spans_paragraph(item, HorizontalAlignment::Left));
    }
    bullets.styled(normal.text_style()).padded(margins(
        normal.space_before_mm,
        0.0,
        normal.space_after_mm,
        pt_to_mm(LIST_INDENT_PT) / 2.0,
    ))
}

/// Describes the table of contents as a borderless two-column table.
pub fn toc_table(entries: &[TocEntry]) -> TableSpec {
    let rows = entries.iter().map(|entry| {
        let page = entry
            .page
            .map(|page| page.to_string())
            .unwrap_or_else(|| "0".to_owned());
        vec![entry.title.clone(), page]
    });
    TableSpec::new(rows)
        .with_header(None)
        .with_grid(None)
        .with_text_color(styles::DARK_BROWN)
        .with_font_size(11)
        .with_cell_padding_pt(5.0)
        .with_column_widths_in(&[5.0, 0.5])
        .with_column_alignments(&[HorizontalAlignment::Left, HorizontalAlignment::Right])
}

/// The element rendered for one [`Block`].
pub struct BlockElement(Box<dyn Element>);

impl Element for BlockElement {
    fn render(
        &mut self,
        context: &Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.0.render(context, area, style)
    }
}

/// Converts one block into its element.
pub fn block_element(block: &Block, toc: &[TocEntry]) -> BlockElement {
    let element: Box<dyn Element> = match block {
        Block::Paragraph(paragraph) => Box::new(paragraph_element(paragraph)),
        Block::BulletList(list) => Box::new(bullet_list_element(list)),
        Block::Table(table) => Box::new(GridTable::new(table.clone())),
        Block::Chart(chart) => Box::new(ChartElement::new(chart.clone())),
        Block::Spacer(height) => Box::new(VerticalSpace::new(*height)),
        Block::PageBreak => Box::new(PageBreak::new()),
        Block::TableOfContents => Box::new(GridTable::new(toc_table(toc))),
    };
    BlockElement(element)
}

/// Stacks a sequence of blocks vertically.
pub fn blocks_layout(blocks: &[Block], toc: &[TocEntry]) -> LinearLayout {
    let mut layout = LinearLayout::vertical();
    for block in blocks {
        layout.push(block_element(block, toc));
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_toc_pages_use_a_placeholder() {
        let table = toc_table(&[
            TocEntry::new("1. Club Concept and Structure", Some(4)),
            TocEntry::new("Appendix", None),
        ]);
        assert_eq!(table.rows()[0], vec!["1. Club Concept and Structure", "4"]);
        assert_eq!(table.rows()[1][1], "0");
        assert!(!table.has_header());
        assert_eq!(table.grid(), None);
        assert_eq!(table.column_alignment(1), HorizontalAlignment::Right);
    }
}
