//! Document construction for the report.
//!
//! [`DocumentBuilder`] configures a bare `genpdf::Document` (paper, margins,
//! footer). [`PdfBuilder`] assembles the cover and sections on top of it and
//! renders the whole document until the table of contents page numbers agree
//! with the pages the sections actually land on. The last render goes through
//! [`crate::fills`] so table cells and chart shapes are painted.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use genpdf::elements::Paragraph;
use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{self, Style};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position, Size};
use log::{debug, info, warn};

use crate::elements::{mm_from_f64, PageAnchor};
use crate::fills;
use crate::fonts;
use crate::layout::{self, TocEntry};
use crate::model::{Cover, Section};
use crate::styles;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::{self, Bookmark, BookmarkError};

/// Upper bound on full renders spent resolving table of contents pages.
pub const MAX_LAYOUT_PASSES: usize = 4;

/// US Letter margins: three quarters of an inch on every side.
pub const PAGE_MARGIN_MM: f64 = 19.05;

const FOOTER_HEIGHT_MM: f64 = 10.0;
const BASE_FONT_SIZE: u8 = 11;

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Builder for `genpdf::Document` instances.
#[derive(Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
    page_counter: Option<Rc<Cell<usize>>>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Configures a footer with a fixed height, printed from `first_page` on.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, first_page: usize, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, first_page, footer));
        self
    }

    /// Shares the decorator's page counter with the caller.
    pub fn with_page_counter(mut self, counter: Rc<Cell<usize>>) -> Self {
        self.page_counter = Some(counter);
        self
    }

    /// Builds a document using an already loaded font family.
    pub fn build_with_fonts(self, font_family: FontFamily<FontData>) -> Result<genpdf::Document, Error> {
        let mut document = genpdf::Document::new(font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }

        let decorator = ConfiguredPageDecorator {
            page: self.page_counter.unwrap_or_default(),
            margins: self.margins,
            footer: self.footer,
        };
        document.set_page_decorator(decorator);

        Ok(document)
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    first_page: usize,
    factory: Box<FooterFactory>,
}

impl FooterSpec {
    pub fn new<F, E>(height: impl Into<Mm>, first_page: usize, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            first_page,
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    page: Rc<Cell<usize>>,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.page.get() + 1;
        self.page.set(page);

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            if page >= footer.first_page {
                let mut footer_area = area.clone();
                footer_area.add_offset(Position::new(0, available - footer.height));
                let mut element = (footer.factory)(page);
                let result = element.render(context, footer_area, style)?;
                if result.has_more {
                    return Err(Error::new(
                        "Footer element does not fit into the reserved space",
                        ErrorKind::PageSizeExceeded,
                    ));
                }
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

/// Errors raised while assembling or rendering the PDF.
#[derive(Debug)]
pub enum PdfBuildError {
    /// No usable font family could be loaded.
    FontLoad(Error),
    /// The layout engine failed while rendering.
    Render(Error),
    /// Rewriting the rendered pages to paint filled shapes failed.
    Fills(lopdf::Error),
    #[cfg(feature = "bookmarks")]
    Bookmarks(BookmarkError),
}

impl fmt::Display for PdfBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontLoad(_) => write!(f, "failed to load fonts"),
            Self::Render(_) => write!(f, "failed to render PDF"),
            Self::Fills(_) => write!(f, "failed to paint filled shapes"),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(_) => write!(f, "failed to add PDF bookmarks"),
        }
    }
}

impl std::error::Error for PdfBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontLoad(err) | Self::Render(err) => Some(err),
            Self::Fills(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => Some(err),
        }
    }
}

#[cfg(feature = "bookmarks")]
impl From<BookmarkError> for PdfBuildError {
    fn from(err: BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}

/// A rendered document held in memory.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    /// First page of every section, in section order.
    pub section_pages: Vec<Option<usize>>,
    pub page_count: usize,
    /// Number of full renders it took for the page numbers to settle.
    pub passes: usize,
}

/// Assembles a cover and sections into a paginated PDF.
pub struct PdfBuilder {
    title: String,
    cover: Option<Cover>,
    sections: Vec<Section>,
    footer_label: Option<String>,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            cover: None,
            sections: Vec::new(),
            footer_label: None,
        }
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds a cover page. The cover carries no footer.
    pub fn with_cover(mut self, cover: Cover) -> Self {
        if self.title.is_empty() {
            self.title = cover.title().to_owned();
        }
        self.cover = Some(cover);
        self
    }

    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Prints `"<label> • Page N"` at the bottom of every page after the cover.
    pub fn with_footer_label(mut self, label: impl Into<String>) -> Self {
        self.footer_label = Some(label.into());
        self
    }

    pub fn cover(&self) -> Option<&Cover> {
        self.cover.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Table of contents entries for the given section pages.
    pub fn toc_entries(&self, section_pages: &[Option<usize>]) -> Vec<TocEntry> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.in_toc())
            .map(|(index, section)| {
                TocEntry::new(section.title(), section_pages.get(index).copied().flatten())
            })
            .collect()
    }

    /// Renders the document into memory.
    pub fn render(&self) -> Result<RenderedPdf, PdfBuildError> {
        let family = fonts::resolve_font_family().map_err(PdfBuildError::FontLoad)?;
        info!(
            "Rendering '{}' with font family '{}' from {}",
            self.title,
            family.name(),
            family.directory().display()
        );

        let mut pages = vec![None; self.sections.len()];
        let mut pass = 0;
        loop {
            pass += 1;
            let font_family = family.load().map_err(PdfBuildError::FontLoad)?;
            let (bytes, found, page_count) = self.render_pass(font_family, &pages)?;
            let settled = found == pages;
            debug!("Layout pass {} produced section pages {:?}", pass, found);
            pages = found;

            if settled || pass == MAX_LAYOUT_PASSES {
                if !settled {
                    warn!(
                        "Table of contents pages did not settle after {} passes",
                        MAX_LAYOUT_PASSES
                    );
                }
                let (bytes, filled) = fills::apply_fills(&bytes).map_err(PdfBuildError::Fills)?;
                debug!("Painted {} filled shapes", filled);
                return Ok(RenderedPdf {
                    bytes,
                    section_pages: pages,
                    page_count,
                    passes: pass,
                });
            }
        }
    }

    /// Renders the document and adds an outline entry for every listed section.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(&self) -> Result<RenderedPdf, PdfBuildError> {
        let mut rendered = self.render()?;
        let entries: Vec<Bookmark> = self
            .sections
            .iter()
            .zip(&rendered.section_pages)
            .filter(|(section, _)| section.in_toc())
            .filter_map(|(section, page)| {
                page.map(|page| Bookmark {
                    title: section.title().to_owned(),
                    identifier: section.identifier().map(str::to_owned),
                    page,
                })
            })
            .collect();
        rendered.bytes = bookmarks::apply_bookmarks(&rendered.bytes, &entries)?;
        Ok(rendered)
    }

    fn render_pass(
        &self,
        font_family: FontFamily<FontData>,
        pages: &[Option<usize>],
    ) -> Result<(Vec<u8>, Vec<Option<usize>>, usize), PdfBuildError> {
        let counter = Rc::new(Cell::new(0));
        let mut builder = DocumentBuilder::new()
            .with_paper_size(PaperSize::Letter)
            .with_margins(Margins::all(mm_from_f64(PAGE_MARGIN_MM)))
            .with_page_counter(Rc::clone(&counter));
        if let Some(label) = self.footer_label.clone() {
            let first_page = if self.cover.is_some() { 2 } else { 1 };
            builder = builder.with_footer(mm_from_f64(FOOTER_HEIGHT_MM), first_page, move |page| {
                footer_element(&label, page)
            });
        }

        let mut document = builder
            .build_with_fonts(font_family)
            .map_err(PdfBuildError::Render)?;
        document.set_title(self.title.clone());
        document.set_minimal_conformance();
        document.set_font_size(BASE_FONT_SIZE);

        let toc = self.toc_entries(pages);
        if let Some(cover) = &self.cover {
            document.push(layout::blocks_layout(cover.blocks(), &toc));
        }

        let slots: Vec<Rc<Cell<Option<usize>>>> = self
            .sections
            .iter()
            .map(|_| Rc::new(Cell::new(None)))
            .collect();
        for (section, slot) in self.sections.iter().zip(&slots) {
            document.push(PageAnchor::new(
                layout::blocks_layout(section.blocks(), &toc),
                Rc::clone(&counter),
                Rc::clone(slot),
            ));
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(PdfBuildError::Render)?;
        let found = slots.iter().map(|slot| slot.get()).collect();
        Ok((bytes, found, counter.get()))
    }
}

fn footer_element(label: &str, page: usize) -> impl Element {
    let mut paragraph = Paragraph::new(format!("{label} \u{2022} Page {page}"));
    paragraph.set_alignment(Alignment::Center);
    paragraph.styled(
        Style::new()
            .with_font_size(9)
            .with_color(styles::MID_GREY),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::styles::TextStyle;

    fn builder() -> PdfBuilder {
        PdfBuilder::new()
            .with_cover(Cover::new("Report"))
            .add_section(Section::builder("Summary").build())
            .add_section(
                Section::builder("1. First")
                    .start_on_new_page(true)
                    .in_toc(true)
                    .push_block(Block::paragraph(Vec::new(), TextStyle::Normal))
                    .build(),
            )
            .add_section(Section::builder("2. Second").in_toc(true).build())
    }

    #[test]
    fn cover_title_becomes_document_title() {
        assert_eq!(builder().title, "Report");
        let titled = PdfBuilder::new().with_title("Custom").with_cover(Cover::new("Report"));
        assert_eq!(titled.title, "Custom");
    }

    #[test]
    fn toc_lists_only_marked_sections() {
        let entries = builder().toc_entries(&[Some(2), Some(3), None]);
        assert_eq!(
            entries,
            vec![
                TocEntry::new("1. First", Some(3)),
                TocEntry::new("2. Second", None),
            ]
        );
    }

    #[test]
    fn errors_expose_their_cause() {
        use std::error::Error as _;

        let err = PdfBuildError::FontLoad(Error::new("missing", ErrorKind::InvalidData));
        assert_eq!(err.to_string(), "failed to load fonts");
        assert!(err.source().is_some());
    }
}
