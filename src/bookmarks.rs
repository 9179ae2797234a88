//! PDF outline entries added to rendered bytes with `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

/// One outline entry pointing at the first page of a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    /// Stored as the entry's `/NM` name when present.
    pub identifier: Option<String>,
    /// One-based page number.
    pub page: usize,
}

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Debug)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    Parse(lopdf::Error),
    /// The trailer has no `/Root` reference.
    MissingCatalog,
    /// The catalog object was not a dictionary.
    InvalidCatalog,
    /// A bookmark points past the last page of the document.
    MissingPage { title: String, page_number: usize },
}

impl From<lopdf::Error> for BookmarkError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to parse PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage { title, page_number } => write!(
                f,
                "Bookmark '{}' refers to missing page {}",
                title, page_number
            ),
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingCatalog | Self::InvalidCatalog | Self::MissingPage { .. } => None,
        }
    }
}

/// Adds a flat `/Outlines` tree with one `/Dest [page /Fit]` entry per bookmark.
///
/// Returns the input unchanged when `bookmarks` is empty.
pub fn apply_bookmarks(pdf_bytes: &[u8], bookmarks: &[Bookmark]) -> Result<Vec<u8>, BookmarkError> {
    if bookmarks.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let entries = collect_outline_entries(&mut document, bookmarks, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, &mut document, &entries);
    insert_outlines_root(outlines_id, &mut document, &entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct OutlineEntry<'a> {
    object_id: ObjectId,
    page_ref: ObjectId,
    bookmark: &'a Bookmark,
}

fn collect_outline_entries<'a>(
    document: &mut Document,
    bookmarks: &'a [Bookmark],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry<'a>>, BookmarkError> {
    bookmarks
        .iter()
        .map(|bookmark| {
            let page_ref = u32::try_from(bookmark.page)
                .ok()
                .and_then(|page| pages.get(&page).copied())
                .ok_or_else(|| BookmarkError::MissingPage {
                    title: bookmark.title.clone(),
                    page_number: bookmark.page,
                })?;
            Ok(OutlineEntry {
                object_id: document.new_object_id(),
                page_ref,
                bookmark,
            })
        })
        .collect()
}

fn link_outline_entries(outlines_id: ObjectId, document: &mut Document, entries: &[OutlineEntry<'_>]) {
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.bookmark.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if let Some(name) = &entry.bookmark.identifier {
            dictionary.set("NM", Object::string_literal(name.as_str()));
        }
        if let Some(previous) = index.checked_sub(1).and_then(|i| entries.get(i)) {
            dictionary.set("Prev", Object::Reference(previous.object_id));
        }
        if let Some(next) = entries.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }

        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry<'_>],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bookmarks_leave_bytes_untouched() {
        let bytes = b"%PDF-1.3 not parsed".to_vec();
        assert_eq!(apply_bookmarks(&bytes, &[]).expect("no-op"), bytes);
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        let bookmark = Bookmark {
            title: "Intro".into(),
            identifier: None,
            page: 1,
        };
        let err = apply_bookmarks(b"not a pdf", &[bookmark]).expect_err("parse failure");
        assert!(matches!(err, BookmarkError::Parse(_)));
    }
}
