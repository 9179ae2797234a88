use std::fs;

use genpdf::style::Color;
use lopdf::content::{Content, Operation};
use sha2::{Digest, Sha256};
use winners_circle_report::builder::RenderedPdf;
use winners_circle_report::{content, fonts, styles, ReportError};

fn fonts_or_skip(test: &str) -> bool {
    if fonts::default_fonts_available() {
        return true;
    }
    eprintln!(
        "Skipping {test}: no usable font family found. Set {} to a directory with Liberation Sans or DejaVu Sans.",
        fonts::FONTS_DIR_ENV
    );
    false
}

fn render_report() -> RenderedPdf {
    content::report()
        .expect("report content parses")
        .render()
        .expect("render report")
}

/// Blanks the values printpdf takes from the clock or a random source: the
/// info dictionary dates and the trailer `/ID`. Delimiters are kept so the
/// byte length does not change.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    let mut scrubbed = bytes.to_vec();
    for key in [&b"/CreationDate"[..], b"/ModDate", b"/ID"] {
        let mut from = 0;
        while let Some(offset) = find(&scrubbed[from..], key) {
            let start = from + offset + key.len();
            let end = value_end(&scrubbed, start);
            scrubbed[start..end]
                .iter_mut()
                .filter(|byte| byte.is_ascii_alphanumeric())
                .for_each(|byte| *byte = b'0');
            from = end.max(start);
        }
    }
    scrubbed
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// End of the string or array value that follows a key, or `start` when the
/// key is followed by anything else.
fn value_end(data: &[u8], start: usize) -> usize {
    let open = data[start..]
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .map(|skip| start + skip);
    let close = match open.map(|index| data[index]) {
        Some(b'(') => b')',
        Some(b'[') => b']',
        _ => return start,
    };
    data[start..]
        .iter()
        .position(|&byte| byte == close)
        .map_or(data.len(), |offset| start + offset + 1)
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn writes_a_pdf_file() {
    if !fonts_or_skip("writes_a_pdf_file") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("Winners_Circle_Analysis.pdf");

    let written = winners_circle_report::build(&path).expect("build report");

    assert_eq!(written, path);
    let bytes = fs::read(&path).expect("read report");
    assert!(bytes.starts_with(b"%PDF-"), "output should carry the PDF magic");
}

#[test]
fn existing_output_is_replaced() {
    if !fonts_or_skip("existing_output_is_replaced") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("report.pdf");
    fs::write(&path, b"stale contents").expect("seed stale file");

    winners_circle_report::build(&path).expect("build report");

    let bytes = fs::read(&path).expect("read report");
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(!bytes.windows(14).any(|window| window == b"stale contents"));
}

#[test]
fn missing_directory_fails_without_creating_anything() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing").join("report.pdf");

    let err = winners_circle_report::build(&path).expect_err("directory does not exist");

    if fonts::default_fonts_available() {
        assert!(
            matches!(&err, ReportError::Io { path: failed, .. } if failed == &path),
            "unexpected error: {err}"
        );
    }
    assert!(!path.exists());
    assert!(!dir.path().join("missing").exists());
}

#[test]
fn rendering_is_deterministic() {
    if !fonts_or_skip("rendering_is_deterministic") {
        return;
    }
    let first = render_report();
    let second = render_report();

    assert_eq!(first.bytes.len(), second.bytes.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn contents_pages_are_resolved_and_increasing() {
    if !fonts_or_skip("contents_pages_are_resolved_and_increasing") {
        return;
    }
    let report = content::report().expect("report content parses");
    let rendered = report.render().expect("render report");
    let entries = report.toc_entries(&rendered.section_pages);

    assert_eq!(entries.len(), 7);
    let pages: Vec<usize> = entries
        .iter()
        .map(|entry| entry.page.unwrap_or_else(|| panic!("{} has no page", entry.title)))
        .collect();
    assert!(
        pages.windows(2).all(|pair| pair[0] < pair[1]),
        "pages should increase: {pages:?}"
    );
    assert!(pages.iter().all(|&page| page <= rendered.page_count));
    assert!(rendered.passes >= 2, "page numbers need a second pass to print");
}

#[test]
fn front_matter_follows_the_cover() {
    if !fonts_or_skip("front_matter_follows_the_cover") {
        return;
    }
    let rendered = render_report();
    // Executive summary, then the table of contents.
    assert_eq!(rendered.section_pages[0], Some(2));
    assert_eq!(rendered.section_pages[1], Some(3));
}

fn page_operations(bytes: &[u8]) -> Vec<Vec<Operation>> {
    let document = lopdf::Document::load_mem(bytes).expect("parse rendered PDF");
    document
        .get_pages()
        .into_values()
        .map(|page| {
            let content = document.get_page_content(page).expect("page content");
            Content::decode(&content).expect("decode page content").operations
        })
        .collect()
}

fn has_color(operation: &Operation, color: Color) -> bool {
    let Color::Rgb(r, g, b) = color else {
        return false;
    };
    let values: Vec<f64> = operation
        .operands
        .iter()
        .filter_map(|operand| operand.as_float().ok().map(f64::from))
        .collect();
    let expected = [r, g, b].map(|channel| f64::from(channel) / 255.0);
    values.len() == 3
        && values
            .iter()
            .zip(expected)
            .all(|(value, expected)| (value - expected).abs() < 1e-3)
}

/// Colours set right after `q`, which is how painted shapes open.
fn fill_colors(operations: &[Operation]) -> Vec<&Operation> {
    operations
        .windows(2)
        .filter(|pair| pair[0].operator == "q" && pair[1].operator == "rg")
        .map(|pair| &pair[1])
        .collect()
}

#[test]
fn tables_and_charts_are_painted_with_fills() {
    if !fonts_or_skip("tables_and_charts_are_painted_with_fills") {
        return;
    }
    let pages = page_operations(&render_report().bytes);

    let fills = pages
        .iter()
        .flatten()
        .filter(|operation| operation.operator == "f")
        .count();
    assert!(fills > 100, "expected table cells and chart shapes, found {fills} fills");

    let painted: Vec<&Operation> = pages.iter().flat_map(|ops| fill_colors(ops)).collect();
    for color in [
        styles::PRIMARY,
        styles::SECONDARY,
        styles::ACCENT,
        styles::LIGHT,
        styles::LIGHT_GREY,
    ] {
        assert!(
            painted.iter().any(|operation| has_color(operation, color)),
            "no shape painted in {color:?}"
        );
    }
}

#[test]
fn header_text_sits_on_its_background() {
    if !fonts_or_skip("header_text_sits_on_its_background") {
        return;
    }
    let pages = page_operations(&render_report().bytes);

    let readable = pages.iter().any(|ops| {
        let Some(background) = ops.windows(2).position(|pair| {
            pair[0].operator == "q" && pair[1].operator == "rg" && has_color(&pair[1], styles::PRIMARY)
        }) else {
            return false;
        };
        ops[background..].windows(2).any(|pair| {
            pair[0].operator != "q" && pair[1].operator == "rg" && has_color(&pair[1], styles::WHITE)
        })
    });
    assert!(readable, "white header text should follow a painted header cell");
}
