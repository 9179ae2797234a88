//! Builds the report file.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::content;
use crate::error::ReportError;

/// Default output file name used by the command line tool.
pub const DEFAULT_OUTPUT: &str = "Winners_Circle_Analysis.pdf";

/// Renders the report and writes it to `output_path`, replacing any existing file.
///
/// The document is rendered in memory first; a font or layout failure leaves
/// the filesystem untouched.
pub fn build(output_path: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
    let path = output_path.as_ref().to_path_buf();
    let report = content::report()?;

    #[cfg(feature = "bookmarks")]
    let rendered = report.render_with_bookmarks()?;
    #[cfg(not(feature = "bookmarks"))]
    let rendered = report.render()?;

    fs::write(&path, &rendered.bytes).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        "Wrote {} ({} pages, {} bytes, {} layout passes)",
        path.display(),
        rendered.page_count,
        rendered.bytes.len(),
        rendered.passes
    );
    Ok(path)
}
