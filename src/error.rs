use std::fmt;
use std::path::PathBuf;

use crate::builder::PdfBuildError;
use crate::richtext::ParseError;

/// Failures surfaced by [`crate::report::build`] and the revenue chart helper.
#[derive(Debug)]
pub enum ReportError {
    /// Fonts could not be loaded or the layout engine failed.
    Build(PdfBuildError),
    /// A literal paragraph contains malformed inline markup.
    Content(ParseError),
    /// Writing an output file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Rasterizing or encoding the PNG chart failed.
    Chart(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build(err) => write!(f, "{err}"),
            Self::Content(_) => write!(f, "report content contains malformed markup"),
            Self::Io { path, .. } => write!(f, "failed to write {}", path.display()),
            Self::Chart(message) => write!(f, "failed to draw chart: {message}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            // Display already carries the build error's message.
            Self::Build(err) => err.source(),
            Self::Content(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Chart(_) => None,
        }
    }
}

impl From<PdfBuildError> for ReportError {
    fn from(err: PdfBuildError) -> Self {
        Self::Build(err)
    }
}

impl From<ParseError> for ReportError {
    fn from(err: ParseError) -> Self {
        Self::Content(err)
    }
}
