//! Generates the Winners Circle Club membership analysis report.
//!
//! [`report::build`] renders the full PDF (cover, table of contents, six
//! numbered sections, conclusion and appendix) with `genpdf`.
//! [`revenue_chart::render_revenue_chart`] writes a standalone PNG line chart
//! of projected revenue.

pub mod builder;
pub mod charts;
pub mod content;
pub mod elements;
pub mod error;
pub mod fills;
pub mod fonts;
pub mod format;
pub mod layout;
pub mod model;
pub mod report;
pub mod revenue_chart;
pub mod richtext;
pub mod styles;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use error::ReportError;
pub use report::{build, DEFAULT_OUTPUT};
pub use revenue_chart::{render_revenue_chart, render_revenue_chart_to};
