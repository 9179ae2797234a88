//! The Winners Circle Club report: literal narrative and projection data.

pub mod projections;
pub mod sections;

use crate::builder::PdfBuilder;
use crate::richtext::ParseError;

pub const REPORT_TITLE: &str = "Winners Circle Club Comprehensive Analysis Report";
pub const FOOTER_LABEL: &str = "Winners Circle Club";

/// Assembles the full report in reading order.
pub fn report() -> Result<PdfBuilder, ParseError> {
    Ok(PdfBuilder::new()
        .with_title(REPORT_TITLE)
        .with_cover(sections::cover())
        .with_footer_label(FOOTER_LABEL)
        .add_section(sections::executive_summary()?)
        .add_section(sections::table_of_contents())
        .add_section(sections::club_concept()?)
        .add_section(sections::membership_growth()?)
        .add_section(sections::revenue_analysis()?)
        .add_section(sections::implementation_strategy()?)
        .add_section(sections::financial_assumptions()?)
        .add_section(sections::key_recommendations()?)
        .add_section(sections::conclusion()?)
        .add_section(sections::appendix()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_paragraph_parses() {
        let report = report().expect("literal markup is well formed");
        assert_eq!(report.sections().len(), 10);
        assert_eq!(report.cover().map(|cover| cover.title()), Some("Winners Circle Club"));
    }

    #[test]
    fn contents_list_numbered_sections_and_appendix() {
        let report = report().expect("literal markup is well formed");
        let titles: Vec<String> = report
            .toc_entries(&[])
            .into_iter()
            .map(|entry| entry.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "1. Club Concept and Structure",
                "2. Membership Growth Projections",
                "3. Revenue Analysis",
                "4. Implementation Strategy",
                "5. Financial Assumptions",
                "6. Key Recommendations",
                "Appendix: Detailed Financial Projections",
            ]
        );
    }
}
