//! Narrative sections of the report, in reading order.

use crate::charts::{BarChart, ChartSpec, LineChart, Marker, PieChart, Series, ValueAxis, ValueFormat};
use crate::model::{Block, CellFill, Cover, HorizontalAlignment, Section, SectionBuilder, TableSpec};
use crate::richtext::{ParseError, Span};
use crate::styles::{self, TextStyle};

use super::projections::{self, YEARS};

const INCH_MM: f64 = 25.4;
const GAP_MM: f64 = 0.2 * INCH_MM;

fn heading(text: &str) -> Block {
    Block::paragraph(vec![Span::new(text)], TextStyle::Heading3)
}

fn body(text: &str) -> Result<Block, ParseError> {
    Block::markup(text, TextStyle::Normal)
}

fn caption(text: &str) -> Block {
    Block::paragraph(vec![Span::new(text)], TextStyle::Caption)
}

fn chart(spec: impl Into<ChartSpec>) -> Block {
    Block::Chart(spec.into())
}

fn gap() -> Block {
    Block::spacer(GAP_MM)
}

fn numbered(title: &str, identifier: &str) -> SectionBuilder {
    Section::builder(title)
        .start_on_new_page(true)
        .in_toc(true)
        .identifier(Some(identifier.to_owned()))
}

const LIGHT_CELL: CellFill = CellFill::new(styles::LIGHT, styles::BLACK, false);
const GREY_CELL: CellFill = CellFill::new(styles::LIGHT_GREY, styles::BLACK, false);
const GREY_TOTAL: CellFill = CellFill::new(styles::LIGHT_GREY, styles::BLACK, true);

/// Right-aligns every column after the label column.
fn numeric_columns(table: TableSpec) -> TableSpec {
    let mut alignments = vec![HorizontalAlignment::Right; table.column_count()];
    alignments[0] = HorizontalAlignment::Left;
    table.with_column_alignments(&alignments)
}

pub fn cover() -> Cover {
    Cover::new("Winners Circle Club").with_blocks([
        Block::paragraph(vec![Span::new("Winners Circle Club")], TextStyle::Title),
        Block::paragraph(
            vec![Span::new("Comprehensive Analysis Report")],
            TextStyle::Subtitle,
        ),
        Block::spacer(2.0 * INCH_MM),
        // Room for the winery logo.
        Block::spacer(2.0 * INCH_MM),
        Block::paragraph(
            vec![Span::new("Prepared for Milea Estate Vineyard")],
            TextStyle::Normal,
        ),
        Block::paragraph(vec![Span::new("April 2025")], TextStyle::Normal),
    ])
}

pub fn executive_summary() -> Result<Section, ParseError> {
    Ok(Section::builder("Executive Summary")
        .start_on_new_page(true)
        .identifier(Some("executive-summary".to_owned()))
        .extend_blocks([
            body(
                "The Winner's Circle Club represents Milea Estate Vineyard's strategic move to establish an \
                 ultra-premium membership tier designed to transform the traditional wine club experience into a \
                 comprehensive lifestyle proposition. Based on our detailed analysis, this premium credit-based \
                 membership program presents a compelling opportunity for sustainable revenue growth, enhanced \
                 customer loyalty, and strengthened brand positioning.",
            )?,
            body(
                "Our financial projections indicate that the Winner's Circle Club will contribute significantly \
                 to Milea's growth, with revenue increasing from $159,360 in Year 1 to $699,986 by Year 4. This \
                 represents a compelling return on investment with a payback period of approximately 28 months \
                 on the initial capital investment.",
            )?,
            body("Key highlights of the Winner's Circle Club include:")?,
            Block::bullets([
                "A flexible credit-based model with quarterly fees of $500 ($2,000 annually)",
                "Projected growth from 64 members in Year 1 to 281 members by Year 4",
                "Enhanced member lifetime value of $8,000 compared to $1,920 for traditional club members",
                "Comprehensive redemption options spanning wine purchases, accommodations, and culinary experiences",
                "Exclusive access to premium facilities and personalized services",
            ])?,
            gap(),
            body(
                "This report provides a detailed analysis of the Winner's Circle concept, membership \
                 projections, revenue forecasts, implementation strategy, and supporting financial assumptions.",
            )?,
        ])
        .build())
}

pub fn table_of_contents() -> Section {
    Section::builder("Table of Contents")
        .start_on_new_page(true)
        .extend_blocks([gap(), Block::TableOfContents])
        .build()
}

fn demographics_chart() -> PieChart {
    let colors = [styles::PRIMARY, styles::SECONDARY, styles::ACCENT, styles::LIGHT];
    projections::DEMOGRAPHICS
        .iter()
        .zip(colors)
        .fold(PieChart::new(), |pie, (share, color)| {
            pie.with_slice(share.segment, f64::from(share.percent), color)
        })
}

pub fn club_concept() -> Result<Section, ParseError> {
    Ok(numbered("1. Club Concept and Structure", "club-concept")
        .extend_blocks([
            heading("Core Concept"),
            body(
                "The Winner's Circle Club introduces a premium tier to Milea Estate's existing membership \
                 hierarchy, sitting above the current Jumper, Grand Prix, and Triple Crown tiers. Unlike \
                 traditional allocation-based wine clubs, the Winner's Circle operates on an innovative \
                 credit-based model where members pay $500 quarterly ($2,000 annually), converted to an \
                 equivalent credit balance usable across the entire Milea ecosystem.",
            )?,
            body(
                "This approach shifts the focus from purely wine acquisition to a comprehensive lifestyle \
                 experience that encompasses fine wine, dining, accommodation, and exclusive events. The \
                 credit-based system provides members with unprecedented flexibility while establishing a \
                 steady revenue stream for Milea Estate.",
            )?,
            Block::markup(
                "The Winner's Circle represents a paradigm shift from traditional wine club models to a \
                 comprehensive lifestyle membership that enhances customer engagement across multiple touchpoints.",
                TextStyle::Quote,
            )?,
            heading("Key Features and Benefits"),
            Block::bullets([
                "**Credit-Based Flexibility:** Members enjoy complete freedom to allocate their credits according \
                 to their personal preferences, moving beyond traditional predetermined wine allocations to create \
                 a truly customizable experience.",
                "**Enhanced Value Proposition:** Members receive a substantial 20% discount on all purchases across \
                 the entire Milea ecosystem, including wine acquisitions, culinary experiences, and luxury \
                 accommodations. This comprehensive discount structure significantly enhances the overall value of \
                 membership.",
                "**Diverse Redemption Options:** Credits can be applied to an extensive range of premium offerings, \
                 including limited-release wines, exclusive culinary programs, luxury overnight accommodations, \
                 curated merchandise, and special member-only events.",
                "**Exclusive Access:** Members enjoy privileged access to premium facilities including the private \
                 club lounge, temperature-controlled wine storage lockers, exclusive recreational facilities, and \
                 extended access hours not available to general visitors.",
                "**Premium Brand Positioning:** The exclusive nature and comprehensive benefits of the Winner's \
                 Circle Club strengthen Milea's position as the premier luxury wine destination in the Hudson \
                 Valley region.",
            ])?,
            gap(),
            heading("Differentiation Factors"),
            body("The Winner's Circle Club stands apart from traditional wine club offerings in several key ways:")?,
            Block::bullets([
                "**Lifestyle Focus vs. Product Focus:** Expands beyond wine to create a holistic vineyard lifestyle experience",
                "**Flexibility vs. Allocation:** Member-directed spending rather than predetermined allocations",
                "**Extended Ecosystem:** Encompasses accommodations, dining, and events in addition to wine",
                "**Premium Positioning:** Creates a clear luxury tier within the Hudson Valley wine region",
                "**Value Amplification:** Enhanced discounts and benefits increase perceived and actual value",
            ])?,
            heading("Target Demographics"),
            body("The Winner's Circle Club is designed to appeal to several distinct demographic segments:")?,
            chart(demographics_chart()),
            caption("Target Member Demographics"),
            body(
                "**Affluent Local Residents (40%):** High-income professionals within a 30-mile radius seeking \
                 regular access to premium experiences without traveling to NYC or other wine regions.",
            )?,
            body(
                "**NYC Weekend Travelers (25%):** Urban dwellers with second homes or frequent weekend trips to \
                 Hudson Valley who want consistent, high-quality experiences during their visits.",
            )?,
            body(
                "**Wine Enthusiasts (20%):** Serious collectors and oenophiles attracted by the quality of \
                 Milea's wines and the exclusivity of limited releases and library access.",
            )?,
            body(
                "**Corporate Members (15%):** Businesses seeking executive retreats, client entertainment \
                 options, and corporate gifting solutions with a premium, local focus.",
            )?,
        ])
        .build())
}

pub fn membership_growth() -> Result<Section, ParseError> {
    let assumptions = TableSpec::new(projections::assumption_rows()).with_first_column(LIGHT_CELL);

    let growth = BarChart::new(YEARS, ValueAxis::new(0.0, 400.0, 100.0))
        .with_series(Series::new(
            "Members",
            projections::MEMBERSHIP_GROWTH,
            styles::PRIMARY,
        ))
        .with_value_labels();

    let composition = LineChart::new(YEARS, ValueAxis::new(0.0, 250.0, 50.0))
        .with_series(
            Series::new(
                "Upgrades from Existing Members",
                projections::COMPOSITION_UPGRADES,
                styles::PRIMARY,
            )
            .with_marker(Marker::Circle),
        )
        .with_series(
            Series::new(
                "New Conversions",
                projections::COMPOSITION_CONVERSIONS,
                styles::SECONDARY,
            )
            .with_marker(Marker::Square),
        )
        .with_legend();

    Ok(numbered("2. Membership Growth Projections", "membership-growth")
        .extend_blocks([
            heading("Growth Assumptions"),
            body(
                "Membership growth for the Winner's Circle Club is projected based on two primary sources: \
                 upgrades from existing wine club members and conversions from non-club visitors to the winery.",
            )?,
            Block::Table(assumptions),
            gap(),
            heading("Membership Growth Chart"),
            chart(growth),
            caption("Projected Member Growth by Year"),
            heading("Membership Composition"),
            body(
                "The chart below illustrates the projected breakdown between upgrades from existing club \
                 members and new conversions from winery visitors:",
            )?,
            chart(composition),
            caption("Member Composition by Source"),
            heading("Retention Strategy"),
            body(
                "A key factor in the success of the Winner's Circle Club is maintaining high retention rates \
                 through exceptional service and continuous enhancement of the value proposition. We project a \
                 92% annual renewal rate based on the following retention strategies:",
            )?,
            Block::bullets([
                "**Personalized Experiences:** Customized offerings based on member preferences and history",
                "**Exclusive Access:** Regular introduction of new benefits, experiences, and products available only to Winner's Circle members",
                "**Recognition Program:** Tiered recognition within the club based on tenure and spending",
                "**Community Building:** Fostering connections among members through exclusive events and forums",
                "**Regular Engagement:** Consistent, meaningful communications that provide value beyond promotional content",
            ])?,
        ])
        .build())
}

pub fn revenue_analysis() -> Result<Section, ParseError> {
    let overview = TableSpec::new(projections::revenue_overview_rows())
        .with_first_column(LIGHT_CELL)
        .with_last_column(GREY_CELL);

    let dollars = ValueAxis::new(0.0, 800_000.0, 200_000.0).with_format(ValueFormat::Dollars);
    let totals = projections::REVENUE_OVERVIEW.map(|year| year.total as f64);
    let trajectory = BarChart::new(YEARS, dollars)
        .with_series(Series::new("Total Revenue", totals, styles::PRIMARY))
        .with_value_labels();

    let stream = |field: fn(&projections::RevenueYear) -> i64| {
        projections::REVENUE_OVERVIEW.map(|year| field(&year) as f64)
    };
    let composition = BarChart::new(YEARS, dollars)
        .with_series(Series::new(
            "Direct Membership",
            stream(|year| year.direct),
            styles::PRIMARY,
        ))
        .with_series(Series::new(
            "Beyond-Credit Purchases",
            stream(|year| year.beyond_credit),
            styles::SECONDARY,
        ))
        .with_series(Series::new(
            "Accommodation",
            stream(|year| year.accommodation),
            styles::ACCENT,
        ))
        .stacked()
        .with_legend();

    Ok(numbered("3. Revenue Analysis", "revenue-analysis")
        .extend_blocks([
            heading("Revenue Streams"),
            body("The Winner's Circle Club generates revenue through three primary channels:")?,
            body(
                "**1. Direct Membership Credits:** The core $2,000 annual membership fee converted to usable credits",
            )?,
            body(
                "**2. Beyond-Credit Purchases:** Additional spending beyond the initial credit allocation, \
                 estimated at 20% of direct credit value",
            )?,
            body(
                "**3. Accommodation Revenue:** Income from member stays at the Staatsburg House, projected at \
                 10% utilization with a $300 per night average rate",
            )?,
            Block::Table(overview),
            gap(),
            heading("Revenue Growth Trajectory"),
            chart(trajectory),
            caption("Total Projected Revenue by Year"),
            heading("Revenue Composition"),
            body(
                "The following chart illustrates the breakdown of revenue streams over the projected \
                 four-year period:",
            )?,
            chart(composition),
            caption("Revenue Composition by Stream"),
            heading("Financial Impact"),
            body(
                "The Winner's Circle Club represents a significant financial opportunity for Milea Estate, \
                 with the following key impacts:",
            )?,
            Block::bullets([
                "**Revenue Growth:** 339% increase in revenue from Year 1 to Year 4",
                "**Enhanced Lifetime Value:** Member lifetime value increases from $1,920 for traditional club members to $8,000 for Winner's Circle members",
                "**Revenue Diversification:** Creates substantial non-wine revenue streams through accommodations and experiences",
                "**Return on Investment:** Projects a payback period of approximately 28 months on the initial investment",
                "**Brand Premium Effect:** Strengthens premium positioning, potentially increasing pricing power across all products",
            ])?,
        ])
        .build())
}

pub fn implementation_strategy() -> Result<Section, ParseError> {
    let resources = TableSpec::new(projections::resource_rows())
        .with_column_widths_in(&[2.0, 1.25, 3.5])
        .with_column_alignments(&[
            HorizontalAlignment::Left,
            HorizontalAlignment::Right,
            HorizontalAlignment::Left,
        ])
        .with_last_row(CellFill::new(styles::LIGHT, styles::BLACK, true))
        .with_font_size(9);

    let milestones = TableSpec::new(projections::milestone_rows())
        .with_header(None)
        .with_column_widths_in(&[1.25, 4.75])
        .with_column_alignments(&[HorizontalAlignment::Center, HorizontalAlignment::Left])
        .with_first_column(CellFill::new(styles::PRIMARY, styles::WHITE, true))
        .with_cell_padding_pt(8.0);

    Ok(numbered("4. Implementation Strategy", "implementation-strategy")
        .extend_blocks([
            heading("Phased Implementation"),
            body(
                "The Winner's Circle Club will be implemented in three distinct phases to ensure operational \
                 readiness, minimize disruption, and optimize the member experience:",
            )?,
            heading("Phase 1: Preparation (Months 1-3)"),
            body("This initial phase focuses on establishing the operational foundation for the club.")?,
            Block::bullets([
                "**Infrastructure Planning:** Finalize plans for club lounge, wine lockers, and other physical facilities",
                "**Technology Development:** Implement credit tracking system and member portal",
                "**Staffing:** Hire and train dedicated Club Manager to oversee the program",
                "**Marketing Materials:** Develop branding, collateral, and digital assets",
                "**Membership Structure:** Finalize pricing, benefits, and redemption policies",
            ])?,
            heading("Phase 2: Soft Launch (Months 4-6)"),
            body("The soft launch phase introduces the club to a limited audience of existing premium members.")?,
            Block::bullets([
                "**Initial Member Recruitment:** Target and convert top tier existing members",
                "**Facilities Completion:** Complete club lounge and essential infrastructure",
                "**Experience Testing:** Refinement of member journey and service standards",
                "**System Optimization:** Troubleshoot technology and operational processes",
                "**Feedback Collection:** Gather and implement early member suggestions",
            ])?,
            heading("Phase 3: Full Implementation (Months 7-12)"),
            body("The final phase scales the program to its full operational capacity.")?,
            Block::bullets([
                "**Full Market Launch:** Open general enrollment and implement marketing campaign",
                "**Complete Infrastructure:** Finalize all physical facilities and technology integration",
                "**Staff Expansion:** Add support personnel as membership grows",
                "**Programming Enhancement:** Establish full calendar of member events and experiences",
                "**Continuous Improvement:** Implement feedback mechanisms and refinement processes",
            ])?,
            heading("Resource Requirements"),
            body(
                "Successful implementation of the Winner's Circle Club will require the following key investments:",
            )?,
            Block::Table(resources),
            gap(),
            heading("Implementation Milestones"),
            Block::Table(milestones),
        ])
        .build())
}

pub fn financial_assumptions() -> Result<Section, ParseError> {
    Ok(numbered("5. Financial Assumptions", "financial-assumptions")
        .extend_blocks([
            heading("Core Membership Assumptions"),
            body(
                "Our financial projections are based on the following core assumptions regarding membership \
                 growth and retention:",
            )?,
            Block::bullets([
                "**Initial Upgrade Rate:** We project 4% of existing club members will upgrade during the initial \
                 launch phase, driven by targeted promotional efforts and early adopter incentives.",
                "**Ongoing Upgrade Rate:** Following the launch period, we expect a sustained 2% annual upgrade \
                 rate from existing club members, focusing on the most engaged current members who demonstrate \
                 high utilization of current benefits.",
                "**Initial Visitor Conversion:** A conservative 0.5% conversion rate of non-club visitors is \
                 projected for Year 1, allowing time for program awareness to build and service standards to be \
                 refined.",
                "**Ongoing Visitor Conversion:** As program awareness grows and word-of-mouth referrals increase, \
                 we project conversion rates to reach 1% of non-club visitors annually.",
                "**Annual Retention Rate:** Based on premium club industry benchmarks, we project a 92% annual \
                 retention rate, supported by high-touch service and continuous value enhancement.",
                "**Growth Potential:** No membership cap has been applied as market analysis indicates the program \
                 will not reach saturation within the initial 4-year projection period.",
            ])?,
            gap(),
            heading("Revenue Assumptions"),
            body("Our revenue projections are built upon the following key assumptions:")?,
            Block::bullets([
                "**Annual Membership Fee:** Members will be charged $2,000 annually, structured as quarterly \
                 payments of $500 to enhance affordability and cash flow management.",
                "**Beyond-Credit Purchases:** Members are projected to spend an additional 20% beyond their \
                 membership credits, driven by special events, limited releases, and premium experiences.",
                "**Accommodation Utilization:** We project 10% of members will utilize accommodation benefits, \
                 with an average stay of 3 nights at $300 per night.",
                "**Pricing Strategy:** Taking a conservative approach, no price increases are projected during the \
                 initial 4-year period, though market conditions may present opportunities for selective increases.",
                "**Credit Utilization:** We assume 100% credit redemption, with no breakage benefit factored into \
                 financial projections, ensuring conservative revenue estimates.",
            ])?,
            gap(),
            heading("Cost Assumptions"),
            body("Our cost and investment projections are based on the following key assumptions:")?,
            Block::bullets([
                "**Club Management:** A dedicated Club Manager position will be created with an annual salary of \
                 $85,000, with responsibilities shared across Milea Estate and Hudson Valley Vineyards to optimize \
                 resource utilization.",
                "**Staffing Efficiency:** The program is designed to operate without requiring additional \
                 full-time employees beyond the Club Manager, leveraging the existing operational team through \
                 enhanced training and systematic processes.",
                "**Physical Infrastructure:** A one-time capital investment of $175,000 will be required for \
                 facilities development, including the club lounge, wine storage lockers, and member access systems.",
                "**Technology Investment:** An initial investment of $62,500 will be allocated for technology \
                 systems, including the credit management platform, member portal, and integrated reservation \
                 systems.",
                "**Ongoing Operations:** Annual operating costs of $87,500 are projected for marketing \
                 initiatives, facility maintenance, program materials, and ongoing member services.",
            ])?,
        ])
        .build())
}

pub fn key_recommendations() -> Result<Section, ParseError> {
    Ok(numbered("6. Key Recommendations", "key-recommendations")
        .extend_blocks([
            body(
                "Based on our comprehensive analysis, we recommend the following key actions to ensure the \
                 success of the Winner's Circle Club:",
            )?,
            heading("Strategic Recommendations"),
            Block::bullets([
                "**Proceed with Implementation:** The financial projections and strategic benefits justify moving forward with the Winner's Circle concept",
                "**Phased Approach:** Adopt the proposed three-phase implementation to minimize disruption and optimize the member experience",
                "**Exclusive Positioning:** Maintain strict exclusivity to preserve the premium nature of the club",
                "**Infrastructure Investment:** Prioritize physical space enhancements to create tangible value for members",
                "**Dedicated Leadership:** Ensure the Club Manager position is filled with a hospitality professional who understands both wine and luxury service",
            ])?,
            heading("Operational Recommendations"),
            Block::bullets([
                "**Technology First:** Prioritize the credit management system to ensure seamless tracking and redemption",
                "**Experience Mapping:** Create detailed service blueprints for all touchpoints in the member journey",
                "**Staff Training:** Implement comprehensive training for all team members who will interact with Winner's Circle members",
                "**Feedback Mechanisms:** Establish formal and informal channels for member input throughout the implementation",
                "**Metric Tracking:** Develop KPI dashboard to monitor critical success factors in real-time",
            ])?,
            heading("Marketing Recommendations"),
            Block::bullets([
                "**Targeted Approach:** Focus initial marketing efforts on existing premium club members and high-value visitors",
                "**Exclusivity Messaging:** Emphasize limited availability and exclusive access in all communications",
                "**Experience Showcase:** Create compelling visual content highlighting the unique aspects of membership",
                "**Referral Program:** Implement member incentives for successful referrals to accelerate growth",
                "**Digital Integration:** Ensure a seamless online presence with easy application process",
            ])?,
            heading("Risk Mitigation"),
            Block::bullets([
                "**Economic Sensitivity Plan:** Develop contingency strategies for potential economic downturns",
                "**Scalable Infrastructure:** Design systems and spaces that can adjust to varying membership levels",
                "**Value Enhancement:** Continuously evolve benefits to maintain perceived value",
                "**Competitive Monitoring:** Establish systems to track similar offerings that may emerge in the region",
                "**Financial Buffers:** Maintain conservative financial projections with appropriate reserves",
            ])?,
        ])
        .build())
}

pub fn conclusion() -> Result<Section, ParseError> {
    Ok(Section::builder("Conclusion")
        .start_on_new_page(true)
        .identifier(Some("conclusion".to_owned()))
        .extend_blocks([
            body(
                "The Winner's Circle Club represents a strategic opportunity for Milea Estate to elevate its \
                 brand positioning, substantially increase revenue, and create deeper relationships with its \
                 most valuable customers. By transitioning from a traditional wine club model to a comprehensive \
                 lifestyle membership, Milea can differentiate itself within the competitive Hudson Valley wine \
                 region while substantially increasing the lifetime value of each member.",
            )?,
            body(
                "Our financial analysis indicates strong revenue potential, with projected growth from $159,360 \
                 in Year 1 to $699,986 by Year 4. The investment requirements are significant but justified by \
                 the estimated 28-month payback period and the strategic brand enhancement that will result.",
            )?,
            body(
                "Through careful implementation following the phased approach outlined in this report, Milea \
                 Estate can minimize operational disruption while creating an exceptional premium experience for \
                 members. The Winner's Circle Club has the potential to transform Milea's business model while \
                 setting a new standard for wine country experiences in the Hudson Valley region.",
            )?,
            Block::spacer(0.5 * INCH_MM),
        ])
        .build())
}

pub fn appendix() -> Result<Section, ParseError> {
    let ledger = TableSpec::new(projections::membership_ledger_rows()).with_first_column(LIGHT_CELL);
    let revenue = numeric_columns(TableSpec::new(projections::detailed_revenue_rows()))
        .with_first_column(LIGHT_CELL)
        .with_last_row(GREY_TOTAL);
    let returns = numeric_columns(TableSpec::new(projections::cash_flow_rows()))
        .with_first_column(LIGHT_CELL)
        .with_last_row(GREY_TOTAL);

    Ok(numbered("Appendix: Detailed Financial Projections", "appendix")
        .extend_blocks([
            heading("Detailed Membership Growth Projections"),
            Block::Table(ledger),
            gap(),
            heading("Detailed Revenue Projections"),
            Block::Table(revenue),
            gap(),
            heading("Investment and Returns Analysis"),
            Block::Table(returns),
            gap(),
            body(
                "ROI Analysis Summary: The Winner's Circle Club is projected to reach a positive cumulative cash \
                 flow in Year 3, with a payback period of approximately 28 months from initial investment. By \
                 Year 4, the cumulative cash flow reaches $1,121,313, representing a robust return on the \
                 initial investment.",
            )?,
        ])
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(section: &Section) -> Vec<String> {
        section
            .blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(paragraph) => Some(crate::richtext::plain_text(paragraph.spans())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cover_leaves_four_inches_above_the_byline() {
        let cover = cover();
        let spacers: Vec<f64> = cover
            .blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Spacer(height) => Some(*height),
                _ => None,
            })
            .collect();
        assert_eq!(spacers, vec![2.0 * INCH_MM, 2.0 * INCH_MM]);

        // Title and subtitle sit above the gap, the byline and date below it.
        let kinds: Vec<bool> = cover
            .blocks()
            .iter()
            .map(|block| matches!(block, Block::Spacer(_)))
            .collect();
        assert_eq!(kinds, vec![false, false, true, true, false, false]);
    }

    #[test]
    fn numbered_sections_open_with_page_break_and_heading() {
        let section = club_concept().expect("content parses");
        assert!(section.in_toc());
        assert_eq!(section.identifier(), Some("club-concept"));
        assert!(matches!(section.blocks()[0], Block::PageBreak));
        assert_eq!(paragraphs(&section)[0], "1. Club Concept and Structure");
    }

    #[test]
    fn bold_labels_are_parsed_out_of_markup() {
        let section = club_concept().expect("content parses");
        let list = section
            .blocks()
            .iter()
            .find_map(|block| match block {
                Block::BulletList(list) => Some(list),
                _ => None,
            })
            .expect("feature list");
        assert_eq!(list.len(), 5);
        let first = &list.items()[0];
        assert!(first[0].is_bold());
        assert_eq!(first[0].text(), "Credit-Based Flexibility:");
        assert!(!first[1].is_bold());
    }

    #[test]
    fn demographics_pie_uses_segment_shares() {
        let pie = demographics_chart();
        let values: Vec<f64> = pie.slices().iter().map(|slice| slice.value).collect();
        assert_eq!(values, vec![40.0, 25.0, 20.0, 15.0]);
    }

    #[test]
    fn appendix_tables_highlight_total_rows() {
        let section = appendix().expect("content parses");
        let tables: Vec<&TableSpec> = section
            .blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 3);

        let revenue = tables[1];
        let last = revenue.rows().len() - 1;
        assert_eq!(revenue.fill_for(last, 0), Some(GREY_TOTAL));
        assert_eq!(revenue.fill_for(1, 0), Some(LIGHT_CELL));
        assert_eq!(revenue.column_alignment(3), HorizontalAlignment::Right);
    }

    #[test]
    fn conclusion_stays_out_of_the_contents() {
        let section = conclusion().expect("content parses");
        assert!(!section.in_toc());
        assert!(matches!(section.blocks()[0], Block::PageBreak));
    }
}
