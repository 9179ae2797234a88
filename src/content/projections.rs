//! Literal projection tables behind the report's tables and charts.
//!
//! Money is whole dollars. Row builders format the values the way they are
//! printed; the chart series are kept exactly as published even where they do
//! not line up with the tables.

use crate::format::{dollars, percent};

pub const YEARS: [&str; 4] = ["Year 1", "Year 2", "Year 3", "Year 4"];

const MISSING: &str = "\u{2014}";

/// Annual membership fee converted one to one into credits.
pub const ANNUAL_FEE: i64 = 2_000;

/// Share of members in each target segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemographicShare {
    pub segment: &'static str,
    pub percent: u32,
}

pub const DEMOGRAPHICS: [DemographicShare; 4] = [
    DemographicShare {
        segment: "Affluent Local Residents",
        percent: 40,
    },
    DemographicShare {
        segment: "NYC Weekend Travelers",
        percent: 25,
    },
    DemographicShare {
        segment: "Wine Enthusiasts",
        percent: 20,
    },
    DemographicShare {
        segment: "Corporate Members",
        percent: 15,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MembershipAssumption {
    pub upgrade_rate: &'static str,
    pub upgrades: u32,
    pub conversion_rate: &'static str,
    pub conversions: u32,
    pub total_new: u32,
    pub cumulative: u32,
}

pub const MEMBERSHIP_ASSUMPTIONS: [MembershipAssumption; 4] = [
    MembershipAssumption {
        upgrade_rate: "4%",
        upgrades: 24,
        conversion_rate: "0.5%",
        conversions: 40,
        total_new: 64,
        cumulative: 64,
    },
    MembershipAssumption {
        upgrade_rate: "2%",
        upgrades: 14,
        conversion_rate: "1%",
        conversions: 80,
        total_new: 94,
        cumulative: 148,
    },
    MembershipAssumption {
        upgrade_rate: "2%",
        upgrades: 14,
        conversion_rate: "1%",
        conversions: 80,
        total_new: 94,
        cumulative: 220,
    },
    MembershipAssumption {
        upgrade_rate: "2%",
        upgrades: 14,
        conversion_rate: "1%",
        conversions: 80,
        total_new: 94,
        cumulative: 281,
    },
];

/// Members per year shown in the membership growth bar chart.
pub const MEMBERSHIP_GROWTH: [f64; 4] = [80.0, 190.0, 285.0, 370.0];

/// Cumulative members by source, shown in the composition line chart.
pub const COMPOSITION_UPGRADES: [f64; 4] = [24.0, 38.0, 52.0, 66.0];
pub const COMPOSITION_CONVERSIONS: [f64; 4] = [40.0, 110.0, 168.0, 215.0];

/// One year of the revenue overview in section 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevenueYear {
    pub members: u32,
    pub direct: i64,
    pub beyond_credit: i64,
    pub accommodation: i64,
    pub total: i64,
}

pub const REVENUE_OVERVIEW: [RevenueYear; 4] = [
    RevenueYear {
        members: 64,
        direct: 128_000,
        beyond_credit: 25_600,
        accommodation: 5_760,
        total: 159_360,
    },
    RevenueYear {
        members: 148,
        direct: 296_000,
        beyond_credit: 59_360,
        accommodation: 13_356,
        total: 369_516,
    },
    RevenueYear {
        members: 220,
        direct: 440_280,
        beyond_credit: 88_056,
        accommodation: 19_812,
        total: 548_148,
    },
    RevenueYear {
        members: 281,
        direct: 562_238,
        beyond_credit: 112_447,
        accommodation: 25_300,
        total: 699_986,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceLine {
    pub category: &'static str,
    pub investment: i64,
    pub details: &'static str,
}

pub const RESOURCES: [ResourceLine; 4] = [
    ResourceLine {
        category: "Physical Infrastructure",
        investment: 175_000,
        details: "Club lounge, wine lockers, biometric access",
    },
    ResourceLine {
        category: "Technology Systems",
        investment: 62_500,
        details: "Credit platform, member portal, reservations",
    },
    ResourceLine {
        category: "Staffing",
        investment: 85_000,
        details: "Club Manager (shared operations)",
    },
    ResourceLine {
        category: "Operations",
        investment: 87_500,
        details: "Inventory, service provisions, marketing",
    },
];

pub const TOTAL_INVESTMENT: i64 = 410_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MilestoneLine {
    pub period: &'static str,
    pub activity: &'static str,
}

pub const MILESTONES: [MilestoneLine; 7] = [
    MilestoneLine {
        period: "Month 1-2",
        activity: "Infrastructure planning & initial staffing",
    },
    MilestoneLine {
        period: "Month 3",
        activity: "Technology development & membership structure finalization",
    },
    MilestoneLine {
        period: "Month 4",
        activity: "Soft launch to select existing members",
    },
    MilestoneLine {
        period: "Month 5-6",
        activity: "Refinement based on initial member feedback",
    },
    MilestoneLine {
        period: "Month 7-8",
        activity: "Full market launch & marketing campaign",
    },
    MilestoneLine {
        period: "Month 9-10",
        activity: "Expansion of programming & experiences",
    },
    MilestoneLine {
        period: "Month 11-12",
        activity: "Optimization & preparation for Year 2 growth",
    },
];

/// One year of the appendix membership ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MembershipLedgerYear {
    pub starting: u32,
    pub upgrades: u32,
    pub conversions: u32,
    pub attrition: u32,
    pub net_new: u32,
    pub ending: u32,
}

pub const MEMBERSHIP_LEDGER: [MembershipLedgerYear; 4] = [
    MembershipLedgerYear {
        starting: 0,
        upgrades: 24,
        conversions: 40,
        attrition: 0,
        net_new: 64,
        ending: 64,
    },
    MembershipLedgerYear {
        starting: 64,
        upgrades: 14,
        conversions: 80,
        attrition: 5,
        net_new: 89,
        ending: 153,
    },
    MembershipLedgerYear {
        starting: 153,
        upgrades: 14,
        conversions: 80,
        attrition: 12,
        net_new: 82,
        ending: 235,
    },
    MembershipLedgerYear {
        starting: 235,
        upgrades: 14,
        conversions: 80,
        attrition: 19,
        net_new: 75,
        ending: 310,
    },
];

/// One year of the appendix revenue detail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetailedRevenueYear {
    pub members: u32,
    pub direct: i64,
    pub beyond_credit: i64,
    pub accommodation: i64,
    pub total: i64,
    /// Growth over the previous year in percent; `None` for the first year.
    pub growth: Option<f64>,
}

pub const DETAILED_REVENUE: [DetailedRevenueYear; 4] = [
    DetailedRevenueYear {
        members: 64,
        direct: 128_000,
        beyond_credit: 25_600,
        accommodation: 5_760,
        total: 159_360,
        growth: None,
    },
    DetailedRevenueYear {
        members: 153,
        direct: 306_000,
        beyond_credit: 61_200,
        accommodation: 13_770,
        total: 380_970,
        growth: Some(139.1),
    },
    DetailedRevenueYear {
        members: 235,
        direct: 470_000,
        beyond_credit: 94_000,
        accommodation: 21_150,
        total: 585_150,
        growth: Some(53.6),
    },
    DetailedRevenueYear {
        members: 310,
        direct: 620_000,
        beyond_credit: 124_000,
        accommodation: 27_900,
        total: 771_900,
        growth: Some(31.9),
    },
];

/// One year of the investment and returns analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CashFlowYear {
    pub revenue: i64,
    pub initial_investment: i64,
    pub ongoing_costs: i64,
    pub net: i64,
    pub cumulative: i64,
}

pub const CASH_FLOW: [CashFlowYear; 4] = [
    CashFlowYear {
        revenue: 159_360,
        initial_investment: 410_000,
        ongoing_costs: 87_500,
        net: -338_140,
        cumulative: -338_140,
    },
    CashFlowYear {
        revenue: 380_970,
        initial_investment: 0,
        ongoing_costs: 90_125,
        net: 290_845,
        cumulative: -47_295,
    },
    CashFlowYear {
        revenue: 585_150,
        initial_investment: 0,
        ongoing_costs: 92_829,
        net: 492_321,
        cumulative: 445_026,
    },
    CashFlowYear {
        revenue: 771_900,
        initial_investment: 0,
        ongoing_costs: 95_613,
        net: 676_287,
        cumulative: 1_121_313,
    },
];

/// Year totals for the standalone revenue growth image.
pub fn revenue_growth_series() -> [f64; 4] {
    DETAILED_REVENUE.map(|year| year.total as f64)
}

fn sum<T>(rows: &[T], field: impl Fn(&T) -> i64) -> i64 {
    rows.iter().map(field).sum()
}

fn dollars_or_missing(value: i64) -> String {
    if value == 0 {
        MISSING.to_owned()
    } else {
        dollars(value)
    }
}

fn header(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_owned()).collect()
}

fn year_header(first: &str, last: Option<&str>) -> Vec<String> {
    let mut row = vec![first.to_owned()];
    row.extend(YEARS.iter().map(|year| (*year).to_owned()));
    row.extend(last.map(str::to_owned));
    row
}

pub fn assumption_rows() -> Vec<Vec<String>> {
    let mut upgrades = vec!["Upgrade of existing club members".to_owned()];
    let mut conversions = vec!["Conversion of non-club visitors".to_owned()];
    let mut total_new = vec!["Total new members".to_owned()];
    let mut cumulative = vec!["Cumulative membership".to_owned()];
    for year in &MEMBERSHIP_ASSUMPTIONS {
        upgrades.push(format!("{}\n({} members)", year.upgrade_rate, year.upgrades));
        conversions.push(format!("{}\n({} members)", year.conversion_rate, year.conversions));
        total_new.push(year.total_new.to_string());
        cumulative.push(year.cumulative.to_string());
    }
    vec![
        year_header("Assumptions", None),
        upgrades,
        conversions,
        total_new,
        cumulative,
    ]
}

pub fn revenue_overview_rows() -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Year",
        "Members",
        "Direct Membership",
        "Beyond-Credit Purchases",
        "Accommodation",
        "Total Revenue",
    ])];
    rows.extend(REVENUE_OVERVIEW.iter().enumerate().map(|(index, year)| {
        vec![
            (index + 1).to_string(),
            year.members.to_string(),
            dollars(year.direct),
            dollars(year.beyond_credit),
            dollars(year.accommodation),
            dollars(year.total),
        ]
    }));
    rows
}

pub fn resource_rows() -> Vec<Vec<String>> {
    let mut rows = vec![header(&["Category", "Investment", "Details"])];
    rows.extend(RESOURCES.iter().map(|line| {
        vec![
            line.category.to_owned(),
            dollars(line.investment),
            line.details.to_owned(),
        ]
    }));
    rows.push(vec![
        "Total Investment".to_owned(),
        dollars(TOTAL_INVESTMENT),
        "First-year capital and operational expenses".to_owned(),
    ]);
    rows
}

pub fn milestone_rows() -> Vec<Vec<String>> {
    MILESTONES
        .iter()
        .map(|line| vec![line.period.to_owned(), line.activity.to_owned()])
        .collect()
}

pub fn membership_ledger_rows() -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Year",
        "Starting Members",
        "Upgrades",
        "New Conversions",
        "Attritions",
        "Net New",
        "Ending Total",
    ])];
    rows.extend(MEMBERSHIP_LEDGER.iter().enumerate().map(|(index, year)| {
        [
            index as u32 + 1,
            year.starting,
            year.upgrades,
            year.conversions,
            year.attrition,
            year.net_new,
            year.ending,
        ]
        .iter()
        .map(u32::to_string)
        .collect()
    }));
    rows
}

pub fn detailed_revenue_rows() -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Year",
        "Members",
        "Direct Membership",
        "Beyond-Credit (20%)",
        "Accommodation",
        "Total Revenue",
        "YoY Growth",
    ])];
    rows.extend(DETAILED_REVENUE.iter().enumerate().map(|(index, year)| {
        vec![
            (index + 1).to_string(),
            year.members.to_string(),
            dollars(year.direct),
            dollars(year.beyond_credit),
            dollars(year.accommodation),
            dollars(year.total),
            year.growth.map_or_else(|| MISSING.to_owned(), percent),
        ]
    }));
    rows.push(vec![
        "Total".to_owned(),
        MISSING.to_owned(),
        dollars(sum(&DETAILED_REVENUE, |year| year.direct)),
        dollars(sum(&DETAILED_REVENUE, |year| year.beyond_credit)),
        dollars(sum(&DETAILED_REVENUE, |year| year.accommodation)),
        dollars(sum(&DETAILED_REVENUE, |year| year.total)),
        MISSING.to_owned(),
    ]);
    rows
}

pub fn cash_flow_rows() -> Vec<Vec<String>> {
    let line = |label: &str, field: fn(&CashFlowYear) -> i64, total: Option<i64>| {
        let mut row = vec![label.to_owned()];
        row.extend(CASH_FLOW.iter().map(|year| dollars_or_missing(field(year))));
        row.push(total.map_or_else(|| MISSING.to_owned(), dollars));
        row
    };
    let negated = |value: i64| -value;

    vec![
        year_header("Category", Some("Total")),
        line(
            "Revenue",
            |year| year.revenue,
            Some(sum(&CASH_FLOW, |year| year.revenue)),
        ),
        line(
            "Initial Investment",
            |year| -year.initial_investment,
            Some(negated(sum(&CASH_FLOW, |year| year.initial_investment))),
        ),
        line(
            "Ongoing Costs",
            |year| -year.ongoing_costs,
            Some(negated(sum(&CASH_FLOW, |year| year.ongoing_costs))),
        ),
        line(
            "Net Cash Flow",
            |year| year.net,
            Some(sum(&CASH_FLOW, |year| year.net)),
        ),
        line("Cumulative Cash Flow", |year| year.cumulative, None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demographic_shares_cover_everyone() {
        assert_eq!(DEMOGRAPHICS.iter().map(|share| share.percent).sum::<u32>(), 100);
    }

    #[test]
    fn new_members_are_upgrades_plus_conversions() {
        for year in &MEMBERSHIP_ASSUMPTIONS {
            assert_eq!(year.total_new, year.upgrades + year.conversions);
        }
    }

    #[test]
    fn composition_upgrades_accumulate_yearly_upgrades() {
        let mut running = 0;
        for (year, plotted) in MEMBERSHIP_ASSUMPTIONS.iter().zip(COMPOSITION_UPGRADES) {
            running += year.upgrades;
            assert_eq!(f64::from(running), plotted);
        }
    }

    #[test]
    fn resources_add_up_to_total_investment() {
        assert_eq!(sum(&RESOURCES, |line| line.investment), TOTAL_INVESTMENT);
        assert_eq!(CASH_FLOW[0].initial_investment, TOTAL_INVESTMENT);
    }

    #[test]
    fn overview_streams_sum_where_published_consistently() {
        for year in [&REVENUE_OVERVIEW[0], &REVENUE_OVERVIEW[2]] {
            assert_eq!(
                year.direct + year.beyond_credit + year.accommodation,
                year.total
            );
        }
        assert_eq!(REVENUE_OVERVIEW[0].direct, i64::from(REVENUE_OVERVIEW[0].members) * ANNUAL_FEE);
    }

    #[test]
    fn membership_ledger_balances() {
        let mut previous_end = 0;
        for year in &MEMBERSHIP_LEDGER {
            assert_eq!(year.starting, previous_end);
            assert_eq!(year.net_new, year.upgrades + year.conversions - year.attrition);
            assert_eq!(year.ending, year.starting + year.net_new);
            previous_end = year.ending;
        }
    }

    #[test]
    fn detailed_revenue_follows_membership() {
        for (year, ledger) in DETAILED_REVENUE.iter().zip(&MEMBERSHIP_LEDGER) {
            assert_eq!(year.members, ledger.ending);
            assert_eq!(year.direct, i64::from(year.members) * ANNUAL_FEE);
            assert_eq!(year.beyond_credit * 5, year.direct);
            assert_eq!(year.accommodation, i64::from(year.members) * 90);
            assert_eq!(
                year.direct + year.beyond_credit + year.accommodation,
                year.total
            );
        }
    }

    #[test]
    fn growth_percentages_match_totals() {
        for pair in DETAILED_REVENUE.windows(2) {
            let expected = (pair[1].total as f64 / pair[0].total as f64 - 1.0) * 100.0;
            let published = pair[1].growth.expect("growth after first year");
            assert!((expected - published).abs() < 0.05, "{expected} vs {published}");
        }
    }

    #[test]
    fn cash_flow_nets_and_accumulates() {
        let mut cumulative = 0;
        for (year, revenue) in CASH_FLOW.iter().zip(&DETAILED_REVENUE) {
            assert_eq!(year.revenue, revenue.total);
            assert_eq!(
                year.net,
                year.revenue - year.initial_investment - year.ongoing_costs
            );
            cumulative += year.net;
            assert_eq!(year.cumulative, cumulative);
        }
    }

    #[test]
    fn total_rows_are_printed_from_the_years() {
        let revenue = detailed_revenue_rows();
        assert_eq!(
            revenue.last().map(|row| row[5].as_str()),
            Some("$1,897,380")
        );
        assert_eq!(revenue[1][6], "\u{2014}");
        assert_eq!(revenue[2][6], "139.1%");

        let cash = cash_flow_rows();
        assert_eq!(cash[2], vec!["Initial Investment", "$(410,000)", "\u{2014}", "\u{2014}", "\u{2014}", "$(410,000)"]);
        assert_eq!(cash[3][5], "$(366,067)");
        assert_eq!(cash[4][5], "$1,121,313");
        assert_eq!(cash[5][2], "$(47,295)");
        assert_eq!(cash[5][5], "\u{2014}");
    }

    #[test]
    fn every_table_is_rectangular() {
        for rows in [
            assumption_rows(),
            revenue_overview_rows(),
            resource_rows(),
            milestone_rows(),
            membership_ledger_rows(),
            detailed_revenue_rows(),
            cash_flow_rows(),
        ] {
            let width = rows[0].len();
            assert!(rows.iter().all(|row| row.len() == width));
        }
    }

    #[test]
    fn assumption_cells_break_before_member_counts() {
        let rows = assumption_rows();
        assert_eq!(rows[1][1], "4%\n(24 members)");
        assert_eq!(rows[2][1], "0.5%\n(40 members)");
        assert_eq!(rows[4][4], "281");
    }
}
