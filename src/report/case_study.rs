use crate::data::model::{Dataset, Dimension, Measure};

use super::ReportSettings;
use super::chart::{Chart, ChartPalette, ChartSpec, Estimator};

// ---------------------------------------------------------------------------
// Case studies – fixed business views over the whole dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStudy {
    TransactionDynamics,
    DeviceDominance,
    InsurancePenetration,
    MarketExpansion,
    UserEngagement,
}

impl CaseStudy {
    pub const ALL: [CaseStudy; 5] = [
        CaseStudy::TransactionDynamics,
        CaseStudy::DeviceDominance,
        CaseStudy::InsurancePenetration,
        CaseStudy::MarketExpansion,
        CaseStudy::UserEngagement,
    ];

    /// 1-based position in the sidebar list.
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).map_or(0, |i| i + 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            CaseStudy::TransactionDynamics => "Decoding Transaction Dynamics",
            CaseStudy::DeviceDominance => "Device Dominance & User Engagement",
            CaseStudy::InsurancePenetration => "Insurance Penetration & Growth",
            CaseStudy::MarketExpansion => "Transaction Analysis for Market Expansion",
            CaseStudy::UserEngagement => "User Engagement & Growth Strategy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CaseStudy::TransactionDynamics => {
                "State-wise and quarter-wise transaction trends and user growth."
            }
            CaseStudy::DeviceDominance => "Which device brands dominate user registrations.",
            CaseStudy::InsurancePenetration => "Where insurance adoption could be expanded.",
            CaseStudy::MarketExpansion => "Top states by transaction volume.",
            CaseStudy::UserEngagement => "Growth of user registrations over time across states.",
        }
    }

    pub fn notice(self, settings: &ReportSettings) -> Option<String> {
        match self {
            CaseStudy::InsurancePenetration => Some(format!(
                "This dataset has no insurance column. Placeholder analysis over rows whose \
                 brand contains \"{}\".",
                settings.insurance_proxy_brand
            )),
            _ => None,
        }
    }

    pub fn charts(self, dataset: &Dataset, settings: &ReportSettings) -> Vec<Chart> {
        match self {
            CaseStudy::TransactionDynamics => vec![
                Chart::build(
                    ChartSpec::bar(
                        "Total Transaction Amount by Year and State",
                        Dimension::Year,
                        Measure::TotalTransactionAmount,
                    )
                    .hue(Dimension::State)
                    .estimator(Estimator::MeanOver(Dimension::Quarter)),
                    dataset,
                ),
                Chart::build(
                    ChartSpec::line("Total Users by Year", Dimension::Year, Measure::TotalUsers)
                        .hue(Dimension::State)
                        .estimator(Estimator::MeanOver(Dimension::Quarter))
                        .markers(),
                    dataset,
                ),
            ],
            CaseStudy::DeviceDominance => vec![Chart::build(
                ChartSpec::horizontal_bar(
                    "Top Device Brands by Total Users",
                    Dimension::Brand,
                    Measure::TotalUsers,
                )
                .descending()
                .palette(ChartPalette::CoolWarm),
                dataset,
            )],
            CaseStudy::InsurancePenetration => {
                let proxy = insurance_proxy(dataset, &settings.insurance_proxy_brand);
                vec![Chart::build(
                    ChartSpec::horizontal_bar(
                        "Users in Proxy Segment by State",
                        Dimension::State,
                        Measure::TotalUsers,
                    )
                    .hue(Dimension::Year)
                    .estimator(Estimator::MeanOfRows),
                    &proxy,
                )]
            }
            CaseStudy::MarketExpansion => vec![Chart::build(
                ChartSpec::horizontal_bar(
                    &format!("Top {} States by Transaction Amount", settings.top_states),
                    Dimension::State,
                    Measure::TotalTransactionAmount,
                )
                .descending()
                .limit(settings.top_states)
                .palette(ChartPalette::Viridis),
                dataset,
            )],
            CaseStudy::UserEngagement => vec![Chart::build(
                ChartSpec::line("User Growth Trend Across States", Dimension::Year, Measure::TotalUsers)
                    .hue(Dimension::State),
                dataset,
            )],
        }
    }

    /// Records the charts are drawn from. Only the proxy subset for
    /// insurance penetration, the whole dataset otherwise.
    pub fn covered_rows(self, dataset: &Dataset, settings: &ReportSettings) -> usize {
        match self {
            CaseStudy::InsurancePenetration => {
                insurance_proxy(dataset, &settings.insurance_proxy_brand).len()
            }
            _ => dataset.len(),
        }
    }
}

/// Rows whose brand contains `pattern`, case-insensitively. A stand-in for
/// insurance data the table does not have.
pub fn insurance_proxy(dataset: &Dataset, pattern: &str) -> Dataset {
    let pattern = pattern.to_lowercase();
    dataset
        .records()
        .iter()
        .filter(|rec| rec.brand.to_lowercase().contains(&pattern))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;
    use crate::report::chart::ChartKind;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Goa", 2020, 1, "Apple", 10, 100.0),
            record("Goa", 2020, 1, "Others", 2, 10.0),
            record("Assam", 2021, 2, "OTHERS", 4, 500.0),
            record("Kerala", 2021, 3, "Vivo", 30, 50.0),
        ])
    }

    /// Goa 2020 spans three quarters; Assam 2020 has two rows in one quarter.
    fn quarterly() -> Dataset {
        Dataset::from_records(vec![
            record("Goa", 2020, 1, "Apple", 10, 100.0),
            record("Goa", 2020, 2, "Others", 30, 300.0),
            record("Goa", 2020, 3, "Others", 20, 200.0),
            record("Goa", 2021, 1, "Others", 6, 60.0),
            record("Assam", 2020, 1, "Others", 4, 40.0),
            record("Assam", 2020, 1, "Vivo", 8, 80.0),
        ])
    }

    fn series<'a>(chart: &'a Chart, name: &str) -> &'a [Option<f64>] {
        &chart.series.iter().find(|s| s.name == name).unwrap().values
    }

    #[test]
    fn numbers_follow_sidebar_order() {
        let numbers: Vec<usize> = CaseStudy::ALL.iter().map(|c| c.number()).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn proxy_filter_ignores_case() {
        let proxy = insurance_proxy(&dataset(), "others");
        assert_eq!(proxy.len(), 2);
    }

    #[test]
    fn device_dominance_ranks_brands() {
        let charts = CaseStudy::DeviceDominance.charts(&dataset(), &ReportSettings::default());
        assert_eq!(charts[0].category_labels(), ["Vivo", "Apple", "OTHERS", "Others"]);
    }

    #[test]
    fn market_expansion_honours_top_n() {
        let settings = ReportSettings {
            top_states: 2,
            ..ReportSettings::default()
        };
        let charts = CaseStudy::MarketExpansion.charts(&dataset(), &settings);
        assert_eq!(charts[0].category_labels(), ["Assam", "Goa"]);
        assert!(charts[0].spec.title.starts_with("Top 2"));
    }

    #[test]
    fn transaction_dynamics_averages_quarter_totals() {
        let charts = CaseStudy::TransactionDynamics.charts(&quarterly(), &ReportSettings::default());
        assert_eq!(charts.len(), 2);

        let amount = &charts[0];
        assert_eq!(amount.category_labels(), ["2020", "2021"]);
        // Goa 2020: (100 + 300 + 200) / 3 quarters; Assam 2020: one quarter, 40 + 80.
        assert_eq!(series(amount, "Goa"), [Some(200.0), Some(60.0)]);
        assert_eq!(series(amount, "Assam"), [Some(120.0), None]);

        let users = &charts[1];
        assert_eq!(users.spec.kind, ChartKind::Line);
        assert!(users.spec.markers);
        assert_eq!(series(users, "Goa"), [Some(20.0), Some(6.0)]);
        assert_eq!(series(users, "Assam"), [Some(12.0), None]);
    }

    #[test]
    fn insurance_penetration_averages_proxy_rows_per_state_and_year() {
        let charts = CaseStudy::InsurancePenetration.charts(&quarterly(), &ReportSettings::default());
        let chart = &charts[0];
        assert_eq!(chart.spec.kind, ChartKind::HorizontalBar);
        assert_eq!(chart.category_labels(), ["Assam", "Goa"]);
        // The Apple and Vivo rows are outside the proxy segment.
        assert_eq!(series(chart, "2020"), [Some(4.0), Some(25.0)]);
        assert_eq!(series(chart, "2021"), [None, Some(6.0)]);
    }

    #[test]
    fn user_engagement_sums_users_per_year() {
        let charts = CaseStudy::UserEngagement.charts(&quarterly(), &ReportSettings::default());
        assert_eq!(series(&charts[0], "Goa"), [Some(60.0), Some(6.0)]);
        assert_eq!(series(&charts[0], "Assam"), [Some(12.0), None]);
    }

    #[test]
    fn covered_rows_counts_the_proxy_subset() {
        let settings = ReportSettings::default();
        let ds = quarterly();
        assert_eq!(CaseStudy::InsurancePenetration.covered_rows(&ds, &settings), 4);
        assert_eq!(CaseStudy::UserEngagement.covered_rows(&ds, &settings), 6);
    }

    #[test]
    fn every_case_study_renders_on_empty_data() {
        let settings = ReportSettings::default();
        for cs in CaseStudy::ALL {
            for chart in cs.charts(&Dataset::default(), &settings) {
                assert!(chart.is_empty(), "{cs:?}");
            }
        }
        assert!(CaseStudy::InsurancePenetration.notice(&settings).is_some());
    }
}
