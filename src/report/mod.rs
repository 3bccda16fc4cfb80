//! Report building: turns a loaded dataset and the current view into
//! summary metrics and resolved charts.

pub mod case_study;
pub mod chart;

use std::path::Path;
use std::sync::Arc;

use crate::data::aggregate::{AggregatedView, Summary, aggregate, summarize};
use crate::data::cache::DatasetCache;
use crate::data::error::{DataError, DataResult};
use crate::data::filter::{Selection, filter};
use crate::data::model::{Dataset, Dimension, Measure};

use case_study::CaseStudy;
use chart::{Chart, ChartSpec};

/// Which page the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    CaseStudy(CaseStudy),
    /// Free filtering over state, year and quarter.
    Explorer,
}

impl Default for View {
    fn default() -> Self {
        View::CaseStudy(CaseStudy::TransactionDynamics)
    }
}

/// Tunables for the case studies.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub top_states: usize,
    pub insurance_proxy_brand: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_states: 10,
            insurance_proxy_brand: "others".to_string(),
        }
    }
}

/// Everything a page needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub description: String,
    /// Warning shown above the charts.
    pub notice: Option<String>,
    pub summary: Option<Summary>,
    pub charts: Vec<Chart>,
    /// Records the report covers.
    pub rows: usize,
}

// ---------------------------------------------------------------------------
// ReportBuilder
// ---------------------------------------------------------------------------

pub struct ReportBuilder<'c> {
    cache: &'c DatasetCache,
    pub settings: ReportSettings,
}

impl ReportBuilder<'static> {
    /// Builder backed by the process-wide dataset cache.
    pub fn global(settings: ReportSettings) -> Self {
        Self::new(DatasetCache::global(), settings)
    }
}

impl<'c> ReportBuilder<'c> {
    pub fn new(cache: &'c DatasetCache, settings: ReportSettings) -> Self {
        Self { cache, settings }
    }

    /// Load `path`, reading the file only on the first request.
    pub fn load(&self, path: &Path) -> DataResult<Arc<Dataset>> {
        self.cache.get_or_load(path)
    }

    pub fn filter(&self, dataset: &Dataset, selection: &Selection) -> Dataset {
        filter(dataset, selection)
    }

    pub fn aggregate(&self, dataset: &Dataset, group_keys: &[Dimension], measures: &[Measure]) -> AggregatedView {
        aggregate(dataset, group_keys, measures)
    }

    pub fn summarize(&self, dataset: &Dataset) -> Summary {
        summarize(dataset)
    }

    pub fn build(&self, dataset: &Dataset, view: View, selection: &Selection) -> Report {
        match view {
            View::CaseStudy(cs) => self.case_study(dataset, cs),
            View::Explorer => self.explorer(dataset, selection),
        }
    }

    pub fn case_study(&self, dataset: &Dataset, case_study: CaseStudy) -> Report {
        Report {
            title: format!("{}. {}", case_study.number(), case_study.title()),
            description: case_study.description().to_string(),
            notice: case_study.notice(&self.settings),
            summary: None,
            charts: case_study.charts(dataset, &self.settings),
            rows: case_study.covered_rows(dataset, &self.settings),
        }
    }

    /// Metrics and charts over the rows admitted by `selection`.
    pub fn explorer(&self, dataset: &Dataset, selection: &Selection) -> Report {
        let filtered = self.filter(dataset, selection);
        log::debug!("Selection kept {} of {} records", filtered.len(), dataset.len());

        let notice = filtered
            .is_empty()
            .then(|| DataError::EmptySelection.to_string());

        Report {
            title: "Explorer".to_string(),
            description: "Filter by state, year and quarter.".to_string(),
            notice,
            summary: Some(self.summarize(&filtered)),
            rows: filtered.len(),
            charts: vec![
                Chart::build(
                    ChartSpec::bar(
                        "Transaction Amount by State",
                        Dimension::State,
                        Measure::TotalTransactionAmount,
                    )
                    .descending(),
                    &filtered,
                ),
                Chart::build(
                    ChartSpec::line("Users by Year and Quarter", Dimension::Year, Measure::TotalUsers)
                        .hue(Dimension::Quarter)
                        .markers(),
                    &filtered,
                ),
            ],
        }
    }
}
