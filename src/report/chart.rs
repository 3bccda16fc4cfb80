use std::collections::{BTreeMap, BTreeSet};

use crate::data::aggregate::aggregate;
use crate::data::model::{Dataset, DimValue, Dimension, Measure};

// ---------------------------------------------------------------------------
// Chart specification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bars, categories along x.
    Bar,
    /// Horizontal bars, categories along y. Used for rankings.
    HorizontalBar,
    Line,
}

/// How grouped values collapse into one plotted value per (category, series).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    Sum,
    /// Mean over the individual records of each cell.
    MeanOfRows,
    /// Sum per value of the given dimension first, then average those sums.
    MeanOver(Dimension),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Sorted by category value.
    Natural,
    /// Largest plotted total first.
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPalette {
    /// Evenly spaced hues, one per series.
    Hue,
    /// Blue → red gradient, one colour per category.
    CoolWarm,
    /// Purple → yellow gradient, one colour per category.
    Viridis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x: Dimension,
    pub hue: Option<Dimension>,
    pub measure: Measure,
    pub estimator: Estimator,
    pub order: CategoryOrder,
    pub limit: Option<usize>,
    pub palette: ChartPalette,
    pub markers: bool,
}

impl ChartSpec {
    fn new(title: &str, kind: ChartKind, x: Dimension, measure: Measure) -> Self {
        Self {
            title: title.to_string(),
            kind,
            x,
            hue: None,
            measure,
            estimator: Estimator::Sum,
            order: CategoryOrder::Natural,
            limit: None,
            palette: ChartPalette::Hue,
            markers: false,
        }
    }

    pub fn bar(title: &str, x: Dimension, measure: Measure) -> Self {
        Self::new(title, ChartKind::Bar, x, measure)
    }

    pub fn horizontal_bar(title: &str, x: Dimension, measure: Measure) -> Self {
        Self::new(title, ChartKind::HorizontalBar, x, measure)
    }

    pub fn line(title: &str, x: Dimension, measure: Measure) -> Self {
        Self::new(title, ChartKind::Line, x, measure)
    }

    /// Split into one series per value of `dim`.
    pub fn hue(mut self, dim: Dimension) -> Self {
        self.hue = Some(dim);
        self
    }

    pub fn estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn descending(mut self) -> Self {
        self.order = CategoryOrder::Descending;
        self
    }

    /// Keep only the first `n` categories after ordering.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn markers(mut self) -> Self {
        self.markers = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Chart – a spec resolved against data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// Aligned with [`Chart::categories`]; `None` where the cell has no rows.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub spec: ChartSpec,
    pub categories: Vec<DimValue>,
    pub series: Vec<Series>,
}

#[derive(Default)]
struct Cell {
    sum: f64,
    count: usize,
}

impl Chart {
    pub fn build(spec: ChartSpec, dataset: &Dataset) -> Self {
        let mut keys = vec![spec.x];
        keys.extend(spec.hue);
        if let Estimator::MeanOver(dim) = spec.estimator {
            keys.push(dim);
        }
        let view = aggregate(dataset, &keys, &[spec.measure]);

        let mut cells: BTreeMap<(DimValue, Option<DimValue>), Cell> = BTreeMap::new();
        let mut hues: BTreeSet<DimValue> = BTreeSet::new();
        for (key, totals) in view.iter() {
            let hue = spec.hue.map(|_| key[1].clone());
            if let Some(h) = &hue {
                hues.insert(h.clone());
            }
            let cell = cells.entry((key[0].clone(), hue)).or_default();
            cell.sum += totals.value(spec.measure);
            cell.count += match spec.estimator {
                Estimator::Sum | Estimator::MeanOfRows => totals.rows,
                Estimator::MeanOver(_) => 1,
            };
        }

        let plotted: BTreeMap<(DimValue, Option<DimValue>), f64> = cells
            .into_iter()
            .map(|(k, cell)| {
                let value = match spec.estimator {
                    Estimator::Sum => cell.sum,
                    _ => cell.sum / cell.count as f64,
                };
                (k, value)
            })
            .collect();

        let mut categories: Vec<DimValue> = plotted
            .keys()
            .map(|(x, _)| x.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if spec.order == CategoryOrder::Descending {
            let mut totals: BTreeMap<DimValue, f64> = BTreeMap::new();
            for ((x, _), v) in &plotted {
                *totals.entry(x.clone()).or_default() += v;
            }
            categories.sort_by(|a, b| totals[b].total_cmp(&totals[a]));
        }
        if let Some(n) = spec.limit {
            categories.truncate(n);
        }

        let series_keys: Vec<Option<DimValue>> = if spec.hue.is_some() {
            hues.into_iter().map(Some).collect()
        } else {
            vec![None]
        };
        let series = series_keys
            .into_iter()
            .map(|hue| Series {
                name: hue
                    .as_ref()
                    .map_or_else(|| spec.measure.label().to_string(), ToString::to_string),
                values: categories
                    .iter()
                    .map(|x| plotted.get(&(x.clone(), hue.clone())).copied())
                    .collect(),
            })
            .filter(|s| s.values.iter().any(Option::is_some))
            .collect();

        Chart {
            spec,
            categories,
            series,
        }
    }

    /// No category has a value.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn category_labels(&self) -> Vec<String> {
        self.categories.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Goa", 2020, 1, "Apple", 10, 100.0),
            record("Goa", 2020, 2, "Apple", 30, 300.0),
            record("Goa", 2021, 1, "Vivo", 50, 20.0),
            record("Assam", 2020, 1, "Vivo", 4, 40.0),
            record("Assam", 2020, 1, "Apple", 6, 60.0),
        ])
    }

    #[test]
    fn single_series_sums_per_category() {
        let chart = Chart::build(
            ChartSpec::bar("users", Dimension::State, Measure::TotalUsers),
            &dataset(),
        );
        assert_eq!(chart.category_labels(), ["Assam", "Goa"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "Total users");
        assert_eq!(chart.series[0].values, [Some(10.0), Some(90.0)]);
    }

    #[test]
    fn hue_aligns_series_and_leaves_gaps() {
        let chart = Chart::build(
            ChartSpec::line("users", Dimension::Year, Measure::TotalUsers).hue(Dimension::State),
            &dataset(),
        );
        assert_eq!(chart.category_labels(), ["2020", "2021"]);
        let assam = chart.series.iter().find(|s| s.name == "Assam").unwrap();
        assert_eq!(assam.values, [Some(10.0), None]);
        let goa = chart.series.iter().find(|s| s.name == "Goa").unwrap();
        assert_eq!(goa.values, [Some(40.0), Some(50.0)]);
    }

    #[test]
    fn mean_over_quarters_averages_quarter_sums() {
        let spec = ChartSpec::bar("amount", Dimension::Year, Measure::TotalTransactionAmount)
            .hue(Dimension::State)
            .estimator(Estimator::MeanOver(Dimension::Quarter));
        let chart = Chart::build(spec, &dataset());
        let goa = chart.series.iter().find(|s| s.name == "Goa").unwrap();
        // 2020: quarters 1 and 2 → (100 + 300) / 2
        assert_eq!(goa.values[0], Some(200.0));
        let assam = chart.series.iter().find(|s| s.name == "Assam").unwrap();
        // 2020: one quarter holding two rows → 40 + 60
        assert_eq!(assam.values[0], Some(100.0));
    }

    #[test]
    fn mean_of_rows_divides_by_row_count() {
        let spec = ChartSpec::bar("users", Dimension::State, Measure::TotalUsers)
            .estimator(Estimator::MeanOfRows);
        let chart = Chart::build(spec, &dataset());
        assert_eq!(chart.series[0].values, [Some(5.0), Some(30.0)]);
    }

    #[test]
    fn descending_with_limit_keeps_the_top() {
        let spec = ChartSpec::horizontal_bar("top", Dimension::Brand, Measure::TotalTransactionAmount)
            .descending()
            .limit(1);
        let chart = Chart::build(spec, &dataset());
        assert_eq!(chart.category_labels(), ["Apple"]);
        assert_eq!(chart.series[0].values, [Some(460.0)]);
    }

    #[test]
    fn empty_dataset_gives_empty_chart() {
        let chart = Chart::build(
            ChartSpec::bar("users", Dimension::State, Measure::TotalUsers).hue(Dimension::Year),
            &Dataset::default(),
        );
        assert!(chart.is_empty());
        assert!(chart.categories.is_empty());
    }
}
