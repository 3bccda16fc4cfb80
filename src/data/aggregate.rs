use std::collections::BTreeMap;

use super::model::{Dataset, DimValue, Dimension, Measure, Record};

// ---------------------------------------------------------------------------
// Totals – summed measures of one group
// ---------------------------------------------------------------------------

/// Summed measures plus the number of contributing records. User counts
/// saturate at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub total_users: u64,
    pub total_transaction_amount: f64,
    pub rows: usize,
}

impl Totals {
    fn add(&mut self, record: &Record, measures: &[Measure]) {
        self.rows += 1;
        for measure in measures {
            match measure {
                Measure::TotalUsers => self.total_users = self.total_users.saturating_add(record.users()),
                Measure::TotalTransactionAmount => {
                    self.total_transaction_amount += record.amount()
                }
            }
        }
    }

    pub fn value(&self, measure: Measure) -> f64 {
        match measure {
            Measure::TotalUsers => self.total_users as f64,
            Measure::TotalTransactionAmount => self.total_transaction_amount,
        }
    }
}

impl std::ops::AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        self.total_users = self.total_users.saturating_add(rhs.total_users);
        self.total_transaction_amount += rhs.total_transaction_amount;
        self.rows += rhs.rows;
    }
}

// ---------------------------------------------------------------------------
// AggregatedView – grouped projection of a dataset
// ---------------------------------------------------------------------------

/// Group key: one value per grouping dimension, in grouping order.
pub type GroupKey = Vec<DimValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedView {
    pub keys: Vec<Dimension>,
    pub measures: Vec<Measure>,
    groups: BTreeMap<GroupKey, Totals>,
}

impl AggregatedView {
    pub fn get(&self, key: &[DimValue]) -> Option<&Totals> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Totals)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum over every group.
    pub fn grand_total(&self) -> Totals {
        self.groups.values().fold(Totals::default(), |mut acc, t| {
            acc += *t;
            acc
        })
    }

    /// Groups ordered by `measure`, largest first. Equal values keep key order.
    pub fn ranked(&self, measure: Measure) -> Vec<(&GroupKey, &Totals)> {
        let mut rows: Vec<_> = self.groups.iter().collect();
        rows.sort_by(|a, b| b.1.value(measure).total_cmp(&a.1.value(measure)));
        rows
    }
}

/// Group `dataset` by the ordered `group_keys` and sum `measures` per group.
/// Measures not listed stay zero. An empty dataset yields an empty view.
pub fn aggregate(dataset: &Dataset, group_keys: &[Dimension], measures: &[Measure]) -> AggregatedView {
    let mut groups: BTreeMap<GroupKey, Totals> = BTreeMap::new();
    for record in dataset.records() {
        let key: GroupKey = group_keys.iter().map(|d| record.dimension(*d)).collect();
        groups.entry(key).or_default().add(record, measures);
    }
    AggregatedView {
        keys: group_keys.to_vec(),
        measures: measures.to_vec(),
        groups,
    }
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub total_users: u64,
    pub total_amount: f64,
}

pub fn summarize(dataset: &Dataset) -> Summary {
    dataset
        .records()
        .iter()
        .fold(Summary::default(), |acc, rec| Summary {
            total_users: acc.total_users.saturating_add(rec.users()),
            total_amount: acc.total_amount + rec.amount(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{Selection, filter};
    use crate::data::model::record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Goa", 2020, 1, "Apple", 10, 1.5),
            record("Goa", 2020, 2, "Vivo", 20, 2.5),
            record("Assam", 2021, 1, "Apple", 5, 4.0),
            record("Kerala", 2021, 3, "Others", 7, 0.25),
        ])
    }

    #[test]
    fn groups_by_single_key() {
        let ds = Dataset::from_records(vec![
            record("X", 2020, 1, "A", 10, 0.0),
            record("X", 2021, 1, "A", 20, 0.0),
        ]);
        let view = aggregate(&ds, &[Dimension::State], &[Measure::TotalUsers]);
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(&[DimValue::text("X")]).unwrap().total_users, 30);
    }

    #[test]
    fn groups_by_tuple_and_skips_unrequested_measures() {
        let view = aggregate(
            &dataset(),
            &[Dimension::State, Dimension::Year],
            &[Measure::TotalTransactionAmount],
        );
        let goa = view
            .get(&[DimValue::text("Goa"), DimValue::Int(2020)])
            .unwrap();
        assert_eq!(goa.total_transaction_amount, 4.0);
        assert_eq!(goa.total_users, 0);
        assert_eq!(goa.rows, 2);
    }

    #[test]
    fn absent_measures_count_as_zero() {
        let mut rec = record("Goa", 2020, 1, "Apple", 0, 0.0);
        rec.total_users = None;
        rec.total_transaction_amount = None;
        let ds = Dataset::from_records(vec![rec, record("Goa", 2020, 2, "Apple", 3, 1.0)]);
        let view = aggregate(&ds, &[Dimension::State], &Measure::ALL);
        let goa = view.get(&[DimValue::text("Goa")]).unwrap();
        assert_eq!((goa.total_users, goa.total_transaction_amount), (3, 1.0));
    }

    #[test]
    fn groups_partition_the_filtered_rows() {
        let ds = dataset();
        let selections = [
            Selection::new(),
            Selection::new().with(Dimension::State, ["Goa"]),
            Selection::new().with(Dimension::Year, [2021_i64]).with(Dimension::Quarter, [1_i64]),
            Selection::new().with(Dimension::State, ["Nowhere"]),
        ];
        for sel in &selections {
            let filtered = filter(&ds, sel);
            let view = aggregate(&filtered, &[Dimension::State, Dimension::Brand], &Measure::ALL);
            let total = view.grand_total();
            let summary = summarize(&filtered);
            assert_eq!(total.total_users, summary.total_users, "{sel:?}");
            assert_eq!(total.total_transaction_amount, summary.total_amount, "{sel:?}");
            assert_eq!(total.rows, filtered.len(), "{sel:?}");
        }
    }

    #[test]
    fn empty_dataset_summarizes_to_zero() {
        let empty = Dataset::default();
        assert_eq!(summarize(&empty), Summary { total_users: 0, total_amount: 0.0 });
        assert!(aggregate(&empty, &[Dimension::State], &Measure::ALL).is_empty());
    }

    #[test]
    fn huge_user_counts_saturate_instead_of_overflowing() {
        let ds = Dataset::from_records(vec![
            record("Goa", 2020, 1, "Apple", u64::MAX, 1.0),
            record("Goa", 2020, 2, "Apple", 1, 1.0),
            record("Assam", 2020, 1, "Vivo", 1, 1.0),
        ]);
        assert_eq!(summarize(&ds).total_users, u64::MAX);

        let view = aggregate(&ds, &[Dimension::State], &[Measure::TotalUsers]);
        assert_eq!(view.get(&[DimValue::text("Goa")]).unwrap().total_users, u64::MAX);
        assert_eq!(view.grand_total().total_users, u64::MAX);
    }

    #[test]
    fn ranked_orders_descending() {
        let view = aggregate(&dataset(), &[Dimension::State], &[Measure::TotalUsers]);
        let order: Vec<String> = view
            .ranked(Measure::TotalUsers)
            .into_iter()
            .map(|(k, _)| k[0].to_string())
            .collect();
        assert_eq!(order, ["Goa", "Kerala", "Assam"]);
    }
}
