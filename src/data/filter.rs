use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, DimValue, Dimension, Record};

// ---------------------------------------------------------------------------
// Selection: which values are chosen per filterable dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state.
/// If a dimension is absent or its set is empty, it means "no filter" (show all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    chosen: BTreeMap<Dimension, BTreeSet<DimValue>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: restrict `dim` to `values`.
    pub fn with<I, V>(mut self, dim: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DimValue>,
    {
        self.set(dim, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn set(&mut self, dim: Dimension, values: BTreeSet<DimValue>) {
        if values.is_empty() {
            self.chosen.remove(&dim);
        } else {
            self.chosen.insert(dim, values);
        }
    }

    /// Drop the constraint on `dim`.
    pub fn clear(&mut self, dim: Dimension) {
        self.chosen.remove(&dim);
    }

    /// Chosen values for `dim`; empty means unconstrained.
    pub fn values(&self, dim: Dimension) -> impl Iterator<Item = &DimValue> {
        self.chosen.get(&dim).into_iter().flatten()
    }

    pub fn is_constrained(&self, dim: Dimension) -> bool {
        self.chosen.contains_key(&dim)
    }

    /// Whether `value` is shown under the current selection.
    pub fn admits(&self, dim: Dimension, value: &DimValue) -> bool {
        self.chosen.get(&dim).map_or(true, |set| set.contains(value))
    }

    /// Flip one value. `universe` holds every value of `dim`; it is used when
    /// narrowing an unconstrained dimension, and a selection that ends up
    /// covering the whole universe collapses back to "no constraint".
    pub fn toggle<'a>(
        &mut self,
        dim: Dimension,
        value: &DimValue,
        universe: impl IntoIterator<Item = &'a DimValue>,
    ) {
        let universe: BTreeSet<DimValue> = universe.into_iter().cloned().collect();
        let mut set = self.chosen.remove(&dim).unwrap_or_else(|| universe.clone());
        if !set.remove(value) {
            set.insert(value.clone());
        }
        if set != universe {
            self.set(dim, set);
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.chosen
            .iter()
            .all(|(dim, set)| set.contains(&record.dimension(*dim)))
    }
}

/// Records of `dataset` admitted by `selection`, in their original order.
pub fn filter(dataset: &Dataset, selection: &Selection) -> Dataset {
    dataset
        .records()
        .iter()
        .filter(|rec| selection.matches(rec))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Goa", 2020, 1, "Apple", 10, 1.0),
            record("Goa", 2021, 2, "Vivo", 20, 2.0),
            record("Assam", 2020, 3, "Apple", 30, 3.0),
            record("Kerala", 2022, 1, "Others", 40, 4.0),
        ])
    }

    #[test]
    fn empty_selection_keeps_everything() {
        let ds = dataset();
        assert_eq!(filter(&ds, &Selection::new()), ds);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let sel = Selection::new()
            .with(Dimension::State, ["Goa", "Assam"])
            .with(Dimension::Year, [2020_i64]);
        let out = filter(&dataset(), &sel);
        let states: Vec<&str> = out.records().iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, ["Goa", "Assam"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let ds = dataset();
        let sel = Selection::new()
            .with(Dimension::Quarter, [1_i64, 2])
            .with(Dimension::State, ["Goa", "Kerala"]);
        let once = filter(&ds, &sel);
        assert_eq!(filter(&once, &sel), once);
    }

    #[test]
    fn unknown_state_yields_empty_dataset() {
        let sel = Selection::new().with(Dimension::State, ["Atlantis"]);
        let out = filter(&dataset(), &sel);
        assert!(out.is_empty());
        assert_eq!(out.distinct_count(Dimension::State), 0);
    }

    #[test]
    fn toggle_narrows_then_restores() {
        let ds = dataset();
        let goa = DimValue::text("Goa");
        let mut sel = Selection::new();

        sel.toggle(Dimension::State, &goa, ds.unique_values(Dimension::State));
        assert!(!sel.admits(Dimension::State, &goa));
        assert!(sel.admits(Dimension::State, &DimValue::text("Assam")));

        sel.toggle(Dimension::State, &goa, ds.unique_values(Dimension::State));
        assert!(!sel.is_constrained(Dimension::State));
    }

    #[test]
    fn setting_an_empty_set_removes_the_constraint() {
        let mut sel = Selection::new().with(Dimension::Year, [2020_i64]);
        sel.set(Dimension::Year, BTreeSet::new());
        assert_eq!(sel, Selection::new());
    }
}
