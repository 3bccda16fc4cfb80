use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Dimension – a categorical column records can be grouped or filtered by
// ---------------------------------------------------------------------------

/// Categorical columns of the statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    State,
    Year,
    Quarter,
    Brand,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::State,
        Dimension::Year,
        Dimension::Quarter,
        Dimension::Brand,
    ];

    /// Dimensions exposed as sidebar filters.
    pub const FILTERABLE: [Dimension; 3] = [Dimension::State, Dimension::Year, Dimension::Quarter];

    /// Column name in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::State => "state",
            Dimension::Year => "year",
            Dimension::Quarter => "quarter",
            Dimension::Brand => "brand",
        }
    }

    /// Human-readable label for axes and widgets.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::State => "State",
            Dimension::Year => "Year",
            Dimension::Quarter => "Quarter",
            Dimension::Brand => "Brand",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.column() == name)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Measure – a numeric column that gets summed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Measure {
    TotalUsers,
    TotalTransactionAmount,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::TotalUsers, Measure::TotalTransactionAmount];

    pub fn column(self) -> &'static str {
        match self {
            Measure::TotalUsers => "total_users",
            Measure::TotalTransactionAmount => "total_transaction_amount",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::TotalUsers => "Total users",
            Measure::TotalTransactionAmount => "Total transaction amount",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.column() == name)
    }
}

/// Every column a source file must provide.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    Dimension::ALL
        .into_iter()
        .map(Dimension::column)
        .chain(Measure::ALL.into_iter().map(Measure::column))
}

// ---------------------------------------------------------------------------
// DimValue – a single cell in a dimension column
// ---------------------------------------------------------------------------

/// Value of a [`Dimension`] for one record. `Ord` so it can key `BTreeMap`s;
/// integers sort before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimValue {
    Int(i64),
    Text(String),
}

impl DimValue {
    pub fn text(s: impl Into<String>) -> Self {
        DimValue::Text(s.into())
    }
}

impl From<i64> for DimValue {
    fn from(v: i64) -> Self {
        DimValue::Int(v)
    }
}

impl From<&str> for DimValue {
    fn from(v: &str) -> Self {
        DimValue::Text(v.to_string())
    }
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimValue::Int(i) => write!(f, "{i}"),
            DimValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// One row of the statistics table. Empty measure cells deserialize to `None`
/// and count as zero everywhere they are summed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub state: String,
    pub year: i64,
    pub quarter: i64,
    pub brand: String,
    pub total_users: Option<u64>,
    pub total_transaction_amount: Option<f64>,
}

impl Record {
    pub fn dimension(&self, dim: Dimension) -> DimValue {
        match dim {
            Dimension::State => DimValue::Text(self.state.clone()),
            Dimension::Year => DimValue::Int(self.year),
            Dimension::Quarter => DimValue::Int(self.quarter),
            Dimension::Brand => DimValue::Text(self.brand.clone()),
        }
    }

    pub fn users(&self) -> u64 {
        self.total_users.unwrap_or(0)
    }

    pub fn amount(&self) -> f64 {
        self.total_transaction_amount.unwrap_or(0.0)
    }

    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::TotalUsers => self.users() as f64,
            Measure::TotalTransactionAmount => self.amount(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – an ordered, read-only sequence of records
// ---------------------------------------------------------------------------

/// Loaded (or filtered) records with the distinct values of every dimension.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    unique_values: BTreeMap<Dimension, BTreeSet<DimValue>>,
}

impl Dataset {
    /// Build the per-dimension value index from the records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<Dimension, BTreeSet<DimValue>> = BTreeMap::new();
        for rec in &records {
            for dim in Dimension::ALL {
                unique_values.entry(dim).or_default().insert(rec.dimension(dim));
            }
        }
        Dataset {
            records,
            unique_values,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sorted distinct values of `dim`; empty for an empty dataset.
    pub fn unique_values(&self, dim: Dimension) -> impl Iterator<Item = &DimValue> {
        self.unique_values.get(&dim).into_iter().flatten()
    }

    pub fn distinct_count(&self, dim: Dimension) -> usize {
        self.unique_values.get(&dim).map_or(0, BTreeSet::len)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Dataset::from_records(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) fn record(state: &str, year: i64, quarter: i64, brand: &str, users: u64, amount: f64) -> Record {
    Record {
        state: state.to_string(),
        year,
        quarter,
        brand: brand.to_string(),
        total_users: Some(users),
        total_transaction_amount: Some(amount),
    }
}
