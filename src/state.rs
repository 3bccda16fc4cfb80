use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::filter::Selection;
use crate::data::model::{Dataset, DimValue, Dimension};
use crate::report::{Report, ReportBuilder, View};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub builder: ReportBuilder<'static>,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Path of the active dataset.
    pub data_path: Option<PathBuf>,

    /// Page currently shown.
    pub view: View,

    /// Explorer filter selections.
    pub selection: Selection,

    /// Report for the current dataset, view and selection (cached).
    pub report: Option<Report>,

    /// Render each chart's values as a table under it.
    pub show_tables: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(builder: ReportBuilder<'static>) -> Self {
        Self {
            builder,
            dataset: None,
            data_path: None,
            view: View::default(),
            selection: Selection::new(),
            report: None,
            show_tables: false,
            status_message: None,
        }
    }

    /// Load `path` through the cache and make it the active dataset. On
    /// failure the previous dataset stays active and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match self.builder.load(path) {
            Ok(dataset) => {
                log::info!(
                    "Showing {} records from {}",
                    dataset.len(),
                    path.display()
                );
                self.set_dataset(dataset, path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a dataset and reset the explorer filters.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, path: &Path) {
        self.dataset = Some(dataset);
        self.data_path = Some(path.to_path_buf());
        self.selection = Selection::new();
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the report after a view, selection or dataset change.
    pub fn refresh(&mut self) {
        self.report = self
            .dataset
            .as_ref()
            .map(|ds| self.builder.build(ds, self.view, &self.selection));
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.refresh();
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &DimValue) {
        if let Some(ds) = &self.dataset {
            self.selection.toggle(dim, value, ds.unique_values(dim));
            self.refresh();
        }
    }

    /// Select all values of a dimension (remove its constraint).
    pub fn select_all(&mut self, dim: Dimension) {
        self.selection.clear(dim);
        self.refresh();
    }

    /// Restrict a dimension to exactly one value.
    pub fn select_only(&mut self, dim: Dimension, value: &DimValue) {
        self.selection.set(dim, [value.clone()].into());
        self.refresh();
    }
}
