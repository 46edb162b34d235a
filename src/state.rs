use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::aggregate::{aggregate, aggregate_unfiltered};
use crate::data::cache::TableCache;
use crate::data::filter::{DateRange, Filter};
use crate::data::loader::{load_path, LoadError};
use crate::data::model::{AggregationResult, Table};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which categorical filter a selection change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Region,
    Category,
}

/// Current widget selections. Turned into a [`Filter`] on every refresh.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    /// `(from, to)` of the date pickers; `None` when the table has no dates.
    pub dates: Option<(NaiveDate, NaiveDate)>,
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Owned cache for the fixed-path dataset.
    pub cache: TableCache,

    /// Loaded table (None until a file is loaded).
    pub table: Option<Arc<Table>>,

    /// Where `table` came from.
    pub source: Option<PathBuf>,

    /// Distinct values offered by the region / category widgets.
    pub all_regions: BTreeSet<String>,
    pub all_categories: BTreeSet<String>,

    /// Earliest / latest order date of the table.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,

    pub selection: FilterSelection,

    /// Aggregation for the current table and selection.
    pub result: AggregationResult,

    /// Aggregation of the whole table, computed once per load.
    pub overall: AggregationResult,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: TableCache::new(),
            table: None,
            source: None,
            all_regions: BTreeSet::new(),
            all_categories: BTreeSet::new(),
            date_bounds: None,
            selection: FilterSelection::default(),
            result: AggregationResult::default(),
            overall: AggregationResult::default(),
            status_message: None,
        }
    }

    /// Load the configured fixed-path dataset through the cache.
    pub fn load_fixed_path(&mut self) {
        let Some(path) = self.config.data_path.clone() else {
            return;
        };
        let outcome = self.cache.load(&path, self.config.load_options());
        self.finish_load(&path, outcome);
    }

    /// Drop the cached copy of the fixed-path dataset and read it again.
    pub fn reload_fixed_path(&mut self) {
        if let Some(path) = &self.config.data_path {
            self.cache.invalidate(path);
        }
        self.load_fixed_path();
    }

    /// Load a user-picked file. Uploads bypass the cache.
    pub fn load_upload(&mut self, path: &Path) {
        let outcome = load_path(path, self.config.load_options()).map(Arc::new);
        self.finish_load(path, outcome);
    }

    /// A failed load keeps whatever table was loaded before.
    fn finish_load(&mut self, path: &Path, outcome: Result<Arc<Table>, LoadError>) {
        match outcome {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows from {} (order dates: {})",
                    table.len(),
                    path.display(),
                    table.has_order_date()
                );
                self.set_table(table, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading data: {e}"));
            }
        }
    }

    /// Ingest a newly loaded table, select everything and aggregate.
    pub fn set_table(&mut self, table: Arc<Table>, source: PathBuf) {
        self.all_regions = table.regions();
        self.all_categories = table.categories();
        self.date_bounds = table.date_bounds();
        self.selection = FilterSelection {
            dates: self.date_bounds,
            regions: self.all_regions.clone(),
            categories: self.all_categories.clone(),
        };
        self.overall = aggregate_unfiltered(&table, self.config.limits);
        self.table = Some(table);
        self.source = Some(source);
        self.status_message = None;
        self.refresh();
    }

    /// Build the filter for the current selection.
    ///
    /// A fully-selected list, or a date range spanning the whole table, is no
    /// constraint at all, so rows without a date still count.
    pub fn current_filter(&self) -> Filter {
        let narrowed = |selected: &BTreeSet<String>, all: &BTreeSet<String>| {
            (selected != all).then(|| selected.clone())
        };
        Filter {
            date_range: self
                .selection
                .dates
                .filter(|dates| Some(*dates) != self.date_bounds)
                .map(|(from, to)| DateRange::new(from, to)),
            regions: narrowed(&self.selection.regions, &self.all_regions),
            categories: narrowed(&self.selection.categories, &self.all_categories),
        }
    }

    /// Recompute the aggregation from the full table.
    pub fn refresh(&mut self) {
        let Some(table) = &self.table else {
            self.result = AggregationResult::default();
            return;
        };
        let filter = self.current_filter();
        let started = Instant::now();
        self.result = aggregate(table, &filter, self.config.limits);
        log::debug!(
            "aggregated {} of {} rows in {:?} (identity filter: {})",
            self.result.total_orders,
            table.len(),
            started.elapsed(),
            filter.is_identity()
        );
    }

    fn selected_mut(&mut self, column: FilterColumn) -> &mut BTreeSet<String> {
        match column {
            FilterColumn::Region => &mut self.selection.regions,
            FilterColumn::Category => &mut self.selection.categories,
        }
    }

    fn all_values(&self, column: FilterColumn) -> &BTreeSet<String> {
        match column {
            FilterColumn::Region => &self.all_regions,
            FilterColumn::Category => &self.all_categories,
        }
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &str) {
        let selected = self.selected_mut(column);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refresh();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        let all = self.all_values(column).clone();
        *self.selected_mut(column) = all;
        self.refresh();
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.selected_mut(column).clear();
        self.refresh();
    }

    /// Set the date pickers; no-op for tables without dates.
    pub fn set_date_range(&mut self, from: NaiveDate, to: NaiveDate) {
        if self.selection.dates.is_some() {
            self.selection.dates = Some((from, to));
            self.refresh();
        }
    }

    /// Back to "everything selected".
    pub fn reset_filters(&mut self) {
        if let (Some(table), Some(source)) = (self.table.clone(), self.source.clone()) {
            self.set_table(table, source);
        }
    }

    /// Write the current aggregation as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.result).context("serializing summary")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}
