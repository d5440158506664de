//! Dataset session with a memoized table cache.
//!
//! Raw records are loaded once per dataset id. Analysis tables are cached per
//! `(dataset id, granularity)`; switching granularity builds a table only the
//! first time that combination is requested.

use std::collections::HashMap;
use std::path::Path;

use placement_core::models::{Granularity, RawRecord};
use placement_core::{PlacementError, Result};
use placement_data::reader::{discover_datasets, read_dataset, DatasetInfo};
use placement_data::table::AnalysisTable;

// ── Session ───────────────────────────────────────────────────────────────────

/// Read-only dataset session.
///
/// # Example
/// ```no_run
/// use placement_core::models::Granularity;
/// use placement_runtime::session::Session;
///
/// let mut session = Session::from_dir(std::path::Path::new("data"));
/// if let Some(id) = session.default_dataset().map(|d| d.id.clone()) {
///     let table = session.table(&id, Granularity::Month).unwrap();
///     println!("{} records", table.len());
/// }
/// ```
#[derive(Debug, Default)]
pub struct Session {
    datasets: Vec<DatasetInfo>,
    /// Raw records keyed by dataset id.
    raw: HashMap<String, Vec<RawRecord>>,
    /// Built tables keyed by dataset id and granularity.
    tables: HashMap<(String, Granularity), AnalysisTable>,
    /// Number of dataset files read from disk.
    loads: usize,
    /// Number of tables built.
    builds: usize,
}

impl Session {
    /// Create a session over an explicit dataset list.
    pub fn new(datasets: Vec<DatasetInfo>) -> Self {
        Self {
            datasets,
            ..Self::default()
        }
    }

    /// Create a session over every dataset found in `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(discover_datasets(dir))
    }

    /// Create a session over a single dataset file.
    pub fn from_file(path: &Path) -> Self {
        Self::new(vec![DatasetInfo::from_path(path)])
    }

    // ── Public API ────────────────────────────────────────────────────────

    pub fn datasets(&self) -> &[DatasetInfo] {
        &self.datasets
    }

    /// Look up a registered dataset by id.
    pub fn dataset(&self, id: &str) -> Option<&DatasetInfo> {
        self.datasets.iter().find(|d| d.id == id)
    }

    /// The dataset with the most recent year, or the last one by id when no
    /// dataset carries a year.
    pub fn default_dataset(&self) -> Option<&DatasetInfo> {
        self.datasets
            .iter()
            .filter(|d| d.year.is_some())
            .max_by_key(|d| d.year)
            .or_else(|| self.datasets.last())
    }

    /// Return the analysis table for `id` at `granularity`, building it on
    /// first use.
    pub fn table(&mut self, id: &str, granularity: Granularity) -> Result<&AnalysisTable> {
        let key = (id.to_string(), granularity);
        if !self.tables.contains_key(&key) {
            let table = AnalysisTable::build(self.raw_records(id)?, granularity);
            self.builds += 1;
            tracing::debug!(dataset = id, %granularity, "analysis table cached");
            self.tables.insert(key.clone(), table);
        } else {
            tracing::debug!(dataset = id, %granularity, "returning cached analysis table");
        }
        self.tables
            .get(&key)
            .ok_or_else(|| PlacementError::UnknownDataset(id.to_string()))
    }

    /// Discard every cached record and table.
    pub fn invalidate(&mut self) {
        self.raw.clear();
        self.tables.clear();
        tracing::debug!("session cache invalidated");
    }

    /// Number of dataset files read so far.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// Number of tables built so far.
    pub fn build_count(&self) -> usize {
        self.builds
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn raw_records(&mut self, id: &str) -> Result<&[RawRecord]> {
        if !self.raw.contains_key(id) {
            let info = self
                .dataset(id)
                .ok_or_else(|| PlacementError::UnknownDataset(id.to_string()))?;
            let records = read_dataset(&info.path)?;
            tracing::info!(dataset = id, records = records.len(), "dataset loaded");
            self.loads += 1;
            self.raw.insert(id.to_string(), records);
        }
        Ok(self.raw.get(id).map(Vec::as_slice).unwrap_or_default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
