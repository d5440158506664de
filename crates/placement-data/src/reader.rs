//! Dataset discovery and loading.
//!
//! A dataset is a JSON file whose top level is an array of job-posting
//! objects, e.g. `jobs.json` or `jobs2025.json`.

use std::path::{Path, PathBuf};

use placement_core::models::RawRecord;
use placement_core::{PlacementError, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

// ── DatasetInfo ───────────────────────────────────────────────────────────────

/// A dataset file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    /// File stem, used as the dataset id.
    pub id: String,
    pub path: PathBuf,
    /// Recruitment year taken from the first four-digit run in the stem.
    pub year: Option<i32>,
}

impl DatasetInfo {
    /// Describe the dataset stored at `path`.
    pub fn from_path(path: &Path) -> Self {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let year = year_from_stem(&id);
        Self {
            id,
            path: path.to_path_buf(),
            year,
        }
    }

    /// Human-readable label: the year when known, otherwise the id.
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", year, self.id),
            None => self.id.clone(),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` datasets directly inside `dir`, sorted by id.
pub fn discover_datasets(dir: &Path) -> Vec<DatasetInfo> {
    if !dir.exists() {
        warn!("Data directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut datasets: Vec<DatasetInfo> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| DatasetInfo::from_path(entry.path()))
        .collect();

    datasets.sort_by(|a, b| a.id.cmp(&b.id));
    debug!("Found {} datasets in {}", datasets.len(), dir.display());
    datasets
}

/// Load every record of the dataset at `path`.
///
/// A missing file, unreadable file, malformed JSON or a top level that is not
/// an array are all errors: without its dataset the dashboard cannot proceed.
/// Array elements that are not objects are skipped.
pub fn read_dataset(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(PlacementError::DatasetNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| PlacementError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_dataset(&content, path)
}

/// Parse dataset JSON text; `path` is only used in error messages.
pub fn parse_dataset(content: &str, path: &Path) -> Result<Vec<RawRecord>> {
    let document: Value = serde_json::from_str(content)?;

    let Value::Array(items) = document else {
        return Err(PlacementError::InvalidDataset {
            path: path.to_path_buf(),
            reason: "top level is not an array".to_string(),
        });
    };

    let total = items.len();
    let records: Vec<RawRecord> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();

    if records.len() < total {
        warn!(
            skipped = total - records.len(),
            "Skipped non-object entries in {}",
            path.display()
        );
    }
    debug!("Loaded {} records from {}", records.len(), path.display());

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn year_from_stem(stem: &str) -> Option<i32> {
    let re = Regex::new(r"(?:^|\D)((?:19|20)\d{2})(?:\D|$)").expect("regex is valid");
    re.captures(stem)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
