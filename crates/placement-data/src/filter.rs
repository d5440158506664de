//! Filter engine.
//!
//! Filters compose as a conjunction applied in order: category, then
//! compensation range, then period. Each step returns a new row view and
//! never touches the base table.

use placement_core::models::{
    AnalysisRecord, CtcRange, FilterParams, JobCategoryMode, PeriodSelector, PRIMARY_JOB_TYPE,
};

/// Apply all of `params` to `rows`.
pub fn apply_filters<'a>(
    rows: &[&'a AnalysisRecord],
    params: &FilterParams,
) -> Vec<&'a AnalysisRecord> {
    let rows = filter_category(rows, params.category);
    let rows = match params.ctc_range {
        Some(range) => filter_ctc_range(&rows, range),
        None => rows,
    };
    filter_period(&rows, params.period)
}

/// Keep rows of the selected job categories.
pub fn filter_category<'a>(
    rows: &[&'a AnalysisRecord],
    mode: JobCategoryMode,
) -> Vec<&'a AnalysisRecord> {
    rows.iter()
        .copied()
        .filter(|r| category_matches(r, mode))
        .collect()
}

/// Keep rows whose compensation lies in `range`; rows without one are dropped.
pub fn filter_ctc_range<'a>(
    rows: &[&'a AnalysisRecord],
    range: CtcRange,
) -> Vec<&'a AnalysisRecord> {
    rows.iter()
        .copied()
        .filter(|r| r.ctc().is_some_and(|v| range.contains(v)))
        .collect()
}

/// Keep rows in the selected period.
pub fn filter_period<'a>(
    rows: &[&'a AnalysisRecord],
    selector: PeriodSelector,
) -> Vec<&'a AnalysisRecord> {
    match selector {
        PeriodSelector::All => rows.to_vec(),
        PeriodSelector::Exact(period) => rows
            .iter()
            .copied()
            .filter(|r| r.period == Some(period))
            .collect(),
    }
}

/// Single-predicate form of [`apply_filters`] for one record.
pub fn matches(record: &AnalysisRecord, params: &FilterParams) -> bool {
    category_matches(record, params.category)
        && params
            .ctc_range
            .map_or(true, |range| record.ctc().is_some_and(|v| range.contains(v)))
        && match params.period {
            PeriodSelector::All => true,
            PeriodSelector::Exact(period) => record.period == Some(period),
        }
}

fn category_matches(record: &AnalysisRecord, mode: JobCategoryMode) -> bool {
    match mode {
        JobCategoryMode::PrimaryOnly => record.job_type() == Some(PRIMARY_JOB_TYPE),
        JobCategoryMode::IncludeSecondary => true,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
