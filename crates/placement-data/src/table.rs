//! Record table builder.
//!
//! Normalizes raw records and derives their temporal fields. The table is
//! immutable once built; a granularity change builds a new table.

use std::collections::BTreeSet;

use placement_core::dates::DateParser;
use placement_core::models::{
    AnalysisRecord, CtcRange, Granularity, NormalizedRecord, Period, RawRecord,
};
use tracing::debug;

/// Field holding the date a posting opened for applications.
pub const DATE_FIELD: &str = "applicationOpen";

/// Compensation range used when no record has a numeric compensation.
pub const FALLBACK_CTC_RANGE: CtcRange = CtcRange { lo: 0.0, hi: 50.0 };

// ── AnalysisTable ─────────────────────────────────────────────────────────────

/// The typed, analyzable table built from one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTable {
    granularity: Granularity,
    records: Vec<AnalysisRecord>,
}

impl AnalysisTable {
    /// Normalize every record of `raw` and bucket it under `granularity`.
    pub fn build(raw: &[RawRecord], granularity: Granularity) -> Self {
        let records: Vec<AnalysisRecord> = raw
            .iter()
            .cloned()
            .map(|r| build_record(r, granularity))
            .collect();

        let undated = records.iter().filter(|r| r.date_parsed.is_none()).count();
        let without_ctc = records.iter().filter(|r| r.ctc().is_none()).count();
        debug!(
            records = records.len(),
            undated,
            without_ctc,
            %granularity,
            "analysis table built"
        );

        Self {
            granularity,
            records,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    /// A view over every row, the input shape of the filter and aggregation
    /// engines.
    pub fn rows(&self) -> Vec<&AnalysisRecord> {
        self.records.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct periods present in the table, for the period selector.
    pub fn period_options(&self) -> Vec<Period> {
        self.records
            .iter()
            .filter_map(|r| r.period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Observed compensation bounds, widened outward to whole lakh.
    ///
    /// Falls back to [`FALLBACK_CTC_RANGE`] when no record has a compensation.
    pub fn ctc_bounds(&self) -> CtcRange {
        let (lo, hi) = self
            .records
            .iter()
            .filter_map(|r| r.ctc())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo.is_finite() && hi.is_finite() {
            CtcRange::new(lo.floor(), hi.ceil())
        } else {
            FALLBACK_CTC_RANGE
        }
    }
}

/// Normalize one raw record and derive `date_parsed` and `period`.
pub fn build_record(raw: RawRecord, granularity: Granularity) -> AnalysisRecord {
    let date_parsed = raw.get(DATE_FIELD).and_then(DateParser::parse);
    let period = date_parsed.as_ref().map(|d| granularity.bucket(d));
    AnalysisRecord {
        normalized: NormalizedRecord::from_raw(raw),
        date_parsed,
        period,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
