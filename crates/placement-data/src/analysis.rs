//! Dashboard pipeline.
//!
//! Runs the filter engine and every aggregation over one analysis table,
//! returning a [`Dashboard`] ready for the presentation layer.

use placement_core::models::{
    AnalysisRecord, DashboardParams, Granularity, Period,
};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    companies_per_period, ctc_distribution, high_ctc_by_month, high_ctc_detail,
    mean_ctc_per_period, overall_mean_ctc, top_offers, top_recruiters, HighCtcOffer,
    PeriodDistribution, PeriodValue, RecruiterCount, TopOffers,
};
use crate::filter::{apply_filters, filter_category};
use crate::table::AnalysisTable;

// ── Public types ──────────────────────────────────────────────────────────────

/// High compensation offers listed for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthDetail {
    pub month: Period,
    pub offers: Vec<HighCtcOffer>,
}

/// The high compensation views: month counts, optional detail, distribution.
///
/// These views honour only the category filter and always bucket by month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighCtcView {
    pub threshold: f64,
    /// Distinct companies per month at or above the threshold, busiest first.
    pub month_counts: Vec<PeriodValue<usize>>,
    pub detail: Option<MonthDetail>,
    /// Compensation distribution per month.
    pub distribution: Vec<PeriodDistribution>,
}

impl HighCtcView {
    /// Months selectable for the detail listing, in count order.
    pub fn month_options(&self) -> Vec<Period> {
        self.month_counts.iter().map(|c| c.period).collect()
    }
}

/// The complete output of [`build_dashboard`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub granularity: Granularity,
    /// Rows in the base table.
    pub total_records: usize,
    /// Rows surviving every filter.
    pub filtered_records: usize,
    pub top_offers: Option<TopOffers>,
    pub high_ctc: HighCtcView,
    pub companies_per_period: Vec<PeriodValue<usize>>,
    pub mean_ctc_per_period: Vec<PeriodValue<f64>>,
    pub top_recruiters: Vec<RecruiterCount>,
    pub overall_mean_ctc: Option<f64>,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full dashboard pipeline.
///
/// 1. Apply every filter for the main views.
/// 2. Apply only the category filter for the high compensation views.
/// 3. Compute each aggregation over its view.
pub fn build_dashboard(table: &AnalysisTable, params: &DashboardParams) -> Dashboard {
    let base = table.rows();

    // ── Step 1: Main view ─────────────────────────────────────────────────────
    let filtered: Vec<&AnalysisRecord> = apply_filters(&base, &params.filter);

    // ── Step 2: High compensation view ────────────────────────────────────────
    let by_category = filter_category(&base, params.filter.category);

    debug!(
        total = base.len(),
        filtered = filtered.len(),
        by_category = by_category.len(),
        "filters applied"
    );

    // ── Step 3: Aggregations ──────────────────────────────────────────────────
    let month_counts = high_ctc_by_month(&by_category, params.threshold);
    let detail = params.detail_month.and_then(|month| {
        if month_counts.iter().any(|c| c.period == month) {
            Some(MonthDetail {
                month,
                offers: high_ctc_detail(&by_category, params.threshold, month),
            })
        } else {
            debug!(%month, "no high compensation offers in requested month");
            None
        }
    });

    Dashboard {
        granularity: table.granularity(),
        total_records: base.len(),
        filtered_records: filtered.len(),
        top_offers: top_offers(&filtered),
        high_ctc: HighCtcView {
            threshold: params.threshold,
            month_counts,
            detail,
            distribution: ctc_distribution(&by_category, Granularity::Month),
        },
        companies_per_period: companies_per_period(&filtered),
        mean_ctc_per_period: mean_ctc_per_period(&filtered),
        top_recruiters: top_recruiters(&filtered),
        overall_mean_ctc: overall_mean_ctc(&filtered),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
