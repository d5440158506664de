//! Aggregation engine.
//!
//! Each function is a pure reduction over a row view (base or filtered) that
//! feeds exactly one dashboard view. Rows without a grouping key never form a
//! bucket of their own, and an aggregation over zero qualifying rows yields an
//! empty or absent result rather than zeros.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use placement_core::models::{AnalysisRecord, Granularity, Period};
use placement_core::stats::{mean, FiveNumberSummary};
use serde::Serialize;

/// Rows kept in the top offers ranking.
pub const TOP_OFFERS_LIMIT: usize = 20;

/// Rows averaged for the top offers headline mean.
pub const TOP_OFFERS_MEAN_WINDOW: usize = 10;

/// Companies listed among the top recruiters.
pub const TOP_RECRUITERS_LIMIT: usize = 10;

// ── Output types ──────────────────────────────────────────────────────────────

/// One row of the top offers ranking. Rank is the 1-based position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferRow {
    pub company: String,
    pub ctc: f64,
    pub period: Option<Period>,
    pub job_type: Option<String>,
    pub location: Option<String>,
}

/// Top offers ranking plus its headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopOffers {
    pub rows: Vec<OfferRow>,
    pub highest: f64,
    pub top_ten_mean: f64,
    pub distinct_companies: usize,
}

/// A numeric value attached to one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodValue<T> {
    pub period: Period,
    pub value: T,
}

/// A high compensation offer listed for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighCtcOffer {
    pub company: String,
    pub ctc: f64,
    pub role_title: Option<String>,
    pub location: Option<String>,
}

/// One point of a compensation distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPoint {
    pub ctc: f64,
    pub company: String,
}

/// Full compensation distribution of one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodDistribution {
    pub period: Period,
    pub summary: FiveNumberSummary,
    pub points: Vec<DistributionPoint>,
}

/// Posting count of one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterCount {
    pub company: String,
    pub postings: usize,
}

// ── Top offers ────────────────────────────────────────────────────────────────

/// The [`TOP_OFFERS_LIMIT`] best-paid rows, highest first.
///
/// Ties keep input order. Returns `None` when no row has a compensation.
pub fn top_offers(rows: &[&AnalysisRecord]) -> Option<TopOffers> {
    let mut priced: Vec<(&AnalysisRecord, f64)> = rows
        .iter()
        .filter_map(|r| r.ctc().map(|ctc| (*r, ctc)))
        .collect();
    priced.sort_by(|a, b| b.1.total_cmp(&a.1));
    priced.truncate(TOP_OFFERS_LIMIT);

    let highest = priced.first()?.1;
    let top_ten_mean = mean(priced.iter().take(TOP_OFFERS_MEAN_WINDOW).map(|(_, c)| *c))?;
    let distinct_companies = priced
        .iter()
        .map(|(r, _)| r.company_name())
        .collect::<HashSet<_>>()
        .len();

    let rows = priced
        .into_iter()
        .map(|(r, ctc)| OfferRow {
            company: r.company_name().to_string(),
            ctc,
            period: r.period,
            job_type: r.job_type().map(str::to_string),
            location: r.location().map(str::to_string),
        })
        .collect();

    Some(TopOffers {
        rows,
        highest,
        top_ten_mean,
        distinct_companies,
    })
}

// ── High compensation by month ────────────────────────────────────────────────

/// Distinct companies per month offering at least `threshold`, busiest first.
///
/// Always buckets by month whatever the table's granularity. Months with equal
/// counts stay in chronological order.
pub fn high_ctc_by_month(rows: &[&AnalysisRecord], threshold: f64) -> Vec<PeriodValue<usize>> {
    let mut counts = distinct_companies_by(rows, |r| {
        if r.ctc()? >= threshold {
            r.period_at(Granularity::Month)
        } else {
            None
        }
    });
    counts.sort_by(|a, b| b.value.cmp(&a.value));
    counts
}

/// Offers of at least `threshold` in `month`, one per company, best first.
///
/// The first row seen for a company is the one kept.
pub fn high_ctc_detail(
    rows: &[&AnalysisRecord],
    threshold: f64,
    month: Period,
) -> Vec<HighCtcOffer> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut offers: Vec<HighCtcOffer> = rows
        .iter()
        .filter(|r| r.period_at(Granularity::Month) == Some(month))
        .filter_map(|r| r.ctc().filter(|c| *c >= threshold).map(|ctc| (*r, ctc)))
        .filter(|&(r, _)| seen.insert(r.company_name()))
        .map(|(r, ctc)| HighCtcOffer {
            company: r.company_name().to_string(),
            ctc,
            role_title: r.role_title().map(str::to_string),
            location: r.location().map(str::to_string),
        })
        .collect();
    offers.sort_by(|a, b| b.ctc.total_cmp(&a.ctc));
    offers
}

// ── Distribution ──────────────────────────────────────────────────────────────

/// Compensation distribution per period under `granularity`, ascending.
pub fn ctc_distribution(
    rows: &[&AnalysisRecord],
    granularity: Granularity,
) -> Vec<PeriodDistribution> {
    let mut groups: BTreeMap<Period, Vec<DistributionPoint>> = BTreeMap::new();
    for r in rows {
        let (Some(period), Some(ctc)) = (r.period_at(granularity), r.ctc()) else {
            continue;
        };
        groups.entry(period).or_default().push(DistributionPoint {
            ctc,
            company: r.company_name().to_string(),
        });
    }

    groups
        .into_iter()
        .filter_map(|(period, points)| {
            let values: Vec<f64> = points.iter().map(|p| p.ctc).collect();
            let summary = FiveNumberSummary::from_values(&values)?;
            Some(PeriodDistribution {
                period,
                summary,
                points,
            })
        })
        .collect()
}

// ── Per-period trends ─────────────────────────────────────────────────────────

/// Distinct companies per table period, ascending.
pub fn companies_per_period(rows: &[&AnalysisRecord]) -> Vec<PeriodValue<usize>> {
    distinct_companies_by(rows, |r| r.period)
}

/// Mean compensation per table period, ascending.
///
/// Periods without any compensation value are omitted.
pub fn mean_ctc_per_period(rows: &[&AnalysisRecord]) -> Vec<PeriodValue<f64>> {
    let mut groups: BTreeMap<Period, Vec<f64>> = BTreeMap::new();
    for r in rows {
        if let (Some(period), Some(ctc)) = (r.period, r.ctc()) {
            groups.entry(period).or_default().push(ctc);
        }
    }
    groups
        .into_iter()
        .filter_map(|(period, values)| {
            mean(values).map(|value| PeriodValue { period, value })
        })
        .collect()
}

// ── Recruiters ────────────────────────────────────────────────────────────────

/// The [`TOP_RECRUITERS_LIMIT`] companies with the most postings.
///
/// Equal counts are ordered by first appearance.
pub fn top_recruiters(rows: &[&AnalysisRecord]) -> Vec<RecruiterCount> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, &r) in rows.iter().enumerate() {
        counts.entry(r.company_name()).or_insert((0, idx)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(company, (postings, first))| (company, postings, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(TOP_RECRUITERS_LIMIT)
        .map(|(company, postings, _)| RecruiterCount {
            company: company.to_string(),
            postings,
        })
        .collect()
}

// ── Overall ───────────────────────────────────────────────────────────────────

/// Mean compensation over all rows; `None` when no row has one.
pub fn overall_mean_ctc(rows: &[&AnalysisRecord]) -> Option<f64> {
    mean(rows.iter().filter_map(|r| r.ctc()))
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Count distinct companies per key, ascending by key. Rows whose key is
/// `None` are skipped.
fn distinct_companies_by<'a>(
    rows: &[&'a AnalysisRecord],
    key_fn: impl Fn(&AnalysisRecord) -> Option<Period>,
) -> Vec<PeriodValue<usize>> {
    let mut map: BTreeMap<Period, BTreeSet<&'a str>> = BTreeMap::new();
    for &r in rows {
        if let Some(period) = key_fn(r) {
            map.entry(period).or_default().insert(r.company_name());
        }
    }
    map.into_iter()
        .map(|(period, companies)| PeriodValue {
            period,
            value: companies.len(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AnalysisTable;
    use placement_core::models::RawRecord;
    use serde_json::{json, Value};

    fn build(values: Vec<Value>, granularity: Granularity) -> AnalysisTable {
        let raw: Vec<RawRecord> = values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();
        AnalysisTable::build(&raw, granularity)
    }

    fn posting(company: &str, ctc: Value, date: &str) -> Value {
        json!({
            "company": company,
            "ctc": ctc,
            "applicationOpen": date,
            "jobType": "fte",
            "location": "Delhi",
            "name": "SDE",
        })
    }

    fn month(year: i32, month: u32) -> Period {
        Period::Month { year, month }
    }

    // ── top_offers ───────────────────────────────────────────────────────────

    #[test]
    fn test_top_offers_excludes_null_and_keeps_tie_order() {
        let t = build(
            vec![
                posting("A", json!(5), "2024-01-01"),
                posting("B", json!(20), "2024-01-02"),
                posting("C", Value::Null, "2024-01-03"),
                posting("D", json!(15), "2024-01-04"),
                posting("E", json!(20), "2024-01-05"),
            ],
            Granularity::Month,
        );
        let top = top_offers(&t.rows()).unwrap();
        let ranked: Vec<(&str, f64)> = top.rows.iter().map(|r| (r.company.as_str(), r.ctc)).collect();
        assert_eq!(ranked, vec![("B", 20.0), ("E", 20.0), ("D", 15.0), ("A", 5.0)]);
        assert_eq!(top.highest, 20.0);
        assert_eq!(top.top_ten_mean, 15.0);
        assert_eq!(top.distinct_companies, 4);
        assert_eq!(top.rows[0].period, Some(month(2024, 1)));
        assert_eq!(top.rows[0].location.as_deref(), Some("Delhi"));
    }

    #[test]
    fn test_top_offers_caps_at_twenty_and_means_top_ten() {
        let values: Vec<Value> = (1..=25)
            .map(|i| posting(&format!("C{}", i % 5), json!(i), "2024-02-01"))
            .collect();
        let t = build(values, Granularity::Month);
        let top = top_offers(&t.rows()).unwrap();
        assert_eq!(top.rows.len(), TOP_OFFERS_LIMIT);
        assert_eq!(top.highest, 25.0);
        // Mean of 25..=16.
        assert_eq!(top.top_ten_mean, 20.5);
        assert_eq!(top.distinct_companies, 5);
    }

    #[test]
    fn test_top_offers_empty_is_none() {
        let t = build(vec![posting("A", Value::Null, "2024-01-01")], Granularity::Month);
        assert!(top_offers(&t.rows()).is_none());
        assert!(top_offers(&[]).is_none());
    }

    // ── high_ctc_by_month ────────────────────────────────────────────────────

    #[test]
    fn test_high_ctc_counts_distinct_companies_per_month() {
        let t = build(
            vec![
                posting("A", json!(12), "2024-03-01"),
                posting("A", json!(14), "2024-03-09"),
                posting("B", json!(10), "2024-03-15"),
                posting("C", json!(9.5), "2024-03-20"),
                posting("D", json!(30), "2024-04-01"),
                posting("E", json!(30), "someday"),
            ],
            Granularity::Year,
        );
        let counts = high_ctc_by_month(&t.rows(), 10.0);
        assert_eq!(
            counts,
            vec![
                PeriodValue { period: month(2024, 3), value: 2 },
                PeriodValue { period: month(2024, 4), value: 1 },
            ]
        );
    }

    #[test]
    fn test_high_ctc_ties_stay_chronological() {
        let t = build(
            vec![
                posting("A", json!(12), "2024-05-01"),
                posting("B", json!(12), "2024-02-01"),
                posting("C", json!(12), "2024-08-01"),
                posting("D", json!(12), "2024-08-02"),
            ],
            Granularity::Month,
        );
        let order: Vec<Period> = high_ctc_by_month(&t.rows(), 10.0).iter().map(|p| p.period).collect();
        assert_eq!(order, vec![month(2024, 8), month(2024, 2), month(2024, 5)]);
    }

    #[test]
    fn test_high_ctc_nothing_above_threshold() {
        let t = build(vec![posting("A", json!(4), "2024-03-01")], Granularity::Month);
        assert!(high_ctc_by_month(&t.rows(), 10.0).is_empty());
    }

    // ── high_ctc_detail ──────────────────────────────────────────────────────

    #[test]
    fn test_high_ctc_detail_dedups_and_sorts() {
        let t = build(
            vec![
                posting("A", json!(12), "2024-03-01"),
                posting("B", json!(18), "2024-03-02"),
                posting("A", json!(40), "2024-03-03"),
                posting("C", json!(8), "2024-03-04"),
                posting("D", json!(50), "2024-04-01"),
            ],
            Granularity::Month,
        );
        let detail = high_ctc_detail(&t.rows(), 10.0, month(2024, 3));
        let rows: Vec<(&str, f64)> = detail.iter().map(|o| (o.company.as_str(), o.ctc)).collect();
        assert_eq!(rows, vec![("B", 18.0), ("A", 12.0)]);
        assert_eq!(detail[0].role_title.as_deref(), Some("SDE"));
    }

    // ── ctc_distribution ─────────────────────────────────────────────────────

    #[test]
    fn test_distribution_per_month_keeps_all_points() {
        let t = build(
            vec![
                posting("A", json!(4), "2024-03-01"),
                posting("B", json!(8), "2024-03-02"),
                posting("C", json!(6), "2024-03-03"),
                posting("D", json!(10), "2024-01-10"),
                posting("E", Value::Null, "2024-01-11"),
                posting("F", json!(7), "undated"),
            ],
            Granularity::Week,
        );
        let dist = ctc_distribution(&t.rows(), Granularity::Month);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].period, month(2024, 1));
        assert_eq!(dist[0].points.len(), 1);
        assert_eq!(dist[1].period, month(2024, 3));
        assert_eq!(dist[1].points.len(), 3);
        assert_eq!(dist[1].summary.median, 6.0);
        assert_eq!(dist[1].summary.min, 4.0);
        assert_eq!(dist[1].summary.max, 8.0);
        assert_eq!(dist[1].points[1].company, "B");
    }

    // ── per-period trends ────────────────────────────────────────────────────

    #[test]
    fn test_companies_per_period_ascending() {
        let t = build(
            vec![
                posting("A", json!(4), "2024-04-01"),
                posting("A", json!(5), "2024-04-02"),
                posting("B", json!(8), "2024-04-03"),
                posting("C", json!(6), "2024-02-03"),
                posting("D", json!(6), "nope"),
            ],
            Granularity::Month,
        );
        assert_eq!(
            companies_per_period(&t.rows()),
            vec![
                PeriodValue { period: month(2024, 2), value: 1 },
                PeriodValue { period: month(2024, 4), value: 2 },
            ]
        );
    }

    #[test]
    fn test_mean_ctc_per_period_ignores_nulls() {
        let t = build(
            vec![
                posting("A", json!(4), "2024-04-01"),
                posting("B", Value::Null, "2024-04-02"),
                posting("C", json!(8), "2024-04-03"),
                posting("D", Value::Null, "2024-05-03"),
            ],
            Granularity::Month,
        );
        assert_eq!(
            mean_ctc_per_period(&t.rows()),
            vec![PeriodValue { period: month(2024, 4), value: 6.0 }]
        );
    }

    #[test]
    fn test_yearly_periods() {
        let t = build(
            vec![
                posting("A", json!(4), "2023-12-01"),
                posting("B", json!(8), "2024-01-01"),
            ],
            Granularity::Year,
        );
        let periods: Vec<Period> = companies_per_period(&t.rows()).iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![Period::Year(2023), Period::Year(2024)]);
    }

    // ── top_recruiters ───────────────────────────────────────────────────────

    #[test]
    fn test_top_recruiters_by_frequency() {
        let t = build(
            vec![
                posting("B", json!(4), "2024-04-01"),
                posting("A", json!(4), "2024-04-01"),
                posting("A", json!(4), "2024-04-01"),
                posting("C", json!(4), "2024-04-01"),
                posting("B", json!(4), "2024-04-01"),
                posting("A", json!(4), "2024-04-01"),
            ],
            Granularity::Month,
        );
        let top = top_recruiters(&t.rows());
        let ranked: Vec<(&str, usize)> = top.iter().map(|r| (r.company.as_str(), r.postings)).collect();
        assert_eq!(ranked, vec![("A", 3), ("B", 2), ("C", 1)]);
    }

    #[test]
    fn test_top_recruiters_limit() {
        let values: Vec<Value> = (0..15)
            .map(|i| posting(&format!("Co{}", i), json!(4), "2024-04-01"))
            .collect();
        let t = build(values, Granularity::Month);
        let top = top_recruiters(&t.rows());
        assert_eq!(top.len(), TOP_RECRUITERS_LIMIT);
        assert_eq!(top[0].company, "Co0");
    }

    // ── overall_mean_ctc ─────────────────────────────────────────────────────

    #[test]
    fn test_overall_mean() {
        let t = build(
            vec![
                posting("A", json!(4), "2024-04-01"),
                posting("B", Value::Null, "2024-04-01"),
                posting("C", json!(1_600_000), "2024-04-01"),
            ],
            Granularity::Month,
        );
        assert_eq!(overall_mean_ctc(&t.rows()), Some(10.0));
    }

    #[test]
    fn test_overall_mean_no_data() {
        let t = build(vec![posting("A", Value::Null, "2024-04-01")], Granularity::Month);
        assert_eq!(overall_mean_ctc(&t.rows()), None);
    }

    // ── empty input ──────────────────────────────────────────────────────────

    #[test]
    fn test_every_aggregation_handles_empty_input() {
        let rows: Vec<&AnalysisRecord> = Vec::new();
        assert!(top_offers(&rows).is_none());
        assert!(high_ctc_by_month(&rows, 10.0).is_empty());
        assert!(high_ctc_detail(&rows, 10.0, month(2024, 1)).is_empty());
        assert!(ctc_distribution(&rows, Granularity::Month).is_empty());
        assert!(companies_per_period(&rows).is_empty());
        assert!(mean_ctc_per_period(&rows).is_empty());
        assert!(top_recruiters(&rows).is_empty());
        assert!(overall_mean_ctc(&rows).is_none());
    }
}
