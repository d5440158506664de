//! Dashboard report rendering.
//!
//! One section per view, each falling back to an informational line when its
//! aggregation produced no data.

use std::fmt::Write;

use placement_core::formatting::{format_lakh, format_number, format_optional_lakh, percentage};
use placement_core::models::{CtcRange, Granularity, JobCategoryMode, Period, PeriodSelector};
use placement_data::aggregator::TOP_OFFERS_LIMIT;
use placement_data::analysis::Dashboard;

use crate::table_view::{Align, TextTable};

/// Context shown above the views: which dataset and which filters.
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub dataset: String,
    pub job_type: JobCategoryMode,
    pub ctc_range: Option<CtcRange>,
    pub period: PeriodSelector,
    /// Periods available to the period selector.
    pub period_options: Vec<Period>,
}

/// Render the whole dashboard as text.
pub fn render_text(dashboard: &Dashboard, header: &ReportHeader) -> String {
    let mut out = String::new();
    render_header(&mut out, dashboard, header);
    render_top_offers(&mut out, dashboard);
    render_high_ctc(&mut out, dashboard);
    render_distribution(&mut out, dashboard);
    render_trends(&mut out, dashboard);
    render_recruiters(&mut out, dashboard);
    render_overall(&mut out, dashboard);
    out
}

/// Render the dashboard as pretty-printed JSON.
pub fn render_json(dashboard: &Dashboard) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dashboard)
}

/// Title-case name of a granularity, e.g. `"Month"`.
pub fn granularity_title(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Year => "Year",
        Granularity::Month => "Month",
        Granularity::Week => "Week",
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_header(out: &mut String, dashboard: &Dashboard, header: &ReportHeader) {
    let _ = writeln!(out, "# Campus Recruitment Dashboard - {}", header.dataset);
    let _ = writeln!(out);

    let job_type = match header.job_type {
        JobCategoryMode::PrimaryOnly => "full-time only",
        JobCategoryMode::IncludeSecondary => "including internships",
    };
    let range = header
        .ctc_range
        .map(|r| format!("{} to {}", format_lakh(r.lo), format_lakh(r.hi)))
        .unwrap_or_else(|| "any".to_string());
    let period = match header.period {
        PeriodSelector::All => "All".to_string(),
        PeriodSelector::Exact(p) => p.to_string(),
    };

    let _ = writeln!(out, "Job type:    {}", job_type);
    let _ = writeln!(out, "CTC range:   {}", range);
    let _ = writeln!(
        out,
        "Period:      {} (by {})",
        period,
        dashboard.granularity
    );
    if !header.period_options.is_empty() {
        let options: Vec<String> = header.period_options.iter().map(|p| p.to_string()).collect();
        let _ = writeln!(out, "Periods:     {}", options.join(", "));
    }
    let _ = writeln!(
        out,
        "Showing {} of {} records ({}%)",
        dashboard.filtered_records,
        dashboard.total_records,
        format_number(
            percentage(
                dashboard.filtered_records as f64,
                dashboard.total_records as f64,
                1
            ),
            1
        )
    );
}

fn render_top_offers(out: &mut String, dashboard: &Dashboard) {
    section(out, "Top CTC Offers");

    let Some(top) = &dashboard.top_offers else {
        let _ = writeln!(out, "No CTC data available for the selected filters.");
        return;
    };

    let mut table = TextTable::new(&[
        ("#", Align::Right),
        ("Company", Align::Left),
        ("CTC", Align::Right),
        ("Period", Align::Left),
        ("Job Type", Align::Left),
        ("Location", Align::Left),
    ]);
    for (i, row) in top.rows.iter().enumerate() {
        table.push_row(vec![
            (i + 1).to_string(),
            row.company.clone(),
            format_lakh(row.ctc),
            row.period.map(|p| p.to_string()).unwrap_or_default(),
            row.job_type.clone().unwrap_or_default(),
            row.location.clone().unwrap_or_default(),
        ]);
    }
    out.push_str(&table.render());
    let _ = writeln!(out);
    let _ = writeln!(out, "Highest CTC:          {}", format_lakh(top.highest));
    let _ = writeln!(out, "Average top 10 CTC:   {}", format_lakh(top.top_ten_mean));
    let _ = writeln!(
        out,
        "Companies in top {}:  {}",
        TOP_OFFERS_LIMIT, top.distinct_companies
    );
}

fn render_high_ctc(out: &mut String, dashboard: &Dashboard) {
    let view = &dashboard.high_ctc;
    section(
        out,
        &format!("High CTC Companies per Month (>= {})", format_lakh(view.threshold)),
    );

    if view.month_counts.is_empty() {
        let _ = writeln!(
            out,
            "No companies found offering CTC above {}.",
            format_lakh(view.threshold)
        );
        return;
    }

    let mut table = TextTable::new(&[("Month", Align::Left), ("Companies", Align::Right)]);
    for count in &view.month_counts {
        table.push_row(vec![count.period.to_string(), count.value.to_string()]);
    }
    out.push_str(&table.render());

    if let Some(detail) = &view.detail {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Companies with high CTC in {}", detail.month);
        let mut table = TextTable::new(&[
            ("#", Align::Right),
            ("Company", Align::Left),
            ("CTC", Align::Right),
            ("Job Title", Align::Left),
            ("Location", Align::Left),
        ]);
        for (i, offer) in detail.offers.iter().enumerate() {
            table.push_row(vec![
                (i + 1).to_string(),
                offer.company.clone(),
                format_lakh(offer.ctc),
                offer.role_title.clone().unwrap_or_default(),
                offer.location.clone().unwrap_or_default(),
            ]);
        }
        out.push_str(&table.render());
    } else {
        let months: Vec<String> = view.month_options().iter().map(|p| p.to_string()).collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "Detail available with --month: {}", months.join(", "));
    }
}

fn render_distribution(out: &mut String, dashboard: &Dashboard) {
    section(out, "CTC Distribution per Month");

    let distribution = &dashboard.high_ctc.distribution;
    if distribution.is_empty() {
        let _ = writeln!(out, "No valid data available for CTC distribution analysis.");
        return;
    }

    let mut table = TextTable::new(&[
        ("Month", Align::Left),
        ("Offers", Align::Right),
        ("Min", Align::Right),
        ("Q1", Align::Right),
        ("Median", Align::Right),
        ("Q3", Align::Right),
        ("Max", Align::Right),
    ]);
    for group in distribution {
        let s = &group.summary;
        table.push_row(vec![
            group.period.to_string(),
            group.points.len().to_string(),
            format_number(s.min, 2),
            format_number(s.q1, 2),
            format_number(s.median, 2),
            format_number(s.q3, 2),
            format_number(s.max, 2),
        ]);
    }
    out.push_str(&table.render());
}

fn render_trends(out: &mut String, dashboard: &Dashboard) {
    let unit = granularity_title(dashboard.granularity);

    section(out, &format!("Companies per {}", unit));
    if dashboard.companies_per_period.is_empty() {
        let _ = writeln!(out, "No data available for the selected time period.");
    } else {
        let mut table = TextTable::new(&[(unit, Align::Left), ("Companies", Align::Right)]);
        for point in &dashboard.companies_per_period {
            table.push_row(vec![point.period.to_string(), point.value.to_string()]);
        }
        out.push_str(&table.render());
    }

    section(out, &format!("Average CTC per {}", unit));
    if dashboard.mean_ctc_per_period.is_empty() {
        let _ = writeln!(out, "No data available for average CTC analysis.");
    } else {
        let mut table = TextTable::new(&[(unit, Align::Left), ("Average CTC", Align::Right)]);
        for point in &dashboard.mean_ctc_per_period {
            table.push_row(vec![point.period.to_string(), format_lakh(point.value)]);
        }
        out.push_str(&table.render());
    }
}

fn render_recruiters(out: &mut String, dashboard: &Dashboard) {
    section(out, "Top Recruiters");

    if dashboard.top_recruiters.is_empty() {
        let _ = writeln!(out, "No recruiter data available for the selected filters.");
        return;
    }

    let mut table = TextTable::new(&[
        ("#", Align::Right),
        ("Company", Align::Left),
        ("Postings", Align::Right),
    ]);
    for (i, recruiter) in dashboard.top_recruiters.iter().enumerate() {
        table.push_row(vec![
            (i + 1).to_string(),
            recruiter.company.clone(),
            recruiter.postings.to_string(),
        ]);
    }
    out.push_str(&table.render());
}

fn render_overall(out: &mut String, dashboard: &Dashboard) {
    section(out, "Average CTC Overall");
    let _ = writeln!(
        out,
        "Average CTC: {}",
        format_optional_lakh(dashboard.overall_mean_ctc)
    );
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", title);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::models::{DashboardParams, FilterParams, RawRecord};
    use placement_data::analysis::build_dashboard;
    use placement_data::table::AnalysisTable;
    use serde_json::json;

    fn table() -> AnalysisTable {
        let raw: Vec<RawRecord> = vec![
            json!({"company": "Acme", "ctc": 2_400_000, "jobType": "fte", "applicationOpen": "2024-08-05", "location": "Pune", "name": "SDE"}),
            json!({"company": "Globex", "ctc": 12, "jobType": "fte", "applicationOpen": "2024-08-20"}),
            json!({"company": "Initech", "ctc": 6, "jobType": "fte", "applicationOpen": "2024-09-02"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();
        AnalysisTable::build(&raw, Granularity::Month)
    }

    fn header(t: &AnalysisTable, range: Option<CtcRange>) -> ReportHeader {
        ReportHeader {
            dataset: "2024 (jobs2024)".to_string(),
            job_type: JobCategoryMode::PrimaryOnly,
            ctc_range: range,
            period: PeriodSelector::All,
            period_options: t.period_options(),
        }
    }

    fn params(range: CtcRange) -> DashboardParams {
        DashboardParams {
            filter: FilterParams {
                ctc_range: Some(range),
                ..FilterParams::default()
            },
            detail_month: Some(Period::Month { year: 2024, month: 8 }),
            ..DashboardParams::default()
        }
    }

    #[test]
    fn test_render_text_has_every_section() {
        let t = table();
        let range = t.ctc_bounds();
        let d = build_dashboard(&t, &params(range));
        let text = render_text(&d, &header(&t, Some(range)));

        for heading in [
            "# Campus Recruitment Dashboard - 2024 (jobs2024)",
            "## Top CTC Offers",
            "## High CTC Companies per Month (>= ₹10.00 L)",
            "### Companies with high CTC in 2024-08",
            "## CTC Distribution per Month",
            "## Companies per Month",
            "## Average CTC per Month",
            "## Top Recruiters",
            "## Average CTC Overall",
        ] {
            assert!(text.contains(heading), "missing {heading}\n{text}");
        }
        assert!(text.contains("Showing 3 of 3 records (100.0%)"));
        assert!(text.contains("Highest CTC:          ₹24.00 L"));
        assert!(text.contains("Periods:     2024-08, 2024-09"));
        assert!(text.contains("Average CTC: ₹14.00 L"));
        assert!(!text.contains("Detail available with --month"));
    }

    #[test]
    fn test_render_text_lists_detail_months_without_selection() {
        let t = table();
        let range = t.ctc_bounds();
        let mut p = params(range);
        p.detail_month = None;
        let d = build_dashboard(&t, &p);
        let text = render_text(&d, &header(&t, Some(range)));
        assert!(text.contains("Detail available with --month: 2024-08"));
    }

    #[test]
    fn test_render_text_no_data_messages() {
        let t = table();
        let range = CtcRange::new(100.0, 200.0);
        let mut p = params(range);
        p.threshold = 1000.0;
        let d = build_dashboard(&t, &p);
        let text = render_text(&d, &header(&t, Some(range)));

        assert!(text.contains("No CTC data available for the selected filters."));
        assert!(text.contains("No companies found offering CTC above ₹1,000.00 L."));
        assert!(text.contains("No data available for the selected time period."));
        assert!(text.contains("No data available for average CTC analysis."));
        assert!(text.contains("No recruiter data available for the selected filters."));
        assert!(text.contains("Average CTC: no data"));
    }

    #[test]
    fn test_render_json_round_trips_through_value() {
        let t = table();
        let d = build_dashboard(&t, &params(t.ctc_bounds()));
        let json = render_json(&d).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_records"], 3);
        assert_eq!(value["top_offers"]["rows"][0]["company"], "Acme");
        assert_eq!(value["high_ctc"]["detail"]["month"], "2024-08");
    }

    #[test]
    fn test_granularity_title() {
        assert_eq!(granularity_title(Granularity::Week), "Week");
    }
}
