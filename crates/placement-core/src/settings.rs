use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{PlacementError, Result};
use crate::models::{
    CtcRange, DashboardParams, FilterParams, Granularity, JobCategoryMode, PeriodSelector,
    DEFAULT_HIGH_CTC_THRESHOLD,
};

// ── OutputFormat ───────────────────────────────────────────────────────────────

/// How the dashboard is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Campus recruitment statistics: top offers, compensation trends and recruiters
#[derive(Parser, Debug, Clone)]
#[command(
    name = "placement-dashboard",
    about = "Campus recruitment statistics: top offers, compensation trends and recruiters",
    version
)]
pub struct Settings {
    /// Directory scanned for `*.json` datasets
    #[arg(long, env = "PLACEMENT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Dataset id (file stem, e.g. `jobs2025`); defaults to the most recent year
    #[arg(long)]
    pub dataset: Option<String>,

    /// Load this file directly instead of scanning the data directory
    #[arg(long, conflicts_with = "dataset")]
    pub dataset_file: Option<PathBuf>,

    /// List the datasets found in the data directory and exit
    #[arg(long)]
    pub list_datasets: bool,

    /// Job categories to include
    #[arg(long, value_enum, default_value_t = JobCategoryMode::PrimaryOnly)]
    pub job_type: JobCategoryMode,

    /// Period bucket size for trend views
    #[arg(long, value_enum, default_value_t = Granularity::Month)]
    pub granularity: Granularity,

    /// Lower compensation bound in lakh (defaults to the observed minimum)
    #[arg(long)]
    pub ctc_min: Option<f64>,

    /// Upper compensation bound in lakh (defaults to the observed maximum)
    #[arg(long)]
    pub ctc_max: Option<f64>,

    /// Period to restrict to (`All`, `2024`, `2024-03` or `2024-W10`)
    #[arg(long, default_value = "All")]
    pub period: String,

    /// High compensation threshold in lakh
    #[arg(long, default_value_t = DEFAULT_HIGH_CTC_THRESHOLD)]
    pub threshold: f64,

    /// Month (`YYYY-MM`) whose high compensation offers are listed in detail
    #[arg(long)]
    pub month: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Merge the explicit `--ctc-min` / `--ctc-max` bounds over `observed`.
    pub fn ctc_range(&self, observed: CtcRange) -> Result<CtcRange> {
        let range = CtcRange::new(
            self.ctc_min.unwrap_or(observed.lo),
            self.ctc_max.unwrap_or(observed.hi),
        );
        if !range.lo.is_finite() || !range.hi.is_finite() {
            return Err(PlacementError::Config(
                "compensation bounds must be finite".to_string(),
            ));
        }
        if range.lo > range.hi {
            return Err(PlacementError::Config(format!(
                "ctc-min ({}) exceeds ctc-max ({})",
                range.lo, range.hi
            )));
        }
        Ok(range)
    }

    /// Build the immutable filter parameters for the main views.
    pub fn filter_params(&self, observed: CtcRange) -> Result<FilterParams> {
        Ok(FilterParams {
            category: self.job_type,
            ctc_range: Some(self.ctc_range(observed)?),
            period: PeriodSelector::parse(&self.period, self.granularity)?,
        })
    }

    /// Build the full parameter set for the dashboard pipeline.
    pub fn dashboard_params(&self, observed: CtcRange) -> Result<DashboardParams> {
        if !self.threshold.is_finite() {
            return Err(PlacementError::Config(
                "threshold must be a finite number".to_string(),
            ));
        }
        let detail_month = self
            .month
            .as_deref()
            .map(|label| Granularity::Month.parse_period(label))
            .transpose()?;
        Ok(DashboardParams {
            filter: self.filter_params(observed)?,
            threshold: self.threshold,
            detail_month,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    fn observed() -> CtcRange {
        CtcRange::new(3.0, 45.0)
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::load_from(["placement-dashboard"]);

        assert!(settings.dataset.is_none());
        assert!(settings.dataset_file.is_none());
        assert!(!settings.list_datasets);
        assert_eq!(settings.job_type, JobCategoryMode::PrimaryOnly);
        assert_eq!(settings.granularity, Granularity::Month);
        assert!(settings.ctc_min.is_none());
        assert!(settings.ctc_max.is_none());
        assert_eq!(settings.period, "All");
        assert_eq!(settings.threshold, 10.0);
        assert!(settings.month.is_none());
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.log_level, "WARNING");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_enums() {
        let settings = Settings::load_from([
            "placement-dashboard",
            "--job-type",
            "include-secondary",
            "--granularity",
            "week",
            "--format",
            "json",
        ]);
        assert_eq!(settings.job_type, JobCategoryMode::IncludeSecondary);
        assert_eq!(settings.granularity, Granularity::Week);
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let settings = Settings::load_from(["placement-dashboard", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_dataset_and_dataset_file_conflict() {
        let result = Settings::try_parse_from([
            "placement-dashboard",
            "--dataset",
            "jobs2025",
            "--dataset-file",
            "jobs.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ctc_range_defaults_to_observed() {
        let settings = Settings::load_from(["placement-dashboard"]);
        assert_eq!(settings.ctc_range(observed()).unwrap(), observed());
    }

    #[test]
    fn test_ctc_range_partial_override() {
        let settings = Settings::load_from(["placement-dashboard", "--ctc-min", "10"]);
        assert_eq!(
            settings.ctc_range(observed()).unwrap(),
            CtcRange::new(10.0, 45.0)
        );
    }

    #[test]
    fn test_ctc_range_inverted_is_config_error() {
        let settings = Settings::load_from([
            "placement-dashboard",
            "--ctc-min",
            "30",
            "--ctc-max",
            "20",
        ]);
        assert!(matches!(
            settings.ctc_range(observed()),
            Err(PlacementError::Config(_))
        ));
    }

    #[test]
    fn test_filter_params_parses_period_for_granularity() {
        let settings = Settings::load_from([
            "placement-dashboard",
            "--granularity",
            "year",
            "--period",
            "2024",
        ]);
        let params = settings.filter_params(observed()).unwrap();
        assert_eq!(params.period, PeriodSelector::Exact(Period::Year(2024)));
        assert_eq!(params.ctc_range, Some(observed()));
    }

    #[test]
    fn test_filter_params_rejects_mismatched_period() {
        let settings = Settings::load_from(["placement-dashboard", "--period", "2024"]);
        assert!(matches!(
            settings.filter_params(observed()),
            Err(PlacementError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_dashboard_params_detail_month() {
        let settings = Settings::load_from([
            "placement-dashboard",
            "--threshold",
            "25",
            "--month",
            "2024-08",
        ]);
        let params = settings.dashboard_params(observed()).unwrap();
        assert_eq!(params.threshold, 25.0);
        assert_eq!(
            params.detail_month,
            Some(Period::Month { year: 2024, month: 8 })
        );
    }
}
