use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{PlacementError, Result};
use crate::normalize::{clean_ctc, clean_cutoff, extract_company_name};

/// One job posting exactly as it was ingested.
pub type RawRecord = Map<String, Value>;

/// `jobType` tag of the primary (full-time) recruitment category.
pub const PRIMARY_JOB_TYPE: &str = "fte";

/// Compensation floor (lakh) used to highlight premium offers by default.
pub const DEFAULT_HIGH_CTC_THRESHOLD: f64 = 10.0;

// ── Granularity ───────────────────────────────────────────────────────────────

/// Size of the time bucket used for period-keyed views.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    #[default]
    Month,
    Week,
}

impl Granularity {
    /// Bucket a parsed date into a [`Period`] of this granularity.
    ///
    /// Weeks are numbered Sunday-first within the calendar year (`%U`): days
    /// before the first Sunday fall in week `00`.
    pub fn bucket(self, date: &NaiveDateTime) -> Period {
        match self {
            Granularity::Year => Period::Year(date.year()),
            Granularity::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Week => {
                let yday = date.ordinal0();
                let wday = date.weekday().num_days_from_sunday();
                Period::Week {
                    year: date.year(),
                    week: (yday + 7 - wday) / 7,
                }
            }
        }
    }

    /// Parse a user-supplied period label (`2024`, `2024-03`, `2024-W10`).
    pub fn parse_period(self, label: &str) -> Result<Period> {
        let label = label.trim();
        let invalid = || PlacementError::InvalidPeriod {
            label: label.to_string(),
            granularity: self.to_string(),
        };

        match self {
            Granularity::Year => label.parse::<i32>().map(Period::Year).map_err(|_| invalid()),
            Granularity::Month => {
                let (year, month) = label.split_once('-').ok_or_else(invalid)?;
                if month.len() != 2 {
                    return Err(invalid());
                }
                let year = year.parse::<i32>().map_err(|_| invalid())?;
                let month = month.parse::<u32>().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(Period::Month { year, month })
            }
            Granularity::Week => {
                let (year, week) = label.split_once("-W").ok_or_else(invalid)?;
                if week.len() != 2 {
                    return Err(invalid());
                }
                let year = year.parse::<i32>().map_err(|_| invalid())?;
                let week = week.parse::<u32>().map_err(|_| invalid())?;
                if week > 53 {
                    return Err(invalid());
                }
                Ok(Period::Week { year, week })
            }
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
            Granularity::Week => "week",
        };
        f.write_str(s)
    }
}

// ── Period ────────────────────────────────────────────────────────────────────

/// A time bucket derived from a record's application-open date.
///
/// Ordering is chronological within one granularity. Periods of different
/// granularities are never mixed in one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Year(i32),
    Month { year: i32, month: u32 },
    Week { year: i32, week: u32 },
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(year) => write!(f, "{}", year),
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Week { year, week } => write!(f, "{:04}-W{:02}", year, week),
        }
    }
}

/// Years serialize as integers, months and weeks as their labels.
impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Period::Year(year) => serializer.serialize_i32(*year),
            other => serializer.collect_str(other),
        }
    }
}

// ── Cutoff ────────────────────────────────────────────────────────────────────

/// Eligibility cutoff passed through without unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cutoff {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

// ── Filter configuration ──────────────────────────────────────────────────────

/// Which job categories survive the category filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum JobCategoryMode {
    /// Only postings tagged with [`PRIMARY_JOB_TYPE`].
    #[default]
    PrimaryOnly,
    /// Every category, internships included.
    IncludeSecondary,
}

/// Inclusive compensation range in lakh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CtcRange {
    pub lo: f64,
    pub hi: f64,
}

impl CtcRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// `true` when `value` lies within `[lo, hi]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

/// Period selector: everything, or one exact bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodSelector {
    #[default]
    All,
    Exact(Period),
}

impl PeriodSelector {
    /// Parse `"All"` (any case) or a period label of `granularity`.
    pub fn parse(label: &str, granularity: Granularity) -> Result<Self> {
        if label.trim().eq_ignore_ascii_case("all") {
            Ok(PeriodSelector::All)
        } else {
            granularity.parse_period(label).map(PeriodSelector::Exact)
        }
    }
}

/// Immutable filter parameters for one view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterParams {
    pub category: JobCategoryMode,
    /// `None` disables the range filter entirely (rows without a compensation
    /// value are kept).
    pub ctc_range: Option<CtcRange>,
    pub period: PeriodSelector,
}

/// Everything the dashboard pipeline needs besides the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardParams {
    pub filter: FilterParams,
    /// High-compensation threshold in lakh.
    pub threshold: f64,
    /// Month whose high-compensation companies are listed in detail.
    pub detail_month: Option<Period>,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            filter: FilterParams::default(),
            threshold: DEFAULT_HIGH_CTC_THRESHOLD,
            detail_month: None,
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// A raw record plus its three canonical scalar fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub raw: RawRecord,
    /// Resolved company identity; never empty.
    pub company_name: String,
    /// Compensation in lakh, `None` when missing or unparseable.
    pub ctc_clean: Option<f64>,
    pub cutoff_clean: Option<Cutoff>,
}

impl NormalizedRecord {
    /// Run the field normalizer over `raw`.
    pub fn from_raw(raw: RawRecord) -> Self {
        let company_name = extract_company_name(raw.get("company").unwrap_or(&Value::Null));
        let ctc_clean = clean_ctc(raw.get("ctc").unwrap_or(&Value::Null));
        let cutoff_clean = clean_cutoff(raw.get("cutoff").unwrap_or(&Value::Null));
        Self {
            raw,
            company_name,
            ctc_clean,
            cutoff_clean,
        }
    }

    /// `jobType` tag, e.g. `"fte"` or `"intern"`.
    pub fn job_type(&self) -> Option<&str> {
        self.raw_str("jobType")
    }

    pub fn location(&self) -> Option<&str> {
        self.raw_str("location")
    }

    /// Role title (`name` field).
    pub fn role_title(&self) -> Option<&str> {
        self.raw_str("name")
    }

    fn raw_str(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }
}

/// A normalized record plus its derived temporal fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub normalized: NormalizedRecord,
    /// Parsed `applicationOpen`, in the record's local wall-clock time.
    pub date_parsed: Option<NaiveDateTime>,
    /// Bucket of `date_parsed` under the table's granularity.
    pub period: Option<Period>,
}

impl AnalysisRecord {
    pub fn company_name(&self) -> &str {
        &self.normalized.company_name
    }

    pub fn ctc(&self) -> Option<f64> {
        self.normalized.ctc_clean
    }

    pub fn job_type(&self) -> Option<&str> {
        self.normalized.job_type()
    }

    pub fn location(&self) -> Option<&str> {
        self.normalized.location()
    }

    pub fn role_title(&self) -> Option<&str> {
        self.normalized.role_title()
    }

    /// Bucket this record's date under a granularity other than the table's.
    pub fn period_at(&self, granularity: Granularity) -> Option<Period> {
        self.date_parsed.as_ref().map(|d| granularity.bucket(d))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
