//! Field normalizer.
//!
//! Recruitment datasets store the same field in several shapes: compensation
//! may be a bare number, a string, a one-element list or an object with a
//! `value` key; company identity may be a string or an object with a `name`
//! key. Everything downstream works on the canonical scalars produced here.

use serde_json::{Map, Value};

use crate::models::Cutoff;

/// Rendering used when a company field is missing or blank.
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Raw values at or above this magnitude are absolute currency, not lakh.
const ABSOLUTE_CURRENCY_FLOOR: f64 = 1000.0;

const RUPEES_PER_LAKH: f64 = 100_000.0;

// ── FieldShape ────────────────────────────────────────────────────────────────

/// The shapes a polymorphic compensation or cutoff field can take.
#[derive(Debug, Clone, Copy)]
pub enum FieldShape<'a> {
    /// `{"value": ...}`
    Tagged(&'a Map<String, Value>),
    /// `[v, ...]`
    List(&'a [Value]),
    /// Anything else, `null` included.
    Scalar(&'a Value),
}

impl<'a> FieldShape<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => FieldShape::Tagged(map),
            Value::Array(items) => FieldShape::List(items),
            other => FieldShape::Scalar(other),
        }
    }

    /// Resolve to the candidate scalar: the `value` entry, the first list
    /// element, or the value itself. `null` resolves to `None`.
    pub fn resolve(self) -> Option<&'a Value> {
        let candidate = match self {
            FieldShape::Tagged(map) => map.get("value"),
            FieldShape::List(items) => items.first(),
            FieldShape::Scalar(value) => Some(value),
        };
        candidate.filter(|v| !v.is_null())
    }
}

// ── Company ───────────────────────────────────────────────────────────────────

/// Resolve a company field to a non-empty identity string.
///
/// Objects yield their `name` entry, falling back to the JSON rendering of the
/// whole object; any other value yields its own rendering.
pub fn extract_company_name(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("name") {
            Some(name) => render_identity(name),
            None => value.to_string(),
        },
        other => render_identity(other),
    }
}

fn render_identity(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN_COMPANY.to_string(),
        Value::String(s) if s.trim().is_empty() => UNKNOWN_COMPANY.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Compensation ──────────────────────────────────────────────────────────────

/// Resolve and parse a compensation field into lakh.
///
/// Values `>= 1000` are treated as absolute currency and divided by 100 000;
/// smaller values are already lakh-scale. Anything that does not parse to a
/// finite number yields `None`.
pub fn clean_ctc(value: &Value) -> Option<f64> {
    let amount = FieldShape::of(value).resolve().and_then(parse_number)?;
    if amount >= ABSOLUTE_CURRENCY_FLOOR {
        Some(amount / RUPEES_PER_LAKH)
    } else {
        Some(amount)
    }
}

/// Parse a JSON number or numeric string. Non-finite results are rejected.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

// ── Cutoff ────────────────────────────────────────────────────────────────────

/// Resolve a cutoff field without any numeric conversion.
///
/// Unparseable strings pass through unchanged, unlike [`clean_ctc`]. A
/// resolved list or object is kept as its JSON rendering.
pub fn clean_cutoff(value: &Value) -> Option<Cutoff> {
    let resolved = FieldShape::of(value).resolve()?;
    Some(match resolved {
        Value::Number(n) => Cutoff::Number(n.clone()),
        Value::String(s) => Cutoff::Text(s.clone()),
        Value::Bool(b) => Cutoff::Flag(*b),
        other => Cutoff::Text(other.to_string()),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
