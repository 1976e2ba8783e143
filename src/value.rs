//! Dynamically-typed cell values and lenient coercion helpers.
//!
//! Any column may hold text, numbers, dates, booleans or nulls
//! interchangeably; operators never assume a cell matches its column's
//! inferred type. Coercions are explicit and lenient: a cell that cannot be
//! coerced yields `None` and the caller degrades per-row rather than
//! erroring.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell value in a dataset.
///
/// Untagged serde representation; variant order matters because a date
/// string must be tried as a date before falling back to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Bool(bool),
    /// A calendar date.
    Date(NaiveDate),
    /// A text value.
    Text(String),
    /// A list of strings. Only produced by the validate operator for its
    /// advisory `_validation_errors` field; coercions treat it as
    /// non-numeric and non-null.
    List(Vec<String>),
    /// A missing value.
    Null,
}

impl Value {
    /// Coerce to a finite number.
    ///
    /// Numbers pass through (NaN and infinities are rejected), booleans map
    /// to 0/1, text is trimmed and parsed as an f64. Dates, lists and nulls
    /// do not coerce.
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Coerce to a date.
    ///
    /// Dates pass through; text is parsed as `YYYY-MM-DD`, `YYYY/MM/DD`,
    /// `MM/DD/YYYY`, or the date prefix of an ISO 8601 timestamp.
    #[must_use]
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }

    /// Render as a display string.
    ///
    /// Integer-valued numbers render without a decimal point (`4`, not
    /// `4.0`), matching how the values were typed. Nulls render empty.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => items.join("; "),
            Value::Null => String::new(),
        }
    }

    /// Whether this value counts as missing.
    ///
    /// Nulls and empty text are both "null" for filtering, sorting and
    /// cleaning purposes.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Get as text, or `None` if not text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get as a number, or `None` if not a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The exact value+type grouping key for this value.
    #[must_use]
    pub fn group_key(&self) -> GroupKey {
        match self {
            Value::Text(s) => GroupKey::Text(s.clone()),
            Value::Number(n) => GroupKey::Number(n.to_bits()),
            Value::Date(d) => GroupKey::Date(*d),
            Value::Bool(b) => GroupKey::Bool(*b),
            Value::List(items) => GroupKey::List(items.clone()),
            Value::Null => GroupKey::Null,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// Hashable exact value+type key used to partition rows.
///
/// A numeric `1` and the text `"1"` are distinct keys. Numbers key on their
/// bit pattern, so NaN groups with NaN and `-0.0` is distinct from `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Text key.
    Text(String),
    /// Numeric key (f64 bit pattern).
    Number(u64),
    /// Date key.
    Date(NaiveDate),
    /// Boolean key.
    Bool(bool),
    /// List key.
    List(Vec<String>),
    /// Null key.
    Null,
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // ISO 8601 timestamp prefix, e.g. "2024-01-15T09:30:00Z"
    if s.len() > 10 {
        if let Ok(d) = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d") {
            return Some(d);
        }
    }
    None
}
