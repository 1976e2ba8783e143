//! Sequential chart data (line, area).

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::value::Value;

/// One point of a sequential series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeqPoint {
    /// The x cell as ingested (date, number or text).
    pub x: Value,
    /// The y cell coerced to a number.
    pub y: f64,
}

/// Per-point ordering key: x is a temporal/ordinal axis, so dates order
/// first as dates, then numbers numerically, then everything else as
/// case-insensitive text.
#[derive(Debug, Clone, PartialEq)]
enum OrdinalKey {
    Date(NaiveDate),
    Number(f64),
    Text(String),
}

impl OrdinalKey {
    fn of(value: &Value) -> Self {
        if let Some(d) = value.to_date() {
            return Self::Date(d);
        }
        if let Some(n) = value.to_number() {
            return Self::Number(n);
        }
        Self::Text(value.to_display_string().to_lowercase())
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            // Mixed-class axes order dates, then numbers, then text.
            (Self::Date(_), _) => Ordering::Less,
            (_, Self::Date(_)) => Ordering::Greater,
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

/// Map rows to `(x, numeric y)` points, dropping rows whose y fails
/// numeric coercion, sorted ascending by x.
pub(super) fn derive(dataset: &Dataset, x_axis: &str, y_axis: &str) -> Vec<SeqPoint> {
    let mut points: Vec<SeqPoint> = dataset
        .rows()
        .iter()
        .filter_map(|row| {
            let y = row.get(y_axis).to_number()?;
            Some(SeqPoint {
                x: row.get(x_axis).clone(),
                y,
            })
        })
        .collect();
    points.sort_by(|a, b| OrdinalKey::of(&a.x).compare(&OrdinalKey::of(&b.x)));
    points
}
