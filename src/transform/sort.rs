//! Stable single-column sorting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};
use crate::schema::ColumnType;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first; missing values first.
    #[default]
    Ascending,
    /// Largest first; missing values last.
    Descending,
}

/// Configuration for a sort step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    /// Column to sort by.
    pub column: String,
    /// Direction.
    pub direction: SortDirection,
}

/// Per-row sort key. Schema-numeric columns compare numerically (a cell
/// that fails coercion counts as missing); everything else compares
/// case-insensitively as text.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Missing,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Less,
            (_, Self::Missing) => Ordering::Greater,
            (Self::Number(a), Self::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            // Mixed classes cannot arise: the key class is fixed per column.
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

pub(super) fn apply(config: &SortConfig, input: &Dataset) -> Dataset {
    let numeric = input.schema().column_type(&config.column) == Some(ColumnType::Number);
    let mut rows: Vec<Row> = input.rows().to_vec();
    rows.sort_by(|a, b| {
        let ka = sort_key(a, &config.column, numeric);
        let kb = sort_key(b, &config.column, numeric);
        match config.direction {
            SortDirection::Ascending => ka.compare(&kb),
            // Reversed operands keep the sort stable and put missing last.
            SortDirection::Descending => kb.compare(&ka),
        }
    });
    Dataset::new(input.schema().clone(), rows)
}

fn sort_key(row: &Row, column: &str, numeric: bool) -> SortKey {
    let cell = row.get(column);
    if cell.is_nullish() {
        return SortKey::Missing;
    }
    if numeric {
        return cell.to_number().map_or(SortKey::Missing, SortKey::Number);
    }
    SortKey::Text(cell.to_display_string().to_lowercase())
}
