//! Row filtering.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};
use crate::value::Value;

/// Comparison operator for a filter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Case-insensitive equality on display strings.
    #[default]
    Equals,
    /// Negated [`FilterOperator::Equals`].
    NotEquals,
    /// Case-insensitive substring match after string coercion.
    Contains,
    /// Negated [`FilterOperator::Contains`].
    NotContains,
    /// Numeric `>`. Rows where either side fails numeric coercion are excluded.
    GreaterThan,
    /// Numeric `<`.
    LessThan,
    /// Numeric `>=`.
    GreaterEqual,
    /// Numeric `<=`.
    LessEqual,
    /// Cell is null, absent, or empty text.
    IsNull,
    /// Negated [`FilterOperator::IsNull`].
    IsNotNull,
}

/// Configuration for a filter step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Column the predicate reads.
    pub column: String,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Comparison operand (ignored by the null checks).
    pub value: Value,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            column: String::new(),
            operator: FilterOperator::default(),
            value: Value::Text(String::new()),
        }
    }
}

impl FilterConfig {
    /// Whether a row satisfies this predicate under the lenient coercion
    /// rules. Numeric coercion failure on either side means "no match"
    /// (fail-soft: the row is excluded, never an error).
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(&self.column);
        match self.operator {
            FilterOperator::Equals => eq_ignore_case(cell, &self.value),
            FilterOperator::NotEquals => !eq_ignore_case(cell, &self.value),
            FilterOperator::Contains => contains_ignore_case(cell, &self.value),
            FilterOperator::NotContains => !contains_ignore_case(cell, &self.value),
            FilterOperator::GreaterThan => numeric_cmp(cell, &self.value, |a, b| a > b),
            FilterOperator::LessThan => numeric_cmp(cell, &self.value, |a, b| a < b),
            FilterOperator::GreaterEqual => numeric_cmp(cell, &self.value, |a, b| a >= b),
            FilterOperator::LessEqual => numeric_cmp(cell, &self.value, |a, b| a <= b),
            FilterOperator::IsNull => cell.is_nullish(),
            FilterOperator::IsNotNull => !cell.is_nullish(),
        }
    }
}

fn eq_ignore_case(cell: &Value, operand: &Value) -> bool {
    cell.to_display_string()
        .eq_ignore_ascii_case(&operand.to_display_string())
}

fn contains_ignore_case(cell: &Value, operand: &Value) -> bool {
    cell.to_display_string()
        .to_lowercase()
        .contains(&operand.to_display_string().to_lowercase())
}

fn numeric_cmp(cell: &Value, operand: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (cell.to_number(), operand.to_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

pub(super) fn apply(config: &FilterConfig, input: &Dataset) -> Dataset {
    let rows: Vec<Row> = input
        .rows()
        .iter()
        .filter(|row| config.matches(row))
        .cloned()
        .collect();
    Dataset::new(input.schema().clone(), rows)
}
