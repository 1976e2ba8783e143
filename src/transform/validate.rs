//! Advisory validation rules.
//!
//! Validation never drops rows and never touches visible columns. Each row
//! gains a computed `_validation_errors` list with human-readable messages;
//! a row that fails every rule is still present in the output.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};
use crate::schema::{Column, ColumnType};
use crate::value::Value;

/// Name of the computed per-row error-list column.
pub const VALIDATION_ERRORS_COLUMN: &str = "_validation_errors";

/// One validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    /// Cell must be present and non-null.
    Required {
        /// Target column.
        column: String,
    },
    /// Numeric-coercible cells must fall within `[min, max]`.
    Range {
        /// Target column.
        column: String,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Non-null cells must match a regex after string coercion.
    Pattern {
        /// Target column.
        column: String,
        /// Regex source text.
        pattern: String,
    },
}

/// Configuration for a validate step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidateConfig {
    /// Rules checked against every row.
    pub rules: Vec<ValidationRule>,
}

pub(super) fn apply(config: &ValidateConfig, input: &Dataset) -> Dataset {
    // Compile patterns once per step. An uncompilable pattern is a config
    // mistake caught by `Transform::validate_config`; on the data path the
    // rule is skipped rather than failing the pipeline.
    let compiled: Vec<Option<Regex>> = config
        .rules
        .iter()
        .map(|rule| match rule {
            ValidationRule::Pattern { pattern, .. } => Regex::new(pattern).ok(),
            _ => None,
        })
        .collect();

    let rows: Vec<Row> = input
        .rows()
        .iter()
        .map(|row| {
            let mut out = row.clone();
            let mut errors = Vec::new();
            for (rule, regex) in config.rules.iter().zip(&compiled) {
                check_rule(rule, regex.as_ref(), row, &mut errors);
            }
            out.set(VALIDATION_ERRORS_COLUMN, Value::List(errors));
            out
        })
        .collect();

    let mut schema = input.schema().clone();
    schema.upsert_column(Column::new(VALIDATION_ERRORS_COLUMN, ColumnType::Text));
    Dataset::new(schema, rows)
}

fn check_rule(rule: &ValidationRule, regex: Option<&Regex>, row: &Row, errors: &mut Vec<String>) {
    match rule {
        ValidationRule::Required { column } => {
            if row.get(column).is_nullish() {
                errors.push(format!("{column} is required"));
            }
        }
        ValidationRule::Range { column, min, max } => {
            if let Some(n) = row.get(column).to_number() {
                if n < *min {
                    errors.push(format!("{column} must be at least {min}"));
                } else if n > *max {
                    errors.push(format!("{column} must be at most {max}"));
                }
            }
        }
        ValidationRule::Pattern { column, pattern } => {
            let cell = row.get(column);
            if cell.is_nullish() {
                return;
            }
            if let Some(regex) = regex {
                if !regex.is_match(&cell.to_display_string()) {
                    errors.push(format!("{column} does not match pattern {pattern}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn dataset(rows: Vec<Row>) -> Dataset {
        Dataset::new(
            Schema::new(vec![
                Column::new("email", ColumnType::Text),
                Column::new("age", ColumnType::Number),
            ]),
            rows,
        )
    }

    fn errors_of(row: &Row) -> Vec<String> {
        match row.get(VALIDATION_ERRORS_COLUMN) {
            Value::List(items) => items.clone(),
            other => panic!("expected error list, got {other:?}"),
        }
    }

    #[test]
    fn test_required_flags_nulls() {
        let ds = dataset(vec![
            Row::from_pairs([("email", Value::from("a@b.c"))]),
            Row::from_pairs([("email", Value::Null)]),
        ]);
        let config = ValidateConfig {
            rules: vec![ValidationRule::Required { column: "email".into() }],
        };
        let out = apply(&config, &ds);
        assert!(errors_of(&out.rows()[0]).is_empty());
        assert_eq!(errors_of(&out.rows()[1]), vec!["email is required"]);
    }

    #[test]
    fn test_no_rows_dropped() {
        let ds = dataset(vec![
            Row::from_pairs([("age", Value::Number(-5.0))]),
            Row::from_pairs([("age", Value::Null)]),
        ]);
        let config = ValidateConfig {
            rules: vec![
                ValidationRule::Required { column: "email".into() },
                ValidationRule::Range { column: "age".into(), min: 0.0, max: 120.0 },
            ],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_range_bounds() {
        let ds = dataset(vec![
            Row::from_pairs([("age", Value::Number(25.0))]),
            Row::from_pairs([("age", Value::Number(-1.0))]),
            Row::from_pairs([("age", Value::Number(200.0))]),
        ]);
        let config = ValidateConfig {
            rules: vec![ValidationRule::Range { column: "age".into(), min: 0.0, max: 120.0 }],
        };
        let out = apply(&config, &ds);
        assert!(errors_of(&out.rows()[0]).is_empty());
        assert_eq!(errors_of(&out.rows()[1]), vec!["age must be at least 0"]);
        assert_eq!(errors_of(&out.rows()[2]), vec!["age must be at most 120"]);
    }

    #[test]
    fn test_range_skips_uncoercible_cells() {
        let ds = dataset(vec![Row::from_pairs([("age", Value::from("unknown"))])]);
        let config = ValidateConfig {
            rules: vec![ValidationRule::Range { column: "age".into(), min: 0.0, max: 120.0 }],
        };
        let out = apply(&config, &ds);
        assert!(errors_of(&out.rows()[0]).is_empty());
    }

    #[test]
    fn test_pattern_rule() {
        let ds = dataset(vec![
            Row::from_pairs([("email", Value::from("a@b.c"))]),
            Row::from_pairs([("email", Value::from("not-an-email"))]),
            Row::from_pairs([("email", Value::Null)]),
        ]);
        let config = ValidateConfig {
            rules: vec![ValidationRule::Pattern {
                column: "email".into(),
                pattern: "^.+@.+\\..+$".into(),
            }],
        };
        let out = apply(&config, &ds);
        assert!(errors_of(&out.rows()[0]).is_empty());
        assert_eq!(errors_of(&out.rows()[1]).len(), 1);
        // Null cells are the Required rule's business, not Pattern's.
        assert!(errors_of(&out.rows()[2]).is_empty());
    }

    #[test]
    fn test_multiple_rules_accumulate() {
        let ds = dataset(vec![Row::from_pairs([("age", Value::Number(-1.0))])]);
        let config = ValidateConfig {
            rules: vec![
                ValidationRule::Required { column: "email".into() },
                ValidationRule::Range { column: "age".into(), min: 0.0, max: 120.0 },
            ],
        };
        let out = apply(&config, &ds);
        assert_eq!(errors_of(&out.rows()[0]).len(), 2);
    }

    #[test]
    fn test_visible_columns_untouched() {
        let ds = dataset(vec![Row::from_pairs([("age", Value::Number(25.0))])]);
        let config = ValidateConfig {
            rules: vec![ValidationRule::Range { column: "age".into(), min: 0.0, max: 120.0 }],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.rows()[0].get("age"), &Value::Number(25.0));
        assert_eq!(out.rows()[0].get("email"), &Value::Null);
    }

    #[test]
    fn test_error_column_in_schema() {
        let out = apply(&ValidateConfig::default(), &dataset(vec![Row::new()]));
        assert!(out.schema().has_column(VALIDATION_ERRORS_COLUMN));
    }
}
