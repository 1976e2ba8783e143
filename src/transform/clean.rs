//! Data cleaning.
//!
//! An ordered list of sub-operations applied per row. A `RemoveRow` action
//! marks the row but the remaining sub-operations still run for it; marked
//! rows are dropped only after the whole list was evaluated.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};
use crate::value::Value;

/// What to do with a row whose target cell is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NullAction {
    /// Drop the row from the output.
    RemoveRow,
    /// Replace the null with a default value.
    FillDefault {
        /// Replacement value.
        default: Value,
    },
}

/// Case standardization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    /// Uppercase.
    Upper,
    /// Lowercase.
    Lower,
}

/// One cleaning sub-operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CleanOp {
    /// Handle null cells in a column.
    RemoveNulls {
        /// Target column.
        column: String,
        /// Null handling action.
        action: NullAction,
    },
    /// Trim leading/trailing whitespace from text cells.
    TrimWhitespace {
        /// Target column.
        column: String,
    },
    /// Standardize the case of text cells.
    StandardizeCase {
        /// Target column.
        column: String,
        /// Target case.
        case: CaseStyle,
    },
}

/// Configuration for a clean step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CleanConfig {
    /// Sub-operations, applied per row in listed order.
    pub operations: Vec<CleanOp>,
}

pub(super) fn apply(config: &CleanConfig, input: &Dataset) -> Dataset {
    let rows: Vec<Row> = input
        .rows()
        .iter()
        .filter_map(|row| {
            let mut out = row.clone();
            let mut remove = false;
            for operation in &config.operations {
                match operation {
                    CleanOp::RemoveNulls { column, action } => {
                        if out.get(column).is_nullish() {
                            match action {
                                NullAction::RemoveRow => remove = true,
                                NullAction::FillDefault { default } => {
                                    out.set(column.clone(), default.clone());
                                }
                            }
                        }
                    }
                    CleanOp::TrimWhitespace { column } => {
                        if let Some(text) = out.get(column).as_text() {
                            out.set(column.clone(), text.trim().to_string());
                        }
                    }
                    CleanOp::StandardizeCase { column, case } => {
                        if let Some(text) = out.get(column).as_text() {
                            let standardized = match case {
                                CaseStyle::Upper => text.to_uppercase(),
                                CaseStyle::Lower => text.to_lowercase(),
                            };
                            out.set(column.clone(), standardized);
                        }
                    }
                }
            }
            (!remove).then_some(out)
        })
        .collect();
    Dataset::new(input.schema().clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType, Schema};

    fn dataset(rows: Vec<Row>) -> Dataset {
        Dataset::new(
            Schema::new(vec![Column::new("v", ColumnType::Text)]),
            rows,
        )
    }

    #[test]
    fn test_remove_nulls_drops_rows() {
        let ds = dataset(vec![
            Row::from_pairs([("v", Value::from("keep"))]),
            Row::from_pairs([("v", Value::Null)]),
            Row::from_pairs([("v", Value::from(""))]),
        ]);
        let config = CleanConfig {
            operations: vec![CleanOp::RemoveNulls {
                column: "v".into(),
                action: NullAction::RemoveRow,
            }],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].get("v"), &Value::from("keep"));
    }

    #[test]
    fn test_fill_default() {
        let ds = dataset(vec![
            Row::from_pairs([("v", Value::Null)]),
            Row::from_pairs([("v", Value::from("set"))]),
        ]);
        let config = CleanConfig {
            operations: vec![CleanOp::RemoveNulls {
                column: "v".into(),
                action: NullAction::FillDefault { default: Value::from("n/a") },
            }],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0].get("v"), &Value::from("n/a"));
        assert_eq!(out.rows()[1].get("v"), &Value::from("set"));
    }

    #[test]
    fn test_trim_whitespace() {
        let ds = dataset(vec![Row::from_pairs([("v", Value::from("  padded  "))])]);
        let config = CleanConfig {
            operations: vec![CleanOp::TrimWhitespace { column: "v".into() }],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.rows()[0].get("v"), &Value::from("padded"));
    }

    #[test]
    fn test_trim_leaves_non_text_alone() {
        let ds = dataset(vec![Row::from_pairs([("v", Value::Number(3.0))])]);
        let config = CleanConfig {
            operations: vec![CleanOp::TrimWhitespace { column: "v".into() }],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.rows()[0].get("v"), &Value::Number(3.0));
    }

    #[test]
    fn test_standardize_case() {
        let ds = dataset(vec![Row::from_pairs([("v", Value::from("MiXeD"))])]);
        let upper = CleanConfig {
            operations: vec![CleanOp::StandardizeCase {
                column: "v".into(),
                case: CaseStyle::Upper,
            }],
        };
        assert_eq!(apply(&upper, &ds).rows()[0].get("v"), &Value::from("MIXED"));
        let lower = CleanConfig {
            operations: vec![CleanOp::StandardizeCase {
                column: "v".into(),
                case: CaseStyle::Lower,
            }],
        };
        assert_eq!(apply(&lower, &ds).rows()[0].get("v"), &Value::from("mixed"));
    }

    #[test]
    fn test_operations_apply_in_listed_order() {
        // Trimming first turns "  " into "", which the null removal then drops.
        let ds = dataset(vec![Row::from_pairs([("v", Value::from("  "))])]);
        let config = CleanConfig {
            operations: vec![
                CleanOp::TrimWhitespace { column: "v".into() },
                CleanOp::RemoveNulls {
                    column: "v".into(),
                    action: NullAction::RemoveRow,
                },
            ],
        };
        assert!(apply(&config, &ds).is_empty());

        // Reversed order: "  " is not nullish yet, so the row survives.
        let config = CleanConfig {
            operations: vec![
                CleanOp::RemoveNulls {
                    column: "v".into(),
                    action: NullAction::RemoveRow,
                },
                CleanOp::TrimWhitespace { column: "v".into() },
            ],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].get("v"), &Value::from(""));
    }

    #[test]
    fn test_remove_row_does_not_short_circuit() {
        // The case standardization still runs on a doomed row; the row is
        // only dropped at the end. Observable through a fill on another
        // column not being skipped.
        let schema = Schema::new(vec![
            Column::new("v", ColumnType::Text),
            Column::new("w", ColumnType::Text),
        ]);
        let ds = Dataset::new(
            schema,
            vec![
                Row::from_pairs([("v", Value::Null), ("w", Value::Null)]),
                Row::from_pairs([("v", Value::from("ok")), ("w", Value::Null)]),
            ],
        );
        let config = CleanConfig {
            operations: vec![
                CleanOp::RemoveNulls {
                    column: "v".into(),
                    action: NullAction::RemoveRow,
                },
                CleanOp::RemoveNulls {
                    column: "w".into(),
                    action: NullAction::FillDefault { default: Value::from("filled") },
                },
            ],
        };
        let out = apply(&config, &ds);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].get("w"), &Value::from("filled"));
    }

    #[test]
    fn test_empty_config_is_identity() {
        let ds = dataset(vec![Row::from_pairs([("v", Value::from("x"))])]);
        let out = apply(&CleanConfig::default(), &ds);
        assert_eq!(out, ds);
    }
}
