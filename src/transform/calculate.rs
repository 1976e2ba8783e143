//! Calculated (derived) fields.
//!
//! Expressions go through the restricted evaluator in [`crate::expr`];
//! they are never executed as code. Any per-row failure — a non-numeric
//! operand, division by zero, a non-finite result — nulls the derived
//! value for that row only. The row itself is always retained.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};
use crate::expr::{Expr, ExprError};
use crate::schema::{Column, ColumnType};
use crate::value::Value;

/// Configuration for a calculated-field step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculateConfig {
    /// Name of the derived column.
    pub new_column: String,
    /// Arithmetic expression over column names, e.g. `"price * quantity"`.
    pub expression: String,
    /// Columns the expression references, as recorded by the dashboard's
    /// step editor. Informational; evaluation resolves identifiers straight
    /// from the parsed expression.
    pub columns: Vec<String>,
}

pub(super) fn apply(config: &CalculateConfig, input: &Dataset) -> Dataset {
    let expr = Expr::parse(&config.expression).ok();
    if expr.is_none() {
        log::debug!(
            "calculate: expression {:?} failed to parse, derived column will be null",
            config.expression
        );
    }

    let rows: Vec<Row> = input
        .rows()
        .iter()
        .map(|row| {
            let mut out = row.clone();
            let derived = expr
                .as_ref()
                .map_or(Value::Null, |expr| evaluate_row(expr, row));
            out.set(config.new_column.clone(), derived);
            out
        })
        .collect();

    let mut schema = input.schema().clone();
    schema.upsert_column(Column::new(config.new_column.clone(), ColumnType::Number));
    Dataset::new(schema, rows)
}

/// Evaluate the expression for one row. Absent or nullish operands read as
/// zero; a present value that fails numeric coercion is an evaluation
/// failure and nulls the result.
fn evaluate_row(expr: &Expr, row: &Row) -> Value {
    match bind_row(expr, row).and_then(|bindings| expr.eval(&bindings)) {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Null,
    }
}

fn bind_row(expr: &Expr, row: &Row) -> Result<HashMap<String, f64>, ExprError> {
    let mut bindings = HashMap::with_capacity(expr.identifiers().len());
    for name in expr.identifiers() {
        let cell = row.get(name);
        let bound = if cell.is_nullish() {
            0.0
        } else {
            cell.to_number()
                .ok_or_else(|| ExprError::NonNumericOperand { column: name.clone() })?
        };
        bindings.insert(name.clone(), bound);
    }
    Ok(bindings)
}
