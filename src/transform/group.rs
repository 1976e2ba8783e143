//! Group + aggregate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};
use crate::schema::{Column, ColumnType, Schema};
use crate::value::{GroupKey, Value};

/// Aggregate function over a partition's target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFn {
    /// Partition size (all members, regardless of nulls).
    #[default]
    Count,
    /// Sum of numeric-coercible members.
    Sum,
    /// Mean of numeric-coercible members.
    Avg,
    /// Minimum of numeric-coercible members.
    Min,
    /// Maximum of numeric-coercible members.
    Max,
}

impl AggregateFn {
    /// Output-column suffix, e.g. `sales_sum`.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// One requested aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Target column.
    pub column: String,
    /// Aggregate function.
    pub function: AggregateFn,
}

impl Aggregation {
    /// Name of the output column, `<column>_<function>`.
    #[must_use]
    pub fn output_column(&self) -> String {
        format!("{}_{}", self.column, self.function.suffix())
    }
}

/// Configuration for a group+aggregate step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Column whose exact value+type partitions the rows.
    pub group_by: String,
    /// Aggregations to compute per partition.
    pub aggregations: Vec<Aggregation>,
}

pub(super) fn apply(config: &GroupConfig, input: &Dataset) -> Dataset {
    // Partitions in first-appearance order: deterministic for a given input.
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut partitions: Vec<(Value, Vec<&Row>)> = Vec::new();
    for row in input.rows() {
        let cell = row.get(&config.group_by);
        let key = cell.group_key();
        match index.get(&key) {
            Some(&slot) => partitions[slot].1.push(row),
            None => {
                index.insert(key, partitions.len());
                partitions.push((cell.clone(), vec![row]));
            }
        }
    }

    let rows: Vec<Row> = partitions
        .into_iter()
        .map(|(key, members)| {
            let mut out = Row::new();
            out.set(config.group_by.clone(), key);
            out.set("count", Value::Number(members.len() as f64));
            for aggregation in &config.aggregations {
                let value = aggregate(aggregation, &members);
                out.set(aggregation.output_column(), value);
            }
            out
        })
        .collect();

    let mut schema = Schema::default();
    let group_column_type = input
        .schema()
        .column_type(&config.group_by)
        .unwrap_or(ColumnType::Text);
    schema.upsert_column(Column::new(config.group_by.clone(), group_column_type));
    schema.upsert_column(Column::new("count", ColumnType::Number));
    for aggregation in &config.aggregations {
        schema.upsert_column(Column::new(aggregation.output_column(), ColumnType::Number));
    }

    Dataset::new(schema, rows)
}

/// Compute one aggregate over a partition. Members that fail numeric
/// coercion are ignored; a partition with no valid members yields null.
fn aggregate(aggregation: &Aggregation, members: &[&Row]) -> Value {
    if aggregation.function == AggregateFn::Count {
        return Value::Number(members.len() as f64);
    }
    let values: Vec<f64> = members
        .iter()
        .filter_map(|row| row.get(&aggregation.column).to_number())
        .collect();
    if values.is_empty() {
        return Value::Null;
    }
    let result = match aggregation.function {
        AggregateFn::Count => members.len() as f64,
        AggregateFn::Sum => values.iter().sum(),
        AggregateFn::Avg => values.iter().sum::<f64>() / values.len() as f64,
        AggregateFn::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateFn::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };
    Value::Number(result)
}
