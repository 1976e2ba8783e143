//! Grouped chart data (bar, pie, donut).

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::{Dataset, Row};
use crate::transform::AggregateFn;
use crate::value::GroupKey;

/// One labelled slice of a grouped chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSlice {
    /// Display label of the partition key.
    pub label: String,
    /// Slice value: partition size, or the aggregate over the y column.
    pub value: f64,
}

/// Partition rows by exact value+type on `group_by` and compute one slice
/// per partition, sorted by value descending. When the aggregation is count
/// or unset the slice value is the partition size; otherwise it aggregates
/// the y column's numeric-coercible members (a partition with none yields
/// zero rather than dropping the slice).
pub(super) fn derive(
    dataset: &Dataset,
    group_by: &str,
    y_axis: Option<&str>,
    aggregation: Option<AggregateFn>,
) -> Vec<GroupSlice> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut partitions: Vec<(String, Vec<&Row>)> = Vec::new();
    for row in dataset.rows() {
        let cell = row.get(group_by);
        let key = cell.group_key();
        match index.get(&key) {
            Some(&slot) => partitions[slot].1.push(row),
            None => {
                index.insert(key, partitions.len());
                partitions.push((cell.to_display_string(), vec![row]));
            }
        }
    }

    let mut slices: Vec<GroupSlice> = partitions
        .into_iter()
        .map(|(label, members)| GroupSlice {
            label,
            value: slice_value(&members, y_axis, aggregation),
        })
        .collect();
    // Stable sort: ties keep first-appearance order.
    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    slices
}

fn slice_value(members: &[&Row], y_axis: Option<&str>, aggregation: Option<AggregateFn>) -> f64 {
    let function = aggregation.unwrap_or(AggregateFn::Count);
    if function == AggregateFn::Count {
        return members.len() as f64;
    }
    let Some(y_axis) = y_axis else {
        return members.len() as f64;
    };
    let values: Vec<f64> = members
        .iter()
        .filter_map(|row| row.get(y_axis).to_number())
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    match function {
        AggregateFn::Count => members.len() as f64,
        AggregateFn::Sum => values.iter().sum(),
        AggregateFn::Avg => values.iter().sum::<f64>() / values.len() as f64,
        AggregateFn::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateFn::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}
