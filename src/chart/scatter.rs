//! Scatter chart data.

use serde::Serialize;

use crate::dataset::Dataset;

/// One numeric scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

/// Map rows to numeric `(x, y)` points in input order; a row where either
/// coordinate fails numeric coercion is dropped.
pub(super) fn derive(dataset: &Dataset, x_axis: &str, y_axis: &str) -> Vec<ScatterPoint> {
    dataset
        .rows()
        .iter()
        .filter_map(|row| {
            let x = row.get(x_axis).to_number()?;
            let y = row.get(y_axis).to_number()?;
            Some(ScatterPoint { x, y })
        })
        .collect()
}
