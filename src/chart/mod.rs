//! Chart data derivation.
//!
//! Turns a dataset (raw or transformed) plus a declarative [`ChartSpec`]
//! into render-ready series. Only data production lives here — drawing is
//! the rendering collaborator's job. A spec that is structurally incomplete
//! for its chart type (a grouped chart without `group_by`, a scatter
//! without axes) is a configuration [`Error`]; malformed *data* never
//! errors, it degrades (rows dropped, empty series).

pub mod correlation;
mod grouped;
mod heatmap;
mod histogram;
mod scatter;
mod sequential;

pub use grouped::GroupSlice;
pub use heatmap::{CorrelationMatrix, MAX_CORRELATION_COLUMNS};
pub use histogram::HistogramBin;
pub use scatter::ScatterPoint;
pub use sequential::SeqPoint;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::transform::AggregateFn;

/// The requested chart shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Grouped bars.
    Bar,
    /// Pie slices.
    Pie,
    /// Donut slices.
    Donut,
    /// Sequential line.
    Line,
    /// Sequential filled area.
    Area,
    /// X/Y point cloud.
    Scatter,
    /// Binned distribution of one numeric column.
    Histogram,
    /// Pairwise correlation matrix over numeric columns.
    Heatmap,
}

impl ChartType {
    /// Lowercase name used in error messages and serialized specs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Donut => "donut",
            Self::Line => "line",
            Self::Area => "area",
            Self::Scatter => "scatter",
            Self::Histogram => "histogram",
            Self::Heatmap => "heatmap",
        }
    }
}

/// Declarative chart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Requested shape.
    pub chart_type: ChartType,
    /// X-axis column (sequential, scatter, histogram).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    /// Y-axis column (sequential, scatter, grouped aggregates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    /// Partition column (grouped charts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    /// Aggregate for grouped charts; count when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregateFn>,
    /// Display title.
    pub title: String,
}

impl ChartSpec {
    /// Create a spec with only the chart type and title set.
    #[must_use]
    pub fn new(chart_type: ChartType, title: impl Into<String>) -> Self {
        Self {
            chart_type,
            x_axis: None,
            y_axis: None,
            group_by: None,
            aggregation: None,
            title: title.into(),
        }
    }

    /// Set the x-axis column.
    #[must_use]
    pub fn x_axis(mut self, column: impl Into<String>) -> Self {
        self.x_axis = Some(column.into());
        self
    }

    /// Set the y-axis column.
    #[must_use]
    pub fn y_axis(mut self, column: impl Into<String>) -> Self {
        self.y_axis = Some(column.into());
        self
    }

    /// Set the partition column.
    #[must_use]
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    /// Set the aggregate function.
    #[must_use]
    pub fn aggregation(mut self, aggregation: AggregateFn) -> Self {
        self.aggregation = Some(aggregation);
        self
    }
}

/// Render-ready chart data; shape depends on the chart type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartData {
    /// Labelled slices, sorted by value descending.
    Grouped(Vec<GroupSlice>),
    /// Points sorted ascending by x.
    Sequential(Vec<SeqPoint>),
    /// Numeric point cloud in input row order.
    Scatter(Vec<ScatterPoint>),
    /// Equal-width bins covering the value range.
    Histogram(Vec<HistogramBin>),
    /// Pairwise Pearson correlation matrix.
    Heatmap(CorrelationMatrix),
}

/// A derived chart: the spec echo plus its computed data.
///
/// Computed once at creation and never auto-refreshed; `source_revision`
/// records the session revision it was derived from so holders can detect
/// staleness after further pipeline edits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    /// Session-unique chart id.
    pub id: u64,
    /// Requested shape (echo of the spec).
    pub chart_type: ChartType,
    /// The computed series.
    pub data: ChartData,
    /// The spec this was derived from.
    pub spec: ChartSpec,
    /// Session revision of the dataset this was derived from.
    pub source_revision: u64,
}

impl ChartResult {
    /// Whether the source dataset has changed since this chart was derived.
    #[must_use]
    pub fn is_stale(&self, current_revision: u64) -> bool {
        self.source_revision != current_revision
    }
}

/// Derive chart data for a spec.
///
/// # Errors
///
/// Returns [`Error::InvalidChartSpec`] when the spec lacks a column the
/// chart type requires.
pub fn derive_chart(dataset: &Dataset, spec: &ChartSpec) -> Result<ChartData> {
    log::trace!(
        "deriving {} chart over {} rows",
        spec.chart_type.name(),
        dataset.len()
    );
    match spec.chart_type {
        ChartType::Bar | ChartType::Pie | ChartType::Donut => {
            let group_by = require(spec, &spec.group_by, "groupBy")?;
            Ok(ChartData::Grouped(grouped::derive(
                dataset,
                group_by,
                spec.y_axis.as_deref(),
                spec.aggregation,
            )))
        }
        ChartType::Line | ChartType::Area => {
            let x = require(spec, &spec.x_axis, "xAxis")?;
            let y = require(spec, &spec.y_axis, "yAxis")?;
            Ok(ChartData::Sequential(sequential::derive(dataset, x, y)))
        }
        ChartType::Scatter => {
            let x = require(spec, &spec.x_axis, "xAxis")?;
            let y = require(spec, &spec.y_axis, "yAxis")?;
            Ok(ChartData::Scatter(scatter::derive(dataset, x, y)))
        }
        ChartType::Histogram => {
            let x = require(spec, &spec.x_axis, "xAxis")?;
            Ok(ChartData::Histogram(histogram::derive(dataset, x)))
        }
        ChartType::Heatmap => Ok(ChartData::Heatmap(heatmap::derive(dataset))),
    }
}

fn require<'a>(spec: &ChartSpec, field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InvalidChartSpec {
            chart_type: spec.chart_type.name().into(),
            missing: name.into(),
        })
}
