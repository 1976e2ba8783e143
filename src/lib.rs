//! # Tabulon
//!
//! In-memory tabular transformation pipeline and chart-data engine for
//! analytics dashboards.
//!
//! Tabulon is the analytical core of an ETL dashboard: an ordered,
//! individually-toggleable pipeline of data operators (filter, sort,
//! group+aggregate, calculated field, clean, validate) folded over an
//! uploaded dataset, plus a chart-data deriver that turns the (possibly
//! transformed) dataset into render-ready series for bar/pie/donut, line/
//! area, scatter, histogram, and correlation-heatmap views.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabulon::prelude::*;
//!
//! let schema = Schema::new(vec![
//!     Column::new("region", ColumnType::Text),
//!     Column::new("sales", ColumnType::Number),
//! ]);
//! let rows = vec![
//!     Row::from_pairs([("region", Value::from("north")), ("sales", Value::Number(10.0))]),
//!     Row::from_pairs([("region", Value::from("south")), ("sales", Value::Number(25.0))]),
//! ];
//!
//! let session = TransformSession::new(Dataset::new(schema, rows))
//!     .add_step_with(Transform::Filter(FilterConfig {
//!         column: "sales".into(),
//!         operator: FilterOperator::GreaterThan,
//!         value: Value::Number(5.0),
//!     }))?;
//! let id = session.steps()[0].id;
//! let session = session.toggle_step(id)?;
//!
//! let session = session.add_chart(
//!     ChartSpec::new(ChartType::Bar, "Sales by region").group_by("region"),
//! )?;
//! assert_eq!(session.charts().len(), 1);
//! # Ok::<(), tabulon::Error>(())
//! ```
//!
//! ## Design
//!
//! - **Fail-soft data path**: no operator errors on malformed data. Cells
//!   that fail coercion degrade locally — rows excluded or dropped, derived
//!   values nulled, findings attached — and the pipeline always runs to
//!   completion. Callers detect degenerate output (empty series, all-null
//!   columns), not exceptions.
//! - **Explicit recomputation**: a session command recomputes the derived
//!   dataset wholesale before returning. No memoization, no incremental
//!   diffing; bounded in-memory datasets only.
//! - **No dynamic code execution**: calculated fields go through a
//!   restricted arithmetic expression evaluator, never `eval`.
//!
//! Ingestion (file parsing, schema inference), rendering, export and
//! persistence are external collaborators: the engine consumes an
//! already-parsed [`dataset::Dataset`] and exposes only data.

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in numeric/analytics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

// ============================================================================
// Core Modules
// ============================================================================

/// Dynamically-typed cell values and coercion helpers.
pub mod value;

/// Column descriptors and dataset schemas.
pub mod schema;

/// Rows and datasets.
pub mod dataset;

/// Restricted arithmetic expression evaluator.
pub mod expr;

// ============================================================================
// Engine Modules
// ============================================================================

/// Transformation operators (filter, sort, group, calculate, clean,
/// validate).
pub mod transform;

/// Transformation sessions: ordered toggleable steps over one dataset.
pub mod session;

/// Chart data derivation (grouped, sequential, scatter, histogram,
/// heatmap) and Pearson correlation.
pub mod chart;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for tabulon operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient imports.
///
/// ```rust,ignore
/// use tabulon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chart::{
        derive_chart, ChartData, ChartResult, ChartSpec, ChartType, CorrelationMatrix,
        GroupSlice, HistogramBin, ScatterPoint, SeqPoint,
    };
    pub use crate::dataset::{Dataset, Row};
    pub use crate::error::{Error, Result};
    pub use crate::schema::{Column, ColumnType, Schema};
    pub use crate::session::{TransformSession, TransformStep};
    pub use crate::transform::{
        AggregateFn, Aggregation, CalculateConfig, CaseStyle, CleanConfig, CleanOp,
        FilterConfig, FilterOperator, GroupConfig, NullAction, SortConfig, SortDirection,
        Transform, TransformKind, ValidateConfig, ValidationRule,
    };
    pub use crate::value::Value;
}
