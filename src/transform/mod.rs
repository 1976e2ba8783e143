//! Transformation operators.
//!
//! Six pure operators, each `(Dataset, Config) -> Dataset`: filter, sort,
//! group+aggregate, calculated field, clean, validate. All of them are
//! fail-soft on data — malformed cells degrade per-row (excluded, nulled,
//! or flagged) and never abort the pipeline. Configuration mistakes (a bad
//! expression, an uncompilable regex) are caught up front by
//! [`Transform::validate_config`].

mod calculate;
mod clean;
mod filter;
mod group;
mod sort;
mod validate;

pub use calculate::CalculateConfig;
pub use clean::{CaseStyle, CleanConfig, CleanOp, NullAction};
pub use filter::{FilterConfig, FilterOperator};
pub use group::{AggregateFn, Aggregation, GroupConfig};
pub use sort::{SortConfig, SortDirection};
pub use validate::{ValidateConfig, ValidationRule, VALIDATION_ERRORS_COLUMN};

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::schema::Schema;

/// The kind of a transformation, without its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Keep rows matching a predicate.
    Filter,
    /// Stable sort by one column.
    Sort,
    /// Partition by one column and aggregate.
    Group,
    /// Derive a new column from an arithmetic expression.
    Calculate,
    /// Null handling, whitespace trimming, case standardization.
    Clean,
    /// Advisory rule checking.
    Validate,
}

impl TransformKind {
    /// Human-readable name, as the dashboard displays it.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Filter => "Filter",
            Self::Sort => "Sort",
            Self::Group => "Group & Aggregate",
            Self::Calculate => "Calculated Field",
            Self::Clean => "Clean",
            Self::Validate => "Validate",
        }
    }
}

/// A configured transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum Transform {
    /// Keep rows matching a predicate.
    Filter(FilterConfig),
    /// Stable sort by one column.
    Sort(SortConfig),
    /// Partition by one column and aggregate.
    Group(GroupConfig),
    /// Derive a new column from an arithmetic expression.
    Calculate(CalculateConfig),
    /// Null handling, whitespace trimming, case standardization.
    Clean(CleanConfig),
    /// Advisory rule checking.
    Validate(ValidateConfig),
}

impl Transform {
    /// The kind of this transform.
    #[must_use]
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Filter(_) => TransformKind::Filter,
            Self::Sort(_) => TransformKind::Sort,
            Self::Group(_) => TransformKind::Group,
            Self::Calculate(_) => TransformKind::Calculate,
            Self::Clean(_) => TransformKind::Clean,
            Self::Validate(_) => TransformKind::Validate,
        }
    }

    /// A type-default configuration, seeded from the schema where a column
    /// reference is needed (newly added steps pre-populate the edit form).
    #[must_use]
    pub fn default_for(kind: TransformKind, schema: &Schema) -> Self {
        let first_column = schema
            .columns()
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        match kind {
            TransformKind::Filter => Self::Filter(FilterConfig {
                column: first_column,
                ..FilterConfig::default()
            }),
            TransformKind::Sort => Self::Sort(SortConfig {
                column: first_column,
                ..SortConfig::default()
            }),
            TransformKind::Group => Self::Group(GroupConfig {
                group_by: first_column,
                ..GroupConfig::default()
            }),
            TransformKind::Calculate => Self::Calculate(CalculateConfig::default()),
            TransformKind::Clean => Self::Clean(CleanConfig::default()),
            TransformKind::Validate => Self::Validate(ValidateConfig::default()),
        }
    }

    /// Check the configuration for mistakes the data path would otherwise
    /// silently degrade on: an unparseable expression or an uncompilable
    /// regex.
    ///
    /// # Errors
    ///
    /// Returns an error describing the offending expression or pattern.
    pub fn validate_config(&self) -> Result<()> {
        match self {
            Self::Calculate(config) => {
                Expr::parse(&config.expression).map_err(|source| Error::InvalidExpression {
                    expression: config.expression.clone(),
                    source,
                })?;
                Ok(())
            }
            Self::Validate(config) => {
                for rule in &config.rules {
                    if let ValidationRule::Pattern { pattern, .. } = rule {
                        regex::Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                            pattern: pattern.clone(),
                            source,
                        })?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Apply this transform to a dataset, producing a new dataset.
    #[must_use]
    pub fn apply(&self, input: &Dataset) -> Dataset {
        log::debug!(
            "applying {} to {} rows",
            self.kind().display_name(),
            input.len()
        );
        match self {
            Self::Filter(config) => filter::apply(config, input),
            Self::Sort(config) => sort::apply(config, input),
            Self::Group(config) => group::apply(config, input),
            Self::Calculate(config) => calculate::apply(config, input),
            Self::Clean(config) => clean::apply(config, input),
            Self::Validate(config) => validate::apply(config, input),
        }
    }
}
