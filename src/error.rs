//! Error types for tabulon operations.
//!
//! Only configuration mistakes surface here: referencing a step that does
//! not exist, a chart spec missing a required axis, an expression or regex
//! that cannot be compiled. Malformed *data* never produces an error —
//! operators degrade per-row instead (see the crate docs on fail-soft
//! behavior).

use thiserror::Error;

use crate::expr::ExprError;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when configuring a session or deriving a chart.
#[derive(Error, Debug)]
pub enum Error {
    /// A step id was not found in the session.
    #[error("Step not found: {id}")]
    StepNotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// A chart id was not found in the session.
    #[error("Chart not found: {id}")]
    ChartNotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// A chart spec is structurally incomplete for its chart type.
    #[error("Invalid chart spec: {chart_type} chart requires {missing}")]
    InvalidChartSpec {
        /// The requested chart type.
        chart_type: String,
        /// The field that was missing.
        missing: String,
    },

    /// A calculated-field expression could not be parsed.
    #[error("Invalid expression {expression:?}: {source}")]
    InvalidExpression {
        /// The offending expression text.
        expression: String,
        /// The underlying parse failure.
        source: ExprError,
    },

    /// A validation rule's regex could not be compiled.
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// The underlying regex failure.
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_not_found_display() {
        let err = Error::StepNotFound { id: 42 };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_invalid_chart_spec_display() {
        let err = Error::InvalidChartSpec {
            chart_type: "scatter".into(),
            missing: "xAxis".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("scatter"));
        assert!(msg.contains("xAxis"));
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = Error::InvalidPattern {
            pattern: "(".into(),
            source,
        };
        assert!(err.to_string().contains("Invalid pattern"));
    }
}
