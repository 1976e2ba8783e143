//! Correlation heatmap data.

use serde::Serialize;

use super::correlation::pearson_columns;
use crate::dataset::Dataset;
use crate::schema::ColumnType;

/// Heatmaps are bounded to the first few numeric columns; pairwise
/// correlation over wide tables is quadratic.
pub const MAX_CORRELATION_COLUMNS: usize = 5;

/// Pairwise Pearson correlation matrix, row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// The numeric columns included, in schema order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation between `columns[i]` and
    /// `columns[j]`; the diagonal is exactly 1.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Matrix dimension (number of included columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no numeric columns were available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Correlate the first [`MAX_CORRELATION_COLUMNS`] schema-numeric columns.
/// Self-pairs are fixed at 1; off-diagonal cells come from
/// [`pearson_columns`] and are mirrored, so the matrix is symmetric by
/// construction.
pub(super) fn derive(dataset: &Dataset) -> CorrelationMatrix {
    let columns: Vec<String> = dataset
        .schema()
        .columns()
        .iter()
        .filter(|c| c.column_type == ColumnType::Number)
        .take(MAX_CORRELATION_COLUMNS)
        .map(|c| c.name.clone())
        .collect();

    let n = columns.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson_columns(dataset, &columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { columns, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::schema::{Column, Schema};
    use crate::value::Value;
    use approx::assert_relative_eq;

    fn dataset() -> Dataset {
        let schema = Schema::new(vec![
            Column::new("label", ColumnType::Text),
            Column::new("a", ColumnType::Number),
            Column::new("b", ColumnType::Number),
            Column::new("c", ColumnType::Number),
        ]);
        let rows = (1..=4)
            .map(|i| {
                let x = f64::from(i);
                Row::from_pairs([
                    ("a", Value::Number(x)),
                    ("b", Value::Number(2.0 * x)),
                    ("c", Value::Number(5.0 - x)),
                ])
            })
            .collect();
        Dataset::new(schema, rows)
    }

    #[test]
    fn test_only_numeric_columns_included() {
        let matrix = derive(&dataset());
        assert_eq!(matrix.columns, vec!["a", "b", "c"]);
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_diagonal_is_one() {
        let matrix = derive(&dataset());
        for i in 0..matrix.len() {
            assert_eq!(matrix.values[i][i], 1.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let matrix = derive(&dataset());
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
    }

    #[test]
    fn test_known_correlations() {
        let matrix = derive(&dataset());
        // b = 2a: perfectly positive. c = 5 - a: perfectly negative.
        assert_relative_eq!(matrix.values[0][1], 1.0);
        assert_relative_eq!(matrix.values[0][2], -1.0);
    }

    #[test]
    fn test_capped_at_five_columns() {
        let columns: Vec<Column> = (0..8)
            .map(|i| Column::new(format!("c{i}"), ColumnType::Number))
            .collect();
        let ds = Dataset::new(Schema::new(columns), Vec::new());
        let matrix = derive(&ds);
        assert_eq!(matrix.len(), MAX_CORRELATION_COLUMNS);
        assert_eq!(matrix.columns[0], "c0");
    }

    #[test]
    fn test_no_numeric_columns() {
        let ds = Dataset::new(
            Schema::new(vec![Column::new("label", ColumnType::Text)]),
            vec![Row::from_pairs([("label", Value::from("x"))])],
        );
        let matrix = derive(&ds);
        assert!(matrix.is_empty());
        assert!(matrix.values.is_empty());
    }

    #[test]
    fn test_degenerate_pairs_are_zero_off_diagonal() {
        let schema = Schema::new(vec![
            Column::new("a", ColumnType::Number),
            Column::new("b", ColumnType::Number),
        ]);
        // "b" never coerces, so every pair is dropped.
        let rows = vec![
            Row::from_pairs([("a", Value::Number(1.0)), ("b", Value::from("x"))]),
            Row::from_pairs([("a", Value::Number(2.0)), ("b", Value::from("y"))]),
        ];
        let matrix = derive(&Dataset::new(schema, rows));
        assert_eq!(matrix.values[0][1], 0.0);
        assert_eq!(matrix.values[0][0], 1.0);
        assert_eq!(matrix.values[1][1], 1.0);
    }
}
