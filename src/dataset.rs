//! Rows and datasets.
//!
//! A [`Dataset`] is an ordered sequence of [`Row`]s plus a [`Schema`],
//! treated as immutable once ingested. Operators produce new datasets
//! rather than mutating their input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;
use crate::value::Value;

/// A single row: a mapping from column name to value.
///
/// Reads of absent columns yield [`Value::Null`], so a structural gap
/// (a column referenced by an operator but missing from the row) degrades
/// instead of aborting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    const NULL: Value = Value::Null;

    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from name/value pairs.
    #[must_use]
    pub fn from_pairs<N, V, I>(pairs: I) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        Self {
            values: pairs.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }

    /// Get a value by column name; absent columns read as null.
    #[must_use]
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&Self::NULL)
    }

    /// Whether the row has an entry for a column (even a null one).
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Set a value, replacing any existing entry.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Iterate over (name, value) entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// An immutable in-memory table: ordered rows plus a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    schema: Schema,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset, enforcing the row/schema invariant.
    ///
    /// Every row is padded with explicit nulls for schema columns it lacks,
    /// so downstream operators can assume an entry per column.
    #[must_use]
    pub fn new(schema: Schema, mut rows: Vec<Row>) -> Self {
        for row in &mut rows {
            for column in schema.columns() {
                if !row.contains(&column.name) {
                    row.set(column.name.clone(), Value::Null);
                }
            }
        }
        Self { schema, rows }
    }

    /// The schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The rows, in order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over one column's values in row order.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType};

    fn schema_ab() -> Schema {
        Schema::new(vec![
            Column::new("a", ColumnType::Number),
            Column::new("b", ColumnType::Text),
        ])
    }

    #[test]
    fn test_row_absent_reads_null() {
        let row = Row::from_pairs([("a", 1.0)]);
        assert_eq!(row.get("missing"), &Value::Null);
        assert!(!row.contains("missing"));
    }

    #[test]
    fn test_row_set_and_get() {
        let mut row = Row::new();
        row.set("a", 2.5);
        assert_eq!(row.get("a"), &Value::Number(2.5));
        row.set("a", "replaced");
        assert_eq!(row.get("a"), &Value::Text("replaced".into()));
    }

    #[test]
    fn test_dataset_pads_missing_entries() {
        let rows = vec![Row::from_pairs([("a", 1.0)])];
        let ds = Dataset::new(schema_ab(), rows);
        let row = &ds.rows()[0];
        assert!(row.contains("b"));
        assert_eq!(row.get("b"), &Value::Null);
    }

    #[test]
    fn test_dataset_row_order_preserved() {
        let rows = vec![
            Row::from_pairs([("a", 1.0)]),
            Row::from_pairs([("a", 2.0)]),
            Row::from_pairs([("a", 3.0)]),
        ];
        let ds = Dataset::new(schema_ab(), rows);
        let values: Vec<f64> = ds
            .column_values("a")
            .filter_map(Value::as_number)
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::new(schema_ab(), Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.len(), 0);
    }

    #[test]
    fn test_row_from_iterator() {
        let row: Row = vec![("x", 1.0), ("y", 2.0)].into_iter().collect();
        assert_eq!(row.len(), 2);
    }
}
