//! Column descriptors and dataset schemas.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free-form text.
    Text,
    /// Numeric values.
    Number,
    /// Calendar dates.
    Date,
    /// Booleans.
    Bool,
}

/// A named, typed column descriptor.
///
/// Supplied by the ingestion collaborator along with the parsed rows; the
/// engine never infers types from raw files itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name; rows key their values on this.
    pub name: String,
    /// Inferred type. Cells are not guaranteed to match it.
    pub column_type: ColumnType,
    /// Whether nulls were observed at ingestion.
    pub nullable: bool,
    /// Whether all observed values were distinct at ingestion.
    pub unique: bool,
    /// A few representative values captured at ingestion.
    pub sample_values: Vec<Value>,
}

impl Column {
    /// Create a column descriptor with no samples.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            unique: false,
            sample_values: Vec::new(),
        }
    }
}

/// An ordered sequence of columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Create a schema from ordered columns.
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// The columns, in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The inferred type of a column, if present.
    #[must_use]
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column(name).map(|c| c.column_type)
    }

    /// Whether a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Append a column, replacing any existing column of the same name.
    ///
    /// Used by operators that introduce derived columns (calculate, group,
    /// validate).
    pub fn upsert_column(&mut self, column: Column) {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == column.name) {
            *existing = column;
        } else {
            self.columns.push(column);
        }
    }
}
