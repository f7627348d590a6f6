//! Core data model types for imports.
//!
//! Loaders produce a columnar [`Table`]: an ordered list of named [`Column`]s, each holding typed
//! [`Value`]s of a single [`DataType`], all of the same length.

use std::fmt;

/// Logical data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Utf8 => "utf8",
        };
        f.write_str(s)
    }
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// The data type of a non-null value; `None` for [`Value::Null`].
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Int64(_) => Some(DataType::Int64),
            Self::Float64(_) => Some(DataType::Float64),
            Self::Bool(_) => Some(DataType::Bool),
            Self::Utf8(_) => Some(DataType::Utf8),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A named, homogeneous column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (unique within a table once the importer has post-processed it).
    pub name: String,
    /// Type shared by every non-null value.
    pub data_type: DataType,
    /// Cell values, one per row.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of [`Value::Null`] cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// In-memory columnar table.
///
/// All columns have the same length (the row count). Column names can be replaced through
/// [`Table::rename_columns`]; nothing else about a table changes after construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from columns.
    ///
    /// # Panics
    ///
    /// Panics if the columns do not all have the same length.
    pub fn new(columns: Vec<Column>) -> Self {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for c in &columns {
                assert!(
                    c.len() == expected,
                    "column '{}' has {} values, expected {}",
                    c.name,
                    c.len(),
                    expected
                );
            }
        }
        Self { columns }
    }

    /// Number of rows (zero for a table without columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// First column with the given name, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_at(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    /// Values of row `idx` in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<&Value>> {
        if idx >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[idx]).collect())
    }

    /// Replace all column names, in order.
    ///
    /// # Panics
    ///
    /// Panics if `names.len()` differs from the column count.
    pub fn rename_columns(&mut self, names: Vec<String>) {
        assert!(
            names.len() == self.columns.len(),
            "rename_columns got {} names for {} columns",
            names.len(),
            self.columns.len()
        );
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name;
        }
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
