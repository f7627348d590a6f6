//! Import metadata returned alongside every [`crate::types::Table`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Table;

/// Structured metadata describing how a file was imported.
///
/// Serializes to a flat object with the keys `format`, `path`, `rows`, `cols` and `notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Short lowercase label for the handled format (`"csv"`, `"tsv"`, `"parquet"`, ...).
    pub format: String,
    /// Source path as a string.
    pub path: String,
    /// Row count. A loader that cannot cheaply count rows may report `0`.
    pub rows: usize,
    /// Column count; always equal to the table's column count once the importer returns.
    pub cols: usize,
    /// Free-form details about the import, in the order they happened.
    pub notes: Vec<String>,
}

impl ImportReport {
    /// Create a report whose `rows`/`cols` are taken from `table`.
    pub fn new(format: impl Into<String>, path: &Path, table: &Table) -> Self {
        Self {
            format: format.into(),
            path: path.display().to_string(),
            rows: table.row_count(),
            cols: table.column_count(),
            notes: Vec::new(),
        }
    }

    /// Builder-style variant of [`Self::push_note`].
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.push_note(note);
        self
    }

    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}
