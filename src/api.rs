//! Text/JSON boundary for front ends that only exchange strings.
//!
//! Every call returns JSON: the [`ImportReport`] on success, or `{"error": "<message>"}` on
//! failure. Nothing here panics or returns a Rust error.

use std::path::Path;

use serde_json::json;

use crate::ingestion::{ImportOptions, ImportReport, Importer, LoaderRegistry};

/// Front-end facing import API.
#[derive(Debug, Clone)]
pub struct Api {
    registry: LoaderRegistry,
    options: ImportOptions,
}

impl Default for Api {
    fn default() -> Self {
        Self::new(LoaderRegistry::with_default_loaders())
    }
}

impl Api {
    pub fn new(registry: LoaderRegistry) -> Self {
        Self::with_options(registry, ImportOptions::default())
    }

    pub fn with_options(registry: LoaderRegistry, options: ImportOptions) -> Self {
        Self { registry, options }
    }

    /// Import `path` and return the report (or the error) as a JSON value.
    ///
    /// Only metadata crosses the boundary; the table itself is dropped here.
    pub fn import_file_value(&self, path: &str) -> serde_json::Value {
        let importer = Importer::with_options(&self.registry, self.options.clone());
        match importer.load_table(Path::new(path)) {
            Ok((_table, report)) => report_value(&report),
            Err(e) => error_value(&e.to_string()),
        }
    }

    /// Import `path` and return the report (or the error) as JSON text.
    ///
    /// ```no_run
    /// use edamorph_core::api::Api;
    ///
    /// let api = Api::default();
    /// let json = api.import_file("data/people.csv");
    /// println!("{json}");
    /// ```
    pub fn import_file(&self, path: &str) -> String {
        self.import_file_value(path).to_string()
    }
}

/// The report's serde form: `{"format", "path", "rows", "cols", "notes"}`.
pub fn report_value(report: &ImportReport) -> serde_json::Value {
    serde_json::to_value(report).unwrap_or_else(|e| error_value(&e.to_string()))
}

/// Single-key error object.
pub fn error_value(message: &str) -> serde_json::Value {
    json!({ "error": message })
}
