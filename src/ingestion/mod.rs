//! Import entrypoints and loader implementations.
//!
//! Most callers should use [`Importer::load_table`] (or the one-off [`load_table`] shorthand), which:
//!
//! - picks a [`Loader`] from a [`LoaderRegistry`] by normalized file extension
//! - runs it to get a [`crate::types::Table`] plus an [`ImportReport`]
//! - guarantees unique column names before returning
//! - optionally reports success/failure/alerts to an [`ImportObserver`]
//!
//! Format loaders:
//! - [`delimited`]: `.csv`, `.tsv`
//! - [`json`]: `.json`, `.ndjson`
//! - [`parquet`]: `.parquet`, `.pq`
//!
//! ## Adding a format
//!
//! Implement [`Loader`] (or write a plain function with the same signature) and register it
//! under each normalized extension it handles:
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use edamorph_core::ingestion::{ImportReport, Importer, Loader, LoaderRegistry};
//! use edamorph_core::types::Table;
//! use edamorph_core::{ImportError, ImportResult};
//!
//! struct XyzLoader;
//!
//! impl Loader for XyzLoader {
//!     fn load(&self, path: &Path) -> ImportResult<(Table, ImportReport)> {
//!         Err(ImportError::unsupported_feature(path, "xyz is not implemented yet"))
//!     }
//! }
//!
//! let mut registry = LoaderRegistry::with_default_loaders();
//! registry.register(".xyz", Arc::new(XyzLoader));
//! let _ = Importer::new(&registry).load_table("file.xyz");
//! ```

pub mod delimited;
pub mod json;
mod loader;
pub mod observability;
mod orchestrator;
pub mod parquet;
mod registry;
mod report;

pub use delimited::{DelimitedLoader, DelimitedOptions};
pub use json::JsonLoader;
pub use loader::Loader;
pub use observability::{
    FileObserver, ImportContext, ImportObserver, ImportSeverity, ImportStats, StdErrObserver,
};
pub use orchestrator::{dedup_column_names, load_table, ImportOptions, Importer, DEDUP_NOTE};
pub use parquet::ParquetLoader;
pub use registry::{normalized_extension, LoaderRegistry};
pub use report::ImportReport;
