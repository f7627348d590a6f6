//! `edamorph-core` loads a file into an in-memory [`types::Table`] by dispatching on its
//! extension to a pluggable, format-specific loader, and describes the import with an
//! [`ingestion::ImportReport`].
//!
//! The primary entrypoint is [`ingestion::Importer::load_table`], which borrows a
//! [`ingestion::LoaderRegistry`] built once at startup.
//!
//! ## What you can import
//!
//! **File formats (selected by extension, case-insensitive):**
//!
//! - **CSV / TSV**: `.csv` (comma), `.tsv` (tab); the first row is the header
//! - **JSON**: `.json` (object or array of objects) and `.ndjson` (one object per line)
//! - **Parquet**: `.parquet`, `.pq` (flat schemas)
//!
//! Column types are inferred per loader as [`types::DataType::Int64`],
//! [`types::DataType::Float64`], [`types::DataType::Bool`] or [`types::DataType::Utf8`]; empty
//! cells and explicit nulls become [`types::Value::Null`].
//!
//! Whatever loader runs, the returned table has unique column names: repeats are renamed
//! `name_1`, `name_2`, ... and the report gets a `"deduped column names"` note.
//!
//! ## Quick example
//!
//! ```no_run
//! use edamorph_core::ingestion::{Importer, LoaderRegistry};
//!
//! # fn main() -> Result<(), edamorph_core::ImportError> {
//! let registry = LoaderRegistry::with_default_loaders();
//! let (table, report) = Importer::new(&registry).load_table("data.tsv")?;
//! assert_eq!(report.format, "tsv");
//! println!("rows={} cols={:?}", table.row_count(), table.column_names());
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every failure is an [`ImportError`] of one kind ([`ImportErrorKind`]): `NotFound`,
//! `UnsupportedFormat`, `ParseError` (with the underlying cause as its source) or
//! `UnsupportedFeature`. Front ends that only speak text can use [`api::Api`], which turns
//! errors into `{"error": "..."}`.
//!
//! ## Modules
//!
//! - [`ingestion`]: importer, registry, loader contract and the stock loaders
//! - [`types`]: table/column/value types
//! - [`api`]: JSON boundary for front ends
//! - [`error`]: error types

pub mod api;
pub mod error;
pub mod ingestion;
pub mod types;

pub use error::{ImportError, ImportErrorKind, ImportResult};
