//! The contract every format loader implements.

use std::path::Path;

use crate::error::ImportResult;
use crate::types::Table;

use super::report::ImportReport;

/// A format-specific loader: path in, `(Table, ImportReport)` out.
///
/// The importer has already checked that `path` is an existing file before calling
/// [`Loader::load`]; a loader may still fail on permissions or content. Any failure must be one
/// of the classified [`crate::ImportError`] variants (use [`crate::ImportError::parse`] to wrap
/// lower-level errors). Loaders only read the file: no caching, no global state.
///
/// On success the report's `rows`/`cols` must match the returned table.
///
/// Plain functions and closures with the matching signature are loaders too:
///
/// ```
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use edamorph_core::ingestion::{ImportReport, LoaderRegistry};
/// use edamorph_core::types::Table;
/// use edamorph_core::ImportResult;
///
/// fn load_nothing(path: &Path) -> ImportResult<(Table, ImportReport)> {
///     let table = Table::default();
///     let report = ImportReport::new("nothing", path, &table);
///     Ok((table, report))
/// }
///
/// let mut registry = LoaderRegistry::new();
/// registry.register(".nothing", Arc::new(load_nothing));
/// assert!(registry.contains(".nothing"));
/// ```
pub trait Loader: Send + Sync {
    /// Read `path` completely into a table.
    fn load(&self, path: &Path) -> ImportResult<(Table, ImportReport)>;
}

impl<F> Loader for F
where
    F: Fn(&Path) -> ImportResult<(Table, ImportReport)> + Send + Sync,
{
    fn load(&self, path: &Path) -> ImportResult<(Table, ImportReport)> {
        self(path)
    }
}
