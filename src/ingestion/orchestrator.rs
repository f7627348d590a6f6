//! Import orchestrator: the single entry point tying validation, dispatch and post-processing
//! together.
//!
//! [`Importer::load_table`]:
//!
//! 1. checks that the path is an existing file ([`ImportError::NotFound`] otherwise)
//! 2. resolves a loader from the normalized extension ([`ImportError::UnsupportedFormat`])
//! 3. runs the loader; its errors are returned unchanged
//! 4. makes column names unique (see [`dedup_column_names`]) and refreshes `report.cols`
//!
//! Each call is independent; the only shared input is the borrowed [`LoaderRegistry`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::types::Table;

use super::observability::{ImportContext, ImportObserver, ImportSeverity, ImportStats};
use super::registry::{normalized_extension, LoaderRegistry};
use super::report::ImportReport;

/// Note appended to the report when the dedup step renamed at least one column.
pub const DEDUP_NOTE: &str = "deduped column names";

/// Options controlling importer behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// Dispatches imports through a [`LoaderRegistry`].
#[derive(Debug, Clone)]
pub struct Importer<'r> {
    registry: &'r LoaderRegistry,
    options: ImportOptions,
}

impl<'r> Importer<'r> {
    pub fn new(registry: &'r LoaderRegistry) -> Self {
        Self::with_options(registry, ImportOptions::default())
    }

    pub fn with_options(registry: &'r LoaderRegistry, options: ImportOptions) -> Self {
        Self { registry, options }
    }

    /// The registry this importer dispatches through.
    pub fn registry(&self) -> &'r LoaderRegistry {
        self.registry
    }

    /// Import `path` into a [`Table`] plus its [`ImportReport`].
    ///
    /// When an observer is configured, this reports:
    ///
    /// - `on_success` on success, with row/column counts and the number of renamed columns
    /// - `on_failure` on failure, with a computed severity
    /// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use edamorph_core::ingestion::{Importer, LoaderRegistry};
    ///
    /// # fn main() -> Result<(), edamorph_core::ImportError> {
    /// let registry = LoaderRegistry::with_default_loaders();
    /// let importer = Importer::new(&registry);
    ///
    /// let (table, report) = importer.load_table("people.csv")?;
    /// assert_eq!(report.cols, table.column_count());
    /// println!("{} rows from {}", report.rows, report.path);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_table(&self, path: impl AsRef<Path>) -> ImportResult<(Table, ImportReport)> {
        let path = path.as_ref();
        let ctx = ImportContext {
            path: path.to_path_buf(),
            extension: normalized_extension(path),
        };

        let result = self.dispatch(path, &ctx.extension);

        if let Some(obs) = self.options.observer.as_ref() {
            match &result {
                Ok((table, _, renamed_columns)) => obs.on_success(
                    &ctx,
                    ImportStats {
                        rows: table.row_count(),
                        cols: table.column_count(),
                        renamed_columns: *renamed_columns,
                    },
                ),
                Err(e) => {
                    let sev = ImportSeverity::for_error(e);
                    obs.on_failure(&ctx, sev, e);
                    if sev >= self.options.alert_at_or_above {
                        obs.on_alert(&ctx, sev, e);
                    }
                }
            }
        }

        result.map(|(table, report, _)| (table, report))
    }

    fn dispatch(
        &self,
        path: &Path,
        extension: &str,
    ) -> ImportResult<(Table, ImportReport, usize)> {
        if !path.is_file() {
            return Err(ImportError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let loader = self
            .registry
            .resolve(extension)
            .ok_or_else(|| ImportError::UnsupportedFormat {
                extension: extension.to_string(),
                path: path.to_path_buf(),
            })?;

        let (mut table, mut report) = loader.load(path)?;

        let renamed = dedup_table_columns(&mut table);
        if renamed > 0 {
            report.push_note(DEDUP_NOTE);
        }
        report.cols = table.column_count();

        Ok((table, report, renamed))
    }
}

/// One-off import of `path` with the stock loaders and default options.
///
/// Each call builds a fresh [`LoaderRegistry::with_default_loaders`] and drops it afterwards.
/// Code that imports more than one file, registers its own loaders or wants an observer should
/// build the registry once and go through [`Importer`] (or [`crate::api::Api`], which owns one).
///
/// ```no_run
/// let (table, report) = edamorph_core::ingestion::load_table("data/people.csv")?;
/// println!("{} rows from {}", table.row_count(), report.path);
/// # Ok::<(), edamorph_core::ImportError>(())
/// ```
pub fn load_table(path: impl AsRef<Path>) -> ImportResult<(Table, ImportReport)> {
    let registry = LoaderRegistry::with_default_loaders();
    Importer::new(&registry).load_table(path)
}

/// Rename duplicate column names in place; returns how many columns were renamed.
fn dedup_table_columns(table: &mut Table) -> usize {
    let names = table.column_names();
    let Some(unique) = dedup_column_names(&names) else {
        return 0;
    };
    let renamed = names.iter().zip(&unique).filter(|(a, b)| **a != b.as_str()).count();
    table.rename_columns(unique);
    renamed
}

/// Make column names unique, or return `None` if they already are.
///
/// Left to right, the first occurrence of a name is kept; the k-th repeat (k ≥ 1) becomes
/// `"<name>_<k>"`, with `k` counted per original name. If that candidate is already one of the
/// input names (or was produced earlier), `k` keeps increasing until the name is free.
///
/// ```
/// use edamorph_core::ingestion::dedup_column_names;
///
/// let out = dedup_column_names(&["a", "b", "a", "a", "c", "b"]).unwrap();
/// assert_eq!(out, ["a", "b", "a_1", "a_2", "c", "b_1"]);
/// assert!(dedup_column_names(&out).is_none());
/// ```
pub fn dedup_column_names<S: AsRef<str>>(names: &[S]) -> Option<Vec<String>> {
    let originals: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
    if originals.len() == names.len() {
        return None;
    }

    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let k = next_suffix.entry(name).or_insert(0);
        let unique = if *k == 0 {
            *k = 1;
            name.to_string()
        } else {
            loop {
                let candidate = format!("{name}_{k}");
                *k += 1;
                if !originals.contains(candidate.as_str()) && !used.contains(&candidate) {
                    break candidate;
                }
            }
        };
        used.insert(unique.clone());
        out.push(unique);
    }

    Some(out)
}
