//! Extension → loader lookup.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::delimited::DelimitedLoader;
use super::json::JsonLoader;
use super::loader::Loader;
use super::parquet::ParquetLoader;

/// Normalized extension of `path`: lowercase with a single leading dot (`"data.CSV"` → `".csv"`).
///
/// Returns an empty string when the path has no extension. Dotfiles such as `.bashrc` have none.
pub fn normalized_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
        None => String::new(),
    }
}

fn is_normalized(ext: &str) -> bool {
    ext.len() > 1
        && ext.starts_with('.')
        && !ext[1..].contains('.')
        && ext.chars().all(|c| !c.is_uppercase())
}

/// Mapping from normalized extension (e.g. `.csv`) to a [`Loader`].
///
/// Build it once at startup, then hand it by reference to an
/// [`super::orchestrator::Importer`]. Keys are case-sensitive; callers normalize before
/// registering, and the importer normalizes before resolving. Several extensions may share one
/// loader instance.
///
/// Once registration is done the registry is only read, so it can be shared across threads.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn Loader>>,
}

impl LoaderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock registry: `.csv`/`.tsv`, `.json`/`.ndjson`, `.parquet`/`.pq`.
    pub fn with_default_loaders() -> Self {
        let mut registry = Self::new();

        let delimited: Arc<dyn Loader> = Arc::new(DelimitedLoader::default());
        registry.register(".csv", Arc::clone(&delimited));
        registry.register(".tsv", delimited);

        let json: Arc<dyn Loader> = Arc::new(JsonLoader);
        registry.register(".json", Arc::clone(&json));
        registry.register(".ndjson", json);

        let parquet: Arc<dyn Loader> = Arc::new(ParquetLoader);
        registry.register(".parquet", Arc::clone(&parquet));
        registry.register(".pq", parquet);

        registry
    }

    /// Add or replace the loader for `extension`, returning the one it replaced.
    ///
    /// `extension` must already be normalized (lowercase, one leading dot).
    pub fn register(
        &mut self,
        extension: impl Into<String>,
        loader: Arc<dyn Loader>,
    ) -> Option<Arc<dyn Loader>> {
        let extension = extension.into();
        debug_assert!(
            is_normalized(&extension),
            "extension '{extension}' is not normalized (expected e.g. '.csv')"
        );
        self.loaders.insert(extension, loader)
    }

    /// Look up the loader for an already-normalized extension.
    pub fn resolve(&self, extension: &str) -> Option<Arc<dyn Loader>> {
        self.loaders.get(extension).cloned()
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.loaders.contains_key(extension)
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}
