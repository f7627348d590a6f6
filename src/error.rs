use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Boxed lower-level failure kept as the cause of a [`ImportError::ParseError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type returned by the importer and by every loader.
///
/// Loaders never let a raw parser/I/O error escape: anything lower-level is wrapped into one of
/// these variants, with the original failure reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// The path does not refer to an existing file at call time.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// No loader is registered for the normalized extension.
    #[error("unsupported file type: '{extension}' ({})", path.display())]
    UnsupportedFormat { extension: String, path: PathBuf },

    /// The file content is not valid data for its format.
    #[error("failed to parse '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The file matches the format but uses a construct the loader cannot handle.
    #[error("unsupported feature in '{}': {feature}", path.display())]
    UnsupportedFeature { path: PathBuf, feature: String },
}

/// Classification of an [`ImportError`], for matching without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportErrorKind {
    NotFound,
    UnsupportedFormat,
    ParseError,
    UnsupportedFeature,
}

impl ImportErrorKind {
    /// Stable lowercase label (e.g. for log lines).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::UnsupportedFormat => "unsupported_format",
            Self::ParseError => "parse_error",
            Self::UnsupportedFeature => "unsupported_feature",
        }
    }
}

impl ImportError {
    /// Wrap a lower-level failure as a [`ImportError::ParseError`] for `path`.
    pub fn parse(path: impl AsRef<Path>, source: impl Into<BoxError>) -> Self {
        Self::ParseError {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    /// Build a [`ImportError::UnsupportedFeature`] for `path`.
    pub fn unsupported_feature(path: impl AsRef<Path>, feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            path: path.as_ref().to_path_buf(),
            feature: feature.into(),
        }
    }

    pub fn kind(&self) -> ImportErrorKind {
        match self {
            Self::NotFound { .. } => ImportErrorKind::NotFound,
            Self::UnsupportedFormat { .. } => ImportErrorKind::UnsupportedFormat,
            Self::ParseError { .. } => ImportErrorKind::ParseError,
            Self::UnsupportedFeature { .. } => ImportErrorKind::UnsupportedFeature,
        }
    }

    /// The source path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::UnsupportedFormat { path, .. }
            | Self::ParseError { path, .. }
            | Self::UnsupportedFeature { path, .. } => path,
        }
    }
}
