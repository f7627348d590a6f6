//! Observer hooks for import outcomes (logging and alerting).

use std::error::Error as StdError;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImportError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (e.g. a construct the loader does not support).
    Warning,
    /// Error-level event (the import failed).
    Error,
    /// Critical error (missing file or underlying I/O failure).
    Critical,
}

impl ImportSeverity {
    /// Severity policy for a failed import.
    pub fn for_error(e: &ImportError) -> Self {
        match e {
            ImportError::NotFound { .. } => Self::Critical,
            ImportError::UnsupportedFormat { .. } => Self::Error,
            ImportError::ParseError { source, .. } => {
                if error_chain_contains_io(source.as_ref()) {
                    Self::Critical
                } else {
                    Self::Error
                }
            }
            ImportError::UnsupportedFeature { .. } => Self::Warning,
        }
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        if let Some(csv_err) = err.downcast_ref::<csv::Error>() {
            if matches!(csv_err.kind(), csv::ErrorKind::Io(_)) {
                return true;
            }
        }
        cur = err.source();
    }
    false
}

/// Context about an import attempt.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// The path passed to the importer.
    pub path: PathBuf,
    /// Normalized extension used for dispatch (empty if the path has none).
    pub extension: String,
}

/// Stats reported on a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub rows: usize,
    pub cols: usize,
    /// Columns renamed by the dedup step.
    pub renamed_columns: usize,
}

/// Observer interface for import outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. Observers only watch; they cannot
/// change the result returned to the caller.
pub trait ImportObserver: Send + Sync {
    /// Called when an import succeeds.
    fn on_success(&self, _ctx: &ImportContext, _stats: ImportStats) {}

    /// Called when an import fails.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// A list of observers is itself an observer: every callback reaches each entry in order.
impl ImportObserver for Vec<Arc<dyn ImportObserver>> {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        self.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// One observer callback, rendered as a single `key=value` log line.
enum ImportEvent<'a> {
    Ok(&'a ImportContext, ImportStats),
    Fail(&'a ImportContext, ImportSeverity, &'a ImportError),
    Alert(&'a ImportContext, ImportSeverity, &'a ImportError),
}

impl fmt::Display for ImportEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, ctx, severity, error) = match *self {
            ImportEvent::Ok(ctx, stats) => {
                return write!(
                    f,
                    "ok ext={} path={} rows={} cols={} renamed={}",
                    ctx.extension,
                    ctx.path.display(),
                    stats.rows,
                    stats.cols,
                    stats.renamed_columns
                );
            }
            ImportEvent::Fail(ctx, severity, error) => ("fail", ctx, severity, error),
            ImportEvent::Alert(ctx, severity, error) => ("ALERT", ctx, severity, error),
        };
        write!(
            f,
            "{label} severity={severity:?} kind={} ext={} path={} err={error}",
            error.kind().as_str(),
            ctx.extension,
            ctx.path.display(),
        )
    }
}

/// Logs import events to stderr, one `[import] ...` line per callback.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ImportObserver for StdErrObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        eprintln!("[import] {}", ImportEvent::Ok(ctx, stats));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!("[import] {}", ImportEvent::Fail(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!("[import] {}", ImportEvent::Alert(ctx, severity, error));
    }
}

/// Appends timestamped import events to a log file.
///
/// The file is opened in append mode on the first event and the handle is kept for later ones.
/// Logging is best-effort: open or write failures are dropped and never reach the importer.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, event: ImportEvent<'_>) {
        let Ok(mut slot) = self.file.lock() else {
            return;
        };
        if slot.is_none() {
            *slot = OpenOptions::new().create(true).append(true).open(&self.path).ok();
        }
        if let Some(file) = slot.as_mut() {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs());
            let _ = writeln!(file, "{secs} {event}");
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        self.record(ImportEvent::Ok(ctx, stats));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.record(ImportEvent::Fail(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.record(ImportEvent::Alert(ctx, severity, error));
    }
}
