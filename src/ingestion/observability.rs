//! Ingestion outcome reporting.
//!
//! Every call to [`super::ingest_from_path`] with an observer configured produces exactly one
//! success or failure callback. A failure is graded with an [`IngestionSeverity`]; failures at or
//! above [`super::IngestionOptions::alert_at_or_above`] are also raised through
//! [`IngestionObserver::on_alert`].
//!
//! The built-in observers all render the same one-line event text, e.g.
//!
//! ```text
//! ok format=csv path=data/tv_shows.csv records=5368 distinct_values=412
//! fail severity=error format=csv path=data/tv_shows.csv err=row 7: cannot coerce column 'age': ...
//! ```

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::types::Catalog;

use super::unified::IngestionFormat;

/// How bad a failed ingestion is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    Warning,
    /// The source was read but rejected (bad header, bad cell, duplicate key).
    Error,
    /// The source could not be read at all.
    Critical,
}

impl IngestionSeverity {
    /// Grade an ingestion error. I/O failures are critical; data problems are errors.
    pub fn of_error(error: &IngestionError) -> Self {
        match error {
            IngestionError::Io(_) => Self::Critical,
            IngestionError::Csv(err) if matches!(err.kind(), ::csv::ErrorKind::Io(_)) => Self::Critical,
            IngestionError::Json(err) if err.is_io() => Self::Critical,
            IngestionError::Csv(_)
            | IngestionError::Json(_)
            | IngestionError::SchemaMismatch { .. }
            | IngestionError::Coercion { .. }
            | IngestionError::DuplicateKey(_) => Self::Error,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for IngestionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which source an ingestion attempt read, and how.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub path: PathBuf,
    pub format: IngestionFormat,
}

/// Summary of a successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of validated records.
    pub records: usize,
    /// Distinct values summed over the categorical (non-identity) columns.
    pub distinct_values: usize,
}

impl IngestionStats {
    pub fn of(catalog: &Catalog) -> Self {
        Self {
            records: catalog.len(),
            distinct_values: catalog.stats.columns().map(|(_, values)| values.len()).sum(),
        }
    }
}

/// Receives ingestion outcomes.
///
/// All methods default to doing nothing, except `on_alert`, which forwards to `on_failure`.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// One observer callback, renderable as a single log line.
enum Event<'a> {
    Ingested(IngestionStats),
    Failed(IngestionSeverity, &'a IngestionError),
    Alert(IngestionSeverity, &'a IngestionError),
}

struct EventLine<'a> {
    ctx: &'a IngestionContext,
    event: Event<'a>,
}

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (format, path) = (self.ctx.format, self.ctx.path.display());
        match &self.event {
            Event::Ingested(stats) => write!(
                f,
                "ok format={format} path={path} records={} distinct_values={}",
                stats.records, stats.distinct_values
            ),
            Event::Failed(severity, error) => {
                write!(f, "fail severity={severity} format={format} path={path} err={error}")
            }
            Event::Alert(severity, error) => {
                write!(f, "ALERT severity={severity} format={format} path={path} err={error}")
            }
        }
    }
}

/// Implements [`IngestionObserver`] for a type with an inherent `emit(&self, EventLine)`.
macro_rules! line_observer {
    ($($observer:ty),+ $(,)?) => {$(
        impl IngestionObserver for $observer {
            fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
                self.emit(EventLine { ctx, event: Event::Ingested(stats) });
            }

            fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
                self.emit(EventLine { ctx, event: Event::Failed(severity, error) });
            }

            fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
                self.emit(EventLine { ctx, event: Event::Alert(severity, error) });
            }
        }
    )+};
}

line_observer!(StdErrObserver, LogObserver, FileObserver);

/// Fans each callback out to several observers, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers
            .iter()
            .for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers
            .iter()
            .for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Prints events to stderr, prefixed with `[ingest]`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl StdErrObserver {
    fn emit(&self, line: EventLine<'_>) {
        eprintln!("[ingest] {line}");
    }
}

/// Routes events through the `log` facade: successes at `info`, failures at `warn`, and alerts
/// and critical failures at `error`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl LogObserver {
    fn emit(&self, line: EventLine<'_>) {
        let level = match line.event {
            Event::Ingested(_) => log::Level::Info,
            Event::Failed(IngestionSeverity::Critical, _) | Event::Alert(..) => log::Level::Error,
            Event::Failed(..) => log::Level::Warn,
        };
        log::log!(level, "{line}");
    }
}

/// Appends events to a log file, one timestamped line each.
///
/// Best-effort: a log file that cannot be opened or written is skipped silently.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }
}

impl FileObserver {
    fn emit(&self, line: EventLine<'_>) {
        let _guard = self.lock.lock().ok();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(file, "{ts} {line}");
        }
    }
}
