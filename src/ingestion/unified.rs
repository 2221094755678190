//! Format dispatch for catalog sources.
//!
//! A source is either the raw CSV export or a parsed JSON artifact previously written by
//! [`super::dump_records`]. [`ingest_from_path`] picks the pipeline, runs it, and reports the
//! outcome to the configured observer.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Catalog;

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Source formats a catalog can be ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Raw export with the catalog header row.
    Csv,
    /// Parsed record artifact (JSON array or NDJSON).
    Json,
}

impl IngestionFormat {
    /// Map a file extension (any case) to a format: `csv`, or `json`/`ndjson`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else if ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("ndjson") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> IngestionResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!(
                "cannot infer a catalog format for {} (expected .csv, .json or .ndjson)",
                path.display()
            ),
        })
    }

    fn ingest(self, path: &Path) -> IngestionResult<Catalog> {
        match self {
            Self::Csv => csv::ingest_csv_from_path(path),
            Self::Json => json::ingest_json_from_path(path),
        }
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

/// How [`ingest_from_path`] reads a source and whom it tells.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Forced format; `None` infers it from the file extension.
    pub format: Option<IngestionFormat>,
    /// Receives the outcome of every ingestion.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Failures this severe or worse are also reported through `on_alert`.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Ingest a catalog source into validated records plus categorical stats.
///
/// An unrecognized extension (with no forced format) fails before any observer is called.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use media_catalog::ingestion::{ingest_from_path, IngestionOptions, StdErrObserver};
///
/// # fn main() -> Result<(), media_catalog::IngestionError> {
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
/// let catalog = ingest_from_path("data/tv_shows.csv", &opts)?;
/// println!("records={}", catalog.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Catalog> {
    let path = path.as_ref();
    let format = match options.format {
        Some(format) => format,
        None => IngestionFormat::from_path(path)?,
    };

    let result = format.ingest(path);
    if let Some(observer) = &options.observer {
        let ctx = IngestionContext {
            path: path.to_path_buf(),
            format,
        };
        report(observer.as_ref(), &ctx, options.alert_at_or_above, &result);
    }
    result
}

fn report(
    observer: &dyn IngestionObserver,
    ctx: &IngestionContext,
    alert_at_or_above: IngestionSeverity,
    result: &IngestionResult<Catalog>,
) {
    match result {
        Ok(catalog) => observer.on_success(ctx, IngestionStats::of(catalog)),
        Err(error) => {
            let severity = IngestionSeverity::of_error(error);
            observer.on_failure(ctx, severity, error);
            if severity >= alert_at_or_above {
                observer.on_alert(ctx, severity, error);
            }
        }
    }
}
