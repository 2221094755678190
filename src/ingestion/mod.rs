//! Ingestion and normalization pipeline.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects the source format by file extension (or you can override via [`IngestionOptions`])
//! - normalizes every row into a typed [`crate::types::Record`] and rejects duplicate identity fields
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! The building blocks are also available on their own:
//! - [`coercion`]: per-field typed-parse rules
//! - [`normalize`]: raw row to [`crate::types::Record`]
//! - [`validate`]: frequency counting and uniqueness checks
//! - [`csv`] and [`json`]: format-specific pipelines and artifact I/O

pub mod coercion;
pub mod csv;
pub mod json;
pub mod normalize;
pub mod observability;
pub mod unified;
pub mod validate;

pub use json::{dump_records, dump_stats, load_records};
pub use normalize::{normalize_record, RawRow};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    LogObserver, StdErrObserver,
};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions};
pub use validate::{validate_records, FrequencyCounter};
