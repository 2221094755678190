//! `media-catalog` ingests a delimited media-availability catalog (titles, release years, age
//! ratings, critic scores, per-platform availability flags) into typed, validated
//! [`types::Record`]s, persists them, and serves filtered, sorted, paginated views of them.
//!
//! The primary entrypoints are:
//!
//! - [`ingestion::ingest_from_path`]: CSV (or parsed JSON artifact) to a validated
//!   [`types::Catalog`] of records plus per-column value frequencies
//! - [`store::SqliteStore::bootstrap`]: open a SQLite store, creating and populating it on first use
//! - [`query::QueryEngine`]: predicate filtering plus rank-based pagination over a store
//!
//! ## Source format
//!
//! The CSV must have a header row with the columns `ID, Title, Year, Age, IMDb, Rotten Tomatoes,
//! Netflix, Hulu, Prime Video, Disney+` (any order). Each cell is coerced by a per-column rule:
//!
//! - `Age` labels `all`, `7+`, `13+`, `16+`, `18+` map to 0/7/13/16/18; an empty label is unrated.
//! - `IMDb` (`7.4/10`) and `Rotten Tomatoes` (`98/100`) are read from the score before the `/`;
//!   IMDb is multiplied by 10, Rotten Tomatoes is kept as is. A missing IMDb
//!   rating is allowed; a missing Rotten Tomatoes score is an error.
//! - `ID` and `Title` must be unique across the file.
//!
//! The first bad row aborts ingestion with an [`IngestionError`].
//!
//! ## Quick example: ingest, persist, query
//!
//! ```no_run
//! use media_catalog::query::{Predicate, QueryEngine, QueryRequest};
//! use media_catalog::store::{BootstrapOptions, SqliteStore};
//! use media_catalog::types::Column;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::bootstrap(
//!     "data/sqlite/tv_shows.db",
//!     &BootstrapOptions::with_source("data/tv_shows.csv"),
//! )?;
//! let engine = QueryEngine::new(&store);
//!
//! let request = QueryRequest::new()
//!     .with_predicate(Predicate::contains(Column::Title, "ar"))
//!     .with_predicate(Predicate::parse("year", ">=", "2000")?)
//!     .sorted_by(Column::Year)
//!     .page(0, 6);
//! for row in engine.query(&request)? {
//!     println!("{} ({})", serde_json::to_string(&row)?, row.availability());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: coercion rules, normalization, validation, and format pipelines
//! - [`query`]: predicates, rank-based pagination, and display adjustment
//! - [`store`]: the storage adapter (SQLite and in-memory)
//! - [`types`]: the closed schema, records, and frequency stats
//! - [`error`]: error types

pub mod error;
pub mod ingestion;
pub mod query;
pub mod store;
pub mod types;

pub use error::{
    CoercionError, DuplicateKeyError, IngestionError, IngestionResult, QueryError, QueryResult, StoreError,
    StoreResult,
};
