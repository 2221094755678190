//! SQLite-backed record store.
//!
//! # Bootstrap and its failure model
//!
//! [`SqliteStore::bootstrap`] opens (or creates) the store file, creates the table if it is
//! absent, and, if the table is empty, populates it from the configured source. Schema creation
//! and population run in one transaction, so a failed population never leaves a half-filled table.
//! If bootstrap fails and this call created the file, the file is removed before the error is
//! returned. "Created" means this call won the exclusive `create_new` open of the path.
//!
//! Bootstrap is not serialized against concurrent bootstrap attempts from several processes or
//! threads. Two callers can both observe an empty table; one of them then loses the write lock
//! and fails with a [`StoreError::Bootstrap`] wrapping SQLite's "database is locked". A caller
//! that loses this way never removes the file, even if it created it. Callers that start several
//! processes against one store should bootstrap from a single process first.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, ErrorCode, Transaction};

use crate::error::{CoercionError, StoreError, StoreResult};
use crate::ingestion::{ingest_from_path, IngestionOptions};
use crate::types::{AgeRating, Column, Record};

use super::{RecordSource, RecordStore};

/// Name of the table holding catalog records.
pub const TABLE_NAME: &str = "titles";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS titles (
    id INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL UNIQUE,
    year INTEGER NOT NULL,
    age INTEGER,
    rating_imdb REAL,
    rating_rotten_tomatoes REAL NOT NULL,
    is_on_netflix INTEGER NOT NULL,
    is_on_hulu INTEGER NOT NULL,
    is_on_prime_video INTEGER NOT NULL,
    is_on_disney INTEGER NOT NULL
);
"#;

const COLUMNS_SQL: &str = "id, title, year, age, rating_imdb, rating_rotten_tomatoes, \
                           is_on_netflix, is_on_hulu, is_on_prime_video, is_on_disney";

/// Options for [`SqliteStore::bootstrap`].
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Source used to populate an empty store (CSV or parsed JSON artifact).
    pub source: Option<PathBuf>,
    /// Options for ingesting `source`.
    pub ingestion: IngestionOptions,
}

impl BootstrapOptions {
    /// Populate a fresh store from the CSV export or JSON artifact at `source`.
    pub fn with_source(source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }
}

/// Catalog records persisted in SQLite.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open the store at `path`, creating and populating it if needed.
    ///
    /// Fails with [`StoreError::MissingSource`] when the table is empty and `options.source` is
    /// unset; every other failure is wrapped in [`StoreError::Bootstrap`].
    pub fn bootstrap(path: impl AsRef<Path>, options: &BootstrapOptions) -> StoreResult<Self> {
        let path = path.as_ref();
        log::info!("Connecting to catalog store in {}...", path.display());

        let result = claim_store_file(path).and_then(|created| {
            Self::open_and_populate(path, options).inspect_err(|err| {
                if created && !is_lock_contention(err) {
                    remove_partial_store(path);
                }
            })
        });

        match result {
            Ok(store) => {
                log::info!("Catalog store ready.");
                Ok(store)
            }
            Err(err @ StoreError::MissingSource { .. }) => Err(err),
            Err(other) => Err(StoreError::Bootstrap {
                path: path.to_path_buf(),
                source: Box::new(other),
            }),
        }
    }

    /// Open an in-memory store with the schema and no records. Useful for testing.
    pub fn open_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn, path: None })
    }

    /// File backing this store (`None` for in-memory stores).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Underlying SQLite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn open_and_populate(path: &Path, options: &BootstrapOptions) -> StoreResult<Self> {
        let mut conn = Connection::open(path)?;
        populate_if_empty(&mut conn, path, options)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }
}

impl RecordSource for SqliteStore {
    fn read_all(&self) -> StoreResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT rowid, {COLUMNS_SQL} FROM {TABLE_NAME} ORDER BY rowid"))?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredRow {
                rowid: row.get(0)?,
                id: row.get(1)?,
                title: row.get(2)?,
                year: row.get(3)?,
                age: row.get(4)?,
                rating_imdb: row.get(5)?,
                rating_rotten_tomatoes: row.get(6)?,
                is_on_netflix: row.get(7)?,
                is_on_hulu: row.get(8)?,
                is_on_prime_video: row.get(9)?,
                is_on_disney: row.get(10)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    fn count(&self) -> StoreResult<usize> {
        count_rows(&self.conn)
    }
}

impl RecordStore for SqliteStore {
    fn insert_many(&mut self, records: &[Record]) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        let inserted = insert_records(&tx, records)?;
        tx.commit()?;
        Ok(inserted)
    }
}

fn populate_if_empty(conn: &mut Connection, path: &Path, options: &BootstrapOptions) -> StoreResult<()> {
    let tx = conn.transaction()?;

    if !table_exists(&tx)? {
        log::info!("Creating {TABLE_NAME} table...");
        tx.execute_batch(SCHEMA_SQL)?;
    }

    if count_rows(&tx)? == 0 {
        log::info!("No records in {TABLE_NAME} table.");
        let source = options
            .source
            .as_deref()
            .ok_or_else(|| StoreError::MissingSource {
                path: path.to_path_buf(),
            })?;

        log::info!("  Populating from {}...", source.display());
        let catalog = ingest_from_path(source, &options.ingestion)?;
        let inserted = insert_records(&tx, &catalog.records)?;
        log::info!("  Inserted {inserted} rows into {TABLE_NAME} table.");
    }

    tx.commit()?;
    Ok(())
}

fn table_exists(conn: &Connection) -> StoreResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
        [TABLE_NAME],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn count_rows(conn: &Connection) -> StoreResult<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"), [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or(0))
}

fn insert_records(tx: &Transaction<'_>, records: &[Record]) -> StoreResult<usize> {
    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {TABLE_NAME} ({COLUMNS_SQL}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    ))?;
    for record in records {
        stmt.execute(params![
            record.id,
            record.title,
            record.year,
            record.age.map(|a| i64::from(a.years())),
            record.rating_imdb,
            record.rating_rotten_tomatoes,
            record.is_on_netflix,
            record.is_on_hulu,
            record.is_on_prime_video,
            record.is_on_disney,
        ])?;
    }
    Ok(records.len())
}

/// Create the store file if it does not exist yet. Returns whether this call created it.
fn claim_store_file(path: &Path) -> StoreResult<bool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Another connection holds the store: a concurrent bootstrap owns whatever is in the file.
fn is_lock_contention(err: &StoreError) -> bool {
    matches!(
        err,
        StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

fn remove_partial_store(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::warn!("Removed partially created store {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove partial store {}: {e}", path.display()),
    }
}

/// A row as read from SQLite, before the age column is checked.
struct StoredRow {
    rowid: i64,
    id: i64,
    title: String,
    year: i64,
    age: Option<i64>,
    rating_imdb: Option<f64>,
    rating_rotten_tomatoes: f64,
    is_on_netflix: i64,
    is_on_hulu: i64,
    is_on_prime_video: i64,
    is_on_disney: i64,
}

impl StoredRow {
    fn into_record(self) -> StoreResult<Record> {
        let age = match self.age {
            None => None,
            Some(years) => Some(
                u8::try_from(years)
                    .ok()
                    .and_then(AgeRating::from_years)
                    .ok_or_else(|| StoreError::CorruptRow {
                        rowid: self.rowid,
                        source: CoercionError::new(Column::Age, &years.to_string(), "unsupported age rating"),
                    })?,
            ),
        };

        Ok(Record {
            id: self.id,
            title: self.title,
            year: self.year,
            age,
            rating_imdb: self.rating_imdb,
            rating_rotten_tomatoes: self.rating_rotten_tomatoes,
            is_on_netflix: self.is_on_netflix,
            is_on_hulu: self.is_on_hulu,
            is_on_prime_video: self.is_on_prime_video,
            is_on_disney: self.is_on_disney,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{is_lock_contention, table_exists, SqliteStore, COLUMNS_SQL};
    use crate::error::StoreError;
    use crate::store::{RecordSource, RecordStore};
    use crate::types::{AgeRating, Column, Record};

    fn record(id: i64, title: &str) -> Record {
        Record {
            id,
            title: title.to_string(),
            year: 2010,
            age: Some(AgeRating::ThirteenPlus),
            rating_imdb: None,
            rating_rotten_tomatoes: 88.0,
            is_on_netflix: 1,
            is_on_hulu: 0,
            is_on_prime_video: 1,
            is_on_disney: 0,
        }
    }

    #[test]
    fn column_list_matches_schema_order() {
        let names: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        let listed: Vec<&str> = COLUMNS_SQL.split(',').map(str::trim).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn memory_store_round_trips_in_insert_order() {
        let mut store = SqliteStore::open_memory().unwrap();
        assert!(table_exists(store.connection()).unwrap());
        let records = vec![record(9, "Nine"), record(2, "Two")];

        assert_eq!(store.insert_many(&records).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.read_all().unwrap(), records);
    }

    #[test]
    fn unique_constraints_reject_duplicates_atomically() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.insert_many(&[record(1, "One")]).unwrap();

        let err = store
            .insert_many(&[record(2, "Two"), record(3, "One")])
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn unsupported_age_is_reported_as_corrupt() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO titles VALUES (1, 'Odd', 2000, 12, NULL, 50.0, 0, 0, 0, 0)",
                [],
            )
            .unwrap();
        let err = store.read_all().unwrap_err();
        assert!(matches!(err, StoreError::CorruptRow { rowid: 1, .. }));
    }

    #[test]
    fn lock_errors_are_told_apart_from_other_failures() {
        let busy = rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY), None);
        assert!(is_lock_contention(&StoreError::Sqlite(busy)));

        let constraint =
            rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT), None);
        assert!(!is_lock_contention(&StoreError::Sqlite(constraint)));
        assert!(!is_lock_contention(&StoreError::MissingSource {
            path: "store.db".into(),
        }));
    }
}
