//! Storage adapter.
//!
//! [`RecordSource`] is the read side the query engine depends on; [`RecordStore`] adds writes.
//! [`SqliteStore`] is the persistent implementation and [`MemoryStore`] an in-process one.

mod sqlite;

pub use sqlite::{BootstrapOptions, SqliteStore, TABLE_NAME};

use crate::error::StoreResult;
use crate::types::Record;

/// Read access to persisted records.
pub trait RecordSource {
    /// Every record, in storage order.
    fn read_all(&self) -> StoreResult<Vec<Record>>;

    /// Number of stored records.
    fn count(&self) -> StoreResult<usize>;
}

/// Read/write access to persisted records.
pub trait RecordStore: RecordSource {
    /// Append `records` in order; returns how many were written.
    fn insert_many(&mut self, records: &[Record]) -> StoreResult<usize>;
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn read_all(&self) -> StoreResult<Vec<Record>> {
        (**self).read_all()
    }

    fn count(&self) -> StoreResult<usize> {
        (**self).count()
    }
}

/// Records held in a `Vec`, in insertion order. Applies no constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RecordSource for MemoryStore {
    fn read_all(&self) -> StoreResult<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.records.len())
    }
}

impl RecordStore for MemoryStore {
    fn insert_many(&mut self, records: &[Record]) -> StoreResult<usize> {
        self.records.extend_from_slice(records);
        Ok(records.len())
    }
}
