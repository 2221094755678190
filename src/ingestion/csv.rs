//! CSV ingestion pipeline.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Catalog, Column};

use super::normalize::{normalize_record, RawRow};
use super::validate::FrequencyCounter;

/// Ingest a catalog CSV file.
///
/// Rules:
///
/// - The CSV must have a header row naming every source column (order can differ).
/// - Each row is normalized into a [`crate::types::Record`], then checked for duplicate identity
///   fields.
/// - The first bad row aborts the whole ingestion; nothing partial is returned.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<Catalog> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest catalog CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Catalog> {
    let headers = rdr.headers()?.clone();

    // Map columns -> CSV indexes once (allows re-ordered CSV columns).
    let mut col_idxs = [0usize; Column::ALL.len()];
    for (slot, column) in col_idxs.iter_mut().zip(Column::ALL) {
        match headers.iter().position(|h| h == column.source_header()) {
            Some(idx) => *slot = idx,
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{header}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        header = column.source_header()
                    ),
                });
            }
        }
    }

    let mut counter = FrequencyCounter::new();
    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let row = result?;

        let raw = RawRow::from_lookup(|column| row.get(col_idxs[column as usize]));
        let record = normalize_record(&raw).map_err(|source| IngestionError::Coercion {
            row: user_row,
            source,
        })?;
        counter.admit(&record)?;
        records.push(record);
    }

    Ok(Catalog::new(records, counter.finish()))
}
