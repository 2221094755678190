//! Parsed-catalog JSON artifacts.
//!
//! Ingestion writes two artifacts: the record array ([`dump_records`]) and the categorical
//! frequency stats ([`dump_stats`]). Both are pretty-printed with a 4-space indent and end with a
//! newline.
//!
//! Reading supports:
//! - A JSON array of record objects: `[{"id":1,...}, {"id":2,...}]`
//! - Newline-delimited JSON (NDJSON): one record object per line
//!
//! Loaded records go through the same uniqueness validation as CSV ingestion.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Catalog, Column, FieldFrequencyStats, Record};

use super::validate::FrequencyCounter;

/// Write `records` as a pretty-printed JSON array.
pub fn dump_records(path: impl AsRef<Path>, records: &[Record]) -> IngestionResult<()> {
    write_pretty(path.as_ref(), records)
}

/// Write the categorical frequency stats as a pretty-printed JSON object.
pub fn dump_stats(path: impl AsRef<Path>, stats: &FieldFrequencyStats) -> IngestionResult<()> {
    write_pretty(path.as_ref(), stats)
}

/// Load a record artifact, returning the column list alongside the records.
///
/// An empty artifact is rejected: there is nothing to derive columns from.
pub fn load_records(path: impl AsRef<Path>) -> IngestionResult<(Vec<Column>, Vec<Record>)> {
    let text = fs::read_to_string(path)?;
    let records = parse_records(&text)?;
    if records.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "record artifact is empty".to_string(),
        });
    }
    Ok((Column::ALL.to_vec(), records))
}

/// Ingest a record artifact into a validated [`Catalog`].
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<Catalog> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest record JSON from an in-memory string into a validated [`Catalog`].
pub fn ingest_json_from_str(input: &str) -> IngestionResult<Catalog> {
    let records = parse_records(input)?;

    let mut counter = FrequencyCounter::new();
    for record in &records {
        counter.admit(record)?;
    }
    Ok(Catalog::new(records, counter.finish()))
}

fn parse_records(input: &str) -> IngestionResult<Vec<Record>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str::<Vec<Record>>(trimmed)?);
    }

    // NDJSON.
    let mut records = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str::<Record>(line).map_err(|e| IngestionError::SchemaMismatch {
            message: format!("invalid ndjson at line {}: {}", i + 1, e),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> IngestionResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
