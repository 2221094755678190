//! Uniqueness and frequency validation over a stream of records.
//!
//! Counting and validation are separate steps: [`FrequencyCounter::observe`] only counts, and
//! [`FrequencyCounter::check_identity`] inspects the identity counts for one record and reports a
//! [`DuplicateKeyError`] when `id` or `title` has been seen more than once.

use crate::error::DuplicateKeyError;
use crate::types::{Column, FieldFrequencyStats, Record};

/// Running per-column value counts across an ingestion stream.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    stats: FieldFrequencyStats,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every column value of `record`.
    pub fn observe(&mut self, record: &Record) {
        for column in Column::ALL {
            self.stats.observe(column, &record.value(column));
        }
    }

    /// Fail if any identity value of `record` has been observed more than once.
    pub fn check_identity(&self, record: &Record) -> Result<(), DuplicateKeyError> {
        for column in Column::IDENTITY {
            let value = record.value(column);
            if self.stats.count(column, &value) > 1 {
                return Err(DuplicateKeyError {
                    column,
                    value,
                    record: Box::new(record.clone()),
                });
            }
        }
        Ok(())
    }

    /// Observe `record`, then validate it.
    pub fn admit(&mut self, record: &Record) -> Result<(), DuplicateKeyError> {
        self.observe(record);
        self.check_identity(record)
    }

    /// Final stats with the identity columns removed.
    pub fn finish(self) -> FieldFrequencyStats {
        self.stats.without_identity()
    }
}

/// Validate a whole collection at once and return its categorical stats.
pub fn validate_records<'a, I>(records: I) -> Result<FieldFrequencyStats, DuplicateKeyError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counter = FrequencyCounter::new();
    for record in records {
        counter.admit(record)?;
    }
    Ok(counter.finish())
}

#[cfg(test)]
mod tests {
    use super::{validate_records, FrequencyCounter};
    use crate::types::{Column, Record, Value};

    fn record(id: i64, title: &str, year: i64) -> Record {
        Record {
            id,
            title: title.to_string(),
            year,
            age: None,
            rating_imdb: None,
            rating_rotten_tomatoes: 50.0,
            is_on_netflix: 1,
            is_on_hulu: 0,
            is_on_prime_video: 0,
            is_on_disney: 0,
        }
    }

    #[test]
    fn counts_categorical_values_without_identity() {
        let records = vec![record(1, "A", 2001), record(2, "B", 2001), record(3, "C", 1999)];
        let stats = validate_records(&records).unwrap();

        assert!(stats.column(Column::Id).is_none());
        assert!(stats.column(Column::Title).is_none());
        assert_eq!(stats.count(Column::Year, &Value::Int64(2001)), 2);
        assert_eq!(stats.count(Column::Age, &Value::Null), 3);
        assert_eq!(stats.count(Column::IsOnNetflix, &Value::Int64(1)), 3);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let records = vec![record(1, "A", 2001), record(1, "B", 2002)];
        let err = validate_records(&records).unwrap_err();
        assert_eq!(err.column, Column::Id);
        assert_eq!(err.value, Value::Int64(1));
        assert_eq!(err.record.title, "B");
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let records = vec![record(1, "Cars", 2006), record(2, "Cars", 2017)];
        let err = validate_records(&records).unwrap_err();
        assert_eq!(err.column, Column::Title);
        assert_eq!(err.value, Value::Utf8("Cars".to_string()));
        assert_eq!(err.record.id, 2);
    }

    #[test]
    fn observe_alone_never_fails() {
        let mut counter = FrequencyCounter::new();
        let r = record(9, "Twice", 2000);
        counter.observe(&r);
        assert!(counter.check_identity(&r).is_ok());
        counter.observe(&r);
        assert!(counter.check_identity(&r).is_err());

        let stats = counter.finish();
        assert_eq!(stats.count(Column::Year, &Value::Int64(2000)), 2);
    }
}
