//! Presentation adjustments applied to query results.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::{Column, Record, Value};

/// Rendered in place of a missing IMDb rating.
pub const RATING_PLACEHOLDER: &str = "-";

/// A display-ready cell.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    /// Stand-in for a missing value that should still render ([`RATING_PLACEHOLDER`]).
    Placeholder,
}

impl DisplayValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DisplayValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DisplayValue::Float(v) => Some(*v),
            DisplayValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl From<Value> for DisplayValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DisplayValue::Null,
            Value::Int64(v) => DisplayValue::Int(v),
            Value::Float64(v) => DisplayValue::Float(v),
            Value::Utf8(s) => DisplayValue::Text(s),
        }
    }
}

impl Serialize for DisplayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DisplayValue::Null => serializer.serialize_none(),
            DisplayValue::Int(v) => serializer.serialize_i64(*v),
            DisplayValue::Float(v) => serializer.serialize_f64(*v),
            DisplayValue::Text(s) => serializer.serialize_str(s),
            DisplayValue::Placeholder => serializer.serialize_str(RATING_PLACEHOLDER),
        }
    }
}

/// Convert one stored value into its display form.
///
/// Every column has an arm. `rating_imdb` goes back to a 0–10 scale, `year` is shown as an
/// integer, and the remaining columns pass through unchanged.
pub fn adjust(column: Column, value: Value) -> DisplayValue {
    match column {
        Column::RatingImdb => match value {
            Value::Float64(v) => DisplayValue::Float(v / 10.0),
            Value::Int64(v) => DisplayValue::Float(v as f64 / 10.0),
            _ => DisplayValue::Placeholder,
        },
        Column::Year => match value {
            Value::Float64(v) => DisplayValue::Int(v.trunc() as i64),
            other => other.into(),
        },
        Column::Id
        | Column::Title
        | Column::Age
        | Column::RatingRottenTomatoes
        | Column::IsOnNetflix
        | Column::IsOnHulu
        | Column::IsOnPrimeVideo
        | Column::IsOnDisney => value.into(),
    }
}

/// A query result row in display form, one cell per [`Column`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    cells: Vec<DisplayValue>,
}

impl DisplayRecord {
    pub fn from_record(record: &Record) -> Self {
        Self {
            cells: Column::ALL
                .into_iter()
                .map(|c| adjust(c, record.value(c)))
                .collect(),
        }
    }

    pub fn get(&self, column: Column) -> &DisplayValue {
        &self.cells[column as usize]
    }

    /// Cells paired with their columns, in [`Column::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &DisplayValue)> {
        Column::ALL.into_iter().zip(self.cells.iter())
    }

    /// Platforms whose availability flag is set, e.g. `Available on: Netflix, Hulu`.
    pub fn availability(&self) -> String {
        let platforms: Vec<&str> = Column::PLATFORMS
            .into_iter()
            .filter(|c| self.get(*c).as_i64().is_some_and(|v| v != 0))
            .map(Column::display_name)
            .collect();
        format!("Available on: {}", platforms.join(", "))
    }
}

impl Serialize for DisplayRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column.name(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{adjust, DisplayRecord, DisplayValue};
    use crate::types::{Column, Record, Value};

    fn record() -> Record {
        Record {
            id: 3,
            title: "Fargo".to_string(),
            year: 2014,
            age: None,
            rating_imdb: Some(74.0),
            rating_rotten_tomatoes: 97.0,
            is_on_netflix: 0,
            is_on_hulu: 1,
            is_on_prime_video: 1,
            is_on_disney: 0,
        }
    }

    #[test]
    fn imdb_rating_is_rescaled_or_placeholder() {
        assert_eq!(adjust(Column::RatingImdb, Value::Float64(74.0)), DisplayValue::Float(7.4));
        assert_eq!(adjust(Column::RatingImdb, Value::Null), DisplayValue::Placeholder);
    }

    #[test]
    fn year_is_integral_and_others_pass_through() {
        assert_eq!(adjust(Column::Year, Value::Float64(2014.0)), DisplayValue::Int(2014));
        assert_eq!(adjust(Column::Year, Value::Int64(2014)), DisplayValue::Int(2014));
        assert_eq!(
            adjust(Column::RatingRottenTomatoes, Value::Float64(97.0)),
            DisplayValue::Float(97.0)
        );
        assert_eq!(adjust(Column::Age, Value::Null), DisplayValue::Null);
    }

    #[test]
    fn availability_lists_flagged_platforms() {
        let d = DisplayRecord::from_record(&record());
        assert_eq!(d.availability(), "Available on: Hulu, Prime Video");
    }

    #[test]
    fn serializes_in_column_order() {
        let mut r = record();
        r.rating_imdb = None;
        let json = serde_json::to_string(&DisplayRecord::from_record(&r)).unwrap();
        assert_eq!(
            json,
            r#"{"id":3,"title":"Fargo","year":2014,"age":null,"rating_imdb":"-","rating_rotten_tomatoes":97.0,"is_on_netflix":0,"is_on_hulu":1,"is_on_prime_video":1,"is_on_disney":0}"#
        );
    }
}
