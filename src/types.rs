//! Core data model for the catalog.
//!
//! The schema is closed: every persisted and queryable field is a [`Column`] variant, and a
//! [`Record`] carries one typed value per column.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Logical value type of a [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
}

/// A column of the catalog schema, in persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Title,
    Year,
    Age,
    RatingImdb,
    RatingRottenTomatoes,
    IsOnNetflix,
    IsOnHulu,
    IsOnPrimeVideo,
    IsOnDisney,
}

impl Column {
    /// Every column, in persisted order.
    pub const ALL: [Column; 10] = [
        Column::Id,
        Column::Title,
        Column::Year,
        Column::Age,
        Column::RatingImdb,
        Column::RatingRottenTomatoes,
        Column::IsOnNetflix,
        Column::IsOnHulu,
        Column::IsOnPrimeVideo,
        Column::IsOnDisney,
    ];

    /// Columns whose values must be unique across the whole catalog.
    pub const IDENTITY: [Column; 2] = [Column::Id, Column::Title];

    /// Availability flag columns.
    pub const PLATFORMS: [Column; 4] = [
        Column::IsOnNetflix,
        Column::IsOnHulu,
        Column::IsOnPrimeVideo,
        Column::IsOnDisney,
    ];

    /// Storage / query name (`rating_imdb`, `is_on_disney`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Title => "title",
            Column::Year => "year",
            Column::Age => "age",
            Column::RatingImdb => "rating_imdb",
            Column::RatingRottenTomatoes => "rating_rotten_tomatoes",
            Column::IsOnNetflix => "is_on_netflix",
            Column::IsOnHulu => "is_on_hulu",
            Column::IsOnPrimeVideo => "is_on_prime_video",
            Column::IsOnDisney => "is_on_disney",
        }
    }

    /// Header of this column in the delimited source file.
    pub fn source_header(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Title => "Title",
            Column::Year => "Year",
            Column::Age => "Age",
            Column::RatingImdb => "IMDb",
            Column::RatingRottenTomatoes => "Rotten Tomatoes",
            Column::IsOnNetflix => "Netflix",
            Column::IsOnHulu => "Hulu",
            Column::IsOnPrimeVideo => "Prime Video",
            Column::IsOnDisney => "Disney+",
        }
    }

    /// Human-facing label used when rendering result tables.
    pub fn display_name(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Title => "Title",
            Column::Year => "Year Released",
            Column::Age => "Rating",
            Column::RatingImdb => "IMDb Rating",
            Column::RatingRottenTomatoes => "Rotten Tomatoes Rating",
            Column::IsOnNetflix => "Netflix",
            Column::IsOnHulu => "Hulu",
            Column::IsOnPrimeVideo => "Prime Video",
            Column::IsOnDisney => "Disney+",
        }
    }

    /// Parse a storage name back into a column.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn data_type(self) -> DataType {
        match self {
            Column::Title => DataType::Utf8,
            Column::RatingImdb | Column::RatingRottenTomatoes => DataType::Float64,
            Column::Id
            | Column::Year
            | Column::Age
            | Column::IsOnNetflix
            | Column::IsOnHulu
            | Column::IsOnPrimeVideo
            | Column::IsOnDisney => DataType::Int64,
        }
    }

    pub fn is_identity(self) -> bool {
        Self::IDENTITY.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Total ascending order used for sorting and ranking.
    ///
    /// Nulls sort first, then numbers (integers and floats compare numerically), then text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
            (Value::Int64(a), Value::Float64(b)) => (*a as f64).total_cmp(b),
            (Value::Float64(a), Value::Int64(b)) => a.total_cmp(&(*b as f64)),
            (Value::Utf8(a), Value::Utf8(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Utf8(_), _) => Ordering::Greater,
            (_, Value::Utf8(_)) => Ordering::Less,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int64(v) => write!(f, "{v}"),
            // Keep a fractional part so `74.0` stays distinguishable from `74`.
            Value::Float64(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

/// Age rating label, stored as the minimum viewer age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AgeRating {
    All,
    SevenPlus,
    ThirteenPlus,
    SixteenPlus,
    EighteenPlus,
}

impl AgeRating {
    /// Minimum viewer age (`all` is 0).
    pub fn years(self) -> u8 {
        match self {
            AgeRating::All => 0,
            AgeRating::SevenPlus => 7,
            AgeRating::ThirteenPlus => 13,
            AgeRating::SixteenPlus => 16,
            AgeRating::EighteenPlus => 18,
        }
    }

    pub fn from_years(years: u8) -> Option<Self> {
        match years {
            0 => Some(AgeRating::All),
            7 => Some(AgeRating::SevenPlus),
            13 => Some(AgeRating::ThirteenPlus),
            16 => Some(AgeRating::SixteenPlus),
            18 => Some(AgeRating::EighteenPlus),
            _ => None,
        }
    }
}

impl From<AgeRating> for u8 {
    fn from(age: AgeRating) -> u8 {
        age.years()
    }
}

impl TryFrom<u8> for AgeRating {
    type Error = String;

    fn try_from(years: u8) -> Result<Self, Self::Error> {
        AgeRating::from_years(years).ok_or_else(|| format!("unsupported age rating {years}"))
    }
}

/// One normalized catalog entry.
///
/// Ratings are held on a 0–100 scale; see [`crate::query::display`] for the presentation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Catalog identifier, unique across the catalog.
    pub id: i64,
    /// Title, unique across the catalog.
    pub title: String,
    /// Release year.
    pub year: i64,
    /// Minimum viewer age; `None` when the source left it blank.
    pub age: Option<AgeRating>,
    /// IMDb score times 10 (`7.4/10` becomes `74.0`); `None` when the source left it blank.
    pub rating_imdb: Option<f64>,
    /// Rotten Tomatoes score as written (`98/100` becomes `98.0`).
    pub rating_rotten_tomatoes: f64,
    /// `1` when available on Netflix, else `0`.
    pub is_on_netflix: i64,
    /// `1` when available on Hulu, else `0`.
    pub is_on_hulu: i64,
    /// `1` when available on Prime Video, else `0`.
    pub is_on_prime_video: i64,
    /// `1` when available on Disney+, else `0`.
    pub is_on_disney: i64,
}

impl Record {
    /// The value stored under `column`.
    pub fn value(&self, column: Column) -> Value {
        match column {
            Column::Id => Value::Int64(self.id),
            Column::Title => Value::Utf8(self.title.clone()),
            Column::Year => Value::Int64(self.year),
            Column::Age => self
                .age
                .map_or(Value::Null, |a| Value::Int64(i64::from(a.years()))),
            Column::RatingImdb => self.rating_imdb.map_or(Value::Null, Value::Float64),
            Column::RatingRottenTomatoes => Value::Float64(self.rating_rotten_tomatoes),
            Column::IsOnNetflix => Value::Int64(self.is_on_netflix),
            Column::IsOnHulu => Value::Int64(self.is_on_hulu),
            Column::IsOnPrimeVideo => Value::Int64(self.is_on_prime_video),
            Column::IsOnDisney => Value::Int64(self.is_on_disney),
        }
    }

    /// All values in [`Column::ALL`] order.
    pub fn values(&self) -> Vec<Value> {
        Column::ALL.into_iter().map(|c| self.value(c)).collect()
    }
}

/// Per-column value frequencies, in first-seen order.
///
/// Values are keyed by their textual form (`null` for missing values), which is also how they
/// appear in the serialized stats artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldFrequencyStats {
    columns: IndexMap<Column, IndexMap<String, usize>>,
}

impl FieldFrequencyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value` under `column` and return the updated count.
    pub fn observe(&mut self, column: Column, value: &Value) -> usize {
        let count = self
            .columns
            .entry(column)
            .or_default()
            .entry(value.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Occurrence count of `value` under `column` (0 if never seen).
    pub fn count(&self, column: Column, value: &Value) -> usize {
        self.columns
            .get(&column)
            .and_then(|m| m.get(&value.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Frequencies for one column, if any value was observed.
    pub fn column(&self, column: Column) -> Option<&IndexMap<String, usize>> {
        self.columns.get(&column)
    }

    /// Iterate columns in first-seen order.
    pub fn columns(&self) -> impl Iterator<Item = (Column, &IndexMap<String, usize>)> {
        self.columns.iter().map(|(c, m)| (*c, m))
    }

    /// Drop the identity columns, leaving only categorical ones.
    pub fn without_identity(mut self) -> Self {
        for column in Column::IDENTITY {
            self.columns.shift_remove(&column);
        }
        self
    }
}

/// Output of ingestion: the validated records (source order) plus their categorical stats.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub records: Vec<Record>,
    pub stats: FieldFrequencyStats,
}

impl Catalog {
    pub fn new(records: Vec<Record>, stats: FieldFrequencyStats) -> Self {
        Self { records, stats }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
