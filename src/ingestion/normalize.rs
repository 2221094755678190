//! Record normalization: one raw row in, one typed [`Record`] out.

use crate::error::CoercionError;
use crate::types::{Column, Record};

use super::coercion::{
    coerce_age, coerce_flag, coerce_integer, coerce_rating_imdb, coerce_rating_rotten_tomatoes,
};

/// One source row, with cells already resolved by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow<'a> {
    cells: [&'a str; Column::ALL.len()],
}

impl<'a> RawRow<'a> {
    /// Build a row by looking up each column's cell; missing cells read as empty.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(Column) -> Option<&'a str>,
    {
        let mut cells = [""; Column::ALL.len()];
        for (slot, column) in cells.iter_mut().zip(Column::ALL) {
            *slot = lookup(column).unwrap_or("");
        }
        Self { cells }
    }

    /// Raw text of the cell for `column`.
    pub fn get(&self, column: Column) -> &'a str {
        self.cells[column as usize]
    }
}

/// Apply every field coercion rule and assemble a [`Record`].
///
/// Stops at the first cell that fails to coerce.
pub fn normalize_record(row: &RawRow<'_>) -> Result<Record, CoercionError> {
    Ok(Record {
        id: coerce_integer(Column::Id, row.get(Column::Id))?,
        title: row.get(Column::Title).to_owned(),
        year: coerce_integer(Column::Year, row.get(Column::Year))?,
        age: coerce_age(row.get(Column::Age))?,
        rating_imdb: coerce_rating_imdb(row.get(Column::RatingImdb))?,
        rating_rotten_tomatoes: coerce_rating_rotten_tomatoes(
            row.get(Column::RatingRottenTomatoes),
        )?,
        is_on_netflix: coerce_flag(Column::IsOnNetflix, row.get(Column::IsOnNetflix))?,
        is_on_hulu: coerce_flag(Column::IsOnHulu, row.get(Column::IsOnHulu))?,
        is_on_prime_video: coerce_flag(Column::IsOnPrimeVideo, row.get(Column::IsOnPrimeVideo))?,
        is_on_disney: coerce_flag(Column::IsOnDisney, row.get(Column::IsOnDisney))?,
    })
}

#[cfg(test)]
mod tests {
    use super::{normalize_record, RawRow};
    use crate::types::{AgeRating, Column};

    fn row(cells: [&'static str; 10]) -> RawRow<'static> {
        RawRow::from_lookup(|c| Some(cells[c as usize]))
    }

    #[test]
    fn normalizes_a_complete_row() {
        let r = normalize_record(&row([
            "1", "Breaking Bad", "2008", "18+", "9.4/10", "100/100", "1", "0", "0", "0",
        ]))
        .unwrap();

        assert_eq!(r.id, 1);
        assert_eq!(r.title, "Breaking Bad");
        assert_eq!(r.year, 2008);
        assert_eq!(r.age, Some(AgeRating::EighteenPlus));
        assert_eq!(r.rating_imdb, Some(94.0));
        assert_eq!(r.rating_rotten_tomatoes, 100.0);
        assert_eq!(
            (r.is_on_netflix, r.is_on_hulu, r.is_on_prime_video, r.is_on_disney),
            (1, 0, 0, 0)
        );
    }

    #[test]
    fn empty_optional_cells_become_none() {
        let r = normalize_record(&row([
            "7", "Obscure", "1990", "", "", "12/100", "0", "0", "1", "0",
        ]))
        .unwrap();
        assert_eq!(r.age, None);
        assert_eq!(r.rating_imdb, None);
    }

    #[test]
    fn first_bad_cell_is_reported() {
        let err = normalize_record(&row([
            "3", "Bad Year", "19x0", "PG", "", "", "0", "0", "0", "0",
        ]))
        .unwrap_err();
        assert_eq!(err.column, Column::Year);
        assert_eq!(err.raw, "19x0");
    }

    #[test]
    fn missing_cells_read_as_empty() {
        let raw = RawRow::from_lookup(|c| match c {
            Column::Id => Some("5"),
            _ => None,
        });
        assert_eq!(raw.get(Column::Id), "5");
        assert_eq!(raw.get(Column::Title), "");
    }
}
