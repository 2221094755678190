//! Field coercion rules: one raw source cell in, one typed value out.

use crate::error::CoercionError;
use crate::types::{AgeRating, Column};

type CoercionResult<T> = Result<T, CoercionError>;

/// Parse a base-10 integer cell (`id`, `year`).
pub fn coerce_integer(column: Column, raw: &str) -> CoercionResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| CoercionError::new(column, raw, e.to_string()))
}

/// Look up an age label. The empty label means "unrated".
pub fn coerce_age(raw: &str) -> CoercionResult<Option<AgeRating>> {
    match raw.trim() {
        "" => Ok(None),
        "all" => Ok(Some(AgeRating::All)),
        "7+" => Ok(Some(AgeRating::SevenPlus)),
        "13+" => Ok(Some(AgeRating::ThirteenPlus)),
        "16+" => Ok(Some(AgeRating::SixteenPlus)),
        "18+" => Ok(Some(AgeRating::EighteenPlus)),
        _ => Err(CoercionError::new(
            Column::Age,
            raw,
            "expected one of all/7+/13+/16+/18+ or empty",
        )),
    }
}

/// IMDb rating, e.g. `7.4/10`, as the score times 10. Empty means "unrated".
pub fn coerce_rating_imdb(raw: &str) -> CoercionResult<Option<f64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    coerce_rating(Column::RatingImdb, raw, 10.0).map(Some)
}

/// Rotten Tomatoes score, e.g. `98/100`, as the score itself. Required.
pub fn coerce_rating_rotten_tomatoes(raw: &str) -> CoercionResult<f64> {
    coerce_rating(Column::RatingRottenTomatoes, raw, 1.0)
}

/// Availability flag. Any integer is accepted; values other than 0/1 are not rejected.
pub fn coerce_flag(column: Column, raw: &str) -> CoercionResult<i64> {
    coerce_integer(column, raw)
}

/// Parse the part of `score/denominator` left of the first `/` and multiply it by `factor`.
///
/// Whatever follows the `/` is ignored.
fn coerce_rating(column: Column, raw: &str, factor: f64) -> CoercionResult<f64> {
    let score = raw.split('/').next().unwrap_or_default().trim();
    if score.is_empty() {
        return Err(CoercionError::new(column, raw, "rating is required"));
    }

    let score = score
        .parse::<f64>()
        .map_err(|e| CoercionError::new(column, raw, format!("bad score: {e}")))?;
    if !score.is_finite() {
        return Err(CoercionError::new(column, raw, "score must be finite"));
    }
    Ok(score * factor)
}
