//! Predicate-based query engine.
//!
//! A [`QueryRequest`] carries typed [`Predicate`]s, a sort column, and page coordinates. The
//! engine evaluates the predicates in memory against the persisted records, ranks the survivors
//! by the sort column, and returns one page of [`DisplayRecord`]s.
//!
//! ```rust
//! use media_catalog::query::{run_query, Predicate, QueryRequest};
//! use media_catalog::types::{Column, Record};
//!
//! let records = vec![Record {
//!     id: 1,
//!     title: "Cars".to_string(),
//!     year: 2006,
//!     age: None,
//!     rating_imdb: Some(71.0),
//!     rating_rotten_tomatoes: 75.0,
//!     is_on_netflix: 0,
//!     is_on_hulu: 0,
//!     is_on_prime_video: 0,
//!     is_on_disney: 1,
//! }];
//!
//! let request = QueryRequest::new().with_predicate(Predicate::contains(Column::Title, "ar"));
//! let page = run_query(&records, &request).unwrap();
//! assert_eq!(page.len(), 1);
//! assert_eq!(page[0].get(Column::RatingImdb).as_f64(), Some(7.1));
//! ```

pub mod display;
pub mod engine;
pub mod predicate;

pub use display::{adjust, DisplayRecord, DisplayValue, RATING_PLACEHOLDER};
pub use engine::{
    competition_ranks, filter_sorted, run_query, select_page, QueryEngine, QueryRequest, DEFAULT_PAGE_SIZE,
    WEB_PAGE_SIZE,
};
pub use predicate::{Filter, Operator, Predicate};
