//! Filtered, sorted, rank-paginated reads over the persisted catalog.
//!
//! Pagination follows window ranking rather than row skipping. Eligible rows are sorted by the
//! request's sort column and given a competition rank (`1, 2, 2, 4, ...`: rows with equal sort
//! values share the rank of the first of them). Page `n` of size `s` is then the first `s` rows
//! whose rank exceeds `n * s`.
//!
//! Without ties this is exactly offset pagination. With ties it is not: a run of equal values that
//! straddles a page boundary is either repeated on the next page or skipped by it, depending on
//! where the shared rank falls. Ties keep persisted storage order; no secondary sort key is
//! applied.

use crate::error::{QueryError, QueryResult};
use crate::store::RecordSource;
use crate::types::{Column, Record};

use super::display::DisplayRecord;
use super::predicate::{Filter, Predicate};

/// Page size used when a request does not set one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page size used by the listing page of the web front end.
pub const WEB_PAGE_SIZE: usize = 6;

/// One page request: predicates, sort column, and page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Conditions, ANDed together; `none` predicates are ignored.
    pub predicates: Vec<Predicate>,
    /// Ascending sort column.
    pub sort_column: Column,
    /// Zero-based page index.
    pub page_offset: usize,
    /// Rows per page; must be positive.
    pub page_size: usize,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            sort_column: Column::Id,
            page_offset: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryRequest {
    /// First page of ten rows, sorted by `id`, with no predicates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; all conditions must hold.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn sorted_by(mut self, column: Column) -> Self {
        self.sort_column = column;
        self
    }

    /// Select the zero-based page `page_offset` of `page_size` rows.
    pub fn page(mut self, page_offset: usize, page_size: usize) -> Self {
        self.page_offset = page_offset;
        self.page_size = page_size;
        self
    }

    /// Translate listing-page parameters into a request.
    ///
    /// Search text becomes one `contains` predicate on `title`. `page` is 1-based; missing,
    /// non-numeric, or non-positive input falls back to the first page.
    pub fn from_web_params(search_text: Option<&str>, page: Option<&str>, page_size: usize) -> Self {
        let predicates = search_text
            .map(|text| vec![Predicate::contains(Column::Title, text)])
            .unwrap_or_default();
        let page_offset = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map_or(0, |p| usize::try_from(p - 1).unwrap_or(0));

        Self {
            predicates,
            sort_column: Column::Id,
            page_offset,
            page_size,
        }
    }

    /// Rank threshold: rows with a rank above this belong to the requested page or later.
    fn rank_floor(&self) -> usize {
        self.page_offset.saturating_mul(self.page_size)
    }
}

/// Eligible records, in ascending `sort_column` order (ties in storage order).
pub fn filter_sorted<'a>(records: &'a [Record], filter: &Filter, sort_column: Column) -> Vec<&'a Record> {
    let mut eligible: Vec<&Record> = records.iter().filter(|r| filter.matches(r)).collect();
    // Stable: equal keys keep storage order.
    eligible.sort_by(|a, b| a.value(sort_column).sort_cmp(&b.value(sort_column)));
    eligible
}

/// Competition ranks for rows already sorted by `sort_column`.
pub fn competition_ranks(sorted: &[&Record], sort_column: Column) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(sorted.len());
    for (i, record) in sorted.iter().enumerate() {
        let rank = match (i.checked_sub(1), ranks.last()) {
            (Some(prev), Some(&prev_rank))
                if sorted[prev]
                    .value(sort_column)
                    .sort_cmp(&record.value(sort_column))
                    .is_eq() =>
            {
                prev_rank
            }
            _ => i + 1,
        };
        ranks.push(rank);
    }
    ranks
}

/// Run `request` against `records` and return the page, before display adjustment.
pub fn select_page(records: &[Record], request: &QueryRequest) -> QueryResult<Vec<Record>> {
    if request.page_size == 0 {
        return Err(QueryError::InvalidPageSize);
    }

    let filter = Filter::compose(&request.predicates);
    let sorted = filter_sorted(records, &filter, request.sort_column);
    let ranks = competition_ranks(&sorted, request.sort_column);
    let floor = request.rank_floor();

    Ok(sorted
        .into_iter()
        .zip(ranks)
        .filter(|(_, rank)| *rank > floor)
        .map(|(record, _)| record.clone())
        .take(request.page_size)
        .collect())
}

/// Run `request` against `records` and return display-ready rows.
pub fn run_query(records: &[Record], request: &QueryRequest) -> QueryResult<Vec<DisplayRecord>> {
    Ok(select_page(records, request)?
        .iter()
        .map(DisplayRecord::from_record)
        .collect())
}

/// Query front end bound to a record source.
///
/// The source is injected by the caller; the engine holds no other state.
#[derive(Debug)]
pub struct QueryEngine<S> {
    source: S,
}

impl<S: RecordSource> QueryEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read the persisted records and return one display-adjusted page.
    pub fn query(&self, request: &QueryRequest) -> QueryResult<Vec<DisplayRecord>> {
        let records = self.source.read_all()?;
        run_query(&records, request)
    }

    /// Positional form of [`Self::query`].
    pub fn query_with(
        &self,
        predicates: &[Predicate],
        sort_column: Option<Column>,
        page_offset: usize,
        page_size: usize,
    ) -> QueryResult<Vec<DisplayRecord>> {
        self.query(&QueryRequest {
            predicates: predicates.to_vec(),
            sort_column: sort_column.unwrap_or(Column::Id),
            page_offset,
            page_size,
        })
    }
}
