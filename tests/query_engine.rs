use media_catalog::ingestion::csv::ingest_csv_from_path;
use media_catalog::query::{
    DisplayRecord, DisplayValue, Operator, Predicate, QueryEngine, QueryRequest, WEB_PAGE_SIZE,
};
use media_catalog::store::{MemoryStore, RecordStore, SqliteStore};
use media_catalog::types::{Column, Record, Value};
use media_catalog::QueryError;

fn fixture_records() -> Vec<Record> {
    ingest_csv_from_path("tests/fixtures/tv_shows.csv")
        .unwrap()
        .records
}

fn sqlite_store() -> SqliteStore {
    let mut store = SqliteStore::open_memory().unwrap();
    store.insert_many(&fixture_records()).unwrap();
    store
}

fn ids(rows: &[DisplayRecord]) -> Vec<i64> {
    rows.iter()
        .map(|r| r.get(Column::Id).as_i64().unwrap())
        .collect()
}

#[test]
fn unfiltered_query_returns_display_adjusted_records() {
    let store = sqlite_store();
    let engine = QueryEngine::new(&store);
    let rows = engine.query(&QueryRequest::new().page(0, 20)).unwrap();
    let originals = fixture_records();

    assert_eq!(rows.len(), originals.len());
    for (row, original) in rows.iter().zip(&originals) {
        assert_eq!(row.get(Column::Id), &DisplayValue::Int(original.id));
        assert_eq!(row.get(Column::Title), &DisplayValue::Text(original.title.clone()));
        assert_eq!(row.get(Column::Year), &DisplayValue::Int(original.year));
        assert_eq!(
            row.get(Column::RatingRottenTomatoes),
            &DisplayValue::Float(original.rating_rotten_tomatoes)
        );
        match original.rating_imdb {
            Some(score) => assert_eq!(row.get(Column::RatingImdb), &DisplayValue::Float(score / 10.0)),
            None => assert_eq!(row.get(Column::RatingImdb), &DisplayValue::Placeholder),
        }
    }

    assert_eq!(rows[0].get(Column::RatingImdb).as_f64(), Some(9.4));
    assert_eq!(rows[7].availability(), "Available on: Disney+");
    assert_eq!(rows[2].availability(), "Available on: Netflix, Hulu");
}

#[test]
fn display_rows_serialize_in_column_order() {
    let store = sqlite_store();
    let rows = QueryEngine::new(&store)
        .query(&QueryRequest::new().with_predicate(Predicate::parse("id", "==", "8").unwrap()))
        .unwrap();
    assert_eq!(rows.len(), 1);

    let json = serde_json::to_string(&rows[0]).unwrap();
    assert_eq!(
        json,
        r#"{"id":8,"title":"The Mandalorian","year":2019,"age":13,"rating_imdb":"-","rating_rotten_tomatoes":93.0,"is_on_netflix":0,"is_on_hulu":0,"is_on_prime_video":0,"is_on_disney":1}"#
    );
}

#[test]
fn pages_by_id_cover_every_record_once() {
    let store = sqlite_store();
    let engine = QueryEngine::new(&store);

    let mut seen = Vec::new();
    for page in 0.. {
        let rows = engine.query(&QueryRequest::new().page(page, 4)).unwrap();
        seen.extend(ids(&rows));
        if rows.len() < 4 {
            break;
        }
    }
    assert_eq!(seen, (1..=9).collect::<Vec<_>>());
}

#[test]
fn year_ties_skip_and_repeat_across_pages() {
    let store = sqlite_store();
    let engine = QueryEngine::new(&store);
    let page = |n| ids(&engine.query_with(&[], Some(Column::Year), n, 2).unwrap());

    // Sorted by year: 6, 1, 9, 3, 7, 4, 2, 5, 8 with ranks 1, 2, 2, 4, 4, 6, 7, 8, 9.
    assert_eq!(page(0), vec![6, 1]);
    // Rank 2 is not above the floor of 2, so record 9 is never served.
    assert_eq!(page(1), vec![3, 7]);
    assert_eq!(page(2), vec![4, 2]);
    // Record 2 comes back because page 2 only consumed ranks up to 7.
    assert_eq!(page(3), vec![2, 5]);
    assert_eq!(page(4), vec![8]);
    assert!(page(5).is_empty());
}

#[test]
fn title_search_is_case_sensitive() {
    let engine = QueryEngine::new(MemoryStore::from_records(fixture_records()));

    let lower = engine
        .query(&QueryRequest::new().with_predicate(Predicate::contains(Column::Title, "ar")))
        .unwrap();
    assert_eq!(ids(&lower), vec![5, 6, 9]);

    let upper = engine
        .query(&QueryRequest::new().with_predicate(Predicate::contains(Column::Title, "AR")))
        .unwrap();
    assert!(upper.is_empty());
}

#[test]
fn web_params_drive_search_and_paging() {
    let engine = QueryEngine::new(MemoryStore::from_records(fixture_records()));

    let first = engine
        .query(&QueryRequest::from_web_params(Some("ar"), Some("1"), WEB_PAGE_SIZE))
        .unwrap();
    assert_eq!(ids(&first), vec![5, 6, 9]);

    let unfiltered = engine
        .query(&QueryRequest::from_web_params(None, Some("2"), WEB_PAGE_SIZE))
        .unwrap();
    assert_eq!(ids(&unfiltered), vec![7, 8, 9]);

    let garbage = engine
        .query(&QueryRequest::from_web_params(None, Some("two"), WEB_PAGE_SIZE))
        .unwrap();
    assert_eq!(ids(&garbage), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn null_ratings_are_excluded_by_comparisons_and_sort_first() {
    let engine = QueryEngine::new(MemoryStore::from_records(fixture_records()));

    let rated = engine
        .query_with(
            &[Predicate::new(Column::RatingImdb, Operator::Ne, Value::Float64(0.0)).unwrap()],
            None,
            0,
            20,
        )
        .unwrap();
    assert_eq!(rated.len(), 8);
    assert!(!ids(&rated).contains(&8));

    let by_rating = engine
        .query_with(&[], Some(Column::RatingImdb), 0, 1)
        .unwrap();
    assert_eq!(ids(&by_rating), vec![8]);
}

#[test]
fn predicates_are_anded_and_none_is_ignored() {
    let engine = QueryEngine::new(MemoryStore::from_records(fixture_records()));
    let predicates = [
        Predicate::parse("rating_imdb", ">=", "90").unwrap(),
        Predicate::parse("is_on_netflix", "=", "1").unwrap(),
        Predicate::parse("age", "none", "").unwrap(),
    ];
    let rows = engine.query_with(&predicates, None, 0, 10).unwrap();
    assert_eq!(ids(&rows), vec![1, 3, 6]);
}

#[test]
fn untrusted_input_is_data_not_syntax() {
    let store = sqlite_store();
    let engine = QueryEngine::new(&store);

    let rows = engine
        .query(&QueryRequest::new().with_predicate(Predicate::contains(Column::Title, "'; DROP TABLE titles; --")))
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(engine.query(&QueryRequest::new().page(0, 20)).unwrap().len(), 9);

    let err = Predicate::parse("title; DROP TABLE titles", "==", "x").unwrap_err();
    assert!(matches!(err, QueryError::UnknownColumn(_)));
    let err = Predicate::parse("year", "OR 1=1", "2000").unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(_)));
    let err = Predicate::parse("year", ">", "2000 OR 1=1").unwrap_err();
    assert!(matches!(err, QueryError::InvalidOperand { .. }));
}

#[test]
fn zero_page_size_is_an_error() {
    let engine = QueryEngine::new(MemoryStore::from_records(fixture_records()));
    let err = engine.query_with(&[], None, 0, 0).unwrap_err();
    assert!(matches!(err, QueryError::InvalidPageSize));
}
