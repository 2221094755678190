use criterion::{black_box, criterion_group, criterion_main, Criterion};

use media_catalog::query::{run_query, select_page, Predicate, QueryRequest};
use media_catalog::types::{AgeRating, Column, Record};

fn synthetic_records(n: usize) -> Vec<Record> {
    let ages = [
        Some(AgeRating::All),
        Some(AgeRating::SevenPlus),
        Some(AgeRating::ThirteenPlus),
        Some(AgeRating::SixteenPlus),
        Some(AgeRating::EighteenPlus),
        None,
    ];
    (0..n)
        .map(|i| Record {
            id: i as i64 + 1,
            title: format!("Title {i:06}"),
            year: 1950 + (i % 70) as i64,
            age: ages[i % ages.len()],
            rating_imdb: (i % 11 != 0).then(|| (i % 100) as f64),
            rating_rotten_tomatoes: (i % 101) as f64,
            is_on_netflix: (i % 2) as i64,
            is_on_hulu: (i % 3 == 0) as i64,
            is_on_prime_video: (i % 5 == 0) as i64,
            is_on_disney: (i % 7 == 0) as i64,
        })
        .collect()
}

fn bench_query(c: &mut Criterion) {
    let records = synthetic_records(20_000);

    let unfiltered = QueryRequest::new().page(10, 50);
    c.bench_function("select_page_by_id", |b| {
        b.iter(|| select_page(black_box(&records), black_box(&unfiltered)).unwrap())
    });

    // Heavy ties: 70 distinct years over 20k rows.
    let by_year = QueryRequest::new().sorted_by(Column::Year).page(40, 25);
    c.bench_function("select_page_by_year", |b| {
        b.iter(|| select_page(black_box(&records), black_box(&by_year)).unwrap())
    });

    let filtered = QueryRequest::new()
        .with_predicate(Predicate::contains(Column::Title, "12"))
        .with_predicate(Predicate::parse("rating_imdb", ">=", "50").unwrap())
        .sorted_by(Column::RatingRottenTomatoes)
        .page(2, 6);
    c.bench_function("run_query_filtered", |b| {
        b.iter(|| run_query(black_box(&records), black_box(&filtered)).unwrap())
    });
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
