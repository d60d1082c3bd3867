use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use filming_locations::{
    engine::{CategoryMode, GroupKey, LocationQueryEngine, MatchMode, SearchCriterion},
    sampling::SamplePolicy,
    types::{Dataset, MediaType, PlaceType, Record},
};

const REGIONS: [&str; 6] = ["서울", "부산", "경기", "강원", "제주", "대구"];
const DISTRICTS: [&str; 4] = ["중구", "동구", "남구", "북구"];
const PLACE_TYPES: [&str; 6] = ["cafe", "playground", "restaurant", "stay", "station", "store"];
const MEDIA_TYPES: [&str; 4] = ["drama", "movie", "show", "artist"];

fn synthetic_dataset(n: usize) -> Dataset {
    let records = (0..n)
        .map(|i| Record {
            title: format!("작품 {}", i % 500),
            media_type: MediaType::from(MEDIA_TYPES[(i % 500) % MEDIA_TYPES.len()]),
            place_type: PlaceType::from(PLACE_TYPES[i % PLACE_TYPES.len()]),
            address: format!(
                "{} {} {}번길",
                REGIONS[i % REGIONS.len()],
                DISTRICTS[(i / 7) % DISTRICTS.len()],
                i
            ),
            latitude: Some(33.0 + (i % 500) as f64 / 100.0),
            longitude: Some(126.0 + (i % 300) as f64 / 100.0),
            ..Default::default()
        })
        .collect();
    Dataset::new(records)
}

fn queries(c: &mut Criterion) {
    let engine = LocationQueryEngine::new(synthetic_dataset(50_000)).unwrap();
    let all = engine.all();

    c.bench_function("search_address", |b| {
        let criterion = SearchCriterion::by_address("경기 남구");
        b.iter(|| {
            let _result = engine.search(black_box(&criterion));
        })
    });

    c.bench_function("search_title_substring", |b| {
        let criterion = SearchCriterion::by_title("작품 12", MatchMode::Substring);
        b.iter(|| {
            let _result = engine.search(black_box(&criterion));
        })
    });

    c.bench_function("category_distribution", |b| {
        b.iter(|| {
            let _result = engine.category_distribution(black_box(&all), CategoryMode::FixedOrder);
        })
    });

    c.bench_function("regional_counts", |b| {
        b.iter(|| {
            let _result = engine.regional_counts(black_box(&all), &REGIONS, None);
        })
    });

    c.bench_function("group_centroids", |b| {
        b.iter(|| {
            let _result = engine.group_centroids(black_box(&all), GroupKey::Title);
        })
    });

    c.bench_function("daily_sample", |b| {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let policy = SamplePolicy::up_to_five();
        b.iter(|| {
            let _result = engine.daily_sample(black_box(&all), &policy, black_box(date));
        })
    });
}

criterion_group!(benches, queries);
criterion_main!(benches);
