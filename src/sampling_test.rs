use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::{prop_assert, prop_assert_eq, proptest};
use rand::RngCore;

use crate::error::QueryError;
use crate::types::{Record, ResultSet};

use super::{daily_sample, date_seed, DailyRng, OnInsufficient, SamplePolicy};

fn records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            title: format!("title {i}"),
            place_name: format!("place {i}"),
            ..Default::default()
        })
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_date_seed() {
    assert_eq!(date_seed(date(2025, 6, 1)), 20250601);
    assert_eq!(date_seed(date(1999, 12, 31)), 19991231);
}

#[test]
fn test_daily_rng_is_reproducible() {
    let mut a = DailyRng::new(20250601);
    let mut b = DailyRng::new(20250601);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = DailyRng::new(20250602);
    assert_ne!(DailyRng::new(20250601).next_u64(), c.next_u64());
}

#[test]
fn test_fill_bytes_handles_partial_chunks() {
    let mut rng = DailyRng::new(1);
    let mut buf = [0u8; 13];
    rng.fill_bytes(&mut buf);
    assert!(buf.iter().any(|b| *b != 0));
}

#[test]
fn test_sample_size_and_uniqueness() {
    let data = records(20);
    let rs: ResultSet = data.iter().collect();
    let sample = daily_sample(&rs, &SamplePolicy::five_of_at_least_three(), date(2025, 6, 1))
        .unwrap();
    assert_eq!(sample.len(), 5);
    let unique: HashSet<&str> = sample.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(unique.len(), 5);
}

#[test]
fn test_sample_is_capped_by_available() {
    let data = records(4);
    let rs: ResultSet = data.iter().collect();
    let sample = daily_sample(&rs, &SamplePolicy::five_of_at_least_three(), date(2025, 6, 1))
        .unwrap();
    assert_eq!(sample.len(), 4);
}

#[test]
fn test_insufficient_fails() {
    let data = records(2);
    let rs: ResultSet = data.iter().collect();
    let result = daily_sample(&rs, &SamplePolicy::three_of_at_least_three(), date(2025, 6, 1));
    assert!(matches!(
        result,
        Err(QueryError::InsufficientData {
            available: 2,
            required: 3
        })
    ));
}

#[test]
fn test_insufficient_returns_all_unshuffled() {
    let data = records(2);
    let rs: ResultSet = data.iter().collect();
    let policy = SamplePolicy {
        on_insufficient: OnInsufficient::ReturnAll,
        ..SamplePolicy::three_of_at_least_three()
    };
    let result = daily_sample(&rs, &policy, date(2025, 6, 1)).unwrap();
    assert_eq!(result, rs);
}

#[test]
fn test_up_to_five_on_empty_fails() {
    let rs = ResultSet::empty();
    let result = daily_sample(&rs, &SamplePolicy::up_to_five(), date(2025, 6, 1));
    assert!(matches!(result, Err(QueryError::InsufficientData { .. })));
}

#[test]
fn test_zero_sample_size_is_rejected() {
    let data = records(5);
    let rs: ResultSet = data.iter().collect();
    let policy = SamplePolicy {
        sample_size: 0,
        ..SamplePolicy::default()
    };
    assert!(matches!(
        daily_sample(&rs, &policy, date(2025, 6, 1)),
        Err(QueryError::Validation(_))
    ));
}

#[test]
fn test_different_dates_can_differ() {
    let data = records(50);
    let rs: ResultSet = data.iter().collect();
    let policy = SamplePolicy::five_of_at_least_three();
    let first = daily_sample(&rs, &policy, date(2025, 6, 1)).unwrap();
    let differs =
        (2..=28).any(|day| daily_sample(&rs, &policy, date(2025, 6, day)).unwrap() != first);
    assert!(differs);
}

proptest! {
    #[test]
    fn same_date_same_sample(
        n in 0usize..60,
        k in 1usize..8,
        days in 0i64..20_000,
    ) {
        let data = records(n);
        let rs: ResultSet = data.iter().collect();
        let day = date(1990, 1, 1) + chrono::Duration::days(days);
        let policy = SamplePolicy {
            sample_size: k,
            min_required: 1,
            on_insufficient: OnInsufficient::ReturnAll,
        };

        let first = daily_sample(&rs, &policy, day).unwrap();
        let other_day = daily_sample(&rs, &policy, day + chrono::Duration::days(1)).unwrap();
        let second = daily_sample(&rs, &policy, day).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert!(first.len() <= k);
        prop_assert!(other_day.len() == first.len());
    }
}
