use chrono::{Datelike, NaiveDate};
use log::debug;
use rand::seq::index;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::types::ResultSet;

/// `YYYYMMDD` read as an integer, e.g. 2025-06-01 -> 20250601.
pub fn date_seed(date: NaiveDate) -> u64 {
    let value = date.year() as i64 * 10_000 + date.month() as i64 * 100 + date.day() as i64;
    value as u64
}

/// SplitMix64. Kept local so a date always maps to the same picks regardless
/// of which generator `rand` ships as its default.
#[derive(Debug, Clone)]
pub struct DailyRng {
    state: u64,
}

impl DailyRng {
    pub fn new(seed: u64) -> Self {
        DailyRng { state: seed }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        DailyRng::new(date_seed(date))
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl RngCore for DailyRng {
    fn next_u32(&mut self) -> u32 {
        (self.next() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnInsufficient {
    /// Hand back the whole (undersized) set in dataset order.
    ReturnAll,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplePolicy {
    pub sample_size: usize,
    pub min_required: usize,
    pub on_insufficient: OnInsufficient,
}

impl SamplePolicy {
    /// Three picks, only once at least three records matched.
    pub fn three_of_at_least_three() -> Self {
        SamplePolicy {
            sample_size: 3,
            min_required: 3,
            on_insufficient: OnInsufficient::Fail,
        }
    }

    pub fn five_of_at_least_three() -> Self {
        SamplePolicy {
            sample_size: 5,
            min_required: 3,
            on_insufficient: OnInsufficient::Fail,
        }
    }

    /// Up to five picks from any non-empty result.
    pub fn up_to_five() -> Self {
        SamplePolicy {
            sample_size: 5,
            min_required: 1,
            on_insufficient: OnInsufficient::Fail,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(QueryError::Validation(
                "sample size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SamplePolicy {
    fn default() -> Self {
        SamplePolicy::three_of_at_least_three()
    }
}

pub fn daily_sample<'a>(
    result: &ResultSet<'a>,
    policy: &SamplePolicy,
    date: NaiveDate,
) -> Result<ResultSet<'a>> {
    policy.validate()?;

    let available = result.len();
    if available < policy.min_required {
        return match policy.on_insufficient {
            OnInsufficient::ReturnAll => Ok(result.clone()),
            OnInsufficient::Fail => Err(QueryError::InsufficientData {
                available,
                required: policy.min_required,
            }),
        };
    }

    let amount = policy.sample_size.min(available);
    let mut rng = DailyRng::for_date(date);
    let picks = index::sample(&mut rng, available, amount);
    debug!(
        "Sampled {} of {} records for {}",
        amount,
        available,
        date.format("%Y-%m-%d")
    );

    let records = result.records();
    Ok(picks.into_iter().map(|ix| records[ix]).collect())
}

#[cfg(test)]
#[path = "./sampling_test.rs"]
mod sampling_test;
