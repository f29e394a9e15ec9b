//! Star ratings and their cached aggregate.
//!
//! A rated entity (a post or a recipe) carries a list of [`RatingEntry`]s and
//! a [`RatingAggregate`] `{count, sum}` derived from it. The aggregate is a
//! cache: `count` is always the number of entries and `sum` the total of
//! their values. [`RatingAccumulator`] is the only mutation path and moves
//! both together, never leaving a half-applied state. State that arrives out
//! of sync is refused with [`ModeratorError::InconsistentRating`] rather than
//! updated.
//!
//! # Concurrency
//!
//! The accumulator takes no locks. Callers must serialize submissions per
//! entity id: hold a row lock, run an optimistic re-read-and-retry loop, or
//! route each entity through a single writer. Submissions for different
//! entities have no ordering requirement and may run fully in parallel.
//! [`RatingBook`] is an in-memory host that follows this discipline.

pub mod book;

pub use book::RatingBook;

use crate::error::{ModeratorError, ModeratorResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted star rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted star rating.
pub const MAX_RATING: i64 = 5;

/// A validated star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    pub fn new(value: i64) -> ModeratorResult<Self> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ModeratorError::InvalidRatingValue { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = ModeratorError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

/// One rater's rating of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub rater_id: String,
    pub value: RatingValue,
    pub rated_at: DateTime<Utc>,
}

/// Cached `{count, sum}` over an entity's rating entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub count: u64,
    pub sum: u64,
}

impl RatingAggregate {
    /// Recomputes the aggregate from scratch.
    pub fn from_entries(entries: &[RatingEntry]) -> Self {
        Self {
            count: entries.len() as u64,
            sum: entries.iter().map(|e| u64::from(e.value.get())).sum(),
        }
    }

    /// Mean rating rounded to two decimals, 0.0 when unrated.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.sum as f64 / self.count as f64;
        (mean * 100.0).round() / 100.0
    }

    pub fn summary(&self) -> RatingSummary {
        RatingSummary {
            count: self.count,
            average: self.average(),
        }
    }
}

/// Fails unless `aggregate` is exactly what `entries` add up to and no rater
/// appears twice.
pub fn check_consistency(aggregate: &RatingAggregate, entries: &[RatingEntry]) -> ModeratorResult<()> {
    let actual = RatingAggregate::from_entries(entries);
    if *aggregate != actual {
        return Err(ModeratorError::InconsistentRating {
            reason: format!(
                "cached aggregate has count {} and sum {}, entries give count {} and sum {}",
                aggregate.count, aggregate.sum, actual.count, actual.sum
            ),
        });
    }

    let mut raters: Vec<&str> = entries.iter().map(|e| e.rater_id.as_str()).collect();
    raters.sort_unstable();
    if let Some(pair) = raters.windows(2).find(|w| w[0] == w[1]) {
        return Err(ModeratorError::InconsistentRating {
            reason: format!("rater '{}' appears more than once", pair[0]),
        });
    }

    Ok(())
}

/// Mean rating of `aggregate`, rounded to two decimals.
pub fn average_rating(aggregate: &RatingAggregate) -> f64 {
    aggregate.average()
}

/// Display form of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: u64,
    pub average: f64,
}

/// Applies rating submissions to a detached `{aggregate, entries}` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingAccumulator;

impl RatingAccumulator {
    /// Records `value` from `rater_id`, timestamped now.
    ///
    /// A rater who already rated has their entry updated in place and the sum
    /// adjusted by the difference; otherwise a new entry is appended. Inputs
    /// are not modified; on error nothing changes. An `aggregate` that does
    /// not match `entries` fails with [`ModeratorError::InconsistentRating`].
    pub fn submit_rating(
        aggregate: &RatingAggregate,
        entries: &[RatingEntry],
        rater_id: &str,
        value: i64,
    ) -> ModeratorResult<(RatingAggregate, Vec<RatingEntry>)> {
        Self::submit_rating_at(aggregate, entries, rater_id, value, Utc::now())
    }

    /// [`submit_rating`](Self::submit_rating) with an explicit timestamp.
    pub fn submit_rating_at(
        aggregate: &RatingAggregate,
        entries: &[RatingEntry],
        rater_id: &str,
        value: i64,
        rated_at: DateTime<Utc>,
    ) -> ModeratorResult<(RatingAggregate, Vec<RatingEntry>)> {
        let value = RatingValue::new(value)?;
        check_consistency(aggregate, entries)?;
        let mut aggregate = *aggregate;
        let mut entries = entries.to_vec();
        Self::apply(&mut aggregate, &mut entries, rater_id, value, rated_at);
        Ok((aggregate, entries))
    }

    fn apply(
        aggregate: &mut RatingAggregate,
        entries: &mut Vec<RatingEntry>,
        rater_id: &str,
        value: RatingValue,
        rated_at: DateTime<Utc>,
    ) {
        let new = u64::from(value.get());

        match entries.iter_mut().find(|e| e.rater_id == rater_id) {
            Some(existing) => {
                let old = u64::from(existing.value.get());
                existing.value = value;
                existing.rated_at = rated_at;
                // Consistent state guarantees the old value is part of the sum.
                aggregate.sum = aggregate.sum - old + new;
                tracing::debug!(rater = rater_id, old, new, "rating updated");
            }
            None => {
                entries.push(RatingEntry {
                    rater_id: rater_id.to_string(),
                    value,
                    rated_at,
                });
                aggregate.count += 1;
                aggregate.sum += new;
                tracing::debug!(rater = rater_id, new, "rating added");
            }
        }
    }
}

/// The rating state attached to one post or recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedEntity {
    #[serde(default)]
    pub aggregate: RatingAggregate,
    #[serde(default)]
    pub entries: Vec<RatingEntry>,
}

impl RatedEntity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an entity from stored entries, recomputing the aggregate.
    pub fn from_entries(entries: Vec<RatingEntry>) -> Self {
        Self {
            aggregate: RatingAggregate::from_entries(&entries),
            entries,
        }
    }

    /// Submits a rating, timestamped now. All-or-nothing.
    pub fn submit(&mut self, rater_id: &str, value: i64) -> ModeratorResult<RatingSummary> {
        self.submit_at(rater_id, value, Utc::now())
    }

    pub fn submit_at(
        &mut self,
        rater_id: &str,
        value: i64,
        rated_at: DateTime<Utc>,
    ) -> ModeratorResult<RatingSummary> {
        let value = RatingValue::new(value)?;
        check_consistency(&self.aggregate, &self.entries)?;
        RatingAccumulator::apply(
            &mut self.aggregate,
            &mut self.entries,
            rater_id,
            value,
            rated_at,
        );
        Ok(self.summary())
    }

    pub fn summary(&self) -> RatingSummary {
        self.aggregate.summary()
    }

    /// The rating given by `rater_id`, if any.
    pub fn rating_by(&self, rater_id: &str) -> Option<RatingValue> {
        self.entries
            .iter()
            .find(|e| e.rater_id == rater_id)
            .map(|e| e.value)
    }

    /// Checks the cached aggregate against the entries and that no rater
    /// appears twice.
    pub fn is_consistent(&self) -> bool {
        check_consistency(&self.aggregate, &self.entries).is_ok()
    }
}
