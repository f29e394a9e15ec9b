//! In-memory rating store keyed by entity id.

use super::{check_consistency, RatedEntity, RatingSummary, RatingValue};
use crate::error::ModeratorResult;
use dashmap::DashMap;

/// Rating state for many entities.
///
/// Each submission runs while holding the exclusive map guard for its
/// entity, so submissions to one entity are serialized while different
/// entities proceed in parallel.
#[derive(Debug, Default)]
pub struct RatingBook {
    entities: DashMap<String, RatedEntity>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads previously stored state for `entity_id`, replacing any present.
    /// State whose aggregate disagrees with its entries is refused.
    pub fn insert(&self, entity_id: impl Into<String>, entity: RatedEntity) -> ModeratorResult<()> {
        check_consistency(&entity.aggregate, &entity.entries)?;
        self.entities.insert(entity_id.into(), entity);
        Ok(())
    }

    /// Records a rating for `entity_id`. Invalid values leave the book as it was.
    pub fn submit(&self, entity_id: &str, rater_id: &str, value: i64) -> ModeratorResult<RatingSummary> {
        let value = RatingValue::new(value)?;
        let mut entity = self.entities.entry(entity_id.to_string()).or_default();
        entity.submit(rater_id, i64::from(value.get()))
    }

    /// Summary for `entity_id`; an unknown entity is unrated.
    pub fn summary(&self, entity_id: &str) -> RatingSummary {
        self.entities
            .get(entity_id)
            .map(|entity| entity.summary())
            .unwrap_or(RatingSummary {
                count: 0,
                average: 0.0,
            })
    }

    /// A copy of the stored state for `entity_id`.
    pub fn get(&self, entity_id: &str) -> Option<RatedEntity> {
        self.entities.get(entity_id).map(|entity| entity.clone())
    }

    /// Drops the ratings of a deleted entity.
    pub fn remove(&self, entity_id: &str) -> Option<RatedEntity> {
        self.entities.remove(entity_id).map(|(_, entity)| entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModeratorError;
    use std::thread;

    #[test]
    fn test_concurrent_submissions_are_not_lost() {
        let book = RatingBook::new();

        thread::scope(|s| {
            for t in 0..8 {
                let book = &book;
                s.spawn(move || {
                    for i in 0..50 {
                        let rater = format!("rater-{}-{}", t, i);
                        book.submit("recipe-1", &rater, (i % 5) + 1).unwrap();
                        // Re-rating must never add a second entry.
                        book.submit("recipe-1", &rater, 5).unwrap();
                        book.submit("post-1", "same-rater", (t % 5) + 1).unwrap();
                    }
                });
            }
        });

        let recipe = book.get("recipe-1").unwrap();
        assert_eq!(recipe.aggregate.count, 400);
        assert_eq!(recipe.aggregate.sum, 2000);
        assert!(recipe.is_consistent());

        let post = book.get("post-1").unwrap();
        assert_eq!(post.aggregate.count, 1);
        assert!(post.is_consistent());
    }

    #[test]
    fn test_invalid_value_creates_nothing() {
        let book = RatingBook::new();
        assert!(book.submit("recipe-1", "u1", 0).is_err());
        assert!(book.is_empty());
        assert_eq!(book.summary("recipe-1").count, 0);
    }

    #[test]
    fn test_insert_loads_stored_state() {
        let mut stored = RatedEntity::new();
        stored.submit("u1", 4).unwrap();
        stored.submit("u2", 2).unwrap();

        let book = RatingBook::new();
        book.insert("recipe-7", stored).unwrap();
        let summary = book.submit("recipe-7", "u1", 5).unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, 3.5);
    }

    #[test]
    fn test_insert_refuses_drifted_state() {
        let mut stored = RatedEntity::new();
        stored.submit("u1", 4).unwrap();
        stored.aggregate.count = 0;

        let book = RatingBook::new();
        assert!(matches!(
            book.insert("recipe-7", stored),
            Err(ModeratorError::InconsistentRating { .. })
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_remove() {
        let book = RatingBook::new();
        book.submit("post-9", "u1", 3).unwrap();
        assert!(book.remove("post-9").is_some());
        assert!(book.get("post-9").is_none());
    }
}
