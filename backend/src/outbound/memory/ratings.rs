//! `RatingRepository` over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{RatingRepository, RatingRepositoryError};
use crate::domain::{MessId, Rating, RatingAggregate};

use super::{InMemoryStore, newest_first};

#[async_trait]
impl RatingRepository for InMemoryStore {
    async fn record(&self, rating: &Rating) -> Result<RatingAggregate, RatingRepositoryError> {
        let mut tables = self.lock(RatingRepositoryError::query)?;
        let aggregate = {
            let mess = tables
                .messes
                .iter_mut()
                .find(|m| m.id() == rating.mess_id)
                .ok_or_else(|| RatingRepositoryError::mess_not_found(rating.mess_id))?;
            mess.rating_mut().record(rating.value);
            *mess.rating()
        };
        tables.ratings.push(rating.clone());
        Ok(aggregate)
    }

    async fn list_by_mess(&self, mess_id: MessId) -> Result<Vec<Rating>, RatingRepositoryError> {
        let tables = self.lock(RatingRepositoryError::query)?;
        let mut rows: Vec<Rating> = tables
            .ratings
            .iter()
            .filter(|r| r.mess_id == mess_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |r| r.created_at);
        Ok(rows)
    }
}
