//! Rating services.
//!
//! Submitting a rating delegates the insert and the aggregate update to a
//! single [`RatingRepository::record`] call, so the mean and count always
//! move together.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::identity_service::map_user_error;
use crate::domain::mess_service::map_mess_error;
use crate::domain::ports::{
    MessRepository, RatingCommand, RatingQuery, RatingRepository, RatingRepositoryError,
    SubmitRatingRequest, SubmitRatingResponse, UserRepository,
};
use crate::domain::{
    Actor, Capability, Error, MessId, Rating, RatingId, RatingValue, User, UserId,
};

/// Maximum length of a written review, in characters.
pub const REVIEW_MAX: usize = 1000;

fn map_rating_error(error: RatingRepositoryError) -> Error {
    match error {
        RatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        RatingRepositoryError::Query { message } => {
            Error::internal(format!("rating repository error: {message}"))
        }
        RatingRepositoryError::MessNotFound { mess_id } => {
            Error::not_found(format!("mess {mess_id} not found"))
        }
    }
}

fn normalise_review(review: Option<String>) -> Result<Option<String>, Error> {
    let review = review
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty());
    if review
        .as_ref()
        .is_some_and(|text| text.chars().count() > REVIEW_MAX)
    {
        return Err(Error::invalid_request(format!(
            "review must be at most {REVIEW_MAX} characters"
        )));
    }
    Ok(review)
}

/// Rating service implementing the rating driving ports.
#[derive(Clone)]
pub struct RatingService<R, M, U> {
    rating_repo: Arc<R>,
    mess_repo: Arc<M>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, M, U> RatingService<R, M, U> {
    pub fn new(
        rating_repo: Arc<R>,
        mess_repo: Arc<M>,
        user_repo: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rating_repo,
            mess_repo,
            user_repo,
            clock,
        }
    }
}

impl<R, M, U> RatingService<R, M, U>
where
    R: RatingRepository,
    M: MessRepository,
    U: UserRepository,
{
    async fn student(&self, user_id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<R, M, U> RatingCommand for RatingService<R, M, U>
where
    R: RatingRepository,
    M: MessRepository,
    U: UserRepository,
{
    async fn submit_rating(
        &self,
        actor: &Actor,
        request: SubmitRatingRequest,
    ) -> Result<SubmitRatingResponse, Error> {
        actor.require(Capability::SubmitRating)?;
        let value = RatingValue::new(request.value)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let review = normalise_review(request.review)?;
        let student = self.student(&actor.user_id).await?;

        let rating = Rating {
            id: RatingId::random(),
            mess_id: request.mess_id,
            student_id: actor.user_id.clone(),
            student_name: student.display_name().clone(),
            value,
            review,
            created_at: self.clock.utc(),
        };
        let aggregate = self
            .rating_repo
            .record(&rating)
            .await
            .map_err(map_rating_error)?;

        info!(
            mess_id = %rating.mess_id,
            value = rating.value.get(),
            count = aggregate.count(),
            average = %aggregate.average(),
            "rating recorded"
        );
        Ok(SubmitRatingResponse { rating, aggregate })
    }
}

#[async_trait]
impl<R, M, U> RatingQuery for RatingService<R, M, U>
where
    R: RatingRepository,
    M: MessRepository,
    U: UserRepository,
{
    async fn list_ratings(&self, mess_id: MessId) -> Result<Vec<Rating>, Error> {
        if self
            .mess_repo
            .find_by_id(mess_id)
            .await
            .map_err(map_mess_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("mess {mess_id} not found")));
        }
        self.rating_repo
            .list_by_mess(mess_id)
            .await
            .map_err(map_rating_error)
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;
