//! Port for rating persistence.

use async_trait::async_trait;

use crate::domain::{MessId, Rating, RatingAggregate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rating repository adapters.
    pub enum RatingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "rating repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rating repository query failed: {message}",
        /// The rated mess does not exist.
        MessNotFound { mess_id: MessId } => "mess {mess_id} not found",
    }
}

/// Rating storage.
///
/// # Atomicity
///
/// [`RatingRepository::record`] inserts the rating row and folds its value
/// into the mess's [`RatingAggregate`] as one unit. Adapters must serialise
/// concurrent calls for the same mess so no reader observes the count
/// without the matching total, and no update is lost.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Store `rating` and return the mess's aggregate after the insert.
    async fn record(&self, rating: &Rating) -> Result<RatingAggregate, RatingRepositoryError>;

    /// Ratings for a mess, newest first.
    async fn list_by_mess(&self, mess_id: MessId) -> Result<Vec<Rating>, RatingRepositoryError>;
}
