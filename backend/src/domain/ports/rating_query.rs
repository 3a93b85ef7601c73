//! Driving port for rating listings.

use async_trait::async_trait;

use crate::domain::{Error, MessId, Rating};

#[async_trait]
pub trait RatingQuery: Send + Sync {
    /// Ratings of a mess, newest first; `not_found` for an unknown mess.
    async fn list_ratings(&self, mess_id: MessId) -> Result<Vec<Rating>, Error>;
}
