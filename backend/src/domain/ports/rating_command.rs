//! Driving port for rating submission.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, Error, MessId, Rating, RatingAggregate};

/// Request to rate a mess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub mess_id: MessId,
    /// Raw star value; must be in `1..=5`.
    pub value: i64,
    #[serde(default)]
    pub review: Option<String>,
}

/// Stored rating and the mess aggregate after it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingResponse {
    pub rating: Rating,
    pub aggregate: RatingAggregate,
}

#[async_trait]
pub trait RatingCommand: Send + Sync {
    async fn submit_rating(
        &self,
        actor: &Actor,
        request: SubmitRatingRequest,
    ) -> Result<SubmitRatingResponse, Error>;
}
