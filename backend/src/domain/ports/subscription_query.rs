//! Driving port for subscription listings.

use async_trait::async_trait;

use crate::domain::{Actor, Error, SubscriptionView};

#[async_trait]
pub trait SubscriptionQuery: Send + Sync {
    /// The calling student's subscriptions, newest first, each with its
    /// mess details and expiry evaluated against today.
    async fn list_my_subscriptions(&self, actor: &Actor) -> Result<Vec<SubscriptionView>, Error>;
}
