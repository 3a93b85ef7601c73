//! Driving port for the subscription lifecycle.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Actor, Error, MealType, MessId, Plan, SkipOutcome, Subscription, SubscriptionId,
};

use super::{PaymentConfirmation, PaymentOrder};

/// What the student wants to buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDraft {
    pub mess_id: MessId,
    pub plan: Plan,
    pub start_date: NaiveDate,
}

/// Response from creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionResponse {
    pub subscription: Subscription,
    /// Whether the payment order had already funded this subscription.
    pub replayed: bool,
}

/// Request to skip one meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipMealRequest {
    pub subscription_id: SubscriptionId,
    pub date: NaiveDate,
    pub meal: MealType,
}

/// Driving port for subscription operations.
///
/// # Idempotency
///
/// `create_subscription` is keyed on the payment order id: retrying with
/// the same confirmation returns the stored subscription with
/// `replayed: true`. `skip_meal` is keyed on `(subscription, date, meal)`.
///
/// # Optimistic Concurrency
///
/// Transitions racing from the same stale state resolve to one success;
/// the loser fails with `conflict`.
#[async_trait]
pub trait SubscriptionCommand: Send + Sync {
    /// Validate the draft and open a payment order for the plan price.
    async fn create_order(
        &self,
        actor: &Actor,
        draft: SubscriptionDraft,
    ) -> Result<PaymentOrder, Error>;

    /// Create an active subscription from a verified payment.
    async fn create_subscription(
        &self,
        actor: &Actor,
        draft: SubscriptionDraft,
        confirmation: PaymentConfirmation,
    ) -> Result<CreateSubscriptionResponse, Error>;

    async fn pause(&self, actor: &Actor, id: SubscriptionId) -> Result<Subscription, Error>;

    async fn cancel(&self, actor: &Actor, id: SubscriptionId) -> Result<Subscription, Error>;

    async fn skip_meal(&self, actor: &Actor, request: SkipMealRequest)
    -> Result<SkipOutcome, Error>;
}
