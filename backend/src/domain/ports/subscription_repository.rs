//! Port for subscription persistence.

use async_trait::async_trait;

use crate::domain::{MessId, Subscription, SubscriptionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subscription repository query failed: {message}",
        /// A subscription already exists for this payment order.
        DuplicatePaymentOrder { order_id: String } =>
            "payment order {order_id} already funded a subscription",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The subscription to update does not exist.
        NotFound { subscription_id: SubscriptionId } =>
            "subscription {subscription_id} not found",
    }
}

/// Subscription storage with optimistic concurrency.
///
/// # Revision Semantics
///
/// - New subscriptions are inserted at revision 1.
/// - The caller bumps the revision on the entity before calling
///   [`SubscriptionRepository::save`] and passes the revision it read as
///   `expected_revision`; a mismatch fails with
///   [`SubscriptionRepositoryError::RevisionMismatch`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a subscription. Fails with `DuplicatePaymentOrder` when its
    /// payment order id is already stored.
    async fn insert(&self, subscription: &Subscription) -> Result<(), SubscriptionRepositoryError>;

    async fn save(
        &self,
        subscription: &Subscription,
        expected_revision: u32,
    ) -> Result<(), SubscriptionRepositoryError>;

    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError>;

    async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError>;

    /// A student's subscriptions, newest first.
    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Subscription>, SubscriptionRepositoryError>;

    /// Subscriptions to any of `mess_ids`.
    async fn list_by_messes(
        &self,
        mess_ids: &[MessId],
    ) -> Result<Vec<Subscription>, SubscriptionRepositoryError>;

    async fn list_all(&self) -> Result<Vec<Subscription>, SubscriptionRepositoryError>;
}
