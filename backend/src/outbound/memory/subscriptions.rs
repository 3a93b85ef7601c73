//! `SubscriptionRepository` over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{MessId, Subscription, SubscriptionId, UserId};

use super::{InMemoryStore, newest_first};

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn insert(&self, subscription: &Subscription) -> Result<(), SubscriptionRepositoryError> {
        let mut tables = self.lock(SubscriptionRepositoryError::query)?;
        let order_id = &subscription.payment().order_id;
        if tables
            .subscriptions
            .iter()
            .any(|s| &s.payment().order_id == order_id)
        {
            return Err(SubscriptionRepositoryError::duplicate_payment_order(
                order_id.as_str(),
            ));
        }
        tables.subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn save(
        &self,
        subscription: &Subscription,
        expected_revision: u32,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut tables = self.lock(SubscriptionRepositoryError::query)?;
        let stored = tables
            .subscriptions
            .iter_mut()
            .find(|s| s.id() == subscription.id())
            .ok_or_else(|| SubscriptionRepositoryError::not_found(subscription.id()))?;
        if stored.revision() != expected_revision {
            return Err(SubscriptionRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision(),
            ));
        }
        *stored = subscription.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        let tables = self.lock(SubscriptionRepositoryError::query)?;
        Ok(tables.subscriptions.iter().find(|s| s.id() == id).cloned())
    }

    async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        let tables = self.lock(SubscriptionRepositoryError::query)?;
        Ok(tables
            .subscriptions
            .iter()
            .find(|s| s.payment().order_id == order_id)
            .cloned())
    }

    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
        let tables = self.lock(SubscriptionRepositoryError::query)?;
        let mut rows: Vec<Subscription> = tables
            .subscriptions
            .iter()
            .filter(|s| s.student_id() == student_id)
            .cloned()
            .collect();
        newest_first(&mut rows, Subscription::created_at);
        Ok(rows)
    }

    async fn list_by_messes(
        &self,
        mess_ids: &[MessId],
    ) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
        let tables = self.lock(SubscriptionRepositoryError::query)?;
        let mut rows: Vec<Subscription> = tables
            .subscriptions
            .iter()
            .filter(|s| mess_ids.contains(&s.mess_id()))
            .cloned()
            .collect();
        newest_first(&mut rows, Subscription::created_at);
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
        let tables = self.lock(SubscriptionRepositoryError::query)?;
        let mut rows = tables.subscriptions.clone();
        newest_first(&mut rows, Subscription::created_at);
        Ok(rows)
    }
}
