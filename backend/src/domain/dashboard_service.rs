//! Dashboard projections recomputed from stored rows on each read.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::complaint_service::map_complaint_error;
use crate::domain::identity_service::map_user_error;
use crate::domain::mess_service::map_mess_error;
use crate::domain::ports::{
    ComplaintRepository, DashboardQuery, MessRepository, SubscriptionRepository, UserRepository,
};
use crate::domain::subscription_service::map_subscription_error;
use crate::domain::{
    Actor, AdminDashboard, Capability, Complaint, Error, MealSchedule, Mess, OwnerDashboard,
};

/// Dashboard service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService<U, M, S, C> {
    user_repo: Arc<U>,
    mess_repo: Arc<M>,
    subscription_repo: Arc<S>,
    complaint_repo: Arc<C>,
    clock: Arc<dyn Clock>,
    schedule: MealSchedule,
}

impl<U, M, S, C> DashboardService<U, M, S, C> {
    /// `schedule` supplies the local calendar used to decide which
    /// subscriptions have expired.
    pub fn new(
        user_repo: Arc<U>,
        mess_repo: Arc<M>,
        subscription_repo: Arc<S>,
        complaint_repo: Arc<C>,
        clock: Arc<dyn Clock>,
        schedule: MealSchedule,
    ) -> Self {
        Self {
            user_repo,
            mess_repo,
            subscription_repo,
            complaint_repo,
            clock,
            schedule,
        }
    }
}

#[async_trait]
impl<U, M, S, C> DashboardQuery for DashboardService<U, M, S, C>
where
    U: UserRepository,
    M: MessRepository,
    S: SubscriptionRepository,
    C: ComplaintRepository,
{
    async fn owner_dashboard(&self, actor: &Actor) -> Result<OwnerDashboard, Error> {
        actor.require(Capability::ViewOwnerDashboard)?;
        let messes = self
            .mess_repo
            .list_by_owner(&actor.user_id)
            .await
            .map_err(map_mess_error)?;
        let mess_ids: Vec<_> = messes.iter().map(Mess::id).collect();
        let subscriptions = if mess_ids.is_empty() {
            Vec::new()
        } else {
            self.subscription_repo
                .list_by_messes(&mess_ids)
                .await
                .map_err(map_subscription_error)?
        };

        let today = self.schedule.local_date(self.clock.utc());
        let dashboard = OwnerDashboard::compute(&messes, &subscriptions, today);
        debug!(owner_id = %actor.user_id, messes = dashboard.total_messes, "owner dashboard computed");
        Ok(dashboard)
    }

    async fn admin_dashboard(&self, actor: &Actor) -> Result<AdminDashboard, Error> {
        actor.require(Capability::ViewAdminDashboard)?;
        let users = self.user_repo.list_all().await.map_err(map_user_error)?;
        let messes = self.mess_repo.list_all().await.map_err(map_mess_error)?;
        let complaints = self
            .complaint_repo
            .list_all()
            .await
            .map_err(map_complaint_error)?;
        let subscriptions = self
            .subscription_repo
            .list_all()
            .await
            .map_err(map_subscription_error)?;

        let today = self.schedule.local_date(self.clock.utc());
        Ok(AdminDashboard::compute(
            &users,
            &messes,
            complaints.iter().map(Complaint::status),
            &subscriptions,
            today,
        ))
    }
}

#[cfg(test)]
#[path = "dashboard_service_tests.rs"]
mod tests;
