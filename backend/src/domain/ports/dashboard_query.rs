//! Driving port for dashboard projections.

use async_trait::async_trait;

use crate::domain::{Actor, AdminDashboard, Error, OwnerDashboard};

#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Figures for the calling owner's messes.
    async fn owner_dashboard(&self, actor: &Actor) -> Result<OwnerDashboard, Error>;

    /// Platform-wide counts. Administrators only.
    async fn admin_dashboard(&self, actor: &Actor) -> Result<AdminDashboard, Error>;
}
