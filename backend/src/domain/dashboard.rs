//! Dashboard read models.
//!
//! Both dashboards are computed from stored rows on every read; nothing
//! here is persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ComplaintStatus, Mess, Role, Subscription, User};

/// Figures shown to a mess owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    pub total_messes: u64,
    pub active_subscriptions: u64,
    pub average_rating: Decimal,
    pub total_revenue: Decimal,
}

impl OwnerDashboard {
    /// Fold an owner's messes and the subscriptions to those messes.
    ///
    /// Only subscriptions that are active and unexpired on `today` count
    /// towards `active_subscriptions` and `total_revenue`; revenue uses the
    /// price captured on each subscription.
    pub fn compute(messes: &[Mess], subscriptions: &[Subscription], today: NaiveDate) -> Self {
        let owned: Vec<_> = messes.iter().map(Mess::id).collect();
        let active: Vec<&Subscription> = subscriptions
            .iter()
            .filter(|s| owned.contains(&s.mess_id()) && s.is_effectively_active(today))
            .collect();

        let average_rating = if messes.is_empty() {
            Decimal::ZERO
        } else {
            let sum: Decimal = messes.iter().map(|m| m.rating().average()).sum();
            sum / Decimal::from(messes.len() as u64)
        };

        Self {
            total_messes: messes.len() as u64,
            active_subscriptions: active.len() as u64,
            average_rating,
            total_revenue: active.iter().map(|s| s.price().amount()).sum(),
        }
    }
}

/// Platform-wide counts shown to the administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_students: u64,
    pub total_owners: u64,
    pub total_messes: u64,
    pub unverified_messes: u64,
    pub pending_complaints: u64,
    pub active_subscriptions: u64,
}

impl AdminDashboard {
    pub fn compute(
        users: &[User],
        messes: &[Mess],
        complaint_statuses: impl IntoIterator<Item = ComplaintStatus>,
        subscriptions: &[Subscription],
        today: NaiveDate,
    ) -> Self {
        let count = |role| users.iter().filter(|u| u.role() == role).count() as u64;
        Self {
            total_students: count(Role::Student),
            total_owners: count(Role::Owner),
            total_messes: messes.len() as u64,
            unverified_messes: messes.iter().filter(|m| !m.is_verified()).count() as u64,
            pending_complaints: complaint_statuses
                .into_iter()
                .filter(|status| *status == ComplaintStatus::Pending)
                .count() as u64,
            active_subscriptions: subscriptions
                .iter()
                .filter(|s| s.is_effectively_active(today))
                .count() as u64,
        }
    }
}
