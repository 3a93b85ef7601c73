//! Port for outbound notifications (email, push, ...).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ComplaintId, MessId, SubscriptionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotificationError {
        /// The message could not be handed to the delivery channel.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// Messages the engine emits. Delivery is best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Sent to the student after a paid subscription is created.
    SubscriptionConfirmed {
        student_id: UserId,
        subscription_id: SubscriptionId,
        mess_name: String,
    },
    /// Sent to the administrator when a student files a complaint.
    ComplaintFiled {
        complaint_id: ComplaintId,
        mess_id: MessId,
        subject: String,
    },
    /// Sent to the owner when an administrator verifies their mess.
    MessVerified {
        owner_id: UserId,
        mess_id: MessId,
        mess_name: String,
    },
    /// Administrator warning delivered to a mess owner.
    OwnerWarning {
        owner_id: UserId,
        issued_by: UserId,
        message: String,
    },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Sink that drops every notification. Use it in tests where delivery is
/// not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSink;

#[async_trait]
impl NotificationSink for FixtureNotificationSink {
    async fn notify(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Ok(())
    }
}
