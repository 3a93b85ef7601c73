//! Notification sink that writes each message to the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Notification, NotificationError, NotificationSink};

/// Emits every notification as a structured `info` event on the
/// `notifications` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        let payload = serde_json::to_string(notification)
            .map_err(|err| NotificationError::delivery(format!("encode notification: {err}")))?;
        info!(target: "notifications", %payload, "notification dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessId, UserId};

    #[tokio::test]
    async fn dispatches_every_kind() {
        let sink = TracingNotificationSink;
        let owner_id = UserId::random();
        let notifications = [
            Notification::MessVerified {
                owner_id: owner_id.clone(),
                mess_id: MessId::random(),
                mess_name: "Annapurna Mess".to_owned(),
            },
            Notification::OwnerWarning {
                owner_id,
                issued_by: UserId::random(),
                message: "Improve hygiene".to_owned(),
            },
        ];
        for notification in &notifications {
            sink.notify(notification).await.expect("logged");
        }
    }

    #[test]
    fn notifications_are_tagged_by_kind() {
        let value = serde_json::to_value(Notification::OwnerWarning {
            owner_id: UserId::random(),
            issued_by: UserId::random(),
            message: "Improve hygiene".to_owned(),
        })
        .expect("serialise");
        assert_eq!(value["kind"], "owner_warning");
    }
}
