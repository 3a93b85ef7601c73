//! Driving port for the complaint workflow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, Complaint, ComplaintId, Error, MessId, UserId};

/// Request to file a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileComplaintRequest {
    pub mess_id: MessId,
    pub subject: String,
    pub description: String,
}

/// Administrator warning to a mess owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendWarningRequest {
    pub owner_id: UserId,
    pub message: String,
}

#[async_trait]
pub trait ComplaintCommand: Send + Sync {
    async fn file_complaint(
        &self,
        actor: &Actor,
        request: FileComplaintRequest,
    ) -> Result<Complaint, Error>;

    /// `pending -> resolved`; `invalid_state` from any other status.
    async fn resolve(&self, actor: &Actor, id: ComplaintId) -> Result<Complaint, Error>;

    /// `pending -> dismissed`; `invalid_state` from any other status.
    async fn dismiss(&self, actor: &Actor, id: ComplaintId) -> Result<Complaint, Error>;

    /// Log and deliver a warning. Nothing is persisted.
    async fn send_warning(&self, actor: &Actor, request: SendWarningRequest) -> Result<(), Error>;
}
