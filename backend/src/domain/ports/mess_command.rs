//! Driving port for mess registry mutations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, DayMenu, Error, Mess, MessDraft, MessId};

/// Response from verifying a mess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyMessResponse {
    pub mess: Mess,
    /// `false` when the mess was already verified.
    pub changed: bool,
}

#[async_trait]
pub trait MessCommand: Send + Sync {
    /// Register an unverified mess owned by the calling owner.
    async fn register_mess(&self, actor: &Actor, draft: MessDraft) -> Result<Mess, Error>;

    /// Mark a mess verified. Repeating the call is a no-op.
    async fn verify_mess(&self, actor: &Actor, mess_id: MessId)
    -> Result<VerifyMessResponse, Error>;

    /// Replace the whole weekly menu of a mess the caller owns.
    async fn update_menu(
        &self,
        actor: &Actor,
        mess_id: MessId,
        days: Vec<DayMenu>,
    ) -> Result<Mess, Error>;
}
