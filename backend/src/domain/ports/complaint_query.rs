//! Driving port for complaint listings. Results are newest first.

use async_trait::async_trait;

use crate::domain::{Actor, Complaint, Error, MessId};

#[async_trait]
pub trait ComplaintQuery: Send + Sync {
    async fn list_my_complaints(&self, actor: &Actor) -> Result<Vec<Complaint>, Error>;

    /// Complaints against one mess, for its owner or an administrator.
    async fn list_mess_complaints(
        &self,
        actor: &Actor,
        mess_id: MessId,
    ) -> Result<Vec<Complaint>, Error>;

    async fn list_all_complaints(&self, actor: &Actor) -> Result<Vec<Complaint>, Error>;
}
