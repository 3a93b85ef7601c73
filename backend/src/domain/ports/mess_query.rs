//! Driving port for mess lookups.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Mess, MessId, MessSearch};

#[async_trait]
pub trait MessQuery: Send + Sync {
    /// Verified messes matching the filter, ordered by name.
    async fn search(&self, filter: &MessSearch) -> Result<Vec<Mess>, Error>;

    /// Full mess detail, verified or not.
    async fn get_mess(&self, mess_id: MessId) -> Result<Mess, Error>;

    /// The calling owner's messes.
    async fn list_owner_messes(&self, actor: &Actor) -> Result<Vec<Mess>, Error>;

    /// Every mess. Administrators only.
    async fn list_all_messes(&self, actor: &Actor) -> Result<Vec<Mess>, Error>;
}
