//! Port for mess persistence.
//!
//! Mutations are targeted: verifying a mess or replacing its menu touches
//! only that column, so neither can overwrite a rating aggregate that the
//! rating adapter updated concurrently.

use async_trait::async_trait;

use crate::domain::{Mess, MessId, MessSearch, UserId, WeeklyMenu};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mess repository adapters.
    pub enum MessRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "mess repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "mess repository query failed: {message}",
        /// The targeted mess does not exist.
        NotFound { mess_id: MessId } => "mess {mess_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessRepository: Send + Sync {
    async fn insert(&self, mess: &Mess) -> Result<(), MessRepositoryError>;

    async fn find_by_id(&self, id: MessId) -> Result<Option<Mess>, MessRepositoryError>;

    /// Verified messes matching `filter`, ordered by name.
    async fn search(&self, filter: &MessSearch) -> Result<Vec<Mess>, MessRepositoryError>;

    /// Messes owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Mess>, MessRepositoryError>;

    /// Every mess, newest first.
    async fn list_all(&self) -> Result<Vec<Mess>, MessRepositoryError>;

    /// Set the verification flag and return the updated mess together with
    /// whether the flag changed.
    async fn set_verified(&self, id: MessId) -> Result<(Mess, bool), MessRepositoryError>;

    /// Replace the weekly menu and return the updated mess.
    async fn replace_menu(
        &self,
        id: MessId,
        menu: &WeeklyMenu,
    ) -> Result<Mess, MessRepositoryError>;
}
