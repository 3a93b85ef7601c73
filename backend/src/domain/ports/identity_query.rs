//! Driving port for user lookups.

use async_trait::async_trait;

use crate::domain::{Actor, Error, User, UserId};

#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Fetch one user; `not_found` when absent.
    async fn get_user(&self, user_id: &UserId) -> Result<User, Error>;

    /// Every registered user. Administrators only.
    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error>;
}
