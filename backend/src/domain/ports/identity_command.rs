//! Driving port for user signup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Role, User};

/// Request to register a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub display_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Create a user.
    ///
    /// # Errors
    ///
    /// - `invalid_request` for a malformed name, email or phone.
    /// - `conflict` when the email address is already registered.
    async fn register_user(&self, request: RegisterUserRequest) -> Result<User, Error>;
}
