//! User signup and lookup services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    IdentityCommand, IdentityQuery, RegisterUserRequest, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Actor, Capability, DisplayName, EmailAddress, Error, User, UserDraft, UserId,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
    }
}

/// Identity service implementing the signup and lookup driving ports.
#[derive(Clone)]
pub struct IdentityService<U> {
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> IdentityService<U> {
    pub fn new(user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }
}

impl<U> IdentityService<U>
where
    U: UserRepository,
{
    fn build_user(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let invalid = |err| Error::invalid_request(format!("invalid user: {err}"));
        let display_name = DisplayName::new(request.display_name).map_err(invalid)?;
        let email = EmailAddress::new(request.email).map_err(invalid)?;
        User::new(UserDraft {
            id: UserId::random(),
            display_name,
            email,
            role: request.role,
            phone: request.phone,
            created_at: self.clock.utc(),
        })
        .map_err(invalid)
    }
}

#[async_trait]
impl<U> IdentityCommand for IdentityService<U>
where
    U: UserRepository,
{
    async fn register_user(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let user = self.build_user(request)?;

        if self
            .user_repo
            .find_by_email(user.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "email {} is already registered",
                user.email()
            )));
        }

        self.user_repo
            .insert(&user)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U> IdentityQuery for IdentityService<U>
where
    U: UserRepository,
{
    async fn get_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error> {
        actor.require(Capability::ListUsers)?;
        self.user_repo.list_all().await.map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
