//! Mess registry services.
//!
//! Owners register and maintain messes; an administrator verifies them.
//! Search only ever returns verified messes, while direct lookups return
//! any mess so its detail page can show a pending badge.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    MessCommand, MessQuery, MessRepository, MessRepositoryError, Notification, NotificationSink,
    VerifyMessResponse,
};
use crate::domain::{
    Actor, Capability, DayMenu, Error, Mess, MessDraft, MessId, MessSearch, WeeklyMenu,
};

pub(crate) fn map_mess_error(error: MessRepositoryError) -> Error {
    match error {
        MessRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("mess repository unavailable: {message}"))
        }
        MessRepositoryError::Query { message } => {
            Error::internal(format!("mess repository error: {message}"))
        }
        MessRepositoryError::NotFound { mess_id } => {
            Error::not_found(format!("mess {mess_id} not found"))
        }
    }
}

/// Deliver a notification, logging instead of failing when delivery breaks.
pub(crate) async fn notify_best_effort<N>(sink: &N, notification: Notification)
where
    N: NotificationSink + ?Sized,
{
    if let Err(error) = sink.notify(&notification).await {
        warn!(%error, ?notification, "notification delivery failed");
    }
}

/// Mess service implementing the registry driving ports.
#[derive(Clone)]
pub struct MessService<M, N> {
    mess_repo: Arc<M>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<M, N> MessService<M, N> {
    pub fn new(mess_repo: Arc<M>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            mess_repo,
            notifier,
            clock,
        }
    }
}

impl<M, N> MessService<M, N>
where
    M: MessRepository,
    N: NotificationSink,
{
    async fn fetch(&self, mess_id: MessId) -> Result<Mess, Error> {
        self.mess_repo
            .find_by_id(mess_id)
            .await
            .map_err(map_mess_error)?
            .ok_or_else(|| Error::not_found(format!("mess {mess_id} not found")))
    }
}

#[async_trait]
impl<M, N> MessCommand for MessService<M, N>
where
    M: MessRepository,
    N: NotificationSink,
{
    async fn register_mess(&self, actor: &Actor, draft: MessDraft) -> Result<Mess, Error> {
        actor.require(Capability::RegisterMess)?;
        let mess = Mess::register(
            MessId::random(),
            actor.user_id.clone(),
            draft,
            self.clock.utc(),
        )
        .map_err(|err| Error::invalid_request(format!("invalid mess: {err}")))?;

        self.mess_repo
            .insert(&mess)
            .await
            .map_err(map_mess_error)?;

        info!(mess_id = %mess.id(), owner_id = %mess.owner_id(), "mess registered");
        Ok(mess)
    }

    async fn verify_mess(
        &self,
        actor: &Actor,
        mess_id: MessId,
    ) -> Result<VerifyMessResponse, Error> {
        actor.require(Capability::VerifyMess)?;
        let (mess, changed) = self
            .mess_repo
            .set_verified(mess_id)
            .await
            .map_err(map_mess_error)?;

        if changed {
            info!(%mess_id, admin_id = %actor.user_id, "mess verified");
            notify_best_effort(
                self.notifier.as_ref(),
                Notification::MessVerified {
                    owner_id: mess.owner_id().clone(),
                    mess_id,
                    mess_name: mess.name().to_owned(),
                },
            )
            .await;
        }

        Ok(VerifyMessResponse { mess, changed })
    }

    async fn update_menu(
        &self,
        actor: &Actor,
        mess_id: MessId,
        days: Vec<DayMenu>,
    ) -> Result<Mess, Error> {
        actor.require(Capability::UpdateMenu)?;
        let menu = WeeklyMenu::new(days)
            .map_err(|err| Error::invalid_request(format!("invalid menu: {err}")))?;

        let mess = self.fetch(mess_id).await?;
        actor.require_self(mess.owner_id(), "mess")?;

        let updated = self
            .mess_repo
            .replace_menu(mess_id, &menu)
            .await
            .map_err(map_mess_error)?;
        info!(%mess_id, "weekly menu replaced");
        Ok(updated)
    }
}

#[async_trait]
impl<M, N> MessQuery for MessService<M, N>
where
    M: MessRepository,
    N: NotificationSink,
{
    async fn search(&self, filter: &MessSearch) -> Result<Vec<Mess>, Error> {
        self.mess_repo.search(filter).await.map_err(map_mess_error)
    }

    async fn get_mess(&self, mess_id: MessId) -> Result<Mess, Error> {
        self.fetch(mess_id).await
    }

    async fn list_owner_messes(&self, actor: &Actor) -> Result<Vec<Mess>, Error> {
        actor.require(Capability::ListOwnMesses)?;
        self.mess_repo
            .list_by_owner(&actor.user_id)
            .await
            .map_err(map_mess_error)
    }

    async fn list_all_messes(&self, actor: &Actor) -> Result<Vec<Mess>, Error> {
        actor.require(Capability::ListAllMesses)?;
        self.mess_repo.list_all().await.map_err(map_mess_error)
    }
}

#[cfg(test)]
#[path = "mess_service_tests.rs"]
mod tests;
