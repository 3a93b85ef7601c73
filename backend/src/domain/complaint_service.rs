//! Complaint workflow services.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::identity_service::map_user_error;
use crate::domain::mess_service::{map_mess_error, notify_best_effort};
use crate::domain::ports::{
    ComplaintCommand, ComplaintQuery, ComplaintRepository, ComplaintRepositoryError,
    FileComplaintRequest, MessRepository, Notification, NotificationSink, SendWarningRequest,
    UserRepository,
};
use crate::domain::{
    Actor, Capability, Complaint, ComplaintClosedError, ComplaintId, Error, Mess, MessId,
    NewComplaint, Role,
};

/// Maximum length of a warning message, in characters.
pub const WARNING_MAX: usize = 2000;

pub(crate) fn map_complaint_error(error: ComplaintRepositoryError) -> Error {
    match error {
        ComplaintRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("complaint repository unavailable: {message}"))
        }
        ComplaintRepositoryError::Query { message } => {
            Error::internal(format!("complaint repository error: {message}"))
        }
        ComplaintRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("complaint was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
        ComplaintRepositoryError::NotFound { complaint_id } => {
            Error::not_found(format!("complaint {complaint_id} not found"))
        }
    }
}

fn map_closed_error(error: ComplaintClosedError) -> Error {
    Error::invalid_state(error.to_string())
}

/// Complaint service implementing the workflow driving ports.
#[derive(Clone)]
pub struct ComplaintService<C, M, U, N> {
    complaint_repo: Arc<C>,
    mess_repo: Arc<M>,
    user_repo: Arc<U>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<C, M, U, N> ComplaintService<C, M, U, N> {
    pub fn new(
        complaint_repo: Arc<C>,
        mess_repo: Arc<M>,
        user_repo: Arc<U>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            complaint_repo,
            mess_repo,
            user_repo,
            notifier,
            clock,
        }
    }
}

impl<C, M, U, N> ComplaintService<C, M, U, N>
where
    C: ComplaintRepository,
    M: MessRepository,
    U: UserRepository,
    N: NotificationSink,
{
    async fn fetch_mess(&self, mess_id: MessId) -> Result<Mess, Error> {
        self.mess_repo
            .find_by_id(mess_id)
            .await
            .map_err(map_mess_error)?
            .ok_or_else(|| Error::not_found(format!("mess {mess_id} not found")))
    }

    async fn close(
        &self,
        actor: &Actor,
        id: ComplaintId,
        apply: fn(&mut Complaint, DateTime<Utc>) -> Result<(), ComplaintClosedError>,
    ) -> Result<Complaint, Error> {
        actor.require(Capability::ResolveComplaint)?;
        let mut complaint = self
            .complaint_repo
            .find_by_id(id)
            .await
            .map_err(map_complaint_error)?
            .ok_or_else(|| Error::not_found(format!("complaint {id} not found")))?;

        let read_revision = complaint.revision();
        apply(&mut complaint, self.clock.utc()).map_err(map_closed_error)?;
        self.complaint_repo
            .save(&complaint, read_revision)
            .await
            .map_err(map_complaint_error)?;

        info!(
            complaint_id = %id,
            status = %complaint.status(),
            admin_id = %actor.user_id,
            "complaint closed"
        );
        Ok(complaint)
    }
}

#[async_trait]
impl<C, M, U, N> ComplaintCommand for ComplaintService<C, M, U, N>
where
    C: ComplaintRepository,
    M: MessRepository,
    U: UserRepository,
    N: NotificationSink,
{
    async fn file_complaint(
        &self,
        actor: &Actor,
        request: FileComplaintRequest,
    ) -> Result<Complaint, Error> {
        actor.require(Capability::FileComplaint)?;
        let mess = self.fetch_mess(request.mess_id).await?;
        let student = self
            .user_repo
            .find_by_id(&actor.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {} not found", actor.user_id)))?;

        let complaint = Complaint::file(
            NewComplaint {
                id: ComplaintId::random(),
                mess_id: mess.id(),
                student_id: actor.user_id.clone(),
                student_name: student.display_name().clone(),
                subject: request.subject,
                description: request.description,
            },
            self.clock.utc(),
        )
        .map_err(|err| Error::invalid_request(format!("invalid complaint: {err}")))?;

        self.complaint_repo
            .insert(&complaint)
            .await
            .map_err(map_complaint_error)?;

        info!(complaint_id = %complaint.id(), mess_id = %mess.id(), "complaint filed");
        notify_best_effort(
            self.notifier.as_ref(),
            Notification::ComplaintFiled {
                complaint_id: complaint.id(),
                mess_id: mess.id(),
                subject: complaint.subject().to_owned(),
            },
        )
        .await;
        Ok(complaint)
    }

    async fn resolve(&self, actor: &Actor, id: ComplaintId) -> Result<Complaint, Error> {
        self.close(actor, id, Complaint::resolve).await
    }

    async fn dismiss(&self, actor: &Actor, id: ComplaintId) -> Result<Complaint, Error> {
        self.close(actor, id, Complaint::dismiss).await
    }

    async fn send_warning(&self, actor: &Actor, request: SendWarningRequest) -> Result<(), Error> {
        actor.require(Capability::SendWarning)?;
        let message = request.message.trim();
        if message.is_empty() {
            return Err(Error::invalid_request("warning message must not be empty"));
        }
        if message.chars().count() > WARNING_MAX {
            return Err(Error::invalid_request(format!(
                "warning message must be at most {WARNING_MAX} characters"
            )));
        }

        let target = self
            .user_repo
            .find_by_id(&request.owner_id)
            .await
            .map_err(map_user_error)?
            .filter(|user| user.role() == Role::Owner)
            .ok_or_else(|| Error::not_found(format!("owner {} not found", request.owner_id)))?;

        info!(
            target: "audit",
            owner_id = %target.id(),
            admin_id = %actor.user_id,
            warning = message,
            "warning issued"
        );
        notify_best_effort(
            self.notifier.as_ref(),
            Notification::OwnerWarning {
                owner_id: target.id().clone(),
                issued_by: actor.user_id.clone(),
                message: message.to_owned(),
            },
        )
        .await;
        Ok(())
    }
}

#[async_trait]
impl<C, M, U, N> ComplaintQuery for ComplaintService<C, M, U, N>
where
    C: ComplaintRepository,
    M: MessRepository,
    U: UserRepository,
    N: NotificationSink,
{
    async fn list_my_complaints(&self, actor: &Actor) -> Result<Vec<Complaint>, Error> {
        actor.require(Capability::FileComplaint)?;
        self.complaint_repo
            .list_by_student(&actor.user_id)
            .await
            .map_err(map_complaint_error)
    }

    async fn list_mess_complaints(
        &self,
        actor: &Actor,
        mess_id: MessId,
    ) -> Result<Vec<Complaint>, Error> {
        actor.require(Capability::ViewMessComplaints)?;
        let mess = self.fetch_mess(mess_id).await?;
        if actor.role == Role::Owner {
            actor.require_self(mess.owner_id(), "mess")?;
        }
        self.complaint_repo
            .list_by_mess(mess_id)
            .await
            .map_err(map_complaint_error)
    }

    async fn list_all_complaints(&self, actor: &Actor) -> Result<Vec<Complaint>, Error> {
        actor.require(Capability::ListAllComplaints)?;
        self.complaint_repo
            .list_all()
            .await
            .map_err(map_complaint_error)
    }
}

#[cfg(test)]
#[path = "complaint_service_tests.rs"]
mod tests;
