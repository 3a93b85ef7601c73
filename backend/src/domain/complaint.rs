//! Complaint workflow.
//!
//! `pending` is the only non-terminal state; an administrator moves a
//! complaint to `resolved` or `dismissed` exactly once.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ComplaintId, DisplayName, MessId, UserId};

/// Maximum length of a complaint subject, in characters.
pub const SUBJECT_MAX: usize = 200;

/// Lifecycle state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplaintValidationError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("subject must be at most {max} characters")]
    SubjectTooLong { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("complaint is already {status}")]
pub struct ComplaintClosedError {
    pub status: ComplaintStatus,
}

/// Inputs for [`Complaint::file`].
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub id: ComplaintId,
    pub mess_id: MessId,
    pub student_id: UserId,
    pub student_name: DisplayName,
    pub subject: String,
    pub description: String,
}

/// A student's grievance against a mess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    id: ComplaintId,
    mess_id: MessId,
    student_id: UserId,
    student_name: DisplayName,
    subject: String,
    description: String,
    status: ComplaintStatus,
    revision: u32,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// Open a pending complaint. Subject and description are trimmed and
    /// must be non-empty.
    pub fn file(new: NewComplaint, now: DateTime<Utc>) -> Result<Self, ComplaintValidationError> {
        let subject = new.subject.trim().to_owned();
        let description = new.description.trim().to_owned();
        if subject.is_empty() {
            return Err(ComplaintValidationError::MissingField { field: "subject" });
        }
        if subject.chars().count() > SUBJECT_MAX {
            return Err(ComplaintValidationError::SubjectTooLong { max: SUBJECT_MAX });
        }
        if description.is_empty() {
            return Err(ComplaintValidationError::MissingField {
                field: "description",
            });
        }

        Ok(Self {
            id: new.id,
            mess_id: new.mess_id,
            student_id: new.student_id,
            student_name: new.student_name,
            subject,
            description,
            status: ComplaintStatus::Pending,
            revision: 1,
            created_at: now,
            resolved_at: None,
        })
    }

    pub fn id(&self) -> ComplaintId {
        self.id
    }

    pub fn mess_id(&self) -> MessId {
        self.mess_id
    }

    pub fn student_id(&self) -> &UserId {
        &self.student_id
    }

    pub fn student_name(&self) -> &DisplayName {
        &self.student_name
    }

    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    fn close(
        &mut self,
        status: ComplaintStatus,
        now: DateTime<Utc>,
    ) -> Result<(), ComplaintClosedError> {
        if self.status != ComplaintStatus::Pending {
            return Err(ComplaintClosedError {
                status: self.status,
            });
        }
        self.status = status;
        self.resolved_at = Some(now);
        self.revision = self.revision.saturating_add(1);
        Ok(())
    }

    /// `pending -> resolved`.
    pub fn resolve(&mut self, now: DateTime<Utc>) -> Result<(), ComplaintClosedError> {
        self.close(ComplaintStatus::Resolved, now)
    }

    /// `pending -> dismissed`.
    pub fn dismiss(&mut self, now: DateTime<Utc>) -> Result<(), ComplaintClosedError> {
        self.close(ComplaintStatus::Dismissed, now)
    }
}
