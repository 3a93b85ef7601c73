//! Port for complaint persistence.

use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintId, MessId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by complaint repository adapters.
    pub enum ComplaintRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "complaint repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "complaint repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The complaint to update does not exist.
        NotFound { complaint_id: ComplaintId } => "complaint {complaint_id} not found",
    }
}

/// Complaint storage. Listings are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintRepositoryError>;

    /// Persist a status change made from `expected_revision`.
    async fn save(
        &self,
        complaint: &Complaint,
        expected_revision: u32,
    ) -> Result<(), ComplaintRepositoryError>;

    async fn find_by_id(
        &self,
        id: ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError>;

    async fn list_by_mess(&self, mess_id: MessId)
    -> Result<Vec<Complaint>, ComplaintRepositoryError>;

    async fn list_all(&self) -> Result<Vec<Complaint>, ComplaintRepositoryError>;
}
