//! `ComplaintRepository` over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{ComplaintRepository, ComplaintRepositoryError};
use crate::domain::{Complaint, ComplaintId, MessId, UserId};

use super::{InMemoryStore, newest_first};

impl InMemoryStore {
    fn complaints_where(
        &self,
        keep: impl Fn(&Complaint) -> bool,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        let tables = self.lock(ComplaintRepositoryError::query)?;
        let mut rows: Vec<Complaint> = tables
            .complaints
            .iter()
            .filter(|c| keep(c))
            .cloned()
            .collect();
        newest_first(&mut rows, Complaint::created_at);
        Ok(rows)
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryStore {
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintRepositoryError> {
        let mut tables = self.lock(ComplaintRepositoryError::query)?;
        if tables.complaints.iter().any(|c| c.id() == complaint.id()) {
            return Err(ComplaintRepositoryError::query(format!(
                "complaint {} already exists",
                complaint.id()
            )));
        }
        tables.complaints.push(complaint.clone());
        Ok(())
    }

    async fn save(
        &self,
        complaint: &Complaint,
        expected_revision: u32,
    ) -> Result<(), ComplaintRepositoryError> {
        let mut tables = self.lock(ComplaintRepositoryError::query)?;
        let stored = tables
            .complaints
            .iter_mut()
            .find(|c| c.id() == complaint.id())
            .ok_or_else(|| ComplaintRepositoryError::not_found(complaint.id()))?;
        if stored.revision() != expected_revision {
            return Err(ComplaintRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision(),
            ));
        }
        *stored = complaint.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let tables = self.lock(ComplaintRepositoryError::query)?;
        Ok(tables.complaints.iter().find(|c| c.id() == id).cloned())
    }

    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        self.complaints_where(|c| c.student_id() == student_id)
    }

    async fn list_by_mess(
        &self,
        mess_id: MessId,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        self.complaints_where(|c| c.mess_id() == mess_id)
    }

    async fn list_all(&self) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        self.complaints_where(|_| true)
    }
}
