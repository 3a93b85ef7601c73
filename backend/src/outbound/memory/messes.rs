//! `MessRepository` over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{MessRepository, MessRepositoryError};
use crate::domain::{Mess, MessId, MessSearch, UserId, WeeklyMenu};

use super::{InMemoryStore, Tables, newest_first};

fn find_mut(tables: &mut Tables, id: MessId) -> Result<&mut Mess, MessRepositoryError> {
    tables
        .messes
        .iter_mut()
        .find(|m| m.id() == id)
        .ok_or_else(|| MessRepositoryError::not_found(id))
}

#[async_trait]
impl MessRepository for InMemoryStore {
    async fn insert(&self, mess: &Mess) -> Result<(), MessRepositoryError> {
        let mut tables = self.lock(MessRepositoryError::query)?;
        if tables.messes.iter().any(|m| m.id() == mess.id()) {
            return Err(MessRepositoryError::query(format!(
                "mess {} already exists",
                mess.id()
            )));
        }
        tables.messes.push(mess.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MessId) -> Result<Option<Mess>, MessRepositoryError> {
        let tables = self.lock(MessRepositoryError::query)?;
        Ok(tables.messes.iter().find(|m| m.id() == id).cloned())
    }

    async fn search(&self, filter: &MessSearch) -> Result<Vec<Mess>, MessRepositoryError> {
        let tables = self.lock(MessRepositoryError::query)?;
        let mut found: Vec<Mess> = tables
            .messes
            .iter()
            .filter(|m| m.matches_search(filter))
            .cloned()
            .collect();
        found.sort_by_cached_key(|m| m.name().to_lowercase());
        Ok(found)
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Mess>, MessRepositoryError> {
        let tables = self.lock(MessRepositoryError::query)?;
        let mut owned: Vec<Mess> = tables
            .messes
            .iter()
            .filter(|m| m.is_owned_by(owner_id))
            .cloned()
            .collect();
        newest_first(&mut owned, Mess::created_at);
        Ok(owned)
    }

    async fn list_all(&self) -> Result<Vec<Mess>, MessRepositoryError> {
        let tables = self.lock(MessRepositoryError::query)?;
        let mut all = tables.messes.clone();
        newest_first(&mut all, Mess::created_at);
        Ok(all)
    }

    async fn set_verified(&self, id: MessId) -> Result<(Mess, bool), MessRepositoryError> {
        let mut tables = self.lock(MessRepositoryError::query)?;
        let mess = find_mut(&mut tables, id)?;
        let changed = mess.verify();
        Ok((mess.clone(), changed))
    }

    async fn replace_menu(
        &self,
        id: MessId,
        menu: &WeeklyMenu,
    ) -> Result<Mess, MessRepositoryError> {
        let mut tables = self.lock(MessRepositoryError::query)?;
        let mess = find_mut(&mut tables, id)?;
        mess.replace_menu(menu.clone());
        Ok(mess.clone())
    }
}
