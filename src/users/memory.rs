use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::filter::CandidateFilter;
use super::repo::{DirectoryError, UserDirectory};
use super::repo_types::{NewUser, User};

/// In-process directory. Users are kept in insertion order, which is also
/// ascending creation time.
#[derive(Default)]
pub struct MemoryDirectory {
    users: RwLock<Vec<User>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> DirectoryError {
        DirectoryError::Unavailable("memory directory lock poisoned".into())
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DirectoryError::DuplicateEmail);
        }
        let created = user.into_user(Uuid::new_v4(), OffsetDateTime::now_utc());
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_candidates(
        &self,
        filter: &CandidateFilter,
        limit: usize,
    ) -> Result<Vec<User>, DirectoryError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users
            .iter()
            .filter(|u| filter.matches(u))
            .take(limit)
            .cloned()
            .collect())
    }
}
