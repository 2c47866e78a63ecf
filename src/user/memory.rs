//! In-memory user store used by tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{Field, Result, ServerError};
use crate::user::{User, UserPatch, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
}

impl MemoryStore {
    fn conflict(
        users: &[User],
        id: Option<Uuid>,
        account: Option<&str>,
        email: Option<&str>,
    ) -> Option<Field> {
        let others = || users.iter().filter(move |user| Some(user.id) != id);

        if others().any(|user| Some(user.account.as_str()) == account) {
            Some(Field::Account)
        } else if others().any(|user| Some(user.email.as_str()) == email) {
            Some(Field::Email)
        } else {
            None
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, account: &str, email: &str) -> Result<User> {
        let mut users = self.users.lock().expect("poisoned store");

        if let Some(field) =
            Self::conflict(&users, None, Some(account), Some(email))
        {
            return Err(ServerError::Duplicate(field));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            account: account.to_owned(),
            email: email.to_owned(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().expect("poisoned store").clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().expect("poisoned store");
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: &UserPatch) -> Result<Option<User>> {
        let mut users = self.users.lock().expect("poisoned store");

        if !users.iter().any(|user| user.id == id) {
            return Ok(None);
        }

        if let Some(field) = Self::conflict(
            &users,
            Some(id),
            changes.account.as_deref(),
            changes.email.as_deref(),
        ) {
            return Err(ServerError::Duplicate(field));
        }

        let Some(user) = users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        if let Some(account) = &changes.account {
            user.account = account.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>> {
        let mut users = self.users.lock().expect("poisoned store");
        let position = users.iter().position(|user| user.id == id);

        Ok(position.map(|index| users.remove(index)))
    }
}
