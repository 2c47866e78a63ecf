use std::sync::Arc;

use axum::extract::FromRef;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::user::{NewUser, User, UserChanges, UserStore};

/// Schema-validated access to the users collection.
#[derive(Clone)]
pub struct Users {
    store: Arc<dyn UserStore>,
}

impl Users {
    /// Create a new [`Users`] collection on top of `store`.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Validate then insert a new user.
    pub async fn create(&self, user: NewUser) -> Result<User> {
        user.validate()?;

        let account = user.account.unwrap_or_default();
        let email = user.email.unwrap_or_default();
        self.store.insert(&account, &email).await
    }

    /// List every user.
    pub async fn find(&self) -> Result<Vec<User>> {
        self.store.find_all().await
    }

    /// Find a user using its textual `id`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = parse_id(id)?;
        self.store.find_by_id(id).await
    }

    /// Validate `changes` then apply them, returning the updated user.
    ///
    /// A malformed `id` is reported before any validation error.
    pub async fn find_by_id_and_update(
        &self,
        id: &str,
        changes: UserChanges,
    ) -> Result<Option<User>> {
        let id = parse_id(id)?;
        let changes = changes.into_patch()?;

        if changes.is_empty() {
            return self.store.find_by_id(id).await;
        }

        self.store.update(id, &changes).await
    }

    /// Delete a user, returning it if it existed.
    pub async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<User>> {
        let id = parse_id(id)?;
        self.store.delete(id).await
    }
}

impl FromRef<AppState> for Users {
    fn from_ref(state: &AppState) -> Users {
        state.users.clone()
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| ServerError::MalformedId)
}
