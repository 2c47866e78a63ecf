//! Handle database requests.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::Result;
use crate::user::{User, UserPatch};

const COLUMNS: &str = "id, account, email, created_at, updated_at";

/// Persistence of [`User`] records.
///
/// Implementations enforce uniqueness of `account` and `email` and report
/// violations as [`crate::error::ServerError::Duplicate`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return it with its assigned id.
    async fn insert(&self, account: &str, email: &str) -> Result<User>;

    /// Every user, oldest first.
    async fn find_all(&self) -> Result<Vec<User>>;

    /// Find a user using its `id`.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Apply `changes` and return the updated user.
    async fn update(&self, id: Uuid, changes: &UserPatch) -> Result<Option<User>>;

    /// Remove a user and return what was deleted.
    async fn delete(&self, id: Uuid) -> Result<Option<User>>;
}

/// PostgreSQL user store.
#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, account: &str, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (account, email) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(account)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: &UserPatch) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
                SET account = COALESCE($2, account),
                    email = COALESCE($3, email),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING {COLUMNS}"#
        ))
        .bind(id)
        .bind(changes.account.as_deref())
        .bind(changes.email.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
