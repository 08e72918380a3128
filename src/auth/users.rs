// src/auth/users.rs
//! Persistence seam for portal accounts.

use crate::models::auth::User;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("email or username already taken")]
    Duplicate,
}

impl From<sqlx::Error> for UserStoreError {
    fn from(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => UserStoreError::Duplicate,
            _ => UserStoreError::Database(err),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether an account already uses this email or this username.
    async fn exists(&self, email: &str, username: &str) -> Result<bool, UserStoreError>;

    /// Create an account. Losing a race against another sign-up with the
    /// same email or username is `Duplicate`.
    async fn insert(&self, email: &str, username: &str, password_hash: &str) -> Result<User, UserStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists(&self, email: &str, username: &str) -> Result<bool, UserStoreError> {
        let existing = sqlx::query("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(email)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(existing.is_some())
    }

    async fn insert(&self, email: &str, username: &str, password_hash: &str) -> Result<User, UserStoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, username, password_hash, created_at)
             VALUES ($1, $2, $3, $4, NOW())
             RETURNING id, email, username, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, username, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryUserStore {
    users: std::sync::Mutex<Vec<User>>,
    /// Makes `exists` always answer false, as when two sign-ups race past
    /// the check.
    pub stale_exists_check: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists(&self, email: &str, username: &str) -> Result<bool, UserStoreError> {
        use std::sync::atomic::Ordering;
        if self.stale_exists_check.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email == email || u.username == username))
    }

    async fn insert(&self, email: &str, username: &str, password_hash: &str) -> Result<User, UserStoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email || u.username == username) {
            return Err(UserStoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: chrono::Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }
}
