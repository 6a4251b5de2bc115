use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{Session, User};
use crate::domain::errors::UserStoreError;
use crate::domain::ports::{Clock, SessionStore, UserStore};
use crate::interface_adapters::password::PasswordHasher;
use crate::use_cases::dispatcher::Dispatcher;

// Application state shared by every auth handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub users: Arc<dyn UserStore>,
    // Owns the hook registry; hooks are registered before serving.
    pub dispatcher: Dispatcher,
    pub session_ttl_seconds: u64,
    // Upper bound on a whole signup/login/logout call, hooks included.
    pub request_timeout: Duration,
}

// In-memory session store adapter for the auth service.
#[derive(Clone)]
pub struct InMemorySessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }
}

struct StoredUser {
    user: User,
    password_hash: String,
}

// In-memory user store used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<HashMap<String, StoredUser>>>,
    hasher: PasswordHasher,
}

impl InMemoryUserStore {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            users: Arc::default(),
            hasher,
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, username: &str, password: &str) -> Result<User, UserStoreError> {
        if self.users.lock().await.contains_key(username) {
            return Err(UserStoreError::UsernameTaken);
        }

        let password_hash = hash_blocking(&self.hasher, password)
            .await
            .map_err(UserStoreError::Storage)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: SystemClock.now_epoch_seconds(),
        };

        // Re-check under the lock; hashing ran without it.
        let mut users = self.users.lock().await;
        if users.contains_key(username) {
            return Err(UserStoreError::UsernameTaken);
        }
        users.insert(
            username.to_string(),
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, String> {
        let stored = {
            let users = self.users.lock().await;
            users
                .get(username)
                .map(|stored| (stored.user.clone(), stored.password_hash.clone()))
        };
        let Some((user, password_hash)) = stored else {
            return Ok(None);
        };

        let matches = verify_blocking(&self.hasher, password, password_hash).await?;
        Ok(matches.then_some(user))
    }
}

// PostgreSQL-backed user store.
#[derive(Clone)]
pub struct PostgresUserStore {
    pub db: PgPool,
    pub hasher: PasswordHasher,
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn create(&self, username: &str, password: &str) -> Result<User, UserStoreError> {
        let password_hash = hash_blocking(&self.hasher, password)
            .await
            .map_err(UserStoreError::Storage)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: SystemClock.now_epoch_seconds(),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&password_hash)
        .bind(user.created_at as i64)
        .execute(&self.db)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(UserStoreError::UsernameTaken)
            }
            Err(err) => Err(UserStoreError::Storage(err.to_string())),
        }
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let Some(row) = row else {
            debug!(username, "login attempted for unknown user");
            return Ok(None);
        };

        let password_hash: String = row.try_get("password_hash").map_err(|e| e.to_string())?;
        let created_at: i64 = row.try_get("created_at").map_err(|e| e.to_string())?;
        let user = User {
            id: row.try_get("id").map_err(|e| e.to_string())?,
            username: row.try_get("username").map_err(|e| e.to_string())?,
            created_at: u64::try_from(created_at).unwrap_or_default(),
        };

        let matches = verify_blocking(&self.hasher, password, password_hash).await?;
        Ok(matches.then_some(user))
    }
}

// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_blocking(hasher: &PasswordHasher, password: &str) -> Result<String, String> {
    let hasher = hasher.clone();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hasher.hash_password(&password))
        .await
        .map_err(|e| format!("password hashing task failed: {e}"))?
}

async fn verify_blocking(
    hasher: &PasswordHasher,
    password: &str,
    password_hash: String,
) -> Result<bool, String> {
    let hasher = hasher.clone();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hasher.verify_password(&password, &password_hash))
        .await
        .map_err(|e| format!("password verification task failed: {e}"))?
}

// System clock adapter used by auth use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
