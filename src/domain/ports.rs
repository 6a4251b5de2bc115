use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{Session, User};
use crate::domain::errors::UserStoreError;

// Port for session storage used by auth use cases.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: Session) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<Session>, String>;
    // Invalidates the session behind `token`.
    async fn remove(&self, token: &str) -> Result<bool, String>;
}

// Port for user records and credential checks.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, username: &str, password: &str) -> Result<User, UserStoreError>;
    // `Ok(None)` means unknown user or wrong password; callers must not
    // be able to tell the two apart.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        (**self).insert(token, session).await
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        (**self).get(token).await
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        (**self).remove(token).await
    }
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn create(&self, username: &str, password: &str) -> Result<User, UserStoreError> {
        (**self).create(username, password).await
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, String> {
        (**self).verify_credentials(username, password).await
    }
}
