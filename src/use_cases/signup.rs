use tracing::{info, warn};

use crate::domain::entities::Credentials;
use crate::domain::errors::{AuthError, UserStoreError};
use crate::domain::ports::{Clock, SessionStore, UserStore};
use crate::use_cases::login::{issue_session, LoginResponse};

// Sign-up creates the account and logs it straight in. It does not fire
// auth events; those belong to the login/logout flows.
pub struct SignUpUseCase<C, U, S> {
    pub clock: C,
    pub users: U,
    pub sessions: S,
    pub ttl_seconds: u64,
}

impl<C, U, S> SignUpUseCase<C, U, S>
where
    C: Clock,
    U: UserStore,
    S: SessionStore,
{
    pub async fn execute(&self, credentials: Credentials) -> Result<LoginResponse, AuthError> {
        let username = validate_username(&credentials.username)?;
        if credentials.password.is_empty() {
            return Err(AuthError::password_missing());
        }

        let user = self
            .users
            .create(username, &credentials.password)
            .await
            .map_err(|err| match err {
                UserStoreError::UsernameTaken => AuthError::username_taken(),
                UserStoreError::Storage(reason) => {
                    warn!(error = %reason, "failed to create user");
                    AuthError::internal()
                }
            })?;

        let (token, expires_at) =
            issue_session(&self.clock, &self.sessions, &user, self.ttl_seconds).await?;

        info!(user_id = %user.id, username = %user.username, "user signed up");

        Ok(LoginResponse {
            user,
            token,
            expires_at,
        })
    }
}

fn validate_username(value: &str) -> Result<&str, AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::username_missing());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        FailureFlags, FixedClock, RecordingStore, RecordingUserStore,
    };

    fn use_case(
        users: RecordingUserStore,
        sessions: RecordingStore,
    ) -> SignUpUseCase<FixedClock, RecordingUserStore, RecordingStore> {
        SignUpUseCase {
            clock: FixedClock(1_700_000_000),
            users,
            sessions,
            ttl_seconds: 3600,
        }
    }

    #[tokio::test]
    async fn when_username_is_new_then_user_is_created_and_logged_in() {
        let users = RecordingUserStore::default();
        let sessions = RecordingStore::new();
        let signup = use_case(users.clone(), sessions.clone());

        let result = signup
            .execute(Credentials::new("tupac", "shakur"))
            .await
            .expect("expected sign-up to succeed");

        assert_eq!(result.user.username, "tupac");
        assert!(sessions.get_test_session(&result.token).is_some());
        let verified = users
            .verify_credentials("tupac", "shakur")
            .await
            .expect("expected lookup to succeed");
        assert_eq!(verified, Some(result.user));
    }

    #[tokio::test]
    async fn when_username_is_taken_then_returns_username_taken() {
        let users = RecordingUserStore::default().with_user("tupac", "shakur");
        let signup = use_case(users, RecordingStore::new());

        let result = signup.execute(Credentials::new("tupac", "other")).await;

        assert_eq!(result.unwrap_err(), AuthError::username_taken());
    }

    #[tokio::test]
    async fn when_username_is_blank_then_returns_username_missing() {
        let signup = use_case(RecordingUserStore::default(), RecordingStore::new());

        let result = signup.execute(Credentials::new("   ", "shakur")).await;

        assert_eq!(result.unwrap_err(), AuthError::username_missing());
    }

    #[tokio::test]
    async fn when_password_is_empty_then_returns_password_missing() {
        let signup = use_case(RecordingUserStore::default(), RecordingStore::new());

        let result = signup.execute(Credentials::new("tupac", "")).await;

        assert_eq!(result.unwrap_err(), AuthError::password_missing());
    }

    #[tokio::test]
    async fn when_user_store_fails_then_returns_internal_error() {
        let signup = use_case(RecordingUserStore::default().failing(), RecordingStore::new());

        let result = signup.execute(Credentials::new("tupac", "shakur")).await;

        assert_eq!(result.unwrap_err(), AuthError::internal());
    }

    #[tokio::test]
    async fn when_session_insert_fails_then_returns_internal_error() {
        let sessions = RecordingStore::new().with_failures(FailureFlags {
            insert: true,
            ..FailureFlags::default()
        });
        let signup = use_case(RecordingUserStore::default(), sessions);

        let result = signup.execute(Credentials::new("tupac", "shakur")).await;

        assert_eq!(result.unwrap_err(), AuthError::internal());
    }
}
