use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{Credentials, Session, User};
use crate::domain::errors::AuthError;
use crate::domain::events::AuthEventRequest;
use crate::domain::ports::{Clock, SessionStore, UserStore};
use crate::use_cases::dispatcher::{DispatchOutcome, Dispatcher};

// Response returned by the login and sign-up use cases.
#[derive(Debug)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    pub expires_at: u64,
}

// Login pipeline: loginStarted -> credential check -> userAuthenticated ->
// loginFinished, with loginFailed on any abort.
pub struct LoginUseCase<C, U, S> {
    pub clock: C,
    pub users: U,
    pub sessions: S,
    pub dispatcher: Dispatcher,
    pub ttl_seconds: u64,
}

impl<C, U, S> LoginUseCase<C, U, S>
where
    C: Clock,
    U: UserStore,
    S: SessionStore,
{
    pub async fn execute(&self, credentials: Credentials) -> Result<LoginResponse, AuthError> {
        let mut started = AuthEventRequest::login_started(credentials.clone());
        if let DispatchOutcome::Abort(error) = self.dispatcher.dispatch(&mut started).await {
            let credentials = started.credentials.unwrap_or(credentials);
            return Err(self.fail(credentials, error).await);
        }
        // loginStarted hooks may rewrite what was submitted.
        let credentials = started.credentials.unwrap_or(credentials);

        let user = match self.authenticate(&credentials).await {
            Ok(user) => user,
            Err(error) => return Err(self.fail(credentials, error).await),
        };

        let mut authenticated = AuthEventRequest::user_authenticated(user.clone());
        if let DispatchOutcome::Abort(error) = self.dispatcher.dispatch(&mut authenticated).await {
            return Err(self.fail(credentials, error).await);
        }
        let user = authenticated.user.unwrap_or(user);

        let mut finished = AuthEventRequest::login_finished(user.clone());
        if let DispatchOutcome::Abort(error) = self.dispatcher.dispatch(&mut finished).await {
            return Err(self.fail(credentials, error).await);
        }
        let user = finished.user.unwrap_or(user);

        let (token, expires_at) =
            match issue_session(&self.clock, &self.sessions, &user, self.ttl_seconds).await {
                Ok(issued) => issued,
                Err(error) => return Err(self.fail(credentials, error).await),
            };

        info!(user_id = %user.id, "login succeeded");

        Ok(LoginResponse {
            user,
            token,
            expires_at,
        })
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError> {
        if credentials.username.is_empty() {
            return Err(AuthError::username_missing());
        }
        if credentials.password.is_empty() {
            return Err(AuthError::password_missing());
        }

        match self
            .users
            .verify_credentials(&credentials.username, &credentials.password)
            .await
        {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AuthError::invalid_credentials()),
            Err(err) => {
                warn!(error = %err, "credential lookup failed");
                Err(AuthError::internal())
            }
        }
    }

    // Failure path: loginFailed hooks may inspect, rewrite or replace the error.
    async fn fail(&self, credentials: Credentials, error: AuthError) -> AuthError {
        let username = credentials.username.clone();
        let mut request = AuthEventRequest::login_failed(credentials, error.clone());

        let effective = match self.dispatcher.dispatch(&mut request).await {
            DispatchOutcome::Abort(effective) => effective,
            // Failure hooks cannot turn a failed attempt into a success.
            DispatchOutcome::Continue => error,
        };

        info!(
            username = %username,
            code = effective.code,
            message = %effective.message,
            "login failed"
        );
        effective
    }
}

// Issue a fresh session token for `user`.
pub(crate) async fn issue_session<C, S>(
    clock: &C,
    sessions: &S,
    user: &User,
    ttl_seconds: u64,
) -> Result<(String, u64), AuthError>
where
    C: Clock,
    S: SessionStore,
{
    let token = Uuid::new_v4().to_string();
    let expires_at = clock.now_epoch_seconds() + ttl_seconds;
    let session = Session {
        user: user.clone(),
        session_id: Uuid::new_v4().to_string(),
        expires_at,
    };

    sessions
        .insert(token.clone(), session)
        .await
        .map_err(|err| {
            warn!(error = %err, user_id = %user.id, "failed to store session");
            AuthError::internal()
        })?;

    Ok((token, expires_at))
}
