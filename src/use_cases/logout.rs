use tracing::{info, warn};

use crate::domain::entities::User;
use crate::domain::errors::AuthError;
use crate::domain::events::AuthEventRequest;
use crate::domain::ports::{Clock, SessionStore};
use crate::use_cases::dispatcher::{DispatchOutcome, Dispatcher};

// Response returned by the logout use case.
#[derive(Debug)]
pub struct LogoutResponse {
    pub revoked: bool,
}

// Logout pipeline: logoutStarted (blocking) -> invalidate session ->
// logoutFinished, with logoutFailed on any abort.
pub struct LogoutUseCase<C, S> {
    pub clock: C,
    pub store: S,
    pub dispatcher: Dispatcher,
}

impl<C, S> LogoutUseCase<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(&self, token: String) -> Result<LogoutResponse, AuthError> {
        let session = self.store.get(&token).await.map_err(|err| {
            warn!(error = %err, "failed to load session for logout");
            AuthError::internal()
        })?;

        // Nobody to log out, so no lifecycle events either.
        let Some(session) = session else {
            return Ok(LogoutResponse { revoked: false });
        };
        // Same rule as the session check: an expired token names nobody.
        if session.expires_at <= self.clock.now_epoch_seconds() {
            let _ = self.store.remove(&token).await;
            return Err(AuthError::session_expired());
        }
        let user = session.user;

        let mut started = AuthEventRequest::logout_started(user.clone());
        if let DispatchOutcome::Abort(error) = self.dispatcher.dispatch(&mut started).await {
            let user = started.user.unwrap_or(user);
            return Err(self.fail(user, error).await);
        }
        let user = started.user.unwrap_or(user);

        match self.store.remove(&token).await {
            Ok(true) => {}
            // A concurrent logout won the race; it owns logoutFinished.
            Ok(false) => {
                info!(user_id = %user.id, "session already invalidated");
                return Ok(LogoutResponse { revoked: false });
            }
            Err(err) => {
                warn!(error = %err, user_id = %user.id, "failed to invalidate session");
                return Err(self.fail(user, AuthError::internal()).await);
            }
        }

        let mut finished = AuthEventRequest::logout_finished(user.clone());
        if let DispatchOutcome::Abort(error) = self.dispatcher.dispatch(&mut finished).await {
            let user = finished.user.unwrap_or(user);
            return Err(self.fail(user, error).await);
        }

        info!(user_id = %user.id, "logout succeeded");

        Ok(LogoutResponse { revoked: true })
    }

    // Failure path: logoutFailed hooks may replace the error outright.
    async fn fail(&self, user: User, error: AuthError) -> AuthError {
        let user_id = user.id.clone();
        let mut request = AuthEventRequest::logout_failed(user, error.clone());

        let effective = match self.dispatcher.dispatch(&mut request).await {
            DispatchOutcome::Abort(effective) => effective,
            DispatchOutcome::Continue => error,
        };

        info!(
            user_id = %user_id,
            code = effective.code,
            message = %effective.message,
            "logout failed"
        );
        effective
    }
}
