use crate::domain::entities::{Session, User};
use crate::domain::errors::AuthError;
use crate::domain::ports::{Clock, SessionStore};
use tracing::warn;

// Response returned by the token verification use case.
#[derive(Debug)]
pub struct VerifyTokenResponse {
    pub user: User,
    pub session_id: String,
    pub expires_at: u64,
}

// Session check: resolves a token back to the logged-in user.
pub struct VerifyTokenUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> VerifyTokenUseCase<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(&self, token: String) -> Result<VerifyTokenResponse, AuthError> {
        let session = self
            .store
            .get(&token)
            .await
            .map_err(|err| {
                warn!(error = %err, "failed to load session");
                AuthError::internal()
            })?
            .ok_or_else(AuthError::invalid_session_token)?;

        if session.expires_at <= self.clock.now_epoch_seconds() {
            // Best-effort cleanup of expired session.
            let _ = self.store.remove(&token).await;
            return Err(AuthError::session_expired());
        }

        Ok(map_session(session))
    }
}

fn map_session(session: Session) -> VerifyTokenResponse {
    VerifyTokenResponse {
        user: session.user,
        session_id: session.session_id,
        expires_at: session.expires_at,
    }
}
