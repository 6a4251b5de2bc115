use crate::domain::entities::Credentials;
use crate::domain::errors::AuthError;
use crate::interface_adapters::protocol::{
    CredentialsRequest, ErrorResponse, LogoutResponse, SessionResponse, TokenRequest,
    VerifyTokenResponse,
};
use crate::interface_adapters::state::{AppState, InMemorySessionStore, SystemClock};
use crate::use_cases::login::{LoginResponse, LoginUseCase};
use crate::use_cases::logout::LogoutUseCase;
use crate::use_cases::signup::SignUpUseCase;
use crate::use_cases::verify_token::VerifyTokenUseCase;
use axum::{extract::State, http::StatusCode, Json};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

// Handler for creating an account and its first session.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ErrorReply> {
    let use_case = SignUpUseCase {
        clock: SystemClock,
        users: state.users.clone(),
        sessions: session_store(&state),
        ttl_seconds: state.session_ttl_seconds,
    };

    let result = with_timeout(
        state.request_timeout,
        use_case.execute(Credentials::new(payload.username, payload.password)),
    )
    .await
    .map_err(error_response)?;

    Ok(Json(session_response(result)))
}

// Handler for the login pipeline.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ErrorReply> {
    let use_case = LoginUseCase {
        clock: SystemClock,
        users: state.users.clone(),
        sessions: session_store(&state),
        dispatcher: state.dispatcher.clone(),
        ttl_seconds: state.session_ttl_seconds,
    };

    let result = with_timeout(
        state.request_timeout,
        use_case.execute(Credentials::new(payload.username, payload.password)),
    )
    .await
    .map_err(error_response)?;

    Ok(Json(session_response(result)))
}

// Handler for the logout pipeline.
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<LogoutResponse>, ErrorReply> {
    let use_case = LogoutUseCase {
        clock: SystemClock,
        store: session_store(&state),
        dispatcher: state.dispatcher.clone(),
    };

    let result = with_timeout(state.request_timeout, use_case.execute(payload.token))
        .await
        .map_err(error_response)?;

    Ok(Json(LogoutResponse {
        revoked: result.revoked,
    }))
}

// Handler for resolving a session token to its user.
pub async fn me(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<VerifyTokenResponse>, ErrorReply> {
    let use_case = VerifyTokenUseCase {
        clock: SystemClock,
        store: session_store(&state),
    };

    let result = use_case.execute(payload.token).await.map_err(error_response)?;

    Ok(Json(VerifyTokenResponse {
        user: result.user,
        session_id: result.session_id,
        expires_at: result.expires_at,
    }))
}

fn session_store(state: &AppState) -> InMemorySessionStore {
    InMemorySessionStore {
        sessions: state.sessions.clone(),
    }
}

fn session_response(result: LoginResponse) -> SessionResponse {
    SessionResponse {
        user: result.user,
        token: result.token,
        expires_at: result.expires_at,
    }
}

// Caller-level deadline around a whole pipeline run.
async fn with_timeout<T>(
    limit: Duration,
    operation: impl Future<Output = Result<T, AuthError>>,
) -> Result<T, RequestError> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result.map_err(RequestError::Auth),
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "auth request timed out");
            Err(RequestError::TimedOut)
        }
    }
}

enum RequestError {
    Auth(AuthError),
    TimedOut,
}

impl From<AuthError> for RequestError {
    fn from(error: AuthError) -> Self {
        RequestError::Auth(error)
    }
}

fn error_response(err: impl Into<RequestError>) -> ErrorReply {
    match err.into() {
        RequestError::TimedOut => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(ErrorResponse {
                code: AuthError::INTERNAL_SERVER_ERROR,
                message: "Request timed out.".to_string(),
            }),
        ),
        RequestError::Auth(err) => (
            status_for(&err),
            Json(ErrorResponse {
                code: err.code,
                message: err.message,
            }),
        ),
    }
}

// Maps canonical error codes to HTTP statuses.
fn status_for(err: &AuthError) -> StatusCode {
    match err.code {
        AuthError::OBJECT_NOT_FOUND => StatusCode::NOT_FOUND,
        AuthError::INVALID_SESSION_TOKEN => StatusCode::UNAUTHORIZED,
        AuthError::INTERNAL_SERVER_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}
