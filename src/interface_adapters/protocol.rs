use serde::{Deserialize, Serialize};

use crate::domain::entities::User;

// Request payload for sign-up and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

// Response payload for sign-up and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
    pub expires_at: u64,
}

// Request payload for token verification and logout.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

// Response payload for token verification.
#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub user: User,
    pub session_id: String,
    pub expires_at: u64,
}

// Response payload for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

// Error envelope carrying the canonical `{code, message}` pair.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}
