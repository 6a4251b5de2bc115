use serde::{Deserialize, Serialize};
use thiserror::Error;

// Canonical error surfaced to callers of login/logout and seen by hooks.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct AuthError {
    pub code: i32,
    pub message: String,
}

impl AuthError {
    pub const INTERNAL_SERVER_ERROR: i32 = 1;
    pub const OBJECT_NOT_FOUND: i32 = 101;
    pub const INVALID_EMAIL_ADDRESS: i32 = 125;
    // Reserved for hooks that raise or return plain text.
    pub const SCRIPT_FAILED: i32 = 141;
    pub const USERNAME_MISSING: i32 = 200;
    pub const PASSWORD_MISSING: i32 = 201;
    pub const USERNAME_TAKEN: i32 = 202;
    pub const INVALID_SESSION_TOKEN: i32 = 209;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::new(Self::OBJECT_NOT_FOUND, "Invalid username/password.")
    }

    pub fn script_failed(message: impl Into<String>) -> Self {
        Self::new(Self::SCRIPT_FAILED, message)
    }

    pub fn username_missing() -> Self {
        Self::new(Self::USERNAME_MISSING, "username/email is required.")
    }

    pub fn password_missing() -> Self {
        Self::new(Self::PASSWORD_MISSING, "password is required.")
    }

    pub fn username_taken() -> Self {
        Self::new(
            Self::USERNAME_TAKEN,
            "Account already exists for this username.",
        )
    }

    pub fn invalid_session_token() -> Self {
        Self::new(Self::INVALID_SESSION_TOKEN, "Invalid session token")
    }

    pub fn session_expired() -> Self {
        Self::new(Self::INVALID_SESSION_TOKEN, "Session token is expired.")
    }

    // Infrastructure details stay in the logs; callers get a generic message.
    pub fn internal() -> Self {
        Self::new(Self::INTERNAL_SERVER_ERROR, "Internal server error.")
    }

    pub fn is_script_failure(&self) -> bool {
        self.code == Self::SCRIPT_FAILED
    }
}

// Failures reported by user persistence adapters.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum UserStoreError {
    #[error("username already taken")]
    UsernameTaken,
    #[error("user storage failure: {0}")]
    Storage(String),
}
