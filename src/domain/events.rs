use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::{Credentials, User};
use crate::domain::errors::AuthError;

// Which authentication flow a stage belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthFlow {
    Login,
    Logout,
}

// Lifecycle points of the login/logout pipeline that hooks can attach to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthEventKind {
    LoginStarted,
    UserAuthenticated,
    LoginFinished,
    LoginFailed,
    LogoutStarted,
    LogoutFailed,
    LogoutFinished,
}

impl AuthEventKind {
    pub const ALL: [AuthEventKind; 7] = [
        AuthEventKind::LoginStarted,
        AuthEventKind::UserAuthenticated,
        AuthEventKind::LoginFinished,
        AuthEventKind::LoginFailed,
        AuthEventKind::LogoutStarted,
        AuthEventKind::LogoutFailed,
        AuthEventKind::LogoutFinished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginStarted => "loginStarted",
            Self::UserAuthenticated => "userAuthenticated",
            Self::LoginFinished => "loginFinished",
            Self::LoginFailed => "loginFailed",
            Self::LogoutStarted => "logoutStarted",
            Self::LogoutFailed => "logoutFailed",
            Self::LogoutFinished => "logoutFinished",
        }
    }

    pub fn flow(&self) -> AuthFlow {
        match self {
            Self::LoginStarted
            | Self::UserAuthenticated
            | Self::LoginFinished
            | Self::LoginFailed => AuthFlow::Login,
            Self::LogoutStarted | Self::LogoutFailed | Self::LogoutFinished => AuthFlow::Logout,
        }
    }

    // Failure stages carry the error that sent the flow down the failure path.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::LoginFailed | Self::LogoutFailed)
    }
}

impl fmt::Display for AuthEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthEventKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("unknown auth event kind: {value}"))
    }
}

// Per-call payload handed to every hook of one stage.
//
// Hooks may mutate any field; later hooks of the same stage and the
// pipeline see the mutated values.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthEventRequest {
    pub kind: AuthEventKind,
    pub credentials: Option<Credentials>,
    pub user: Option<User>,
    pub error: Option<AuthError>,
}

impl AuthEventRequest {
    fn empty(kind: AuthEventKind) -> Self {
        Self {
            kind,
            credentials: None,
            user: None,
            error: None,
        }
    }

    pub fn login_started(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..Self::empty(AuthEventKind::LoginStarted)
        }
    }

    pub fn user_authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::empty(AuthEventKind::UserAuthenticated)
        }
    }

    pub fn login_finished(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::empty(AuthEventKind::LoginFinished)
        }
    }

    pub fn login_failed(credentials: Credentials, error: AuthError) -> Self {
        Self {
            credentials: Some(credentials),
            error: Some(error),
            ..Self::empty(AuthEventKind::LoginFailed)
        }
    }

    pub fn logout_started(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::empty(AuthEventKind::LogoutStarted)
        }
    }

    pub fn logout_finished(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::empty(AuthEventKind::LogoutFinished)
        }
    }

    pub fn logout_failed(user: User, error: AuthError) -> Self {
        Self {
            user: Some(user),
            error: Some(error),
            ..Self::empty(AuthEventKind::LogoutFailed)
        }
    }
}
