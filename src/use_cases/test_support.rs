use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{Session, User};
use crate::domain::errors::UserStoreError;
use crate::domain::events::{AuthEventKind, AuthEventRequest};
use crate::domain::hooks::{hook_fn, AuthHook};
use crate::domain::ports::{Clock, SessionStore, UserStore};
use crate::use_cases::dispatcher::Dispatcher;
use crate::use_cases::registry::EventRegistry;

pub(crate) type SessionTable = Arc<Mutex<HashMap<String, Session>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

pub(crate) fn test_user(username: &str) -> User {
    User {
        id: format!("user-{username}"),
        username: username.to_string(),
        created_at: 0,
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    sessions: SessionTable,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, token: impl Into<String>, session: Session) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token.into(), session);
    }

    pub(crate) fn insert_test_token(&self, token: impl Into<String>, user: User) {
        let session = Session {
            user,
            session_id: "test-session".to_string(),
            expires_at: u64::MAX,
        };
        self.insert_test_session(token, session);
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<Session> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(token).cloned()
    }

    pub(crate) fn session_count(&self) -> usize {
        self.sessions.lock().expect("sessions mutex poisoned").len()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(token).is_some())
    }
}

// Plain-text user table; hashing is covered by the real adapters.
#[derive(Clone, Default)]
pub(crate) struct RecordingUserStore {
    users: Arc<Mutex<HashMap<String, (User, String)>>>,
    fail_lookups: bool,
}

impl RecordingUserStore {
    pub(crate) fn failing(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub(crate) fn with_user(self, username: &str, password: &str) -> Self {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        guard.insert(
            username.to_string(),
            (test_user(username), password.to_string()),
        );
        drop(guard);
        self
    }
}

#[async_trait]
impl UserStore for RecordingUserStore {
    async fn create(&self, username: &str, password: &str) -> Result<User, UserStoreError> {
        if self.fail_lookups {
            return Err(UserStoreError::Storage("create failed".to_string()));
        }

        let mut guard = self.users.lock().expect("users mutex poisoned");
        if guard.contains_key(username) {
            return Err(UserStoreError::UsernameTaken);
        }
        let user = test_user(username);
        guard.insert(username.to_string(), (user.clone(), password.to_string()));
        Ok(user)
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, String> {
        if self.fail_lookups {
            return Err("lookup failed".to_string());
        }

        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard
            .get(username)
            .filter(|(_, stored)| stored == password)
            .map(|(user, _)| user.clone()))
    }
}

// Records every fired stage so tests can assert on the exact sequence.
#[derive(Clone, Default)]
pub(crate) struct EventLog {
    fired: Arc<Mutex<Vec<AuthEventKind>>>,
    requests: Arc<Mutex<Vec<AuthEventRequest>>>,
}

impl EventLog {
    pub(crate) fn hook(&self) -> impl AuthHook {
        let fired = self.fired.clone();
        let requests = self.requests.clone();
        hook_fn(move |request| {
            fired.lock().expect("fired mutex poisoned").push(request.kind);
            requests
                .lock()
                .expect("requests mutex poisoned")
                .push(request.clone());
            Ok(None)
        })
    }

    pub(crate) fn fired(&self) -> Vec<AuthEventKind> {
        self.fired.lock().expect("fired mutex poisoned").clone()
    }

    pub(crate) fn requests(&self) -> Vec<AuthEventRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.fired.lock().expect("fired mutex poisoned").len()
    }

    // Dispatcher with this log observing every lifecycle point.
    pub(crate) async fn observing_dispatcher(&self) -> Dispatcher {
        let registry = Arc::new(EventRegistry::new());
        for kind in AuthEventKind::ALL {
            registry.on_auth_event(kind, self.hook()).await;
        }
        Dispatcher::new(registry)
    }
}
