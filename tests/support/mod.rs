// Shared helpers that boot an in-memory auth server per test.
use auth_events::interface_adapters::password::PasswordHasher;
use auth_events::interface_adapters::state::{AppState, InMemoryUserStore};
use auth_events::{
    AuthEventKind, AuthEventRequest, AuthHook, Dispatcher, EventRegistry, HookResult,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct TestServer {
    pub base_url: String,
    pub registry: Arc<EventRegistry>,
    client: reqwest::Client,
}

// Bind an ephemeral port and serve on the current test runtime.
pub async fn spawn_server() -> TestServer {
    let registry = Arc::new(EventRegistry::new());
    let state = AppState {
        sessions: Arc::default(),
        users: Arc::new(InMemoryUserStore::new(PasswordHasher::fast())),
        dispatcher: Dispatcher::new(registry.clone()),
        session_ttl_seconds: 3600,
        request_timeout: Duration::from_secs(5),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        auth_events::run(listener, state).await.expect("server failed");
    });

    TestServer {
        base_url: format!("http://{addr}"),
        registry,
        client: reqwest::Client::new(),
    }
}

impl TestServer {
    pub async fn post(&self, path: &str, body: Value) -> (reqwest::StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("request should succeed");
        let status = res.status();
        let payload = res.json::<Value>().await.expect("expected json body");
        (status, payload)
    }

    pub async fn sign_up(&self, username: &str, password: &str) -> Value {
        let (status, payload) = self
            .post(
                "/auth/signup",
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, reqwest::StatusCode::OK, "sign-up failed: {payload}");
        payload
    }

    pub async fn log_in(&self, username: &str, password: &str) -> (reqwest::StatusCode, Value) {
        self.post(
            "/auth/login",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn log_out(&self, token: &Value) -> (reqwest::StatusCode, Value) {
        self.post("/auth/logout", json!({ "token": token })).await
    }
}

// Hook that records every request it observes and stays passive.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<AuthEventRequest>>>,
}

impl Recorder {
    pub async fn attach(&self, registry: &EventRegistry, kinds: &[AuthEventKind]) {
        for kind in kinds {
            registry.on_auth_event(*kind, self.clone()).await;
        }
    }

    pub fn seen(&self) -> Vec<AuthEventRequest> {
        self.seen.lock().expect("recorder poisoned").clone()
    }

    pub fn kinds(&self) -> Vec<AuthEventKind> {
        self.seen().into_iter().map(|request| request.kind).collect()
    }
}

#[async_trait::async_trait]
impl AuthHook for Recorder {
    async fn call(&self, request: &mut AuthEventRequest) -> HookResult {
        self.seen
            .lock()
            .expect("recorder poisoned")
            .push(request.clone());
        Ok(None)
    }
}
