use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::events::AuthEventKind;
use crate::domain::hooks::AuthHook;

/// Table of auth hooks keyed by the lifecycle point they are bound to.
///
/// Hooks of one kind run in registration order. The registry is shared by
/// every in-flight login/logout, so readers always get a snapshot of the
/// list rather than a view into it.
#[derive(Default)]
pub struct EventRegistry {
    hooks: RwLock<HashMap<AuthEventKind, Vec<Arc<dyn AuthHook>>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` for `kind`; it runs after every hook already bound
    /// to that kind.
    pub async fn on_auth_event(&self, kind: AuthEventKind, hook: impl AuthHook) {
        self.register(kind, Arc::new(hook)).await;
    }

    pub async fn register(&self, kind: AuthEventKind, hook: Arc<dyn AuthHook>) {
        let name = hook.name().to_string();

        let mut hooks = self.hooks.write().await;
        let entries = hooks.entry(kind).or_default();
        entries.push(hook);
        let position = entries.len();
        drop(hooks);

        info!(kind = %kind, hook = %name, position, "auth hook registered");
    }

    // Snapshot of the hooks for `kind`, in registration order.
    pub async fn handlers_for(&self, kind: AuthEventKind) -> Vec<Arc<dyn AuthHook>> {
        let hooks = self.hooks.read().await;
        hooks.get(&kind).cloned().unwrap_or_default()
    }

    pub async fn handler_count(&self, kind: AuthEventKind) -> usize {
        let hooks = self.hooks.read().await;
        hooks.get(&kind).map(Vec::len).unwrap_or(0)
    }

    // Drops every registration, e.g. between isolated test runs.
    pub async fn reset(&self) {
        self.hooks.write().await.clear();
        info!("auth hooks cleared");
    }
}
