use async_trait::async_trait;

use crate::domain::events::{AuthEventKind, AuthEventRequest};
use crate::domain::hooks::{AuthHook, HookResult};
use crate::use_cases::registry::EventRegistry;

// Passive observer that logs every event it sees. Never alters the outcome.
pub struct TracingHook;

impl TracingHook {
    // Registers one observer per event kind.
    pub async fn register_all(registry: &EventRegistry) {
        for kind in AuthEventKind::ALL {
            registry.on_auth_event(kind, TracingHook).await;
        }
    }
}

#[async_trait]
impl AuthHook for TracingHook {
    async fn call(&self, request: &mut AuthEventRequest) -> HookResult {
        let username = request
            .credentials
            .as_ref()
            .map(|credentials| credentials.username.as_str());
        let user_id = request.user.as_ref().map(|user| user.id.as_str());

        if let Some(error) = &request.error {
            tracing::info!(
                target: "auth_events::hooks",
                event = %request.kind,
                flow = ?request.kind.flow(),
                username,
                user_id,
                code = error.code,
                message = %error.message,
                "auth event"
            );
        } else {
            tracing::info!(
                target: "auth_events::hooks",
                event = %request.kind,
                flow = ?request.kind.flow(),
                username,
                user_id,
                "auth event"
            );
        }

        Ok(None)
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
