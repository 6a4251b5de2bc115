use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::domain::errors::AuthError;
use crate::domain::events::AuthEventRequest;
use crate::domain::hooks::{AuthHook, HookResult, HookValue};
use crate::domain::normalizer::{classify, normalize};
use crate::use_cases::registry::EventRegistry;

// Result of running every hook of one stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Continue,
    Abort(AuthError),
}

/// Runs the hooks bound to a lifecycle point against one request.
///
/// Hooks run one at a time in registration order and each is awaited to
/// completion. The first hook that raises or returns a value ends the
/// stage; its value, normalized to an [`AuthError`], replaces whatever
/// error the request carried.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<EventRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    pub async fn dispatch(&self, request: &mut AuthEventRequest) -> DispatchOutcome {
        let kind = request.kind;
        let hooks = self.registry.handlers_for(kind).await;
        let mut effective = request.error.clone();

        if !hooks.is_empty() {
            debug!(kind = %kind, hook_count = hooks.len(), "dispatching auth event");
        }

        for hook in &hooks {
            let before = request.error.clone();
            let result = run_hook(hook.as_ref(), request).await;
            let outcome = classify(result, before.as_ref(), request.error.as_ref());
            let stop = outcome.short_circuits();

            effective = normalize(outcome, effective);
            // Exactly one error per stage: hooks and pipeline see the same value.
            request.error = effective.clone();

            if stop {
                if let Some(error) = &effective {
                    info!(
                        kind = %kind,
                        hook = hook.name(),
                        code = error.code,
                        message = %error.message,
                        script_failure = error.is_script_failure(),
                        "auth hook ended stage"
                    );
                }
                break;
            }
        }

        match effective {
            Some(error) => DispatchOutcome::Abort(error),
            None => DispatchOutcome::Continue,
        }
    }
}

// A panicking hook counts as a hook that raised its panic message.
async fn run_hook(hook: &dyn AuthHook, request: &mut AuthEventRequest) -> HookResult {
    match AssertUnwindSafe(hook.call(request)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(hook = hook.name(), message = %message, "auth hook panicked");
            Err(HookValue::Text(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "auth hook panicked".to_string()
    }
}
