use async_trait::async_trait;

use crate::domain::errors::AuthError;
use crate::domain::events::AuthEventRequest;

// Error-like value a hook can return or raise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookValue {
    Error(AuthError),
    Text(String),
}

impl From<AuthError> for HookValue {
    fn from(error: AuthError) -> Self {
        HookValue::Error(error)
    }
}

impl From<String> for HookValue {
    fn from(text: String) -> Self {
        HookValue::Text(text)
    }
}

impl From<&str> for HookValue {
    fn from(text: &str) -> Self {
        HookValue::Text(text.to_string())
    }
}

// `Ok(None)`: passive. `Ok(Some(v))`: returned a value. `Err(v)`: raised a value.
pub type HookResult = Result<Option<HookValue>, HookValue>;

/// Callback bound to one [`AuthEventKind`](crate::domain::events::AuthEventKind).
///
/// A hook may read or mutate the request, return an error-like value or
/// raise one. Any async work is awaited before the next hook runs.
#[async_trait]
pub trait AuthHook: Send + Sync + 'static {
    async fn call(&self, request: &mut AuthEventRequest) -> HookResult;

    // Used in logs only.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// Adapter that turns a synchronous closure into a hook.
pub struct FnHook<F> {
    f: F,
}

pub fn hook_fn<F>(f: F) -> FnHook<F>
where
    F: Fn(&mut AuthEventRequest) -> HookResult + Send + Sync + 'static,
{
    FnHook { f }
}

#[async_trait]
impl<F> AuthHook for FnHook<F>
where
    F: Fn(&mut AuthEventRequest) -> HookResult + Send + Sync + 'static,
{
    async fn call(&self, request: &mut AuthEventRequest) -> HookResult {
        (self.f)(request)
    }

    fn name(&self) -> &str {
        "fn_hook"
    }
}
