pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::entities::{Credentials, User};
pub use domain::errors::AuthError;
pub use domain::events::{AuthEventKind, AuthEventRequest};
pub use domain::hooks::{hook_fn, AuthHook, HookResult, HookValue};
pub use frameworks::config::http_port;
pub use frameworks::server::{run, run_with_config};
pub use use_cases::dispatcher::{DispatchOutcome, Dispatcher};
pub use use_cases::registry::EventRegistry;
