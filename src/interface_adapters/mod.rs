// Interface adapters: HTTP surface, storage adapters and built-in hooks.

pub mod handlers;
pub mod hooks;
pub mod password;
pub mod protocol;
pub mod routes;
pub mod state;
