use std::{env, time::Duration};

// Runtime/server settings read from the environment.

pub fn http_port() -> u16 {
    env::var("AUTH_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3002)
}

// Users persist in Postgres only when this is set.
pub fn database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

pub fn session_ttl_seconds() -> u64 {
    env::var("SESSION_TTL_SECONDS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(60 * 60)
}

pub fn request_timeout() -> Duration {
    let millis = env::var("AUTH_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(5000);
    Duration::from_millis(millis)
}

pub fn event_logging_enabled() -> bool {
    matches!(
        env::var("AUTH_EVENT_LOGGING").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

pub const DB_MAX_CONNECTIONS: u32 = 5;
