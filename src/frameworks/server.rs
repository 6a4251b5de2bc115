// Framework bootstrap for the auth service runtime.

use crate::domain::ports::UserStore;
use crate::frameworks::{config, db};
use crate::interface_adapters::hooks::TracingHook;
use crate::interface_adapters::password::PasswordHasher;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{AppState, InMemoryUserStore, PostgresUserStore};
use crate::use_cases::dispatcher::Dispatcher;
use crate::use_cases::registry::EventRegistry;

use std::collections::HashMap;
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Serve the auth routes on an already bound listener.
pub async fn run(listener: tokio::net::TcpListener, state: AppState) -> Result<()> {
    let address = listener.local_addr()?;
    let app = app(state);

    tracing::info!(%address, "listening");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

// Reads the environment, wires the stores around `registry` and serves.
// Hooks registered on `registry` take effect on the next dispatch.
pub async fn run_with_config(registry: Arc<EventRegistry>) -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    let state = build_state(registry).await?;
    run(listener, state).await
}

async fn build_state(registry: Arc<EventRegistry>) -> Result<AppState> {
    if config::event_logging_enabled() {
        TracingHook::register_all(&registry).await;
        tracing::debug!("auth event logging enabled");
    }

    let hasher = PasswordHasher::new();
    let users: Arc<dyn UserStore> = match config::database_url() {
        Some(database_url) => {
            let pool = db::connect_pool(&database_url)
                .await
                .map_err(|e| std::io::Error::other(format!("failed to connect database: {e}")))?;
            db::run_migrations(&pool)
                .await
                .map_err(|e| std::io::Error::other(format!("failed to run migrations: {e}")))?;
            tracing::info!("using postgres user store");
            Arc::new(PostgresUserStore { db: pool, hasher })
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory");
            Arc::new(InMemoryUserStore::new(hasher))
        }
    };

    let session_ttl_seconds = config::session_ttl_seconds();
    let request_timeout = config::request_timeout();
    tracing::debug!(
        session_ttl_seconds,
        request_timeout_ms = request_timeout.as_millis() as u64,
        "auth service configured"
    );

    Ok(AppState {
        sessions: Arc::new(Mutex::new(HashMap::new())),
        users,
        dispatcher: Dispatcher::new(registry),
        session_ttl_seconds,
        request_timeout,
    })
}
