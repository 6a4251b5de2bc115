use auth_events::EventRegistry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Embedders register hooks on the registry before serving.
    let registry = Arc::new(EventRegistry::new());
    auth_events::run_with_config(registry).await
}
