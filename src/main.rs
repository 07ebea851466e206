use shoe_store_rust::catalog::Catalog;
use shoe_store_rust::config::StoreConfig;
use shoe_store_rust::router::create_app_router;
use shoe_store_rust::state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = StoreConfig::from_env().expect("Failed to load configuration");

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shoe_store_rust=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load the product catalog once; it never changes afterwards
    let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())
        .expect("Failed to load catalog");
    tracing::info!(products = catalog.len(), "Catalog ready");

    // Initialize application state (registers the store tools)
    let state = Arc::new(AppState::new(catalog, &config));

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    let addr = config.socket_addr();
    tracing::info!("Server running on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
