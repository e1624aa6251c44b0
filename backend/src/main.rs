//! Stockbook - Backend Server
//!
//! Serves the inventory and pricing engine over HTTP. Local runs use the
//! in-memory document store and a fixed development identity; deployments
//! wire the hosted document database and sign-in provider here instead.

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockbook_backend::{
    create_app,
    identity::StaticIdentity,
    store::MemoryStore,
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockbook_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Stockbook Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Tenant: {}", config.app.id);

    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        identity: Arc::new(StaticIdentity::signed_in(&config.app.dev_user)),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
