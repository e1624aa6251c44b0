//! Stockbook - Backend
//!
//! Inventory and pricing engine for a small manufacturing business:
//! material purchases, running stock with weighted-average cost, bill-of-
//! materials product pricing, and stock deduction on save. Persistence is
//! delegated to a hosted document store behind the [`store::DocumentStore`]
//! trait; sign-in state comes from the [`identity::Identity`] collaborator.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn store::DocumentStore>,
    pub identity: Arc<dyn identity::Identity>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Stockbook API v1.0"
}
