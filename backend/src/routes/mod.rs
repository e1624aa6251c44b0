//! Route definitions for the Stockbook backend

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - material purchases and ledger views
        .nest("/materials", material_routes(state.clone()))
        // Protected routes - product pricing
        .nest("/products", product_routes(state.clone()))
        // Protected routes - drug purchase log
        .nest("/drugs", drug_routes(state))
}

/// Material purchase routes (protected)
fn material_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::submit_purchase),
        )
        .route("/latest", get(handlers::latest_snapshots))
        .route("/low-stock", get(handlers::low_stock))
        .route("/categories", get(handlers::categories))
        .route("/history/:material", get(handlers::material_history))
        .route("/prefill/:material", get(handlers::prefill))
        .route(
            "/:id",
            put(handlers::update_purchase).delete(handlers::delete_purchase),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product pricing routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::save_product),
        )
        .route("/price", post(handlers::calculate_price))
        .route("/bottles", get(handlers::list_bottles))
        .route("/:id", delete(handlers::delete_product))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Drug log routes (protected)
fn drug_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_entries).post(handlers::add_entry))
        .route("/search", get(handlers::search_entries))
        .route("/history/:drug_name", get(handlers::drug_history))
        .route("/:id", delete(handlers::delete_entry))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
