//! HTTP handlers for product pricing endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::models::{PricingResult, ProductPriceRecord};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::pricing::{bottle_catalog, BottleOption, PricingRequest};
use crate::services::PricingService;
use crate::AppState;

/// Calculate a product price without saving
pub async fn calculate_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PricingRequest>,
) -> AppResult<Json<PricingResult>> {
    let service = PricingService::new(state.store.clone(), state.config.app.id.clone());
    let result = service.calculate(&current_user.0.uid, &request).await?;
    Ok(Json(result))
}

/// Calculate, save, and deduct stock
pub async fn save_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PricingRequest>,
) -> AppResult<Json<ProductPriceRecord>> {
    let service = PricingService::new(state.store.clone(), state.config.app.id.clone());
    let record = service.save(&current_user.0.uid, &request).await?;
    Ok(Json(record))
}

/// List saved product prices, newest first
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductPriceRecord>>> {
    let service = PricingService::new(state.store.clone(), state.config.app.id.clone());
    let records = service.list_products(&current_user.0.uid).await?;
    Ok(Json(records))
}

/// Delete a saved product price (stock is not restored)
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PricingService::new(state.store.clone(), state.config.app.id.clone());
    service.delete_product(&current_user.0.uid, id).await?;
    Ok(Json(()))
}

/// The fixed bottle price table
pub async fn list_bottles() -> Json<Vec<BottleOption>> {
    Json(bottle_catalog())
}
