//! HTTP handlers for material purchase endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use shared::models::{PurchaseEntry, PurchaseRecord};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{LedgerService, MaterialService};
use crate::AppState;

/// Record a new material purchase
pub async fn submit_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(entry): Json<PurchaseEntry>,
) -> AppResult<Json<PurchaseRecord>> {
    let service = MaterialService::new(state.store.clone(), state.config.app.id.clone());
    let record = service.submit_purchase(&current_user.0.uid, entry).await?;
    Ok(Json(record))
}

/// List every purchase, newest first
pub async fn list_purchases(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<PurchaseRecord>>> {
    let service = MaterialService::new(state.store.clone(), state.config.app.id.clone());
    let records = service.list_purchases(&current_user.0.uid).await?;
    Ok(Json(records))
}

/// Latest snapshot per material name
pub async fn latest_snapshots(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<HashMap<String, PurchaseRecord>>> {
    let service = LedgerService::new(state.store.clone(), state.config.app.id.clone());
    let snapshots = service.latest_snapshots(&current_user.0.uid).await?;
    Ok(Json(snapshots))
}

/// Materials below their reorder threshold
pub async fn low_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<PurchaseRecord>>> {
    let service = LedgerService::new(state.store.clone(), state.config.app.id.clone());
    let records = service.low_stock(&current_user.0.uid).await?;
    Ok(Json(records))
}

/// Distinct category labels across the purchase log
pub async fn categories(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<String>>> {
    let service = LedgerService::new(state.store.clone(), state.config.app.id.clone());
    let labels = service.categories(&current_user.0.uid).await?;
    Ok(Json(labels))
}

/// Purchase history for one material name
pub async fn material_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(material): Path<String>,
) -> AppResult<Json<Vec<PurchaseRecord>>> {
    let service = LedgerService::new(state.store.clone(), state.config.app.id.clone());
    let records = service
        .material_history(&current_user.0.uid, &material)
        .await?;
    Ok(Json(records))
}

/// Latest record for a material name, for entry-form prefill.
/// Returns null for a new material.
pub async fn prefill(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(material): Path<String>,
) -> AppResult<Json<Option<PurchaseRecord>>> {
    let service = MaterialService::new(state.store.clone(), state.config.app.id.clone());
    let record = service.prefill(&current_user.0.uid, &material).await?;
    Ok(Json(record))
}

/// Edit an existing purchase record in place
pub async fn update_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(entry): Json<PurchaseEntry>,
) -> AppResult<Json<PurchaseRecord>> {
    let service = MaterialService::new(state.store.clone(), state.config.app.id.clone());
    let record = service
        .update_purchase(&current_user.0.uid, id, entry)
        .await?;
    Ok(Json(record))
}

/// Delete a purchase record
pub async fn delete_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = MaterialService::new(state.store.clone(), state.config.app.id.clone());
    service.delete_purchase(&current_user.0.uid, id).await?;
    Ok(Json(()))
}
