//! HTTP handlers for the drug purchase log

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::DrugRecord;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::drugs::DrugEntry;
use crate::services::DrugService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Append one drug purchase
pub async fn add_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(entry): Json<DrugEntry>,
) -> AppResult<Json<DrugRecord>> {
    let service = DrugService::new(state.store.clone(), state.config.app.id.clone());
    let record = service.add_entry(&current_user.0.uid, entry).await?;
    Ok(Json(record))
}

/// List the drug log sorted by name
pub async fn list_entries(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<DrugRecord>>> {
    let service = DrugService::new(state.store.clone(), state.config.app.id.clone());
    let records = service.list(&current_user.0.uid).await?;
    Ok(Json(records))
}

/// Search entries by name substring
pub async fn search_entries(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<DrugRecord>>> {
    let service = DrugService::new(state.store.clone(), state.config.app.id.clone());
    let records = service.search(&current_user.0.uid, &params.q).await?;
    Ok(Json(records))
}

/// Purchase history for one drug name, newest first
pub async fn drug_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(drug_name): Path<String>,
) -> AppResult<Json<Vec<DrugRecord>>> {
    let service = DrugService::new(state.store.clone(), state.config.app.id.clone());
    let records = service.history(&current_user.0.uid, &drug_name).await?;
    Ok(Json(records))
}

/// Delete one entry
pub async fn delete_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = DrugService::new(state.store.clone(), state.config.app.id.clone());
    service.delete_entry(&current_user.0.uid, id).await?;
    Ok(Json(()))
}
