//! HTTP handlers for supplier endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{Choice, SupplierForm};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::supplier::{Supplier, SupplierService};
use crate::AppState;

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list_suppliers().await?;
    Ok(Json(suppliers))
}

/// Supplier choices for product forms
pub async fn list_supplier_choices(State(state): State<AppState>) -> AppResult<Json<Vec<Choice>>> {
    let service = SupplierService::new(state.db);
    let choices = service.list_choices().await?;
    Ok(Json(choices))
}

/// Get a supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(form): Json<SupplierForm>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let service = SupplierService::new(state.db);
    let supplier = service.create_supplier(form).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(form): Json<SupplierForm>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.update_supplier(supplier_id, form).await?;
    Ok(Json(supplier))
}
