//! HTTP handlers for stock movement endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::StockMovementForm;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock_movement::{RecordedMovement, StockMovement, StockMovementService};
use crate::AppState;

/// List all stock movements
pub async fn list_stock_movements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockMovementService::new(state.db);
    let movements = service.list_movements().await?;
    Ok(Json(movements))
}

/// List stock movements for a product
pub async fn list_product_movements(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockMovementService::new(state.db);
    let movements = service.list_for_product(product_id).await?;
    Ok(Json(movements))
}

/// Record a stock movement and apply it
pub async fn record_stock_movement(
    State(state): State<AppState>,
    Json(form): Json<StockMovementForm>,
) -> AppResult<(StatusCode, Json<RecordedMovement>)> {
    let service = StockMovementService::new(state.db);
    let movement = service.record_movement(form).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
