//! HTTP handlers for sale order endpoints

use axum::{extract::State, http::StatusCode, Json};
use shared::SaleOrderForm;

use crate::error::AppResult;
use crate::services::sale_order::{PlacedOrder, SaleOrder, SaleOrderService};
use crate::AppState;

/// List all sale orders
pub async fn list_sale_orders(State(state): State<AppState>) -> AppResult<Json<Vec<SaleOrder>>> {
    let service = SaleOrderService::new(state.db);
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

/// Place a sale order
pub async fn place_sale_order(
    State(state): State<AppState>,
    Json(form): Json<SaleOrderForm>,
) -> AppResult<(StatusCode, Json<PlacedOrder>)> {
    let service = SaleOrderService::new(state.db);
    let order = service.place_order(form).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
