//! Route definitions for the Inventory Management Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/suppliers", supplier_routes())
        .nest("/products", product_routes())
        .nest("/stock-movements", stock_movement_routes())
        .nest("/sale-orders", sale_order_routes())
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route("/choices", get(handlers::list_supplier_choices))
        .route(
            "/:supplier_id",
            get(handlers::get_supplier).put(handlers::update_supplier),
        )
}

/// Product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/choices", get(handlers::list_product_choices))
        .route(
            "/:product_id",
            get(handlers::get_product).put(handlers::update_product),
        )
        .route(
            "/:product_id/stock-movements",
            get(handlers::list_product_movements),
        )
}

/// Stock movement routes (append-only)
fn stock_movement_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_stock_movements).post(handlers::record_stock_movement),
    )
}

/// Sale order routes
fn sale_order_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_sale_orders).post(handlers::place_sale_order),
    )
}
