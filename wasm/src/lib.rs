//! WebAssembly module for the Inventory Management Platform
//!
//! Runs the same form validators as the backend in the browser, so forms can
//! be checked before they are submitted. Inputs and outputs are JSON:
//! a form object plus, where needed, the reference snapshot the page loaded
//! from the `/choices` endpoints.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

/// `{"ok": entity}` on success, `{"errors": {field: {code, message}}}` otherwise
fn run<V>(validator: &V, form: &V::Form) -> String
where
    V: FormValidator,
    V::Output: Serialize,
{
    match validator.validate(form) {
        Ok(entity) => json!({ "ok": entity }).to_string(),
        Err(errors) => json!({ "errors": errors }).to_string(),
    }
}

/// Validate a product form against the supplier choices
#[wasm_bindgen]
pub fn validate_product_form(form_json: &str, suppliers_json: &str) -> Result<String, JsValue> {
    let form: ProductForm = parse("product form", form_json)?;
    let suppliers: SupplierSnapshot = parse("supplier list", suppliers_json)?;
    Ok(run(&ProductValidator::new(&suppliers), &form))
}

/// Validate a supplier form
#[wasm_bindgen]
pub fn validate_supplier_form(form_json: &str) -> Result<String, JsValue> {
    let form: SupplierForm = parse("supplier form", form_json)?;
    Ok(run(&SupplierValidator::new(), &form))
}

/// Validate a stock movement form against the product list
#[wasm_bindgen]
pub fn validate_stock_movement_form(form_json: &str, products_json: &str) -> Result<String, JsValue> {
    let form: StockMovementForm = parse("stock movement form", form_json)?;
    let products: ProductSnapshot = parse("product list", products_json)?;
    Ok(run(&StockMovementValidator::new(&products), &form))
}

/// Validate a sale order form against the product list and its stock levels
#[wasm_bindgen]
pub fn validate_sale_order_form(form_json: &str, products_json: &str) -> Result<String, JsValue> {
    let form: SaleOrderForm = parse("sale order form", form_json)?;
    let products: ProductSnapshot = parse("product list", products_json)?;
    Ok(run(&SaleOrderValidator::new(&products), &form))
}

/// Check a phone number as typed
#[wasm_bindgen]
pub fn is_valid_phone(phone: &str) -> bool {
    validate_phone(phone).is_ok()
}
