//! Shared types, models and validation for the Inventory Management Platform
//!
//! This crate holds the form validators for products, suppliers, stock
//! movements and sale orders. It is used by the backend and, through WASM, by
//! the browser for validation before submission.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
