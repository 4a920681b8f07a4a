//! Inventory entity models and their form validators

mod product;
mod sale_order;
mod stock_movement;
mod supplier;

pub use product::*;
pub use sale_order::*;
pub use stock_movement::*;
pub use supplier::*;
