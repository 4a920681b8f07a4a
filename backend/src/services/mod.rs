//! Business logic services for the Inventory Management Platform

pub mod lookup;
pub mod product;
pub mod sale_order;
pub mod stock;
pub mod stock_movement;
pub mod supplier;

pub use product::ProductService;
pub use sale_order::SaleOrderService;
pub use stock_movement::StockMovementService;
pub use supplier::SupplierService;
