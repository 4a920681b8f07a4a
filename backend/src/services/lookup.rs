//! Reference data lookups used to build validation snapshots
//!
//! Each request reads its snapshot once, before validating, and does not see
//! later changes.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{Choice, ProductSnapshot, ProductStock, SupplierSnapshot};

use crate::error::AppResult;

/// Reads the supplier and product reference sets
#[derive(Clone)]
pub struct ReferenceLookup {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ChoiceRow {
    id: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct ProductStockRow {
    id: Uuid,
    name: String,
    stock_quantity: i64,
}

impl ReferenceLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All suppliers available for selection
    pub async fn supplier_snapshot(&self) -> AppResult<SupplierSnapshot> {
        let rows = sqlx::query_as::<_, ChoiceRow>("SELECT id, name FROM suppliers ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(SupplierSnapshot::new(
            rows.into_iter().map(|r| Choice::new(r.id, r.name)).collect(),
        ))
    }

    /// All products with their current stock levels
    pub async fn product_snapshot(&self) -> AppResult<ProductSnapshot> {
        let rows = sqlx::query_as::<_, ProductStockRow>(
            "SELECT id, name, stock_quantity FROM products ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(ProductSnapshot::new(
            rows.into_iter()
                .map(|r| ProductStock {
                    id: r.id,
                    name: r.name,
                    stock_quantity: r.stock_quantity,
                })
                .collect(),
        ))
    }

    /// Snapshot holding a single product, for checks that only concern one id
    pub async fn product_stock(&self, product_id: Uuid) -> AppResult<ProductSnapshot> {
        let row = sqlx::query_as::<_, ProductStockRow>(
            "SELECT id, name, stock_quantity FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(ProductSnapshot::new(
            row.into_iter()
                .map(|r| ProductStock {
                    id: r.id,
                    name: r.name,
                    stock_quantity: r.stock_quantity,
                })
                .collect(),
        ))
    }
}
