//! Sale order service

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{FormValidator, ProductSnapshot, SaleOrderForm, SaleOrderValidator};

use crate::error::AppResult;
use crate::services::lookup::ReferenceLookup;
use crate::services::stock::apply_stock_delta;

/// Sale order service
#[derive(Clone)]
pub struct SaleOrderService {
    db: PgPool,
    lookup: ReferenceLookup,
}

/// Recorded sale order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SaleOrder {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// A placed order with the stock level it left behind
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: SaleOrder,
    pub stock_quantity: i64,
}

impl SaleOrderService {
    /// Create a new SaleOrderService instance
    pub fn new(db: PgPool) -> Self {
        let lookup = ReferenceLookup::new(db.clone());
        Self { db, lookup }
    }

    /// List all sale orders, newest first
    pub async fn list_orders(&self) -> AppResult<Vec<SaleOrder>> {
        let orders = sqlx::query_as::<_, SaleOrder>(
            "SELECT id, product_id, quantity, created_at FROM sale_orders ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Validate an order against current stock, then record it and decrement stock
    ///
    /// Validation reads the product's stock once. The decrement is conditional,
    /// so an order that passed validation but lost a race with another sale is
    /// rejected with `InsufficientStock` and nothing is recorded.
    pub async fn place_order(&self, form: SaleOrderForm) -> AppResult<PlacedOrder> {
        let products = match Uuid::parse_str(form.product_id.trim()) {
            Ok(product_id) => self.lookup.product_stock(product_id).await?,
            Err(_) => ProductSnapshot::default(),
        };
        let input = SaleOrderValidator::new(&products).validate(&form)?;

        let mut tx = self.db.begin().await?;

        let stock_quantity = apply_stock_delta(&mut tx, input.product_id, input.stock_delta()).await?;

        let order = sqlx::query_as::<_, SaleOrder>(
            r#"
            INSERT INTO sale_orders (product_id, quantity)
            VALUES ($1, $2)
            RETURNING id, product_id, quantity, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            product_id = %order.product_id,
            quantity = order.quantity,
            stock_quantity,
            "Sale order placed"
        );

        Ok(PlacedOrder {
            order,
            stock_quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ValidationErrorKind;

    use crate::error::AppError;

    async fn insert_product(pool: &PgPool, stock_quantity: i64) -> Uuid {
        let supplier_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO suppliers (name, email, phone, address)
            VALUES ('Acme', 'sales@acme.test', '5551234567', '1 Main St')
            RETURNING id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar(
            r#"
            INSERT INTO products (name, description, category, price, stock_quantity, supplier_id)
            VALUES ('Desk Lamp', 'LED lamp', 'Lighting', 19.99, $1, $2)
            RETURNING id
            "#,
        )
        .bind(stock_quantity)
        .bind(supplier_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn stock_of(pool: &PgPool, product_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn order_count(pool: &PgPool, product_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sale_orders WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn form(product_id: Uuid, quantity: &str) -> SaleOrderForm {
        SaleOrderForm {
            product_id: product_id.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_order_for_exact_stock_empties_it(pool: PgPool) {
        let product_id = insert_product(&pool, 5).await;
        let placed = SaleOrderService::new(pool.clone())
            .place_order(form(product_id, "5"))
            .await
            .unwrap();

        assert_eq!(placed.stock_quantity, 0);
        assert_eq!(stock_of(&pool, product_id).await, 0);
        assert_eq!(order_count(&pool, product_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_order_past_stock_records_nothing(pool: PgPool) {
        let product_id = insert_product(&pool, 5).await;
        let err = SaleOrderService::new(pool.clone())
            .place_order(form(product_id, "6"))
            .await
            .unwrap_err();

        match err {
            AppError::InvalidForm(errors) => assert_eq!(
                errors.kind_of("quantity"),
                Some(ValidationErrorKind::InsufficientStock)
            ),
            other => panic!("expected InvalidForm, got {:?}", other),
        }
        assert_eq!(stock_of(&pool, product_id).await, 5);
        assert_eq!(order_count(&pool, product_id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_second_order_sees_first_decrement(pool: PgPool) {
        let product_id = insert_product(&pool, 5).await;
        let service = SaleOrderService::new(pool.clone());

        service.place_order(form(product_id, "3")).await.unwrap();
        let err = service.place_order(form(product_id, "3")).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidForm(_)));
        assert_eq!(stock_of(&pool, product_id).await, 2);
        assert_eq!(order_count(&pool, product_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_lost_race_is_conflict(pool: PgPool) {
        // Stock drops after validation read it; the guarded write refuses the order
        let product_id = insert_product(&pool, 5).await;
        let mut tx = pool.begin().await.unwrap();
        sqlx::query("UPDATE products SET stock_quantity = 1 WHERE id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .unwrap();

        let err = apply_stock_delta(&mut tx, product_id, -5).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock(_)));
        tx.rollback().await.unwrap();

        assert_eq!(stock_of(&pool, product_id).await, 5);
        assert_eq!(order_count(&pool, product_id).await, 0);
    }
}
