//! Product management service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{Choice, FormValidator, ProductForm, ProductValidator};

use crate::error::{AppError, AppResult};
use crate::services::lookup::ReferenceLookup;

/// Product service for managing the product catalogue
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
    lookup: ReferenceLookup,
}

/// Stored product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock_quantity: i64,
    pub supplier_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, category, price, stock_quantity, supplier_id, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        let lookup = ReferenceLookup::new(db.clone());
        Self { db, lookup }
    }

    /// List all products
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Products available for selection on movement and order forms
    pub async fn list_choices(&self) -> AppResult<Vec<Choice>> {
        Ok(self.lookup.product_snapshot().await?.choices())
    }

    /// Validate and store a new product
    pub async fn create_product(&self, form: ProductForm) -> AppResult<Product> {
        let suppliers = self.lookup.supplier_snapshot().await?;
        let input = ProductValidator::new(&suppliers).validate(&form)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, category, price, stock_quantity, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.stock_quantity)
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = %product.id, price = %product.price, "Product created");
        Ok(product)
    }

    /// Validate and replace an edited product
    ///
    /// The form's stock quantity is validated but not written: stock only
    /// changes through stock movements and sale orders, so an edit made from a
    /// stale form cannot undo them.
    pub async fn update_product(&self, product_id: Uuid, form: ProductForm) -> AppResult<Product> {
        // Unknown products are a 404, not a form error
        self.get_product(product_id).await?;

        let suppliers = self.lookup.supplier_snapshot().await?;
        let input = ProductValidator::new(&suppliers).validate(&form)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, category = $4, price = $5,
                supplier_id = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SaleOrderForm;

    use crate::services::sale_order::SaleOrderService;

    async fn insert_supplier(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO suppliers (name, email, phone, address)
            VALUES ('Acme', 'sales@acme.test', '5551234567', '1 Main St')
            RETURNING id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn form(supplier_id: Uuid, name: &str, stock_quantity: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            description: "LED lamp".to_string(),
            category: "Lighting".to_string(),
            price: "19.99".to_string(),
            stock_quantity: stock_quantity.to_string(),
            supplier_id: supplier_id.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_edit_keeps_stock_changed_by_sales(pool: PgPool) {
        let supplier_id = insert_supplier(&pool).await;
        let service = ProductService::new(pool.clone());
        let product = service
            .create_product(form(supplier_id, "Desk Lamp", "5"))
            .await
            .unwrap();

        SaleOrderService::new(pool.clone())
            .place_order(SaleOrderForm {
                product_id: product.id.to_string(),
                quantity: "5".to_string(),
            })
            .await
            .unwrap();

        // Edit from the form as it was loaded before the sale
        let edited = service
            .update_product(product.id, form(supplier_id, "Desk Lamp XL", "5"))
            .await
            .unwrap();

        assert_eq!(edited.name, "Desk Lamp XL");
        assert_eq!(edited.stock_quantity, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_edit_of_unknown_product_is_not_found(pool: PgPool) {
        let err = ProductService::new(pool)
            .update_product(Uuid::new_v4(), ProductForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
