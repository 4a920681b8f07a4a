//! Guarded application of stock changes

use sqlx::PgConnection;
use uuid::Uuid;

use shared::{apply_stock_change, FieldError, FieldErrors, ValidationErrorKind};

use crate::error::{AppError, AppResult};

/// Apply a signed change to a product's stock inside the caller's transaction
///
/// The update is conditional on the result staying within `0..=i64::MAX`, so a
/// sale or outgoing movement that lost a race against another one fails with
/// `InsufficientStock` instead of driving stock below zero, and an incoming
/// movement too large for the column is a range error on `quantity`.
pub async fn apply_stock_delta(
    conn: &mut PgConnection,
    product_id: Uuid,
    delta: i64,
) -> AppResult<i64> {
    // Both bounds are written without `stock_quantity + $1` so the filter itself cannot overflow
    let updated = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE products
        SET stock_quantity = stock_quantity + $1, updated_at = NOW()
        WHERE id = $2
          AND stock_quantity >= -LEAST($1::BIGINT, 0)
          AND stock_quantity <= 9223372036854775807 - GREATEST($1::BIGINT, 0)
        RETURNING stock_quantity
        "#,
    )
    .bind(delta)
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(stock_quantity) = updated {
        return Ok(stock_quantity);
    }

    let current = sqlx::query_scalar::<_, i64>("SELECT stock_quantity FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    let error = apply_stock_change(current, delta)
        .err()
        .unwrap_or_else(|| FieldError::insufficient_stock(current));
    Err(rejection(error))
}

fn rejection(error: FieldError) -> AppError {
    match error.kind {
        ValidationErrorKind::InsufficientStock => AppError::InsufficientStock(error),
        _ => {
            let mut errors = FieldErrors::new();
            errors.add("quantity", error);
            AppError::InvalidForm(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

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

    #[sqlx::test(migrations = "./migrations")]
    async fn test_decrement_within_stock(pool: PgPool) {
        let product_id = insert_product(&pool, 5).await;
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(apply_stock_delta(&mut conn, product_id, -5).await.unwrap(), 0);
        assert_eq!(stock_of(&pool, product_id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_decrement_past_zero_is_refused(pool: PgPool) {
        let product_id = insert_product(&pool, 5).await;
        let mut conn = pool.acquire().await.unwrap();

        let err = apply_stock_delta(&mut conn, product_id, -6).await.unwrap_err();
        match err {
            AppError::InsufficientStock(error) => assert!(error.message.contains("Only 5 items")),
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
        assert_eq!(stock_of(&pool, product_id).await, 5);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_increment_past_bigint_is_range_error(pool: PgPool) {
        let product_id = insert_product(&pool, 5).await;
        let mut conn = pool.acquire().await.unwrap();

        let err = apply_stock_delta(&mut conn, product_id, i64::MAX).await.unwrap_err();
        match err {
            AppError::InvalidForm(errors) => {
                assert_eq!(errors.kind_of("quantity"), Some(ValidationErrorKind::Range))
            }
            other => panic!("expected InvalidForm, got {:?}", other),
        }
        assert_eq!(stock_of(&pool, product_id).await, 5);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_increment_up_to_bigint_max(pool: PgPool) {
        let product_id = insert_product(&pool, 0).await;
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(
            apply_stock_delta(&mut conn, product_id, i64::MAX).await.unwrap(),
            i64::MAX
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_product_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();

        let err = apply_stock_delta(&mut conn, Uuid::new_v4(), 3).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
