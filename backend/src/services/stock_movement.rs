//! Stock movement service: records movements and applies them to stock

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{FormValidator, StockMovementForm, StockMovementValidator};

use crate::error::{AppError, AppResult};
use crate::services::lookup::ReferenceLookup;
use crate::services::stock::apply_stock_delta;

/// Stock movement service
#[derive(Clone)]
pub struct StockMovementService {
    db: PgPool,
    lookup: ReferenceLookup,
}

/// Recorded stock movement
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    /// Stored code, `In` or `Out`
    pub movement_type: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A recorded movement with the stock level it left behind
#[derive(Debug, Clone, Serialize)]
pub struct RecordedMovement {
    #[serde(flatten)]
    pub movement: StockMovement,
    pub stock_quantity: i64,
}

const MOVEMENT_COLUMNS: &str = "id, product_id, quantity, movement_type, notes, created_at";

impl StockMovementService {
    /// Create a new StockMovementService instance
    pub fn new(db: PgPool) -> Self {
        let lookup = ReferenceLookup::new(db.clone());
        Self { db, lookup }
    }

    /// List all movements, newest first
    pub async fn list_movements(&self) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            "SELECT {} FROM stock_movements ORDER BY created_at DESC",
            MOVEMENT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// List movements for one product, newest first
    pub async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let product_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            "SELECT {} FROM stock_movements WHERE product_id = $1 ORDER BY created_at DESC",
            MOVEMENT_COLUMNS
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Validate a movement, record it and apply it to the product's stock
    ///
    /// Outgoing movements that would take stock below zero are refused and
    /// nothing is recorded.
    pub async fn record_movement(&self, form: StockMovementForm) -> AppResult<RecordedMovement> {
        let products = self.lookup.product_snapshot().await?;
        let input = StockMovementValidator::new(&products).validate(&form)?;

        let mut tx = self.db.begin().await?;

        let stock_quantity = apply_stock_delta(&mut tx, input.product_id, input.stock_delta()).await?;

        let movement = sqlx::query_as::<_, StockMovement>(&format!(
            r#"
            INSERT INTO stock_movements (product_id, quantity, movement_type, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.movement_type.as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            movement_type = %input.movement_type,
            quantity = movement.quantity,
            stock_quantity,
            "Stock movement recorded"
        );

        Ok(RecordedMovement {
            movement,
            stock_quantity,
        })
    }
}
