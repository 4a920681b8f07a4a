//! Supplier management service

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{Choice, FormValidator, NewSupplier, SupplierForm, SupplierValidator};

use crate::error::{AppError, AppResult};
use crate::services::lookup::ReferenceLookup;

/// Supplier service for managing supplier records
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Stored supplier
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SUPPLIER_COLUMNS: &str = "id, name, email, phone, address, created_at, updated_at";

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all suppliers
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers ORDER BY name",
            SUPPLIER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Get a supplier by ID
    pub async fn get_supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers WHERE id = $1",
            SUPPLIER_COLUMNS
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Suppliers available for selection on product forms
    pub async fn list_choices(&self) -> AppResult<Vec<Choice>> {
        let snapshot = ReferenceLookup::new(self.db.clone()).supplier_snapshot().await?;
        Ok(snapshot.choices().to_vec())
    }

    /// Validate and store a new supplier
    pub async fn create_supplier(&self, form: SupplierForm) -> AppResult<Supplier> {
        let input: NewSupplier = SupplierValidator::new().validate(&form)?;

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (name, email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(supplier_id = %supplier.id, "Supplier created");
        Ok(supplier)
    }

    /// Validate and replace an existing supplier
    pub async fn update_supplier(&self, supplier_id: Uuid, form: SupplierForm) -> AppResult<Supplier> {
        // Unknown suppliers are a 404, not a form error
        self.get_supplier(supplier_id).await?;

        let input = SupplierValidator::new().validate(&form)?;

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE suppliers
            SET name = $2, email = $3, phone = $4, address = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(supplier_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        tracing::info!(supplier_id = %supplier.id, "Supplier updated");
        Ok(supplier)
    }
}
