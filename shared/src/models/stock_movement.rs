//! Stock movement models and validation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{form_value, ProductSnapshot};
use crate::validation::{
    normalize_optional_text, validate_positive_quantity, validate_reference, FieldError,
    FieldErrors, FormValidator,
};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    #[serde(rename = "In", alias = "Incoming")]
    Incoming,
    #[serde(rename = "Out", alias = "Outgoing")]
    Outgoing,
}

impl MovementType {
    /// Stored code
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Incoming => "In",
            MovementType::Outgoing => "Out",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            MovementType::Incoming => "Incoming",
            MovementType::Outgoing => "Outgoing",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MovementType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(FieldError::required()),
            "In" | "Incoming" => Ok(MovementType::Incoming),
            "Out" | "Outgoing" => Ok(MovementType::Outgoing),
            other => Err(FieldError::format(format!(
                "Select a valid choice. {} is not one of the available choices.",
                other
            ))),
        }
    }
}

/// Raw stock movement submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockMovementForm {
    #[serde(default, deserialize_with = "form_value")]
    pub product_id: String,
    #[serde(default, deserialize_with = "form_value")]
    pub quantity: String,
    #[serde(default, deserialize_with = "form_value")]
    pub movement_type: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated stock movement; its effect on stock is applied by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewStockMovement {
    pub product_id: Uuid,
    pub quantity: i64,
    pub movement_type: MovementType,
    pub notes: Option<String>,
}

impl NewStockMovement {
    /// Signed change this movement makes to the product's stock
    pub fn stock_delta(&self) -> i64 {
        match self.movement_type {
            MovementType::Incoming => self.quantity,
            MovementType::Outgoing => -self.quantity,
        }
    }
}

/// Validates stock movement submissions against the products available at request time
#[derive(Debug, Clone, Copy)]
pub struct StockMovementValidator<'a> {
    products: &'a ProductSnapshot,
}

impl<'a> StockMovementValidator<'a> {
    pub fn new(products: &'a ProductSnapshot) -> Self {
        Self { products }
    }
}

impl FormValidator for StockMovementValidator<'_> {
    type Form = StockMovementForm;
    type Output = NewStockMovement;

    fn validate(&self, form: &StockMovementForm) -> Result<NewStockMovement, FieldErrors> {
        let mut errors = FieldErrors::new();

        let product_id = errors.check(
            "product_id",
            validate_reference(&form.product_id, |id| self.products.contains(id)),
        );
        let quantity = errors.check("quantity", validate_positive_quantity(&form.quantity));
        let movement_type = errors.check(
            "movement_type",
            form.movement_type.parse::<MovementType>(),
        );
        let notes = normalize_optional_text(form.notes.as_deref());

        match (product_id, quantity, movement_type) {
            (Some(product_id), Some(quantity), Some(movement_type)) => Ok(NewStockMovement {
                product_id,
                quantity,
                movement_type,
                notes,
            }),
            _ => Err(errors),
        }
    }
}
