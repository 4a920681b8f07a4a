//! Sale order models and validation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{form_value, ProductSnapshot};
use crate::validation::{
    validate_positive_quantity, validate_reference, FieldError, FieldErrors, FormValidator,
};

/// Raw sale order submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleOrderForm {
    #[serde(default, deserialize_with = "form_value")]
    pub product_id: String,
    #[serde(default, deserialize_with = "form_value")]
    pub quantity: String,
}

/// A validated sale order, not yet applied to stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSaleOrder {
    pub product_id: Uuid,
    pub quantity: i64,
}

impl NewSaleOrder {
    /// Signed change this order makes to the product's stock
    pub fn stock_delta(&self) -> i64 {
        -self.quantity
    }
}

/// Validates sale orders against a snapshot of products and their stock
///
/// The stock check is only as fresh as the snapshot. Callers that need the
/// decrement to be safe under concurrent sales must guard the write.
#[derive(Debug, Clone, Copy)]
pub struct SaleOrderValidator<'a> {
    products: &'a ProductSnapshot,
}

impl<'a> SaleOrderValidator<'a> {
    pub fn new(products: &'a ProductSnapshot) -> Self {
        Self { products }
    }
}

impl FormValidator for SaleOrderValidator<'_> {
    type Form = SaleOrderForm;
    type Output = NewSaleOrder;

    fn validate(&self, form: &SaleOrderForm) -> Result<NewSaleOrder, FieldErrors> {
        let mut errors = FieldErrors::new();

        let product_id = errors.check(
            "product_id",
            validate_reference(&form.product_id, |id| self.products.contains(id)),
        );
        let quantity = errors.check("quantity", validate_positive_quantity(&form.quantity));

        let (Some(product_id), Some(quantity)) = (product_id, quantity) else {
            return Err(errors);
        };

        if let Some(available) = self.products.stock_of(product_id) {
            if quantity > available {
                errors.add("quantity", FieldError::insufficient_stock(available));
                return Err(errors);
            }
        }

        Ok(NewSaleOrder {
            product_id,
            quantity,
        })
    }
}
