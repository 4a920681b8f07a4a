//! Product models and validation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{form_value, SupplierSnapshot};
use crate::validation::{
    validate_price, validate_reference, validate_required_text, validate_stock_quantity,
    FieldErrors, FormValidator, MAX_CHAR_LENGTH,
};

/// Raw product submission, used for both new and edited products
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(default, deserialize_with = "form_value")]
    pub name: String,
    #[serde(default, deserialize_with = "form_value")]
    pub description: String,
    #[serde(default, deserialize_with = "form_value")]
    pub category: String,
    #[serde(default, deserialize_with = "form_value")]
    pub price: String,
    #[serde(default, deserialize_with = "form_value")]
    pub stock_quantity: String,
    #[serde(default, deserialize_with = "form_value")]
    pub supplier_id: String,
}

/// A validated product ready to be stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    /// Always carries exactly two decimal places
    pub price: Decimal,
    pub stock_quantity: i64,
    pub supplier_id: Uuid,
}

/// Validates product submissions against the suppliers available at request time
#[derive(Debug, Clone, Copy)]
pub struct ProductValidator<'a> {
    suppliers: &'a SupplierSnapshot,
}

impl<'a> ProductValidator<'a> {
    pub fn new(suppliers: &'a SupplierSnapshot) -> Self {
        Self { suppliers }
    }
}

impl FormValidator for ProductValidator<'_> {
    type Form = ProductForm;
    type Output = NewProduct;

    fn validate(&self, form: &ProductForm) -> Result<NewProduct, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.check(
            "name",
            validate_required_text(&form.name, Some(MAX_CHAR_LENGTH)),
        );
        let description = errors.check(
            "description",
            validate_required_text(&form.description, None),
        );
        let category = errors.check(
            "category",
            validate_required_text(&form.category, Some(MAX_CHAR_LENGTH)),
        );
        let price = errors.check("price", validate_price(&form.price));
        let stock_quantity = errors.check(
            "stock_quantity",
            validate_stock_quantity(&form.stock_quantity),
        );
        let supplier_id = errors.check(
            "supplier_id",
            validate_reference(&form.supplier_id, |id| self.suppliers.contains(id)),
        );

        match (name, description, category, price, stock_quantity, supplier_id) {
            (
                Some(name),
                Some(description),
                Some(category),
                Some(price),
                Some(stock_quantity),
                Some(supplier_id),
            ) => Ok(NewProduct {
                name,
                description,
                category,
                price,
                stock_quantity,
                supplier_id,
            }),
            _ => Err(errors),
        }
    }
}
