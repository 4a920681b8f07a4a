//! Supplier models and validation

use serde::{Deserialize, Serialize};

use crate::types::form_value;
use crate::validation::{
    validate_email, validate_phone, validate_required_text, FieldErrors, FormValidator,
    MAX_CHAR_LENGTH,
};

/// Raw supplier submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierForm {
    #[serde(default, deserialize_with = "form_value")]
    pub name: String,
    #[serde(default, deserialize_with = "form_value")]
    pub email: String,
    #[serde(default, deserialize_with = "form_value")]
    pub phone: String,
    #[serde(default, deserialize_with = "form_value")]
    pub address: String,
}

/// A validated supplier ready to be stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub email: String,
    /// Exactly 10 digits
    pub phone: String,
    pub address: String,
}

/// Validates supplier submissions. Format rules only, no reference data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplierValidator;

impl SupplierValidator {
    pub fn new() -> Self {
        Self
    }
}

impl FormValidator for SupplierValidator {
    type Form = SupplierForm;
    type Output = NewSupplier;

    fn validate(&self, form: &SupplierForm) -> Result<NewSupplier, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.check(
            "name",
            validate_required_text(&form.name, Some(MAX_CHAR_LENGTH)),
        );
        let email = errors.check("email", validate_email(&form.email));
        let phone = errors.check("phone", validate_phone(&form.phone));
        let address = errors.check("address", validate_required_text(&form.address, None));

        match (name, email, phone, address) {
            (Some(name), Some(email), Some(phone), Some(address)) => Ok(NewSupplier {
                name,
                email,
                phone,
                address,
            }),
            _ => Err(errors),
        }
    }
}
