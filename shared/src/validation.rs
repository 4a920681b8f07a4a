//! Field-level validation rules and the error types they report
//!
//! Every rule takes the raw submitted text of one field and either returns the
//! normalized value or a [`FieldError`]. Validators in [`crate::models`] run
//! the rules field by field and collect the failures into [`FieldErrors`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum length of short text fields (names, categories)
pub const MAX_CHAR_LENGTH: usize = 255;

/// Number of decimal places kept on prices
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Maximum number of digits allowed before the decimal point of a price
pub const PRICE_MAX_WHOLE_DIGITS: u32 = 8;

/// Exact number of digits in a supplier phone number
pub const PHONE_DIGITS: usize = 10;

// ============================================================================
// Error Types
// ============================================================================

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    RequiredField,
    Length,
    Range,
    Format,
    Reference,
    InsufficientStock,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::RequiredField => "required_field",
            ValidationErrorKind::Length => "length",
            ValidationErrorKind::Range => "range",
            ValidationErrorKind::Format => "format",
            ValidationErrorKind::Reference => "reference",
            ValidationErrorKind::InsufficientStock => "insufficient_stock",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct FieldError {
    #[serde(rename = "code")]
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn required() -> Self {
        Self::new(ValidationErrorKind::RequiredField, "This field is required.")
    }

    pub fn length(max: usize, actual: usize) -> Self {
        Self::new(
            ValidationErrorKind::Length,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, actual
            ),
        )
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::Range, message)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::Format, message)
    }

    /// The submitted value is not one of the available choices
    pub fn reference(value: &str) -> Self {
        Self::new(
            ValidationErrorKind::Reference,
            format!(
                "Select a valid choice. {} is not one of the available choices.",
                value
            ),
        )
    }

    /// The requested quantity exceeds what is in stock
    pub fn insufficient_stock(available: i64) -> Self {
        Self::new(
            ValidationErrorKind::InsufficientStock,
            format!(
                "Not enough stock available. Only {} items in stock.",
                available
            ),
        )
    }
}

/// Field name -> error mapping returned when a form is rejected
///
/// Only the first failure per field is kept. Fields are ordered by name so the
/// serialized form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field unless one is already recorded
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.0.entry(field.into()).or_insert(error);
    }

    /// Run one field rule, recording its error and returning the value on success
    pub fn check<T>(&mut self, field: &str, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.add(field, error);
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn kind_of(&self, field: &str) -> Option<ValidationErrorKind> {
        self.0.get(field).map(|e| e.kind)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// A form validator: raw submission in, normalized entity or field errors out
pub trait FormValidator {
    type Form;
    type Output;

    fn validate(&self, form: &Self::Form) -> Result<Self::Output, FieldErrors>;
}

// ============================================================================
// Text Rules
// ============================================================================

/// Required text, trimmed, optionally bounded in characters
pub fn validate_required_text(value: &str, max_len: Option<usize>) -> Result<String, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::required());
    }
    if let Some(max) = max_len {
        let len = value.chars().count();
        if len > max {
            return Err(FieldError::length(max, len));
        }
    }
    Ok(value.to_string())
}

/// Optional free text; blank collapses to `None`
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<String, FieldError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FieldError::required());
    }
    if !validator::validate_email(email) {
        return Err(FieldError::format("Enter a valid email address."));
    }
    Ok(email.to_string())
}

/// Validate phone number: exactly 10 digits, no separators or country code
pub fn validate_phone(phone: &str) -> Result<String, FieldError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(FieldError::required());
    }
    if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::format("Phone number must be exactly 10 digits."));
    }
    Ok(phone.to_string())
}

// ============================================================================
// Numeric Rules
// ============================================================================

/// Parse a decimal number
pub fn parse_decimal(value: &str) -> Result<Decimal, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::required());
    }
    Decimal::from_str(value).map_err(|_| FieldError::format("Enter a number."))
}

/// Parse a whole number
pub fn parse_integer(value: &str) -> Result<i64, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::required());
    }
    value
        .parse::<i64>()
        .map_err(|_| FieldError::format("Enter a whole number."))
}

/// Round a price to exactly two decimal places (half away from zero)
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut normalized =
        price.round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    normalized.rescale(PRICE_DECIMAL_PLACES);
    normalized
}

/// Validate a price: strictly positive, normalized to two decimal places
pub fn validate_price(value: &str) -> Result<Decimal, FieldError> {
    let price = parse_decimal(value)?;
    if price <= Decimal::ZERO {
        return Err(FieldError::range("Price must be greater than zero."));
    }

    let price = normalize_price(price);
    if price.is_zero() {
        return Err(FieldError::range("Price must be greater than zero."));
    }
    if price.trunc() >= Decimal::from(10u64.pow(PRICE_MAX_WHOLE_DIGITS)) {
        return Err(FieldError::range(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            PRICE_MAX_WHOLE_DIGITS
        )));
    }
    Ok(price)
}

/// Validate a stock level (zero allowed)
pub fn validate_stock_quantity(value: &str) -> Result<i64, FieldError> {
    let quantity = parse_integer(value)?;
    if quantity < 0 {
        return Err(FieldError::range("Stock quantity cannot be negative."));
    }
    Ok(quantity)
}

/// Validate a movement or order quantity (at least one unit)
pub fn validate_positive_quantity(value: &str) -> Result<i64, FieldError> {
    let quantity = parse_integer(value)?;
    if quantity < 1 {
        return Err(FieldError::range("Quantity must be a positive number."));
    }
    Ok(quantity)
}

// ============================================================================
// Reference Rules
// ============================================================================

/// Resolve a submitted identifier against the set of known identifiers
pub fn validate_reference(value: &str, known: impl Fn(Uuid) -> bool) -> Result<Uuid, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::required());
    }
    match Uuid::parse_str(value) {
        Ok(id) if known(id) => Ok(id),
        _ => Err(FieldError::reference(value)),
    }
}

// ============================================================================
// Stock Rules
// ============================================================================

/// Apply a signed change to a stock level, refusing to go below zero
pub fn apply_stock_change(current: i64, delta: i64) -> Result<i64, FieldError> {
    match current.checked_add(delta) {
        Some(next) if next >= 0 => Ok(next),
        Some(_) => Err(FieldError::insufficient_stock(current)),
        None => Err(FieldError::range("Stock quantity is out of range.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ========================================================================
    // Text Rule Tests
    // ========================================================================

    #[test]
    fn test_required_text_trims() {
        assert_eq!(validate_required_text("  Widget ", Some(255)).unwrap(), "Widget");
    }

    #[test]
    fn test_required_text_empty() {
        let err = validate_required_text("   ", None).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::RequiredField);
    }

    #[test]
    fn test_required_text_length() {
        assert!(validate_required_text(&"a".repeat(255), Some(255)).is_ok());

        let err = validate_required_text(&"a".repeat(256), Some(255)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Length);
        assert!(err.message.contains("256"));
    }

    #[test]
    fn test_required_text_counts_characters_not_bytes() {
        // 255 two-byte characters
        assert!(validate_required_text(&"é".repeat(255), Some(255)).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" restock ")),
            Some("restock".to_string())
        );
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert_eq!(
            validate_email("invalid").unwrap_err().kind,
            ValidationErrorKind::Format
        );
        assert_eq!(
            validate_email("@example.com").unwrap_err().kind,
            ValidationErrorKind::Format
        );
        assert_eq!(
            validate_email("").unwrap_err().kind,
            ValidationErrorKind::RequiredField
        );
    }

    #[test]
    fn test_validate_phone_valid() {
        assert_eq!(validate_phone("1234567890").unwrap(), "1234567890");
        assert_eq!(validate_phone(" 0812345678 ").unwrap(), "0812345678");
    }

    #[test]
    fn test_validate_phone_invalid() {
        for phone in ["12345", "123-456-7890", "12345678901", "+661234567", "abcdefghij"] {
            let err = validate_phone(phone).unwrap_err();
            assert_eq!(err.kind, ValidationErrorKind::Format, "phone {}", phone);
        }
    }

    #[test]
    fn test_validate_phone_rejects_non_ascii_digits() {
        // Thai digits are numeric but not ASCII
        assert!(validate_phone("๑๒๓๔๕๖๗๘๙๐").is_err());
    }

    // ========================================================================
    // Numeric Rule Tests
    // ========================================================================

    #[test]
    fn test_validate_price_normalizes() {
        assert_eq!(validate_price("5").unwrap().to_string(), "5.00");
        assert_eq!(validate_price("19.9").unwrap().to_string(), "19.90");
        assert_eq!(validate_price("2.345").unwrap().to_string(), "2.35");
        assert_eq!(validate_price("2.344").unwrap().to_string(), "2.34");
    }

    #[test]
    fn test_validate_price_range() {
        assert_eq!(validate_price("0").unwrap_err().kind, ValidationErrorKind::Range);
        assert_eq!(validate_price("-3.50").unwrap_err().kind, ValidationErrorKind::Range);
        // Rounds to 0.00
        assert_eq!(validate_price("0.004").unwrap_err().kind, ValidationErrorKind::Range);
        assert_eq!(
            validate_price("100000000").unwrap_err().kind,
            ValidationErrorKind::Range
        );
        assert!(validate_price("99999999.99").is_ok());
    }

    #[test]
    fn test_validate_price_format() {
        assert_eq!(validate_price("abc").unwrap_err().kind, ValidationErrorKind::Format);
        assert_eq!(
            validate_price("").unwrap_err().kind,
            ValidationErrorKind::RequiredField
        );
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert_eq!(validate_stock_quantity("0").unwrap(), 0);
        assert_eq!(validate_stock_quantity("42").unwrap(), 42);
        assert_eq!(
            validate_stock_quantity("-1").unwrap_err().kind,
            ValidationErrorKind::Range
        );
        assert_eq!(
            validate_stock_quantity("1.5").unwrap_err().kind,
            ValidationErrorKind::Format
        );
    }

    #[test]
    fn test_validate_positive_quantity() {
        assert_eq!(validate_positive_quantity("1").unwrap(), 1);
        assert_eq!(
            validate_positive_quantity("0").unwrap_err().kind,
            ValidationErrorKind::Range
        );
        assert_eq!(
            validate_positive_quantity("-7").unwrap_err().kind,
            ValidationErrorKind::Range
        );
    }

    #[test]
    fn test_normalize_price_exact_scale() {
        assert_eq!(normalize_price(dec("7")).scale(), 2);
        assert_eq!(normalize_price(dec("7.125")), dec("7.13"));
    }

    // ========================================================================
    // Reference and Stock Rule Tests
    // ========================================================================

    #[test]
    fn test_validate_reference() {
        let known = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert_eq!(
            validate_reference(&known.to_string(), |id| id == known).unwrap(),
            known
        );
        assert_eq!(
            validate_reference(&other.to_string(), |id| id == known)
                .unwrap_err()
                .kind,
            ValidationErrorKind::Reference
        );
        assert_eq!(
            validate_reference("not-a-uuid", |_| true).unwrap_err().kind,
            ValidationErrorKind::Reference
        );
        assert_eq!(
            validate_reference("", |_| true).unwrap_err().kind,
            ValidationErrorKind::RequiredField
        );
    }

    #[test]
    fn test_apply_stock_change() {
        assert_eq!(apply_stock_change(5, 3).unwrap(), 8);
        assert_eq!(apply_stock_change(5, -5).unwrap(), 0);

        let err = apply_stock_change(5, -6).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InsufficientStock);
        assert!(err.message.contains('5'));
    }

    #[test]
    fn test_field_errors_keeps_first() {
        let mut errors = FieldErrors::new();
        errors.add("price", FieldError::format("Enter a number."));
        errors.add("price", FieldError::range("Price must be greater than zero."));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.kind_of("price"), Some(ValidationErrorKind::Format));
    }

    #[test]
    fn test_field_errors_serialize() {
        let mut errors = FieldErrors::new();
        errors.add("phone", FieldError::format("Phone number must be exactly 10 digits."));

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["phone"]["code"], "format");
        assert_eq!(
            json["phone"]["message"],
            "Phone number must be exactly 10 digits."
        );
    }

    proptest! {
        #[test]
        fn prop_price_always_two_places(units in 1u64..10_000_000, scale in 0u32..8) {
            let price = Decimal::new(units as i64, scale);
            if let Ok(normalized) = validate_price(&price.to_string()) {
                prop_assert_eq!(normalized.scale(), 2);
            }
        }
    }
}
