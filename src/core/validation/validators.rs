//! Reusable field validators
//!
//! Custom validators plug into `#[validate(custom(function = "..."))]`.

use crate::core::error::ShopError;
use rust_decimal::Decimal;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Validator: text must contain something other than whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(violation("not_blank", "must not be blank"))
    } else {
        Ok(())
    }
}

/// Validator: amount must be zero or positive
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(violation(
            "non_negative",
            "must be greater than or equal to 0",
        ))
    } else {
        Ok(())
    }
}

/// Run the derived validation rules, mapping failures to `InvalidFields`
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ShopError> {
    payload.validate().map_err(ShopError::from)
}

/// Parse an identifier supplied by a caller
///
/// Malformed ids are the caller's mistake, so they surface as
/// `InvalidInput` rather than `NotFound`.
pub fn parse_id(raw: &str, field: &str) -> Result<Uuid, ShopError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ShopError::invalid_input(field, format!("'{}' is not a valid id", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Books").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::new(1999, 2)).is_ok());
        let err = non_negative(&Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(err.code, "non_negative");
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "product_id").unwrap(), id);

        let err = parse_id("42", "product_id").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("product_id"));
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(custom(function = "not_blank"))]
        name: String,
        #[validate(custom(function = "non_negative"))]
        price: Decimal,
        #[validate(range(min = 1))]
        quantity: u32,
    }

    #[test]
    fn test_validate_payload_collects_every_field() {
        let payload = Payload {
            name: " ".to_string(),
            price: Decimal::new(-500, 2),
            quantity: 0,
        };
        match validate_payload(&payload).unwrap_err() {
            ShopError::InvalidFields(violations) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "price", "quantity"]);
            }
            other => panic!("Expected InvalidFields, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_payload_accepts_valid() {
        let payload = Payload {
            name: "Pen".to_string(),
            price: Decimal::ZERO,
            quantity: 1,
        };
        assert!(validate_payload(&payload).is_ok());
    }
}
