// Validation utilities module
// Provides custom validation functions for domain-specific rules

use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a monetary value is strictly positive
pub fn validate_positive_money(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        Err(ValidationError::new("value_must_be_positive"))
    } else {
        Ok(())
    }
}

/// Validates that a monetary value is not negative (zero is allowed)
pub fn validate_non_negative_money(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        Err(ValidationError::new("value_must_not_be_negative"))
    } else {
        Ok(())
    }
}

/// Validates that a percentage is within 0..=100
pub fn validate_percent_range(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::from(100) {
        Err(ValidationError::new("percent_out_of_range"))
    } else {
        Ok(())
    }
}

/// Validates that an optional monetary value is strictly positive
pub fn validate_optional_positive_money(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive_money(value)
}

/// Validates that an optional monetary value is not negative
pub fn validate_optional_non_negative_money(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative_money(value)
}

/// Validates a client registry document: 11 (CPF) or 14 (CNPJ) digits
pub fn validate_document(document: &str) -> Result<(), ValidationError> {
    let pattern = Regex::new(r"^(\d{11}|\d{14})$").expect("valid document pattern");
    if pattern.is_match(document) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_document"))
    }
}

/// Validates a phone number: digits with optional +country prefix, 8-15 digits
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let pattern = Regex::new(r"^\+?\d{8,15}$").expect("valid phone pattern");
    if pattern.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_money() {
        assert!(validate_positive_money(&dec!(0.01)).is_ok());
        assert!(validate_positive_money(&Decimal::ZERO).is_err());
        assert!(validate_positive_money(&dec!(-5)).is_err());
    }

    #[test]
    fn test_non_negative_money() {
        assert!(validate_non_negative_money(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_money(&dec!(10)).is_ok());
        assert!(validate_non_negative_money(&dec!(-0.01)).is_err());
    }

    #[test]
    fn test_percent_range() {
        assert!(validate_percent_range(&Decimal::ZERO).is_ok());
        assert!(validate_percent_range(&dec!(100)).is_ok());
        assert!(validate_percent_range(&dec!(100.01)).is_err());
        assert!(validate_percent_range(&dec!(-1)).is_err());
    }

    #[test]
    fn test_document() {
        assert!(validate_document("12345678901").is_ok()); // CPF: 11 digits
        assert!(validate_document("12345678000199").is_ok()); // CNPJ: 14 digits
        assert!(validate_document("123").is_err());
        assert!(validate_document("12.345.678/0001-99").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+5511987654321").is_ok());
        assert!(validate_phone("1134567890").is_ok());
        assert!(validate_phone("abc").is_err());
        assert!(validate_phone("123").is_err());
    }
}
