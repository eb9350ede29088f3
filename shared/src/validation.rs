//! Validation utilities for the AgroNond Mandi Platform
//!
//! Includes India-specific validations for phone numbers and payment
//! references.

use rust_decimal::Decimal;

// ============================================================================
// Sale Validations
// ============================================================================

/// Validate a sale rate (currency per unit) is positive
pub fn validate_sale_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate <= Decimal::ZERO {
        return Err("Sale rate must be greater than zero");
    }
    if rate > Decimal::from(1_000_000) {
        return Err("Sale rate is unreasonably large");
    }
    Ok(())
}

/// Validate a declared or measured quantity is non-negative
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a commission rate is a sane fraction (0 to 50%)
pub fn validate_commission_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO {
        return Err("Commission rate cannot be negative");
    }
    if rate > Decimal::new(5, 1) {
        return Err("Commission rate cannot exceed 50%");
    }
    Ok(())
}

/// Validate a produce name
pub fn validate_produce_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Produce name cannot be empty");
    }
    if trimmed.len() > 120 {
        return Err("Produce name must be at most 120 characters");
    }
    Ok(())
}

/// Validate a payment reference (cheque/UTR/UPI id)
pub fn validate_payment_reference(reference: &str) -> Result<(), &'static str> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err("Payment reference cannot be empty");
    }
    if trimmed.len() > 64 {
        return Err("Payment reference must be at most 64 characters");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Validate Indian mobile number format
/// Accepts: 9812345678, 98123-45678, +919812345678, 919812345678
pub fn validate_indian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic: 10 digits starting 6-9
    if digits.len() == 10 && digits.starts_with(['6', '7', '8', '9']) {
        return Ok(());
    }
    // With country code: 12 digits starting with 91
    if digits.len() == 12 && digits.starts_with("91") && digits[2..].starts_with(['6', '7', '8', '9'])
    {
        return Ok(());
    }

    Err("Invalid Indian mobile number format")
}

/// Normalize an Indian mobile number to its 10-digit form
pub fn normalize_indian_phone(phone: &str) -> Option<String> {
    validate_indian_phone(phone).ok()?;
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 12 {
        Some(digits[2..].to_string())
    } else {
        Some(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Sale Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_sale_rate() {
        assert!(validate_sale_rate(Decimal::from(20)).is_ok());
        assert!(validate_sale_rate(Decimal::new(5, 1)).is_ok());
        assert!(validate_sale_rate(Decimal::ZERO).is_err());
        assert!(validate_sale_rate(Decimal::from(-5)).is_err());
        assert!(validate_sale_rate(Decimal::from(2_000_000)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Decimal::ZERO).is_ok());
        assert!(validate_quantity(Decimal::from(105)).is_ok());
        assert!(validate_quantity(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_commission_rate() {
        assert!(validate_commission_rate(Decimal::new(4, 2)).is_ok());
        assert!(validate_commission_rate(Decimal::new(9, 2)).is_ok());
        assert!(validate_commission_rate(Decimal::ZERO).is_ok());
        assert!(validate_commission_rate(Decimal::from(-1)).is_err());
        assert!(validate_commission_rate(Decimal::new(6, 1)).is_err());
    }

    #[test]
    fn test_validate_produce_name() {
        assert!(validate_produce_name("Tomato").is_ok());
        assert!(validate_produce_name("  ").is_err());
        assert!(validate_produce_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_payment_reference() {
        assert!(validate_payment_reference("UTR123456").is_ok());
        assert!(validate_payment_reference("").is_err());
        assert!(validate_payment_reference(&"x".repeat(65)).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.in").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }

    // ========================================================================
    // India-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_indian_phone_valid() {
        assert!(validate_indian_phone("9812345678").is_ok());
        assert!(validate_indian_phone("98123-45678").is_ok());
        assert!(validate_indian_phone("+919812345678").is_ok());
        assert!(validate_indian_phone("919812345678").is_ok());
        assert!(validate_indian_phone("6012345678").is_ok());
    }

    #[test]
    fn test_validate_indian_phone_invalid() {
        assert!(validate_indian_phone("12345").is_err());
        assert!(validate_indian_phone("5812345678").is_err()); // bad leading digit
        assert!(validate_indian_phone("981234567890").is_err());
        assert!(validate_indian_phone("abcdefghij").is_err());
    }

    #[test]
    fn test_normalize_indian_phone() {
        assert_eq!(
            normalize_indian_phone("+919812345678").as_deref(),
            Some("9812345678")
        );
        assert_eq!(
            normalize_indian_phone("98123-45678").as_deref(),
            Some("9812345678")
        );
        assert!(normalize_indian_phone("12345").is_none());
    }
}
