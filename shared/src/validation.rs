//! Validation utilities for the Ferreteria Management System
//!
//! Includes Colombia-specific validations for tax ids and phone numbers.

use rust_decimal::Decimal;

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

/// Validate username format (3-30 chars, lowercase letters, digits, . _ -)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 30 {
        return Err("Username must be at most 30 characters");
    }
    let mut chars = username.chars();
    let first = chars.next().unwrap_or(' ');
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return Err("Username must start with a letter or digit");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
    {
        return Err("Username may only contain lowercase letters, digits, . _ -");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Validate a positive monetary amount
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a hex display color ("#RRGGBB")
pub fn validate_hex_color(color: &str) -> Result<(), &'static str> {
    let rest = color
        .strip_prefix('#')
        .ok_or("Color must start with '#'")?;
    if rest.len() != 6 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color must be a 6-digit hex value");
    }
    Ok(())
}

// ============================================================================
// Colombia-Specific Validations
// ============================================================================

/// Validate a Colombian phone number
/// Accepts: 6012345 (landline), 3001234567 (mobile), +57 300 123 4567
pub fn validate_colombian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Landline: 7 digits, or 10 with the area code
    if digits.len() == 7 {
        return Ok(());
    }
    // Mobile: 10 digits starting with 3
    if digits.len() == 10 {
        return Ok(());
    }
    // International format with country code 57
    if digits.len() == 12 && digits.starts_with("57") {
        return Ok(());
    }

    Err("Invalid Colombian phone number format")
}

/// Validate a Colombian NIT (tax id), optionally with its verification digit
/// Accepts: "900123456" or "900123456-5"
pub fn validate_nit(nit: &str) -> Result<(), &'static str> {
    let (base, dv) = match nit.split_once('-') {
        Some((base, dv)) => (base, Some(dv)),
        None => (nit, None),
    };

    let digits: Vec<u32> = base.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != base.chars().count() || digits.is_empty() {
        return Err("NIT must be numeric");
    }
    if digits.len() < 6 || digits.len() > 10 {
        return Err("NIT must be 6-10 digits");
    }

    if let Some(dv) = dv {
        let expected: u32 = dv.parse().map_err(|_| "Verification digit must be numeric")?;
        if expected > 9 {
            return Err("Verification digit must be a single digit");
        }
        if compute_nit_check_digit(&digits) != expected {
            return Err("NIT verification digit does not match");
        }
    }

    Ok(())
}

/// DIAN check-digit algorithm: weighted sum of digits (weights applied from
/// the rightmost digit), modulo 11; remainders above 1 subtract from 11.
fn compute_nit_check_digit(digits: &[u32]) -> u32 {
    const WEIGHTS: [u32; 15] = [3, 7, 13, 17, 19, 23, 29, 37, 41, 43, 47, 53, 59, 67, 71];

    let sum: u32 = digits
        .iter()
        .rev()
        .zip(WEIGHTS.iter())
        .map(|(digit, weight)| digit * weight)
        .sum();

    let remainder = sum % 11;
    if remainder > 1 {
        11 - remainder
    } else {
        remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ventas@ferreteria.co").is_ok());
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("sin-arroba.com").is_err());
        assert!(validate_email("x@y").is_err());
    }

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("maria").is_ok());
        assert!(validate_username("jose.perez").is_ok());
        assert!(validate_username("caja_02").is_ok());
        assert!(validate_username("bodega-1").is_ok());
    }

    #[test]
    fn test_validate_username_invalid() {
        assert!(validate_username("ab").is_err()); // Too short
        assert!(validate_username(&"a".repeat(31)).is_err()); // Too long
        assert!(validate_username("Maria").is_err()); // Uppercase
        assert!(validate_username(".maria").is_err()); // Leading separator
        assert!(validate_username("maria perez").is_err()); // Space
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("#FF5733").is_ok());
        assert!(validate_hex_color("#00ff00").is_ok());
        assert!(validate_hex_color("FF5733").is_err());
        assert!(validate_hex_color("#FFF").is_err());
        assert!(validate_hex_color("#GG5733").is_err());
    }

    #[test]
    fn test_validate_colombian_phone() {
        assert!(validate_colombian_phone("6012345").is_ok());
        assert!(validate_colombian_phone("3001234567").is_ok());
        assert!(validate_colombian_phone("+57 300 123 4567").is_ok());
        assert!(validate_colombian_phone("300-123-4567").is_ok());
        assert!(validate_colombian_phone("12345").is_err());
        assert!(validate_colombian_phone("+1 555 123 4567").is_err());
    }

    #[test]
    fn test_validate_nit_without_check_digit() {
        assert!(validate_nit("900123456").is_ok());
        assert!(validate_nit("830512345").is_ok());
        assert!(validate_nit("12AB34").is_err());
        assert!(validate_nit("12345").is_err()); // Too short
    }

    #[test]
    fn test_validate_nit_check_digit() {
        // 800197268 is the DIAN's own NIT; its verification digit is 4
        assert!(validate_nit("800197268-4").is_ok());
        assert!(validate_nit("800197268-5").is_err());
        assert!(validate_nit("900123456-x").is_err());
    }

    #[test]
    fn test_compute_nit_check_digit() {
        let digits: Vec<u32> = "800197268"
            .chars()
            .filter_map(|c| c.to_digit(10))
            .collect();
        assert_eq!(compute_nit_check_digit(&digits), 4);
    }
}
