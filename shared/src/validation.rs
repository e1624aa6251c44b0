//! Validation utilities for Stockbook
//!
//! Includes India-specific validations for purchase compliance fields.

use rust_decimal::Decimal;

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate a material display name
pub fn validate_material_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Material name is required");
    }
    Ok(())
}

/// Validate a purchase quantity (zero is allowed, negative is not)
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a monetary amount (price, surcharge)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate the bottle count used for per-bottle pricing
pub fn validate_bottle_count(num_bottles: u32) -> Result<(), &'static str> {
    if num_bottles == 0 {
        return Err("Number of bottles must be greater than 0");
    }
    Ok(())
}

/// Validate a product name before pricing
pub fn validate_product_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Product name is required");
    }
    Ok(())
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Validate an Indian GSTIN (Goods and Services Tax Identification Number)
///
/// 15 characters: 2-digit state code, 10-character PAN, entity code,
/// the literal 'Z', and a base-36 check character.
pub fn validate_gstin(gstin: &str) -> Result<(), &'static str> {
    let chars: Vec<char> = gstin.chars().collect();

    if chars.len() != 15 {
        return Err("GSTIN must be 15 characters");
    }

    // State code 01-38
    if !chars[0].is_ascii_digit() || !chars[1].is_ascii_digit() {
        return Err("GSTIN must start with a 2-digit state code");
    }
    let state: u32 = chars[0].to_digit(10).unwrap() * 10 + chars[1].to_digit(10).unwrap();
    if state == 0 || state > 38 {
        return Err("GSTIN state code out of range");
    }

    // PAN: 5 letters, 4 digits, 1 letter
    if !chars[2..7].iter().all(|c| c.is_ascii_uppercase()) {
        return Err("GSTIN characters 3-7 must be uppercase letters");
    }
    if !chars[7..11].iter().all(|c| c.is_ascii_digit()) {
        return Err("GSTIN characters 8-11 must be digits");
    }
    if !chars[11].is_ascii_uppercase() {
        return Err("GSTIN character 12 must be an uppercase letter");
    }

    // Entity code, then the constant 'Z'
    if !chars[12].is_ascii_alphanumeric() {
        return Err("Invalid GSTIN entity code");
    }
    if chars[13] != 'Z' {
        return Err("GSTIN character 14 must be 'Z'");
    }

    // Base-36 check character over the first 14 characters
    let expected = gstin_check_char(&chars[..14]).ok_or("Invalid GSTIN format")?;
    if chars[14] != expected {
        return Err("Invalid GSTIN check character");
    }

    Ok(())
}

/// Compute the GSTIN check character (base-36 alternating-factor scheme)
fn gstin_check_char(chars: &[char]) -> Option<char> {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut sum: u32 = 0;
    for (i, c) in chars.iter().enumerate() {
        let value = ALPHABET.iter().position(|&a| a as char == *c)? as u32;
        let factor = if i % 2 == 0 { 1 } else { 2 };
        let product = value * factor;
        sum += product / 36 + product % 36;
    }

    let check = (36 - sum % 36) % 36;
    Some(ALPHABET[check as usize] as char)
}
