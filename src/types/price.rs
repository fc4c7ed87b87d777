//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! All prices and sizes use fixed-point representation to guarantee the
//! exact equality and ordering comparisons the book relies on. Values are
//! stored as u64 scaled by 10^8.
//!
//! ## Quantization Boundary
//!
//! The upstream feed delivers decimal strings. They are quantized exactly
//! once, at the ingestion boundary, before reaching the book:
//!
//! - sizes to 8 fractional digits ([`quantize_size`])
//! - prices to 2 fractional digits ([`quantize_price`])
//!
//! Both go through `rust_decimal` so no binary floating point ever touches
//! a price or size.
//!
//! ## Examples
//!
//! ```
//! use l2book::types::price::{to_fixed, from_fixed, quantize_price};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//!
//! // Prices carry 2 fractional digits on the wire
//! assert_eq!(quantize_price("201.1"), Some(20_110_000_000));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
///
/// This provides 8 decimal places of precision.
pub const SCALE: u64 = 100_000_000;

/// Fractional digits carried by a size on the wire.
pub const SIZE_DIGITS: u32 = 8;

/// Fractional digits carried by a price on the wire.
pub const PRICE_DIGITS: u32 = 2;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// # Arguments
///
/// * `s` - Decimal string (e.g., "50000.12345678")
///
/// # Returns
///
/// * `Some(u64)` - The fixed-point representation
/// * `None` - If parsing fails or value is out of range
///
/// # Example
///
/// ```
/// use l2book::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("50000.12345678"), Some(5_000_012_345_678));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64
///
/// # Returns
///
/// * `Some(u64)` - The fixed-point representation
/// * `None` - If value is negative or out of range
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Quantize a feed size string to 8 fractional digits and convert to
/// fixed-point.
///
/// Rounding is banker's rounding (round half to even), matching the
/// upstream feed's own quantization.
///
/// # Example
///
/// ```
/// use l2book::types::price::quantize_size;
///
/// assert_eq!(quantize_size("0.0001"), Some(10_000));
/// assert_eq!(quantize_size("0.123456789"), Some(12_345_679));
/// ```
pub fn quantize_size(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal.round_dp(SIZE_DIGITS))
}

/// Quantize a feed price string to 2 fractional digits and convert to
/// fixed-point.
///
/// # Example
///
/// ```
/// use l2book::types::price::quantize_price;
///
/// assert_eq!(quantize_price("200.01"), Some(20_001_000_000));
/// assert_eq!(quantize_price("201"), Some(20_100_000_000));
/// ```
pub fn quantize_price(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal.round_dp(PRICE_DIGITS))
}

/// Convert fixed-point u64 to a string with 8 decimal places
///
/// # Example
///
/// ```
/// use l2book::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// assert_eq!(from_fixed(5_000_012_345_678), "50000.12345678");
/// ```
pub fn from_fixed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{:.8}", decimal)
}

/// Convert fixed-point u64 to a human-readable string (trimmed trailing zeros)
///
/// # Example
///
/// ```
/// use l2book::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// assert_eq!(from_fixed_trimmed(123_456_789), "1.23456789");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{}", decimal.normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================
