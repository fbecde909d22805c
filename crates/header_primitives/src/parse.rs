//! Strict decoding of header fields from their text and byte forms.
//!
//! Identifiers accept an optional `0x` prefix in either case and must have the
//! exact width of their type. Quantities accept `0x`-prefixed hex or plain
//! decimal. The canonical text of an identifier is [`to_hex`].
use core::fmt::LowerHex;

use crate::{Address, Bloom, H64, H256, InvalidHeaderError, U256};

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn malformed(field: &'static str, reason: impl ToString) -> InvalidHeaderError {
    InvalidHeaderError::Malformed {
        field,
        reason: reason.to_string(),
    }
}

/// Lowercase, `0x`-prefixed, full-width hex of a fixed-size value.
pub fn to_hex<T: LowerHex>(value: &T) -> String {
    format!("{value:#x}")
}

/// Decodes a hex string of any length, such as `extra_data`.
pub fn bytes(field: &'static str, s: &str) -> Result<Vec<u8>, InvalidHeaderError> {
    let digits = strip_hex_prefix(s).unwrap_or(s);
    hex::decode(digits).map_err(|e| malformed(field, e))
}

/// Copies a byte slice into an array of exactly `N` bytes.
pub fn fixed<const N: usize>(field: &'static str, raw: &[u8]) -> Result<[u8; N], InvalidHeaderError> {
    <[u8; N]>::try_from(raw)
        .map_err(|_| malformed(field, format!("expected {N} bytes, got {}", raw.len())))
}

fn fixed_hex<const N: usize>(field: &'static str, s: &str) -> Result<[u8; N], InvalidHeaderError> {
    fixed(field, &bytes(field, s)?)
}

/// Digits only; the std integer parsers would also take a leading sign.
fn hex_digits<'a>(field: &'static str, digits: &'a str) -> Result<&'a str, InvalidHeaderError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed(field, format!("not a hex quantity: {digits:?}")));
    }
    Ok(digits)
}

fn decimal_digits<'a>(field: &'static str, digits: &'a str) -> Result<&'a str, InvalidHeaderError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(field, format!("not a decimal integer: {digits:?}")));
    }
    Ok(digits)
}

/// Decodes a 32-byte identifier.
pub fn h256(field: &'static str, s: &str) -> Result<H256, InvalidHeaderError> {
    fixed_hex::<32>(field, s).map(H256::from)
}

/// Decodes a 20-byte address.
pub fn address(field: &'static str, s: &str) -> Result<Address, InvalidHeaderError> {
    fixed_hex::<20>(field, s).map(Address::from)
}

/// Decodes an 8-byte nonce.
pub fn h64(field: &'static str, s: &str) -> Result<H64, InvalidHeaderError> {
    fixed_hex::<8>(field, s).map(H64::from)
}

/// Decodes a 256-byte logs bloom from hex text.
pub fn bloom(field: &'static str, s: &str) -> Result<Bloom, InvalidHeaderError> {
    fixed_hex::<256>(field, s).map(Bloom::from)
}

/// Decodes an unsigned 64-bit quantity, hex (`0x1b4`) or decimal (`436`).
pub fn quantity(field: &'static str, s: &str) -> Result<u64, InvalidHeaderError> {
    let parsed = match strip_hex_prefix(s) {
        Some(digits) => u64::from_str_radix(hex_digits(field, digits)?, 16),
        None => decimal_digits(field, s)?.parse::<u64>(),
    };
    parsed.map_err(|e| malformed(field, e))
}

/// Decodes an arbitrary precision quantity, hex or decimal.
pub fn big_quantity(field: &'static str, s: &str) -> Result<U256, InvalidHeaderError> {
    match strip_hex_prefix(s) {
        Some(digits) => {
            U256::from_str_radix(hex_digits(field, digits)?, 16).map_err(|e| malformed(field, e))
        }
        None => decimal(field, s),
    }
}

/// Decodes decimal text only, the persisted form of `difficulty`.
pub fn decimal(field: &'static str, s: &str) -> Result<U256, InvalidHeaderError> {
    U256::from_dec_str(decimal_digits(field, s)?).map_err(|e| malformed(field, e))
}
