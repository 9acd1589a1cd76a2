//! Session seed derivation
//!
//! Players share a seed as free text. Numeric text is used as-is; anything
//! else is folded into an integer with a polynomial string hash.

/// Multiplier of the polynomial string hash
const HASH_BASE: u64 = 31;

/// Derive the numeric generation seed from user-facing seed text
///
/// Text that parses as an `i64` keeps its two's-complement bit pattern.
/// Other text hashes as `h = h * 31 + c` over its chars, wrapping, from 0.
pub fn derive_seed(input: &str) -> u64 {
    match input.parse::<i64>() {
        Ok(value) => value as u64,
        Err(_) => polynomial_hash(input),
    }
}

fn polynomial_hash(input: &str) -> u64 {
    input.chars().fold(0u64, |hash, c| {
        hash.wrapping_mul(HASH_BASE).wrapping_add(c as u64)
    })
}
