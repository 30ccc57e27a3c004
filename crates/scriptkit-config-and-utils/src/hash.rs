//! Storage key derivation.
//!
//! Keys are a base-31 polynomial hash over UTF-16 code units with 32-bit
//! two's-complement wraparound. Entries written by other implementations are
//! addressed by these exact values, so the arithmetic must stay bit-for-bit
//! identical.

/// Raw signed 32-bit hash of `s`.
pub fn hash_code(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Storage key for `s`, formatted as `hash_<signed decimal>`.
pub fn hash(s: &str) -> String {
    format!("hash_{}", hash_code(s))
}
