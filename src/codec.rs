//! Hex/byte conversion
//!
//! Every field encoder in this crate ends up going through these two
//! functions: packed-BCD fields (PAN, expiry, Track-2) are built as hex
//! character strings and then decoded into bytes.

pub use hex::FromHexError;

/// Convert bytes to an uppercase hex string (two characters per byte).
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Convert a hex string to bytes.
///
/// Accepts upper and lower case. Fails on odd length or non-hex
/// characters.
pub fn from_hex(s: &str) -> Result<Vec<u8>, FromHexError> {
    hex::decode(s)
}
