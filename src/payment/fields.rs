//! Packed-BCD field encoders
//!
//! PAN, expiry, and Track-2 equivalent data are built as hex character
//! strings and packed two nibbles per byte through the codec, with `F`
//! as the right-pad filler when the nibble count is odd. This matches
//! conventional EMV encoding, which compliant terminals parse byte for
//! byte.

use crate::codec;

/// Service code carried in Track-2 equivalent data
const SERVICE_CODE: &str = "201";

/// Track-2 field separator between PAN and expiry
const TRACK2_SEPARATOR: char = 'D';

/// Encode the token as a packed-BCD PAN
///
/// Non-digit characters are stripped first. An odd digit count gets a
/// single `F` pad nibble, so the output is always `ceil(digits / 2)`
/// bytes.
pub fn encode_pan(token: &str) -> Result<Vec<u8>, codec::FromHexError> {
    codec::from_hex(&pad_to_even(digits_of(token)))
}

/// Encode the 4-digit MMYY expiry into 2 bytes
///
/// The stored order is packed verbatim; there is no YYMM conversion.
pub fn encode_expiry(expiry: &str) -> Result<Vec<u8>, codec::FromHexError> {
    codec::from_hex(expiry)
}

/// Build Track-2 equivalent data
///
/// Layout: digits-only token, `D` separator, the 4 expiry characters,
/// then the fixed service code. The concatenation is padded to an even
/// nibble count before packing; unpadded odd-parity strings would
/// corrupt the encoding.
pub fn build_track2(token: &str, expiry: &str) -> Result<Vec<u8>, codec::FromHexError> {
    let mut track = digits_of(token);
    track.push(TRACK2_SEPARATOR);
    track.push_str(expiry);
    track.push_str(SERVICE_CODE);
    codec::from_hex(&pad_to_even(track))
}

fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn pad_to_even(mut s: String) -> String {
    if s.len() % 2 != 0 {
        s.push('F');
    }
    s
}
