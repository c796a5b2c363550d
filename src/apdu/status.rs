//! Status Word (SW) constants for APDU responses
//!
//! This card answers every command with one of three ISO 7816-4 status
//! words; any failure condition maps to either the generic error or
//! not-found.

/// Status Word constants
pub struct SW;

impl SW {
    /// Command completed normally
    pub const SUCCESS: u16 = 0x9000;

    /// Generic failure (no precise diagnosis)
    pub const UNKNOWN_ERROR: u16 = 0x6F00;

    /// File or application not found
    pub const FILE_NOT_FOUND: u16 = 0x6A82;

    /// Check if a status word indicates success
    #[inline]
    pub fn is_success(sw: u16) -> bool {
        sw == Self::SUCCESS
    }
}
