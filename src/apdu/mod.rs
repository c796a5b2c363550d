//! APDU (Application Protocol Data Unit) handling
//!
//! Command parsing for the ISO 7816-4 short format. Contactless payment
//! terminals drive this card with short APDUs only, so the extended
//! (three-byte Lc/Le) encoding is not supported.
//!
//! # Example
//! ```
//! use blackwallet_hce::apdu::parse_apdu;
//!
//! // SELECT by AID
//! let raw = [0x00, 0xA4, 0x04, 0x00, 0x07, 0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
//! let cmd = parse_apdu(&raw).unwrap();
//! assert_eq!(cmd.ins, 0xA4);
//! assert_eq!(cmd.data.len(), 7);
//! ```

mod response;
mod status;

pub use response::Response;
pub use status::SW;

use thiserror::Error;

/// Errors that can occur during APDU parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApduError {
    #[error("APDU too short: expected at least 4 bytes, got {0}")]
    TooShort(usize),

    #[error("APDU body inconsistent with Lc")]
    InvalidLength,
}

/// A parsed APDU command
///
/// Immutable once parsed; one is constructed per incoming message.
///
/// # Fields
/// - `cla`: Class byte
/// - `ins`: Instruction byte
/// - `p1`, `p2`: Parameter bytes (command-specific)
/// - `data`: Command data, Lc-delimited (may be empty)
/// - `le`: Expected response length (None if not specified)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    /// Class byte (CLA)
    pub cla: u8,
    /// Instruction byte (INS)
    pub ins: u8,
    /// Parameter 1 (P1)
    pub p1: u8,
    /// Parameter 2 (P2)
    pub p2: u8,
    /// Command data (may be empty)
    pub data: Vec<u8>,
    /// Expected response length (Le), None if not specified
    pub le: Option<u16>,
}

impl Apdu {
    /// Create a new APDU with just the header (CLA, INS, P1, P2)
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Vec::new(),
            le: None,
        }
    }

    /// Create a new APDU with data
    pub fn with_data(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
            le: None,
        }
    }

    /// The four header bytes as sent on the wire
    pub fn header(&self) -> [u8; 4] {
        [self.cla, self.ins, self.p1, self.p2]
    }
}

/// Parse raw bytes into an APDU
///
/// Handles the four short-format cases:
/// - Case 1: CLA INS P1 P2
/// - Case 2: CLA INS P1 P2 Le
/// - Case 3: CLA INS P1 P2 Lc Data
/// - Case 4: CLA INS P1 P2 Lc Data Le
pub fn parse_apdu(data: &[u8]) -> Result<Apdu, ApduError> {
    if data.len() < 4 {
        return Err(ApduError::TooShort(data.len()));
    }

    let cla = data[0];
    let ins = data[1];
    let p1 = data[2];
    let p2 = data[3];

    let remaining = &data[4..];

    // Case 1: header only
    if remaining.is_empty() {
        return Ok(Apdu::new(cla, ins, p1, p2));
    }

    let first_byte = remaining[0];

    // Case 2: only Le - Le=0 means 256
    if remaining.len() == 1 {
        let le = if first_byte == 0 { 256 } else { first_byte as u16 };
        return Ok(Apdu {
            cla,
            ins,
            p1,
            p2,
            data: Vec::new(),
            le: Some(le),
        });
    }

    // first_byte is Lc
    let lc = first_byte as usize;

    // Case 3: Lc + Data (no Le)
    if remaining.len() == 1 + lc {
        return Ok(Apdu {
            cla,
            ins,
            p1,
            p2,
            data: remaining[1..1 + lc].to_vec(),
            le: None,
        });
    }

    // Case 4: Lc + Data + Le
    if remaining.len() == 1 + lc + 1 {
        let le_byte = remaining[1 + lc];
        let le = if le_byte == 0 { 256 } else { le_byte as u16 };
        return Ok(Apdu {
            cla,
            ins,
            p1,
            p2,
            data: remaining[1..1 + lc].to_vec(),
            le: Some(le),
        });
    }

    Err(ApduError::InvalidLength)
}

/// Instruction bytes recognized by the payment applet
pub mod ins {
    pub const SELECT: u8 = 0xA4;
    pub const GET_PROCESSING_OPTIONS: u8 = 0xA8;
    pub const READ_RECORD: u8 = 0xB2;
}
