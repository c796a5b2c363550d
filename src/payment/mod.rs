//! Payment applet
//!
//! EMV-style contactless payment application: SELECT by AID, GET
//! PROCESSING OPTIONS, READ RECORD. The applet answers with the fixed
//! BlackWallet AID and builds its records from the shared card profile.

pub mod applet;
pub mod cryptogram;
pub mod fields;

pub use applet::{PaymentApplet, SessionState};
pub use cryptogram::{ClockCryptogram, CryptogramProvider};

/// The single payment AID this card answers to
pub const PAYMENT_AID: &[u8] = &[0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];

/// Application label returned in the FCI
pub const APPLICATION_LABEL: &[u8] = b"BlackWallet";
