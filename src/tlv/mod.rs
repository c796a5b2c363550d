//! TLV (Tag-Length-Value) encoding
//!
//! Builds the nested TLV structures the terminal expects in SELECT and
//! READ RECORD responses. This card only ever emits TLV; incoming
//! command payloads (the candidate AID) arrive Lc-delimited and need no
//! TLV parsing.
//!
//! # Example
//! ```
//! use blackwallet_hce::tlv::{tags, TlvBuilder};
//!
//! let fci = TlvBuilder::new()
//!     .add(tags::DF_NAME, &[0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06])
//!     .add(tags::APPLICATION_LABEL, b"BlackWallet")
//!     .wrap(tags::FCI_TEMPLATE)
//!     .build();
//! assert_eq!(fci[0], 0x6F);
//! ```

mod encoder;

pub use encoder::{TlvEncoder, TlvBuilder};

/// A TLV node: either a primitive value or a constructed list of
/// child nodes. Children of a constructed node are encoded first so the
/// parent's length byte always equals the exact encoded child length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    /// Tag identifier (one or two bytes on the wire)
    pub tag: u32,
    /// Primitive value bytes (ignored when `subs` is non-empty)
    pub value: Vec<u8>,
    /// Child nodes for constructed tags
    pub subs: Vec<Tlv>,
}

impl Tlv {
    /// Create a primitive TLV
    pub fn new(tag: u32, value: Vec<u8>) -> Self {
        Self {
            tag,
            value,
            subs: Vec::new(),
        }
    }

    /// Create a constructed TLV from child nodes
    pub fn constructed(tag: u32, subs: Vec<Tlv>) -> Self {
        Self {
            tag,
            value: Vec::new(),
            subs,
        }
    }
}

/// EMV tag constants used by the payment applet
pub mod tags {
    /// File Control Information template
    pub const FCI_TEMPLATE: u32 = 0x6F;
    /// DF Name (the AID)
    pub const DF_NAME: u32 = 0x84;
    /// Application Label
    pub const APPLICATION_LABEL: u32 = 0x50;
    /// Application Priority Indicator
    pub const APPLICATION_PRIORITY: u32 = 0x87;

    /// Response Message Template Format 1 (GET PROCESSING OPTIONS)
    pub const RESPONSE_TEMPLATE: u32 = 0x80;

    /// Record template (READ RECORD)
    pub const RECORD_TEMPLATE: u32 = 0x70;
    /// Application Primary Account Number
    pub const PAN: u32 = 0x5A;
    /// Cardholder Name
    pub const CARDHOLDER_NAME: u32 = 0x5F20;
    /// Application Expiration Date
    pub const EXPIRATION_DATE: u32 = 0x5F24;
    /// Track 2 Equivalent Data
    pub const TRACK2_EQUIVALENT: u32 = 0x57;
    /// Application Cryptogram
    pub const APPLICATION_CRYPTOGRAM: u32 = 0x9F26;
}
