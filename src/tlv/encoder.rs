//! TLV encoder
//!
//! Emits `tag ++ length ++ value` byte sequences. The length is always
//! a single byte: every value this card produces is well under 255
//! bytes, so multi-byte length forms are out of contract. Encoding a
//! longer value is a programming error, not a runtime condition.

use super::Tlv;

/// TLV encoder for building terminal-facing structures
pub struct TlvEncoder;

impl TlvEncoder {
    /// Encode a tag-value pair to bytes
    pub fn encode(tag: u32, value: &[u8]) -> Vec<u8> {
        let mut result = Vec::with_capacity(3 + value.len());
        result.extend(Self::encode_tag(tag));
        result.push(Self::encode_length(value.len()));
        result.extend_from_slice(value);
        result
    }

    /// Encode just the tag bytes (one or two, e.g. 0x5A or 0x5F20)
    pub fn encode_tag(tag: u32) -> Vec<u8> {
        debug_assert!(tag <= 0xFFFF, "tag 0x{:X} exceeds two bytes", tag);
        if tag > 0xFF {
            vec![((tag >> 8) & 0xFF) as u8, (tag & 0xFF) as u8]
        } else {
            vec![(tag & 0xFF) as u8]
        }
    }

    /// Encode the length as a single byte
    ///
    /// Panics if the value cannot fit: all fields in this protocol are
    /// small and fixed, so a longer value is a contract violation.
    pub fn encode_length(length: usize) -> u8 {
        assert!(
            length <= 0xFF,
            "TLV value of {} bytes exceeds the single-byte length form",
            length
        );
        length as u8
    }

    /// Encode a TLV node to bytes
    ///
    /// Constructed nodes encode all children first, then prefix the
    /// parent tag and the concatenated length.
    pub fn encode_tlv(tlv: &Tlv) -> Vec<u8> {
        let value = if !tlv.subs.is_empty() {
            let mut child_bytes = Vec::new();
            for child in &tlv.subs {
                child_bytes.extend(Self::encode_tlv(child));
            }
            child_bytes
        } else {
            tlv.value.clone()
        };

        Self::encode(tlv.tag, &value)
    }
}

/// Builder for constructing nested TLV structures
pub struct TlvBuilder {
    data: Vec<u8>,
}

impl TlvBuilder {
    /// Create a new TLV builder
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Add a primitive TLV
    pub fn add(mut self, tag: u32, value: &[u8]) -> Self {
        self.data.extend(TlvEncoder::encode(tag, value));
        self
    }

    /// Add raw bytes (pre-encoded TLV)
    pub fn add_raw(mut self, data: &[u8]) -> Self {
        self.data.extend_from_slice(data);
        self
    }

    /// Wrap current content in a constructed tag
    pub fn wrap(self, tag: u32) -> Self {
        let wrapped = TlvEncoder::encode(tag, &self.data);
        Self { data: wrapped }
    }

    /// Build the final byte vector
    pub fn build(self) -> Vec<u8> {
        self.data
    }

    /// Get current length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for TlvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
