//! APDU Response handling
//!
//! A Response is the data bytes plus SW1/SW2 status words. On the wire
//! it is always exactly `data ++ SW1 ++ SW2`.

use super::status::SW;

/// A card response
///
/// # Example
/// ```
/// use blackwallet_hce::apdu::{Response, SW};
///
/// let response = Response::success(vec![0x01, 0x02]);
/// assert!(response.is_okay());
///
/// let error = Response::error(SW::FILE_NOT_FOUND);
/// assert_eq!(error.to_bytes(), vec![0x6A, 0x82]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response data (without status words)
    pub data: Vec<u8>,
    /// Status word 1 (SW1)
    pub sw1: u8,
    /// Status word 2 (SW2)
    pub sw2: u8,
}

impl Response {
    /// Create a new response with data and status word
    pub fn new(data: Vec<u8>, sw: u16) -> Self {
        Self {
            data,
            sw1: (sw >> 8) as u8,
            sw2: sw as u8,
        }
    }

    /// Create a success response (0x9000) with data
    pub fn success(data: Vec<u8>) -> Self {
        Self::new(data, SW::SUCCESS)
    }

    /// Create an empty success response (0x9000)
    pub fn ok() -> Self {
        Self::success(Vec::new())
    }

    /// Create an error response (no data)
    pub fn error(sw: u16) -> Self {
        Self::new(Vec::new(), sw)
    }

    /// Check if the response indicates success
    pub fn is_okay(&self) -> bool {
        SW::is_success(self.sw())
    }

    /// Get the combined status word as u16
    pub fn sw(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Convert to raw bytes for transmission (data + SW1 + SW2)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.data.len() + 2);
        result.extend_from_slice(&self.data);
        result.push(self.sw1);
        result.push(self.sw2);
        result
    }

    /// Get total length in bytes (data + 2 status bytes)
    pub fn len(&self) -> usize {
        self.data.len() + 2
    }

    /// Check if response has no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

impl From<u16> for Response {
    /// Create an error response from a status word
    fn from(sw: u16) -> Self {
        Self::error(sw)
    }
}
