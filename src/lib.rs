//! BlackWallet host card emulation core
//!
//! Emulates the command/response behavior of an EMV-style contactless
//! payment card: ISO 7816-4 APDUs come in from a reading terminal, TLV
//! encoded responses plus a status word go back out.
//!
//! The platform card-emulation service that delivers APDU bytes, the
//! wallet application that supplies cardholder data, and real
//! transaction cryptography are all external collaborators. This crate
//! is the synchronous protocol core between them: feed it a command
//! buffer, get back exactly `body ++ status word`.
//!
//! # Example
//! ```
//! use blackwallet_hce::PaymentCard;
//!
//! let mut card = PaymentCard::new();
//! card.activate("Jane Doe", "4111111111111111", "1225");
//!
//! // SELECT the payment application by AID
//! let select = [
//!     0x00, 0xA4, 0x04, 0x00, 0x07,
//!     0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06,
//! ];
//! let response = card.process_apdu(&select);
//! assert_eq!(&response[response.len() - 2..], &[0x90, 0x00]);
//! ```

pub mod apdu;
pub mod codec;
pub mod payment;
pub mod profile;
pub mod tlv;

use log::info;

use payment::{CryptogramProvider, PaymentApplet, SessionState};
use profile::ProfileHandle;

pub use payment::PAYMENT_AID;
pub use profile::CardProfile;

/// The emulated payment card
///
/// Owns the payment applet and a handle to the shared card profile.
/// The wallet application drives [`activate`](Self::activate) and
/// [`deactivate`](Self::deactivate); the platform adapter drives
/// [`process_apdu`](Self::process_apdu) with one command at a time. A
/// cloned [`profile_handle`](Self::profile_handle) lets the wallet
/// rewrite profile fields from its own thread while an exchange is in
/// flight.
pub struct PaymentCard {
    applet: PaymentApplet,
    profile: ProfileHandle,
}

impl PaymentCard {
    /// Create a card with an inactive profile
    pub fn new() -> Self {
        Self::with_profile(ProfileHandle::new())
    }

    /// Create a card reading from an existing profile handle
    pub fn with_profile(profile: ProfileHandle) -> Self {
        Self {
            applet: PaymentApplet::new(profile.clone()),
            profile,
        }
    }

    /// Create a card with a specific cryptogram provider
    pub fn with_cryptogram(
        profile: ProfileHandle,
        cryptogram: Box<dyn CryptogramProvider>,
    ) -> Self {
        Self {
            applet: PaymentApplet::with_cryptogram(profile.clone(), cryptogram),
            profile,
        }
    }

    /// Set the profile fields and mark the card ready to transact
    pub fn activate(&mut self, cardholder_name: &str, token: &str, expiry: &str) {
        self.profile.activate(cardholder_name, token, expiry);
    }

    /// End emulation: clear the token, mark not ready, and drop the
    /// session back to `Idle` immediately
    pub fn deactivate(&mut self) {
        self.profile.deactivate();
        self.applet.reset();
        info!("Card emulation deactivated");
    }

    /// Whether the card is currently ready to transact
    pub fn is_ready(&self) -> bool {
        self.profile.is_ready()
    }

    /// Current session state
    pub fn session_state(&self) -> SessionState {
        self.applet.state()
    }

    /// Process one command APDU and return the response bytes
    ///
    /// Total over all inputs: an empty or truncated buffer answers with
    /// a failure status word rather than faulting.
    pub fn process_apdu(&mut self, command: &[u8]) -> Vec<u8> {
        self.applet.process_apdu(command)
    }

    /// Clone of the shared profile handle for the controlling thread
    pub fn profile_handle(&self) -> ProfileHandle {
        self.profile.clone()
    }
}

impl Default for PaymentCard {
    fn default() -> Self {
        Self::new()
    }
}
