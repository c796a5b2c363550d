//! Card profile shared between the controlling application and the
//! APDU dispatcher
//!
//! The controlling application may rewrite the profile while a command
//! exchange is in flight on the platform's delivery thread. To keep
//! each handler invocation on a consistent view, the handle stores an
//! `Arc<CardProfile>` behind a `parking_lot::RwLock`: writers build a
//! fresh profile and swap the whole `Arc`, readers clone the `Arc` once
//! per command and never observe a partial update. Neither side blocks
//! for longer than the pointer swap.

use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

/// The configuration the card session responds with
///
/// `expiry` is the 4-digit MMYY string as stored by the wallet; no
/// YYMM reordering happens anywhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProfile {
    /// Cardholder name, returned verbatim in record 1
    pub cardholder_name: String,
    /// Payment token standing in for the PAN (digits, variable length)
    pub token: String,
    /// Expiry as 4-digit MMYY text
    pub expiry: String,
    /// Whether emulation is switched on
    pub ready: bool,
}

impl CardProfile {
    /// An inactive profile with no token
    pub fn inactive() -> Self {
        Self {
            cardholder_name: String::new(),
            token: String::new(),
            expiry: String::new(),
            ready: false,
        }
    }
}

impl Default for CardProfile {
    fn default() -> Self {
        Self::inactive()
    }
}

/// Shared handle to the card profile
///
/// Cheap to clone; all clones point at the same profile. This is the
/// only mutation surface exposed to the controlling application.
#[derive(Debug, Clone)]
pub struct ProfileHandle {
    inner: Arc<RwLock<Arc<CardProfile>>>,
}

impl ProfileHandle {
    /// Create a handle holding an inactive profile
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(CardProfile::inactive()))),
        }
    }

    /// Set all profile fields and mark the card ready
    pub fn activate(&self, cardholder_name: &str, token: &str, expiry: &str) {
        let profile = Arc::new(CardProfile {
            cardholder_name: cardholder_name.to_string(),
            token: token.to_string(),
            expiry: expiry.to_string(),
            ready: true,
        });
        *self.inner.write() = profile;
        info!("Payment profile activated for {}", cardholder_name);
    }

    /// Clear the token and mark the card not ready
    ///
    /// The remaining fields are dropped with the old snapshot; nothing
    /// token-derived survives deactivation.
    pub fn deactivate(&self) {
        *self.inner.write() = Arc::new(CardProfile::inactive());
        info!("Payment profile deactivated");
    }

    /// Whether the card is currently ready to transact
    pub fn is_ready(&self) -> bool {
        self.inner.read().ready
    }

    /// Take a consistent snapshot of the profile
    ///
    /// The returned `Arc` is immutable; concurrent writes swap in a new
    /// snapshot without touching this one.
    pub fn snapshot(&self) -> Arc<CardProfile> {
        self.inner.read().clone()
    }
}

impl Default for ProfileHandle {
    fn default() -> Self {
        Self::new()
    }
}
