//! Payment applet dispatcher and session state machine
//!
//! Classifies incoming commands by header, drives the session through
//! SELECT -> GET PROCESSING OPTIONS -> READ RECORD, and builds the TLV
//! responses from the current profile snapshot. Every handler is total:
//! any unrecognized, malformed, or disallowed input maps to one of the
//! three status words and the session keeps going. Retry policy belongs
//! to the terminal.

use log::{debug, info, warn};
use thiserror::Error;

use crate::apdu::{ins, parse_apdu, Apdu, Response, SW};
use crate::codec;
use crate::profile::{CardProfile, ProfileHandle};
use crate::tlv::{tags, TlvBuilder};

use super::cryptogram::{ClockCryptogram, CryptogramProvider};
use super::fields;
use super::{APPLICATION_LABEL, PAYMENT_AID};

/// Session state, owned solely by the dispatcher
///
/// `Idle` is both the initial state and the deactivation target.
/// Nothing persists across deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Selected,
    OptionsSet,
}

/// Why a command was refused
///
/// Surfaced only as a status word; none of these are fatal to the
/// session. SELECT and GET PROCESSING OPTIONS answer different status
/// words for an unready profile, hence the two readiness variants.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("payment profile is not ready")]
    NotReady,

    #[error("payment profile is inactive or has no token")]
    NotProvisioned,

    #[error("AID {0} does not match the payment application")]
    UnknownAid(String),

    #[error("command too short to carry required fields")]
    MalformedCommand,

    #[error("record {0} is not supported")]
    UnsupportedRecord(u8),

    #[error("unrecognized command header {0:02X?}")]
    UnrecognizedCommand([u8; 4]),

    #[error("profile field failed to encode")]
    Encoding(#[from] codec::FromHexError),
}

impl CommandError {
    /// The status word this refusal answers with
    pub fn status_word(&self) -> u16 {
        match self {
            CommandError::NotReady
            | CommandError::UnknownAid(_)
            | CommandError::UnsupportedRecord(_) => SW::FILE_NOT_FOUND,
            CommandError::NotProvisioned
            | CommandError::MalformedCommand
            | CommandError::UnrecognizedCommand(_)
            | CommandError::Encoding(_) => SW::UNKNOWN_ERROR,
        }
    }
}

/// The payment applet: command dispatcher plus session state
pub struct PaymentApplet {
    profile: ProfileHandle,
    state: SessionState,
    cryptogram: Box<dyn CryptogramProvider>,
}

impl PaymentApplet {
    /// Create an applet reading from the given profile handle
    pub fn new(profile: ProfileHandle) -> Self {
        Self::with_cryptogram(profile, Box::new(ClockCryptogram))
    }

    /// Create an applet with a specific cryptogram provider
    pub fn with_cryptogram(profile: ProfileHandle, cryptogram: Box<dyn CryptogramProvider>) -> Self {
        Self {
            profile,
            state: SessionState::Idle,
            cryptogram,
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Reset the session to `Idle`
    ///
    /// Called on deactivation; takes effect immediately, there is no
    /// timeout-based cleanup.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        debug!("Session reset to Idle");
    }

    /// Process a raw command buffer and return raw response bytes
    ///
    /// The byte-level entry point for the platform adapter. An empty or
    /// truncated buffer still yields a valid failure response.
    pub fn process_apdu(&mut self, command: &[u8]) -> Vec<u8> {
        debug!("Received APDU: {}", codec::to_hex(command));

        let cmd = match parse_apdu(command) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("Rejecting command: {}", e);
                return Response::error(CommandError::MalformedCommand.status_word()).to_bytes();
            }
        };

        self.handle(&cmd).to_bytes()
    }

    /// Dispatch a parsed command to its handler
    ///
    /// Matched in priority order: SELECT (`00 A4 04 00`), GET
    /// PROCESSING OPTIONS (`80 A8 00 00`), READ RECORD (`00 B2`).
    pub fn handle(&mut self, cmd: &Apdu) -> Response {
        let result = match cmd.header() {
            [0x00, ins::SELECT, 0x04, 0x00] => self.handle_select(cmd),
            [0x80, ins::GET_PROCESSING_OPTIONS, 0x00, 0x00] => self.handle_processing_options(),
            [0x00, ins::READ_RECORD, _, _] => self.handle_read_record(cmd),
            header => Err(CommandError::UnrecognizedCommand(header)),
        };

        result.unwrap_or_else(|e| {
            warn!("Command refused: {}", e);
            Response::error(e.status_word())
        })
    }

    /// Handle SELECT by AID
    ///
    /// On a match, answers the File Control Information template and
    /// enters `Selected`. A mismatched AID leaves the state untouched.
    fn handle_select(&mut self, cmd: &Apdu) -> Result<Response, CommandError> {
        let profile = self.profile.snapshot();
        if !profile.ready {
            return Err(CommandError::NotReady);
        }

        // Command data is the Lc-delimited candidate AID
        if cmd.data != PAYMENT_AID {
            return Err(CommandError::UnknownAid(codec::to_hex(&cmd.data)));
        }

        self.state = SessionState::Selected;
        info!("Payment application selected");

        let fci = TlvBuilder::new()
            .add(tags::DF_NAME, PAYMENT_AID)
            .add(tags::APPLICATION_LABEL, APPLICATION_LABEL)
            .add(tags::APPLICATION_PRIORITY, &[0x01])
            .wrap(tags::FCI_TEMPLATE)
            .build();

        Ok(Response::success(fci))
    }

    /// Handle GET PROCESSING OPTIONS
    ///
    /// Answers the fixed AIP/AFL pair: AIP `00 80` (combined data
    /// authentication supported), AFL `08 01 01 00` (records 1-1 on
    /// SFI 1). No SELECT-first ordering is enforced.
    fn handle_processing_options(&mut self) -> Result<Response, CommandError> {
        let profile = self.profile.snapshot();
        if !profile.ready || profile.token.is_empty() {
            return Err(CommandError::NotProvisioned);
        }

        self.state = SessionState::OptionsSet;
        debug!("Processing options issued");

        let body = TlvBuilder::new()
            .add(tags::RESPONSE_TEMPLATE, &[0x00, 0x80, 0x08, 0x01, 0x01, 0x00])
            .build();

        Ok(Response::success(body))
    }

    /// Handle READ RECORD
    ///
    /// Record number comes from P1, the short file identifier from the
    /// top five bits of P2. Only records 1 and 2 exist.
    fn handle_read_record(&mut self, cmd: &Apdu) -> Result<Response, CommandError> {
        let record_number = cmd.p1;
        let sfi = (cmd.p2 >> 3) & 0x1F;
        debug!("Reading record {} from SFI {}", record_number, sfi);

        let profile = self.profile.snapshot();
        match record_number {
            1 => self.build_record1(&profile),
            2 => self.build_record2(&profile),
            other => Err(CommandError::UnsupportedRecord(other)),
        }
    }

    /// Record 1: PAN, cardholder name, expiration date
    fn build_record1(&self, profile: &CardProfile) -> Result<Response, CommandError> {
        let pan = fields::encode_pan(&profile.token)?;
        let expiry = fields::encode_expiry(&profile.expiry)?;

        let record = TlvBuilder::new()
            .add(tags::PAN, &pan)
            .add(tags::CARDHOLDER_NAME, profile.cardholder_name.as_bytes())
            .add(tags::EXPIRATION_DATE, &expiry)
            .wrap(tags::RECORD_TEMPLATE)
            .build();

        Ok(Response::success(record))
    }

    /// Record 2: Track-2 equivalent data and application cryptogram
    fn build_record2(&mut self, profile: &CardProfile) -> Result<Response, CommandError> {
        let track2 = fields::build_track2(&profile.token, &profile.expiry)?;
        let cryptogram = self.cryptogram.generate();

        let record = TlvBuilder::new()
            .add(tags::TRACK2_EQUIVALENT, &track2)
            .add(tags::APPLICATION_CRYPTOGRAM, &cryptogram)
            .wrap(tags::RECORD_TEMPLATE)
            .build();

        Ok(Response::success(record))
    }
}
