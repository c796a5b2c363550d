//! Full terminal conversations against the emulated card
//!
//! Drives the card the way a contactless terminal does: SELECT by AID,
//! GET PROCESSING OPTIONS, then READ RECORD, checking the exact wire
//! bytes at each step.

use std::sync::Arc;
use std::thread;

use blackwallet_hce::payment::CryptogramProvider;
use blackwallet_hce::profile::ProfileHandle;
use blackwallet_hce::{PaymentCard, PAYMENT_AID};

const SUCCESS: &[u8] = &[0x90, 0x00];
const NOT_FOUND: &[u8] = &[0x6A, 0x82];
const FAILED: &[u8] = &[0x6F, 0x00];

struct FixedCryptogram([u8; 8]);

impl CryptogramProvider for FixedCryptogram {
    fn generate(&mut self) -> [u8; 8] {
        self.0
    }
}

fn select_apdu() -> Vec<u8> {
    let mut raw = vec![0x00, 0xA4, 0x04, 0x00, PAYMENT_AID.len() as u8];
    raw.extend_from_slice(PAYMENT_AID);
    raw.push(0x00);
    raw
}

fn read_record(number: u8) -> Vec<u8> {
    // SFI 1, P2 = (1 << 3) | 0x04
    vec![0x00, 0xB2, number, 0x0C, 0x00]
}

fn jane_doe_card() -> PaymentCard {
    let profile = ProfileHandle::new();
    profile.activate("Jane Doe", "4111111111111111", "1225");
    PaymentCard::with_cryptogram(profile, Box::new(FixedCryptogram([0x11; 8])))
}

#[test]
fn full_purchase_conversation() {
    let mut card = jane_doe_card();

    // SELECT -> FCI wrapped in tag 6F
    let fci = card.process_apdu(&select_apdu());
    assert_eq!(fci[0], 0x6F);
    assert_eq!(&fci[fci.len() - 2..], SUCCESS);
    // FCI carries the AID back as DF Name
    assert_eq!(&fci[2..4], &[0x84, 0x07]);
    assert_eq!(&fci[4..11], PAYMENT_AID);
    // and the application label
    let label_at = fci
        .windows(2)
        .position(|w| w == [0x50, 0x0B])
        .expect("label TLV present");
    assert_eq!(&fci[label_at + 2..label_at + 13], b"BlackWallet");

    // GET PROCESSING OPTIONS -> fixed 6-byte AIP/AFL template
    let gpo = card.process_apdu(&[0x80, 0xA8, 0x00, 0x00, 0x02, 0x83, 0x00]);
    assert_eq!(
        gpo,
        vec![0x80, 0x06, 0x00, 0x80, 0x08, 0x01, 0x01, 0x00, 0x90, 0x00]
    );

    // READ RECORD 1 -> PAN, name, expiry under tag 70
    let rec1 = card.process_apdu(&read_record(1));
    assert_eq!(rec1[0], 0x70);
    assert_eq!(&rec1[rec1.len() - 2..], SUCCESS);
    assert_eq!(&rec1[2..4], &[0x5A, 0x08]);
    assert_eq!(
        &rec1[4..12],
        &[0x41, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11]
    );
    assert_eq!(&rec1[12..15], &[0x5F, 0x20, 0x08]);
    assert_eq!(&rec1[15..23], b"Jane Doe");
    assert_eq!(&rec1[23..28], &[0x5F, 0x24, 0x02, 0x12, 0x25]);

    // READ RECORD 2 -> Track-2 and the injected cryptogram
    let rec2 = card.process_apdu(&read_record(2));
    assert_eq!(rec2[0], 0x70);
    assert_eq!(&rec2[rec2.len() - 2..], SUCCESS);
    assert_eq!(&rec2[2..4], &[0x57, 0x0C]);
    assert_eq!(
        &rec2[4..16],
        &[0x41, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0xD1, 0x22, 0x52, 0x01]
    );
    assert_eq!(&rec2[16..19], &[0x9F, 0x26, 0x08]);
    assert_eq!(&rec2[19..27], &[0x11; 8]);
}

#[test]
fn gpo_without_select_is_not_gated() {
    let mut card = jane_doe_card();
    let gpo = card.process_apdu(&[0x80, 0xA8, 0x00, 0x00]);
    assert_eq!(gpo.len(), 10);
    assert_eq!(&gpo[gpo.len() - 2..], SUCCESS);
}

#[test]
fn inactive_card_rejects_select() {
    let mut card = PaymentCard::new();
    assert_eq!(card.process_apdu(&select_apdu()), NOT_FOUND);
}

#[test]
fn record_three_is_not_found() {
    let mut card = jane_doe_card();
    assert_eq!(card.process_apdu(&read_record(3)), NOT_FOUND);
}

#[test]
fn unknown_and_degenerate_commands_fail_cleanly() {
    let mut card = jane_doe_card();
    // unknown instruction
    assert_eq!(card.process_apdu(&[0x00, 0xCA, 0x00, 0x6E, 0x00]), FAILED);
    // empty buffer (null at the platform boundary)
    assert_eq!(card.process_apdu(&[]), FAILED);
    // header fragment
    assert_eq!(card.process_apdu(&[0x00, 0xA4, 0x04]), FAILED);
    // the session survives all of it
    let fci = card.process_apdu(&select_apdu());
    assert_eq!(&fci[fci.len() - 2..], SUCCESS);
}

#[test]
fn deactivation_ends_the_session() {
    let mut card = jane_doe_card();
    card.process_apdu(&select_apdu());
    card.deactivate();

    assert!(!card.is_ready());
    assert_eq!(card.process_apdu(&select_apdu()), NOT_FOUND);
}

#[test]
fn concurrent_profile_writes_never_tear_a_snapshot() {
    let profile = ProfileHandle::new();
    profile.activate("Jane Doe", "4111111111111111", "1225");
    let mut card = PaymentCard::with_profile(profile.clone());

    let writer_profile = profile.clone();
    let writer = thread::spawn(move || {
        for i in 0..500 {
            if i % 2 == 0 {
                writer_profile.activate("John Roe", "5500005555555559", "0328");
            } else {
                writer_profile.activate("Jane Doe", "4111111111111111", "1225");
            }
        }
    });

    for _ in 0..500 {
        let rec1 = card.process_apdu(&read_record(1));
        assert_eq!(&rec1[rec1.len() - 2..], SUCCESS);

        // Both profiles have a 16-digit token, a name, and a 4-digit
        // expiry; any torn read would break the fixed TLV offsets.
        assert_eq!(&rec1[2..4], &[0x5A, 0x08]);
        let pan: [u8; 8] = rec1[4..12].try_into().unwrap();
        let name = &rec1[15..23];
        let expiry = &rec1[26..28];
        match &pan {
            [0x41, 0x11, ..] => {
                assert_eq!(name, b"Jane Doe");
                assert_eq!(expiry, &[0x12, 0x25]);
            }
            [0x55, 0x00, ..] => {
                assert_eq!(name, b"John Roe");
                assert_eq!(expiry, &[0x03, 0x28]);
            }
            other => panic!("unexpected PAN bytes: {:02X?}", other),
        }
    }

    writer.join().unwrap();

    // a final reader sees one of the two complete profiles
    let snap = profile.snapshot();
    assert!(snap.ready);
    assert!(snap.token == "4111111111111111" || snap.token == "5500005555555559");
}

#[test]
fn profile_writes_from_wallet_thread_apply_to_live_card() {
    let mut card = PaymentCard::new();
    let handle = card.profile_handle();

    let wallet = thread::spawn(move || {
        handle.activate("Jane Doe", "4111111111111111", "1225");
    });
    wallet.join().unwrap();

    let fci = card.process_apdu(&select_apdu());
    assert_eq!(&fci[fci.len() - 2..], SUCCESS);

    // arc snapshot taken before deactivation stays consistent
    let snap: Arc<_> = card.profile_handle().snapshot();
    card.deactivate();
    assert_eq!(snap.token, "4111111111111111");
}
