//! CAM Entry Tests.
//!
//! Verifies the four commands of a single entry: NONE holds storage and clears
//! the match register, READ registers the comparison one edge later, WRITE
//! stores key and data and clears the match, RESET clears everything.

use proptest::prelude::*;
use rstest::rstest;
use rvsim_tlb::Clocked;
use rvsim_tlb::core::units::cam::{CamCommand, CamEntry, CamEntryInput, CamEntryOutput};

fn entry() -> CamEntry {
    CamEntry::new(4, 4).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Command encoding
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0b00, CamCommand::None)]
#[case(0b01, CamCommand::Read)]
#[case(0b10, CamCommand::Write)]
#[case(0b11, CamCommand::Reset)]
fn command_decodes_every_pattern(#[case] bits: u8, #[case] command: CamCommand) {
    assert_eq!(CamCommand::from_bits(bits), command);
    assert_eq!(command.bits(), bits);
}

#[test]
fn rejects_zero_and_oversized_widths() {
    assert!(CamEntry::new(0, 4).is_err());
    assert!(CamEntry::new(4, 0).is_err());
    assert!(CamEntry::new(65, 4).is_err());
    assert!(CamEntry::new(4, 129).is_err());
    assert!(CamEntry::new(64, 128).is_ok());
}

// ══════════════════════════════════════════════════════════
// 2. Command semantics
// ══════════════════════════════════════════════════════════

#[test]
fn write_stores_and_clears_match() {
    let mut e = entry();
    e.tick(&CamEntryInput::write(5, 4));
    e.tick(&CamEntryInput::read(5));
    assert!(e.matched());

    e.tick(&CamEntryInput::write(5, 4));
    assert!(!e.matched());
    assert_eq!(e.key(), 5);
    assert_eq!(e.data(), 4);
}

#[test]
fn read_match_is_registered() {
    let mut e = entry();
    e.tick(&CamEntryInput::write(3, 9));
    // Before the read edge the match register is still clear.
    assert!(!e.matched());
    let out = e.step(&CamEntryInput::read(3));
    assert_eq!(
        out,
        CamEntryOutput {
            matched: true,
            data: 9
        }
    );
}

#[test]
fn read_with_other_key_does_not_match() {
    let mut e = entry();
    e.tick(&CamEntryInput::write(3, 9));
    assert!(!e.step(&CamEntryInput::read(4)).matched);
}

#[test]
fn none_holds_storage_and_clears_match() {
    let mut e = entry();
    e.tick(&CamEntryInput::write(6, 2));
    e.tick(&CamEntryInput::read(6));
    assert!(e.matched());

    e.tick(&CamEntryInput::idle());
    assert!(!e.matched());
    assert_eq!(e.key(), 6);
    assert_eq!(e.data(), 2);
    assert!(e.occupied());
}

#[test]
fn reset_clears_everything() {
    let mut e = entry();
    e.tick(&CamEntryInput::write(6, 2));
    e.tick(&CamEntryInput::read(6));
    e.tick(&CamEntryInput::clear());
    assert!(!e.matched());
    assert!(!e.occupied());
    assert_eq!(e.key(), 0);
    assert_eq!(e.data(), 0);
}

#[test]
fn cleared_entry_never_matches_key_zero() {
    let mut e = entry();
    assert!(!e.step(&CamEntryInput::read(0)).matched);
    e.tick(&CamEntryInput::write(0, 1));
    assert!(e.step(&CamEntryInput::read(0)).matched);
}

#[test]
fn trait_reset_matches_reset_command() {
    let mut a = entry();
    let mut b = entry();
    for e in [&mut a, &mut b] {
        e.tick(&CamEntryInput::write(7, 7));
    }
    a.reset();
    b.tick(&CamEntryInput::clear());
    assert_eq!(a.regs(), b.regs());
}

// ══════════════════════════════════════════════════════════
// 3. Round trip
// ══════════════════════════════════════════════════════════

proptest! {
    /// Writing `(k, d)` then reading `k` matches and presents `d`; reading
    /// any other key does not match.
    #[test]
    fn write_then_read_round_trip(key in any::<u64>(), data in any::<u128>(), other in any::<u64>()) {
        let mut e = CamEntry::new(64, 128).unwrap();
        e.tick(&CamEntryInput::write(key, data));

        let out = e.step(&CamEntryInput::read(key));
        prop_assert!(out.matched);
        prop_assert_eq!(out.data, data);

        let out = e.step(&CamEntryInput::read(other));
        prop_assert_eq!(out.matched, other == key);
    }
}
