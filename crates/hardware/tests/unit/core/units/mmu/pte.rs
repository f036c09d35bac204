//! PTE Layout Tests.
//!
//! Verifies the fixed flag positions and the `{asid, pte}` stored word.

use proptest::prelude::*;
use rstest::rstest;
use rvsim_tlb::common::{ConfigError, Xwr};
use rvsim_tlb::core::units::mmu::pte::{EntryLayout, PageTableEntry, TranslationEntry};

#[test]
fn flag_positions_are_fixed() {
    let pte = PageTableEntry::from_bits(0b1111_0101);
    assert!(pte.valid());
    assert_eq!(pte.xwr(), Xwr::from_bits(0b010));
    assert!(pte.user());
    assert!(pte.global());
    assert!(pte.accessed());
    assert!(pte.dirty());
    assert_eq!(pte.payload(), 0);
}

#[test]
fn builders_touch_only_their_field() {
    let pte = PageTableEntry::default()
        .with_valid(true)
        .with_xwr(Xwr::RX)
        .with_user(true)
        .with_payload(0xABC);
    assert_eq!(pte.bits(), (0xABC << 8) | 0b1_1011);
    assert!(!pte.global() && !pte.accessed() && !pte.dirty());

    let cleared = pte.with_xwr(Xwr::NONE).with_user(false);
    assert_eq!(cleared.bits(), (0xABC << 8) | 1);
}

#[test]
fn display_lists_flags() {
    let pte = PageTableEntry::default().with_valid(true).with_xwr(Xwr::R).with_payload(0x10);
    assert_eq!(pte.to_string(), "0x10 [------rv]");
}

#[rstest]
#[case(0, 64, "asid_bits")]
#[case(33, 64, "asid_bits")]
#[case(15, 7, "pte_bits")]
#[case(15, 65, "pte_bits")]
fn layout_rejects_bad_widths(#[case] asid_bits: u32, #[case] pte_bits: u32, #[case] field: &str) {
    let err = EntryLayout::new(asid_bits, pte_bits).unwrap_err();
    let what = match err {
        ConfigError::Zero { what }
        | ConfigError::TooLarge { what, .. }
        | ConfigError::TooSmall { what, .. } => what,
        other => panic!("unexpected error {other}"),
    };
    assert_eq!(what, field);
}

#[test]
fn pack_places_asid_above_pte() {
    let layout = EntryLayout::new(15, 64).unwrap();
    assert_eq!(layout.word_bits(), 79);
    let word = layout.pack(TranslationEntry {
        pte: PageTableEntry(0xF0F0),
        asid: 0xFFFF,
    });
    // The ASID is truncated to 15 bits on the way in.
    assert_eq!(word, (0x7FFFu128 << 64) | 0xF0F0);
}

#[test]
fn narrow_pte_is_truncated() {
    let layout = EntryLayout::new(8, 16).unwrap();
    let word = layout.pack(TranslationEntry {
        pte: PageTableEntry(0x1_2345),
        asid: 0x1FF,
    });
    assert_eq!(word, (0xFF << 16) | 0x2345);
    assert_eq!(
        layout.unpack(word),
        TranslationEntry {
            pte: PageTableEntry(0x2345),
            asid: 0xFF
        }
    );
}

proptest! {
    /// Unpacking a packed word recovers the truncated fields.
    #[test]
    fn pack_unpack_truncates(asid_bits in 1u32..=32, pte_bits in 8u32..=64, pte in any::<u64>(), asid in any::<u32>()) {
        let layout = EntryLayout::new(asid_bits, pte_bits).unwrap();
        let entry = TranslationEntry { pte: PageTableEntry(pte), asid };
        let back = layout.unpack(layout.pack(entry));
        prop_assert_eq!(back.asid, layout.truncate_asid(asid));
        prop_assert_eq!(back.pte, layout.truncate_pte(PageTableEntry(pte)));
    }
}
