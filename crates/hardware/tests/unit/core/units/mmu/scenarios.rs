//! End-to-End Scenarios.
//!
//! Reference traces driven through the public surface, cycle by cycle.

use pretty_assertions::assert_eq;
use rvsim_tlb::common::{PermissionFault, TlbFault, Xwr};
use rvsim_tlb::core::units::cam::{Cam, CamInput};
use rvsim_tlb::core::units::mmu::pte::PageTableEntry;
use rvsim_tlb::{Clocked, TlbConfig, TlbRequest};

use crate::common::builder::{ConfigBuilder, user_pte};
use crate::common::harness::TestContext;

/// 36-bit VMA, 15-bit ASID: write one translation, find it, miss a neighbour.
#[test]
fn write_then_search_feed_face() {
    let config = ConfigBuilder::new().vma_bits(36).asid_bits(15).build();
    let mut ctx = TestContext::new(&config);

    let _ = ctx.write_l1(0xFEED_FACE, 0xFFFF, PageTableEntry(0xF0F0));

    let hit = ctx.search(0xFEED_FACE, 0xFFFF, Xwr::from_bits(0b000));
    assert!(hit.hit);
    // 0xF0F0 has the valid bit clear, so the hit carries a fault.
    assert_eq!(
        hit.fault(),
        Some(TlbFault::Permission(PermissionFault::NotValid))
    );

    let miss = ctx.search(0xFACE_FEED, 0xFFFF, Xwr::from_bits(0b000));
    assert!(!miss.hit);
    assert_eq!(miss.fault(), Some(TlbFault::Miss));
}

/// 4-bit key, 4-bit data, 4 entries.
#[test]
fn cam_key_five_data_four() {
    let mut cam = Cam::new(4, 4, 4).unwrap();
    cam.tick(&CamInput::write(0, 5, 4));
    let out = cam.step(&CamInput::search(5));
    assert!(out.single_match);
    assert_eq!(out.match_address, 0);
    assert_eq!(out.data_out, 4);
}

/// A page-table walker refills after a miss; the retried access hits.
#[test]
fn miss_refill_retry() {
    let mut ctx = TestContext::new(&TlbConfig::default());
    let vma = 0x0040_2000;
    let asid = 12;

    let first = ctx.search(vma, asid, Xwr::R);
    assert_eq!(first.fault(), Some(TlbFault::Miss));

    let pte = user_pte(Xwr::R, 0x8_0402);
    let _ = ctx.write_l1(vma, asid, pte);

    let retry = ctx.search(vma, asid, Xwr::R);
    assert!(retry.valid);
    assert_eq!(retry.pte_out.payload(), 0x8_0402);
}

/// Two address spaces hold pages in the same set. The tag carries no ASID, so
/// a foreign lookup still matches and is rejected by the ASID check.
#[test]
fn two_address_spaces_share_a_set() {
    let mut ctx = TestContext::default();
    let vma = 0x7000;
    let _ = ctx.write_l1_way(vma, 1, user_pte(Xwr::RW, 0x100), 0);
    let _ = ctx.write_l1(vma + 0x10, 2, user_pte(Xwr::RW, 0x200));

    let own = ctx.search(vma, 1, Xwr::RW);
    assert!(own.valid);
    assert_eq!(own.pte_out.payload(), 0x100);

    let foreign = ctx.search(vma, 2, Xwr::RW);
    assert!(foreign.hit && !foreign.valid);

    let second = ctx.search(vma + 0x10, 2, Xwr::RW);
    assert!(second.valid);
    assert_eq!(second.pte_out.payload(), 0x200);
}

/// A context switch without global pages: flush, then refill.
#[test]
fn flush_on_context_switch() {
    let mut ctx = TestContext::default();
    for page in 0..8u64 {
        let _ = ctx.write_l1(page << 12, 1, user_pte(Xwr::R, page));
    }
    ctx.tlb.flush();
    let refill = user_pte(Xwr::R, 0x55);
    let _ = ctx.step(TlbRequest::write_l1(0x3000, 2, refill));
    assert!(!ctx.search(0x0000, 1, Xwr::R).hit);
    assert_eq!(ctx.search(0x3000, 2, Xwr::R).pte_out, refill);
    assert!(ctx.tlb.stats().hit_rate() > 0.0);
}
