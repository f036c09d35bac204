//! Secondary Table Tests.
//!
//! The direct-mapped table: registered lookup, tag compare, the active bit,
//! overwrite on index conflict, and flush.

use rvsim_tlb::Clocked;
use rvsim_tlb::common::{ConfigError, PermissionFault, VirtAddr, Xwr};
use rvsim_tlb::config::BackingConfig;
use rvsim_tlb::core::units::mmu::backing::{BackingCommand, BackingLookup, BackingTable};

use crate::common::builder::{PteBuilder, default_layout, user_request};

fn table() -> BackingTable {
    BackingTable::new(&BackingConfig { entries: 8 }, 12, default_layout()).unwrap()
}

fn search(t: &mut BackingTable, vma: u64, xwr: Xwr) -> BackingLookup {
    t.step(&BackingCommand::Search {
        vma: VirtAddr::new(vma),
        request: user_request(xwr, 1),
    })
}

#[test]
fn rejects_bad_geometry() {
    let layout = default_layout();
    assert!(matches!(
        BackingTable::new(&BackingConfig { entries: 0 }, 12, layout),
        Err(ConfigError::Zero { .. })
    ));
    assert!(matches!(
        BackingTable::new(&BackingConfig { entries: 12 }, 12, layout),
        Err(ConfigError::NotPowerOfTwo { .. })
    ));
    assert!(matches!(
        BackingTable::new(&BackingConfig { entries: 8 }, 3, layout),
        Err(ConfigError::TooSmall { .. })
    ));
}

#[test]
fn empty_table_misses_even_on_tag_zero() {
    let mut t = table();
    let lookup = search(&mut t, 0, Xwr::R);
    assert!(lookup.searched);
    assert!(!lookup.hit);
}

#[test]
fn written_entry_hits_after_one_tick() {
    let mut t = table();
    let entry = PteBuilder::new().xwr(Xwr::R).user().ppn(0x77).with_asid(1);
    assert!(!t.write(VirtAddr::new(0x2A5), entry));
    assert_eq!(t.peek(5), Some(entry));

    let lookup = search(&mut t, 0x2A5, Xwr::R);
    assert_eq!(
        lookup,
        BackingLookup {
            searched: true,
            hit: true,
            index: 5,
            entry: Some(entry),
            permission_valid: true,
            permission_fault: None,
        }
    );
}

#[test]
fn same_index_other_tag_misses() {
    let mut t = table();
    let entry = PteBuilder::new().xwr(Xwr::R).user().with_asid(1);
    let _ = t.write(VirtAddr::new(0x2A5), entry);
    let lookup = search(&mut t, 0x1A5, Xwr::R);
    assert_eq!(lookup.index, 5);
    assert!(!lookup.hit);
}

#[test]
fn index_conflict_overwrites() {
    let mut t = table();
    let first = PteBuilder::new().xwr(Xwr::R).user().ppn(1).with_asid(1);
    let second = PteBuilder::new().xwr(Xwr::R).user().ppn(2).with_asid(1);
    let _ = t.write(VirtAddr::new(0x013), first);
    assert!(t.write(VirtAddr::new(0x7F3), second));
    assert!(!search(&mut t, 0x013, Xwr::R).hit);
    assert_eq!(search(&mut t, 0x7F3, Xwr::R).entry, Some(second));
}

#[test]
fn hit_carries_permission_verdict() {
    let mut t = table();
    let entry = PteBuilder::new().xwr(Xwr::R).with_asid(1);
    let _ = t.write(VirtAddr::new(0x40), entry);
    let lookup = search(&mut t, 0x40, Xwr::R);
    assert!(lookup.hit);
    assert!(!lookup.permission_valid);
    assert_eq!(lookup.permission_fault, Some(PermissionFault::UserDenied));
}

#[test]
fn idle_clears_lookup() {
    let mut t = table();
    let _ = t.write(VirtAddr::new(0x40), PteBuilder::new().with_asid(1));
    let _ = search(&mut t, 0x40, Xwr::NONE);
    assert_eq!(t.step(&BackingCommand::Idle), BackingLookup::default());
}

#[test]
fn flush_deactivates_every_slot() {
    let mut t = table();
    for i in 0..8u64 {
        let _ = t.write(VirtAddr::new(i), PteBuilder::new().with_asid(1));
    }
    t.flush();
    assert_eq!(t.entries(), 8);
    assert!((0..8).all(|i| t.peek(i).is_none()));
    assert!(!search(&mut t, 3, Xwr::NONE).hit);
}
