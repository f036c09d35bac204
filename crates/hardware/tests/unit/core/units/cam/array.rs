//! Fully Associative CAM Tests.
//!
//! Covers the basic write/read scenario, enable gating, multiple matches,
//! out-of-range writes and reset.

use pretty_assertions::assert_eq;
use rvsim_tlb::Clocked;
use rvsim_tlb::core::units::cam::{Cam, CamInput, CamOutput};

fn cam() -> Cam {
    crate::common::init_tracing();
    Cam::new(4, 4, 4).unwrap()
}

#[test]
fn write_key_five_then_read_it_back() {
    let mut cam = cam();
    let out = cam.step(&CamInput::write(0, 5, 4));
    assert_eq!(out, CamOutput::default());

    let out = cam.step(&CamInput::search(5));
    assert_eq!(
        out,
        CamOutput {
            single_match: true,
            multiple_match: false,
            match_address: 0,
            data_out: 4,
        }
    );
}

#[test]
fn write_targets_only_the_addressed_entry() {
    let mut cam = cam();
    cam.tick(&CamInput::write(2, 9, 1));
    assert!(cam.entry(2).unwrap().occupied());
    assert!((0..4).filter(|&i| i != 2).all(|i| !cam.entry(i).unwrap().occupied()));

    let out = cam.step(&CamInput::search(9));
    assert!(out.single_match);
    assert_eq!(out.match_address, 2);
}

#[test]
fn disabled_cam_drives_zero() {
    let mut cam = cam();
    cam.tick(&CamInput::write(1, 3, 3));
    assert!(cam.step(&CamInput::search(3)).single_match);
    assert_eq!(cam.step(&CamInput::idle()), CamOutput::default());
}

#[test]
fn duplicate_keys_raise_multiple_match_at_lowest_address() {
    let mut cam = cam();
    cam.tick(&CamInput::write(3, 7, 0xA));
    cam.tick(&CamInput::write(1, 7, 0xB));
    let out = cam.step(&CamInput::search(7));
    assert!(!out.single_match);
    assert!(out.multiple_match);
    assert_eq!(out.match_address, 1);
    assert_eq!(out.data_out, 0);
    assert_eq!(cam.match_vector(), 0b1010);
}

#[test]
fn out_of_range_write_selects_nothing() {
    let mut cam = cam();
    cam.tick(&CamInput::write(4, 2, 2));
    assert!((0..4).all(|i| !cam.entry(i).unwrap().occupied()));
    assert!(cam.entry(4).is_none());
}

#[test]
fn reset_clears_every_entry() {
    let mut cam = cam();
    for addr in 0..4 {
        cam.tick(&CamInput::write(addr, addr as u64, 1));
    }
    cam.reset();
    assert_eq!(cam.size(), 4);
    for key in 0..4 {
        assert!(!cam.step(&CamInput::search(key)).single_match);
    }
}
