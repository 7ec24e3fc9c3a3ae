//! Persistence round trips: named inventory export/restore and whole-facility
//! binary snapshots.

use pyreflow_core::agent::Agent;
use pyreflow_core::facility::RestoreError;
use pyreflow_core::snapshot::{
    FEED_INV_NAME, LEFTOVER_INV_NAME, deserialize_facility, serialize_facility,
};
use pyreflow_core::test_utils::*;
use pyreflow_core::trade::SimContext;

const TOL: f64 = 1e-9;

fn worked_facility() -> pyreflow_core::facility::Facility {
    let mut fac = activated(vec![("metal", stream(20.0, &[(u235(), 0.5)]))]);
    push_feed(&mut fac, material([(u235(), 80.0), (cs137(), 20.0)]));
    fac.tick(&SimContext::new(0)).unwrap();
    fac
}

// ---------------------------------------------------------------------------
// Inventory export / restore
// ---------------------------------------------------------------------------

#[test]
fn snapshot_leaves_facility_unchanged() {
    let mut fac = worked_facility();
    let feed_before = fac.feed_buf().quantity();
    let metal_before = fac.stream_buf("metal").unwrap().quantity();
    let leftover_before = fac.leftover_buf().quantity();

    let inv = fac.snapshot_inventories();

    assert!((fac.feed_buf().quantity() - feed_before).abs() < TOL);
    assert!((fac.stream_buf("metal").unwrap().quantity() - metal_before).abs() < TOL);
    assert!((fac.leftover_buf().quantity() - leftover_before).abs() < TOL);

    // All buffers are present under their inventory names.
    assert!(inv.contains_key(FEED_INV_NAME));
    assert!(inv.contains_key(LEFTOVER_INV_NAME));
    assert!(inv.contains_key("metal"));
}

#[test]
fn restore_refills_a_fresh_facility() {
    let mut fac = worked_facility();
    let inv = fac.snapshot_inventories();

    let mut fresh = activated(vec![("metal", stream(20.0, &[(u235(), 0.5)]))]);
    fresh.restore_inventories(inv).unwrap();

    assert!((fresh.feed_buf().quantity() - fac.feed_buf().quantity()).abs() < TOL);
    assert!(
        (fresh.stream_buf("metal").unwrap().quantity()
            - fac.stream_buf("metal").unwrap().quantity())
        .abs()
            < TOL
    );
    assert!((fresh.leftover_buf().quantity() - fac.leftover_buf().quantity()).abs() < TOL);
}

#[test]
fn restore_rejects_unknown_inventory_names() {
    let mut fac = worked_facility();
    let mut inv = fac.snapshot_inventories();
    inv.insert("ghost-stream".to_string(), vec![single_nuclide(1.0, u235())]);

    let mut fresh = activated(vec![("metal", stream(20.0, &[(u235(), 0.5)]))]);
    let err = fresh.restore_inventories(inv).unwrap_err();
    assert!(matches!(err, RestoreError::UnknownInventory(name) if name == "ghost-stream"));
}

/// A restored facility continues exactly where the original would.
#[test]
fn restored_facility_continues_processing() {
    let mut fac = worked_facility();
    let inv = fac.snapshot_inventories();

    let mut fresh = activated(vec![("metal", stream(20.0, &[(u235(), 0.5)]))]);
    fresh.restore_inventories(inv).unwrap();

    fac.tick(&SimContext::new(1)).unwrap();
    fresh.tick(&SimContext::new(1)).unwrap();

    assert!((fresh.feed_buf().quantity() - fac.feed_buf().quantity()).abs() < TOL);
    assert!((fresh.leftover_buf().quantity() - fac.leftover_buf().quantity()).abs() < TOL);
}

// ---------------------------------------------------------------------------
// Binary facility snapshots
// ---------------------------------------------------------------------------

#[test]
fn binary_round_trip_preserves_ledger() {
    let fac = worked_facility();

    let data = serialize_facility(&fac, 7).unwrap();
    let (restored, time) = deserialize_facility(&data).unwrap();

    assert_eq!(time, 7);
    assert_eq!(restored, fac);
}

#[test]
fn restored_binary_facility_keeps_processing() {
    let mut fac = worked_facility();
    let data = serialize_facility(&fac, 1).unwrap();
    let (mut restored, _) = deserialize_facility(&data).unwrap();

    fac.tick(&SimContext::new(1)).unwrap();
    restored.tick(&SimContext::new(1)).unwrap();
    assert_eq!(restored, fac);
}
