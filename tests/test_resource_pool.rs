// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Slotted resource pool: permit bound, distinct slots, release on every path.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use libcoord::config::ChargingConfig;
use libcoord::scenario::charging;
use libcoord::{logging, worker, ResourcePool, SyncError};

#[test]
fn empty_pool_is_rejected() {
    assert!(matches!(
        ResourcePool::new(0),
        Err(SyncError::InvalidArgument(_))
    ));
}

#[test]
fn manual_protocol_assigns_lowest_free_slot() {
    let pool = ResourcePool::new(3).expect("pool");
    for expected in 0..3 {
        pool.acquire_permit().expect("permit");
        assert_eq!(pool.assign_slot(), Some(expected));
    }
    assert_eq!(pool.available_permits(), 0);
    assert_eq!(pool.occupied_slots(), 3);
    assert_eq!(pool.assign_slot(), None);

    pool.release_slot(1).expect("release slot");
    pool.release_permit().expect("release permit");
    pool.acquire_permit().expect("permit");
    assert_eq!(pool.assign_slot(), Some(1));
}

#[test]
fn bad_releases_are_reported() {
    let pool = ResourcePool::new(2).expect("pool");
    assert_eq!(
        pool.release_slot(2),
        Err(SyncError::InvalidSlot { index: 2, size: 2 })
    );
    assert!(matches!(
        pool.release_slot(0),
        Err(SyncError::InvariantViolation(_))
    ));
    assert!(matches!(
        pool.release_permit(),
        Err(SyncError::InvariantViolation(_))
    ));
    assert_eq!(pool.available_permits(), 2);
    assert_eq!(pool.occupied_slots(), 0);
}

#[test]
fn at_most_capacity_holders_and_no_shared_slot() {
    const SIZE: usize = 5;
    const WORKERS: usize = 10;
    const ROUNDS: usize = 20;

    let pool = Arc::new(ResourcePool::new(SIZE).expect("pool"));
    let holders: Arc<Vec<AtomicBool>> = Arc::new((0..SIZE).map(|_| AtomicBool::new(false)).collect());
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let conflicts = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let holders = Arc::clone(&holders);
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            let conflicts = Arc::clone(&conflicts);
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let lease = pool.check_out().expect("check out");
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    if holders[lease.slot()].swap(true, Ordering::SeqCst) {
                        conflicts.fetch_add(1, Ordering::SeqCst);
                    }
                    thread::sleep(Duration::from_millis(1));
                    holders[lease.slot()].store(false, Ordering::SeqCst);
                    active.fetch_sub(1, Ordering::SeqCst);
                    drop(lease);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("worker panicked");
    }

    assert!(peak.load(Ordering::SeqCst) <= SIZE);
    assert_eq!(conflicts.load(Ordering::SeqCst), 0);
    assert_eq!(pool.available_permits(), SIZE);
    assert_eq!(pool.occupied_slots(), 0);
}

#[test]
fn waiting_for_a_permit_is_interrupted_holding_nothing() {
    let pool = Arc::new(ResourcePool::new(1).expect("pool"));
    let lease = pool.check_out().expect("check out");

    let p = Arc::clone(&pool);
    let waiter = worker::spawn("waiter", move |interrupt| {
        p.check_out_interruptible(interrupt).map(|lease| lease.slot())
    })
    .expect("spawn");

    thread::sleep(Duration::from_millis(50));
    waiter.interrupt();
    assert_eq!(waiter.join().expect("join"), Err(SyncError::Interrupted));
    assert_eq!(pool.available_permits(), 0);
    assert_eq!(pool.occupied_slots(), 1);

    drop(lease);
    assert_eq!(pool.available_permits(), 1);
    assert_eq!(pool.occupied_slots(), 0);
}

#[test]
fn holders_interrupted_mid_charge_return_slot_and_permit() {
    const SIZE: usize = 5;

    let pool = Arc::new(ResourcePool::new(SIZE).expect("pool"));
    let holding = Arc::new(AtomicUsize::new(0));
    let holders: Vec<_> = (0..SIZE)
        .map(|i| {
            let pool = Arc::clone(&pool);
            let holding = Arc::clone(&holding);
            worker::spawn(format!("ev-{i}"), move |interrupt| -> Result<usize, SyncError> {
                let lease = pool.check_out_interruptible(interrupt)?;
                holding.fetch_add(1, Ordering::SeqCst);
                interrupt.sleep(Duration::from_secs(30))?;
                Ok(lease.slot())
            })
            .expect("spawn")
        })
        .collect();

    while holding.load(Ordering::SeqCst) < SIZE {
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(pool.available_permits(), 0);
    assert_eq!(pool.occupied_slots(), SIZE);

    for holder in &holders {
        holder.interrupt();
    }
    for holder in holders {
        assert_eq!(holder.join().expect("join"), Err(SyncError::Interrupted));
    }
    assert_eq!(pool.available_permits(), SIZE);
    assert_eq!(pool.occupied_slots(), 0);

    // Everything is reusable afterwards.
    let leases: Vec<_> = (0..SIZE).map(|_| pool.check_out().expect("check out")).collect();
    let mut slots: Vec<usize> = leases.iter().map(|l| l.slot()).collect();
    slots.sort_unstable();
    assert_eq!(slots, (0..SIZE).collect::<Vec<_>>());
}

#[test]
fn released_permit_wakes_a_waiter() {
    let pool = Arc::new(ResourcePool::new(1).expect("pool"));
    let lease = pool.check_out().expect("check out");
    assert_eq!(lease.slot(), 0);

    let p = Arc::clone(&pool);
    let waiter = thread::spawn(move || p.check_out().map(|lease| lease.slot()));
    thread::sleep(Duration::from_millis(30));
    assert!(!waiter.is_finished());

    drop(lease);
    assert_eq!(waiter.join().expect("waiter panicked"), Ok(0));
    assert_eq!(pool.available_permits(), 1);
}

#[test]
fn lease_is_returned_when_the_holder_panics() {
    let pool = Arc::new(ResourcePool::new(2).expect("pool"));
    let p = Arc::clone(&pool);
    let result = thread::spawn(move || {
        let _lease = p.check_out().expect("check out");
        panic!("holder crashed");
    })
    .join();
    assert!(result.is_err());
    assert_eq!(pool.available_permits(), 2);
    assert_eq!(pool.occupied_slots(), 0);
}

#[test]
fn charging_driver_respects_station_count() {
    logging::init_for_tests();

    let config = ChargingConfig {
        stations: 3,
        vehicles: 8,
        arrival_stagger: Duration::from_millis(1),
        charge_unit: Duration::from_millis(5),
    };
    let report = charging::run(&config).expect("charging");
    assert_eq!(report.charged, 8);
    assert!(report.peak_concurrent <= 3);
    assert_eq!(report.slot_conflicts, 0);
    assert!(report.stations_used.iter().all(|&s| s < 3));
    assert_eq!(report.available_permits, 3);
    assert_eq!(report.occupied_slots, 0);
}
