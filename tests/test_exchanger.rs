// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Two-party exchanger: pairing, repeated cycles, withdrawal.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use libcoord::config::LogisticsConfig;
use libcoord::scenario::logistics;
use libcoord::{logging, worker, Exchanger, SyncError};

#[test]
fn two_parties_swap_values() {
    let ex: Arc<Exchanger<String>> = Arc::new(Exchanger::new());
    let other = Arc::clone(&ex);
    let h = thread::spawn(move || other.exchange("from thread".to_owned()).expect("exchange"));

    let got = ex.exchange("from main".to_owned()).expect("exchange");
    assert_eq!(got, "from thread");
    assert_eq!(h.join().expect("partner panicked"), "from main");
    assert!(ex.is_idle());
}

#[test]
fn repeated_cycles_pair_up_in_order() {
    const CYCLES: u32 = 4;

    let ex: Arc<Exchanger<u32>> = Arc::new(Exchanger::new());
    let a = {
        let ex = Arc::clone(&ex);
        thread::spawn(move || {
            (0..CYCLES)
                .map(|i| ex.exchange(i * 2).expect("exchange"))
                .collect::<Vec<_>>()
        })
    };
    let b = {
        let ex = Arc::clone(&ex);
        thread::spawn(move || {
            (0..CYCLES)
                .map(|i| {
                    if i % 2 == 1 {
                        thread::sleep(Duration::from_millis(5));
                    }
                    ex.exchange(i * 2 + 1).expect("exchange")
                })
                .collect::<Vec<_>>()
        })
    };

    let got_a = a.join().expect("a panicked");
    let got_b = b.join().expect("b panicked");
    assert_eq!(got_a, vec![1, 3, 5, 7]);
    assert_eq!(got_b, vec![0, 2, 4, 6]);
    assert!(ex.is_idle());
}

#[test]
fn lone_party_times_out() {
    let ex: Exchanger<u8> = Exchanger::new();
    assert_eq!(
        ex.exchange_timeout(1, Duration::from_millis(30)),
        Err(SyncError::TimedOut)
    );
    assert!(ex.is_idle());
}

#[test]
fn interrupted_offer_is_withdrawn() {
    let ex: Arc<Exchanger<u32>> = Arc::new(Exchanger::new());
    let other = Arc::clone(&ex);
    let waiter = worker::spawn("waiter", move |interrupt| {
        other.exchange_interruptible(99, interrupt)
    })
    .expect("spawn");

    thread::sleep(Duration::from_millis(50));
    assert!(!ex.is_idle());
    waiter.interrupt();
    assert_eq!(waiter.join().expect("join"), Err(SyncError::Interrupted));
    assert!(ex.is_idle());

    // The withdrawn 99 must not reach the next pair.
    let other = Arc::clone(&ex);
    let h = thread::spawn(move || other.exchange(2).expect("exchange"));
    assert_eq!(ex.exchange(1).expect("exchange"), 2);
    assert_eq!(h.join().expect("partner panicked"), 1);
}

#[test]
fn logistics_driver_swaps_every_cycle() {
    logging::init_for_tests();

    let config = LogisticsConfig {
        cycles: Some(4),
        pause_between_cycles: Duration::from_millis(2),
    };
    let report = logistics::run(&config).expect("logistics");
    assert_eq!(report.cycles, 4);
    assert_eq!(report.unloader.cycles, 4);
    assert_eq!(report.loader.cycles, 4);
    assert!(report.is_consistent(), "{report:?}");
    assert!(report.unloader.received.iter().all(|p| *p == logistics::Product::Empty));
    assert!(report.unloader.sent.iter().all(|p| *p != logistics::Product::Empty));
    // Containers trade hands each cycle; an even count brings them home.
    assert_eq!(report.unloader.final_container.id(), 1);
    assert_eq!(report.loader.final_container.id(), 2);
    assert!(report.loader.final_container.is_empty());
}

#[test]
fn logistics_driver_picks_a_cycle_count() {
    logging::init_for_tests();

    let config = LogisticsConfig {
        cycles: None,
        pause_between_cycles: Duration::ZERO,
    };
    let report = logistics::run(&config).expect("logistics");
    assert!((3..=5).contains(&report.cycles));
    assert!(report.is_consistent());
}
