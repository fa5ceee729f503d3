// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Interrupts and workers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use libcoord::{worker, BlockingBuffer, BufferKind, Interrupt, Monitor, SyncError, WaitOptions};

#[test]
fn raise_is_sticky_and_shared_by_clones() {
    let interrupt = Interrupt::new();
    let clone = interrupt.clone();
    assert!(!clone.is_raised());
    assert_eq!(clone.check(), Ok(()));

    interrupt.raise();
    interrupt.raise();
    assert!(clone.is_raised());
    assert_eq!(clone.check(), Err(SyncError::Interrupted));
}

#[test]
fn sleep_runs_to_completion_when_not_raised() {
    let interrupt = Interrupt::new();
    let start = Instant::now();
    interrupt.sleep(Duration::from_millis(20)).expect("sleep");
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn raised_interrupt_cuts_a_long_sleep() {
    let w = worker::spawn("sleeper", |interrupt| {
        let start = Instant::now();
        (interrupt.sleep(Duration::from_secs(30)), start.elapsed())
    })
    .expect("spawn");
    thread::sleep(Duration::from_millis(30));
    w.interrupt();
    let (result, elapsed) = w.join().expect("join");
    assert_eq!(result, Err(SyncError::Interrupted));
    assert!(elapsed < Duration::from_secs(5));
}

#[test]
fn interrupt_before_wait_fails_fast_unless_condition_holds() {
    let monitor = Arc::new(Monitor::new(0u32));
    let interrupt = Interrupt::new();
    interrupt.raise();

    let mut guard = monitor.lock();
    assert_eq!(
        monitor.wait_while(&mut guard, WaitOptions::interruptible(&interrupt), |v| *v == 0),
        Err(SyncError::Interrupted)
    );
    *guard = 1;
    assert_eq!(
        monitor.wait_while(&mut guard, WaitOptions::interruptible(&interrupt), |v| *v == 0),
        Ok(())
    );
}

#[test]
fn only_the_interrupted_waiter_leaves() {
    let monitor = Arc::new(Monitor::new(false));
    let left = Arc::new(AtomicUsize::new(0));

    let spawn_waiter = |name: &str| {
        let monitor = Arc::clone(&monitor);
        let left = Arc::clone(&left);
        worker::spawn(name.to_owned(), move |interrupt| {
            let mut ready = monitor.lock();
            let result =
                monitor.wait_while(&mut ready, WaitOptions::interruptible(interrupt), |r| !*r);
            left.fetch_add(1, Ordering::SeqCst);
            result
        })
        .expect("spawn")
    };
    let a = spawn_waiter("a");
    let b = spawn_waiter("b");

    thread::sleep(Duration::from_millis(30));
    a.interrupt();
    assert_eq!(a.join().expect("join a"), Err(SyncError::Interrupted));
    thread::sleep(Duration::from_millis(20));
    assert_eq!(left.load(Ordering::SeqCst), 1);
    assert!(!b.is_finished());

    *monitor.lock() = true;
    monitor.notify_all();
    assert_eq!(b.join().expect("join b"), Ok(()));
}

#[test]
fn worker_reports_its_name_and_panics() {
    let ok = worker::spawn("named", |_| 5u32).expect("spawn");
    assert_eq!(ok.name(), "named");
    assert_eq!(ok.join(), Ok(5));

    let bad = worker::spawn("crasher", |_| -> u32 { panic!("boom") }).expect("spawn");
    assert!(matches!(bad.join(), Err(SyncError::WorkerPanicked(_))));
}

#[test]
fn join_all_keeps_spawn_order() {
    let workers = (0..6)
        .map(|i| worker::spawn(format!("w{i}"), move |_| i * 10))
        .collect::<Result<Vec<_>, _>>()
        .expect("spawn");
    assert_eq!(
        worker::join_all(workers).expect("join"),
        vec![0, 10, 20, 30, 40, 50]
    );
}

fn drive_then_fail(
    buffer: &Arc<dyn BlockingBuffer<u32>>,
    parked: &Arc<AtomicUsize>,
) -> Result<(), SyncError> {
    let _consumers = (0..2)
        .map(|i| {
            let buffer = Arc::clone(buffer);
            let parked = Arc::clone(parked);
            worker::spawn(format!("consumer-{i}"), move |interrupt| {
                parked.fetch_add(1, Ordering::SeqCst);
                let res = buffer.get_interruptible(interrupt);
                parked.fetch_sub(1, Ordering::SeqCst);
                res
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    while parked.load(Ordering::SeqCst) < 2 {
        thread::yield_now();
    }
    // A producer failing before the consumers were told to stop.
    Err(SyncError::InvariantViolation("producer failed"))
}

#[test]
fn early_return_releases_parked_workers() {
    let buffer: Arc<dyn BlockingBuffer<u32>> = BufferKind::Monitor.build(2).expect("buffer");
    let parked = Arc::new(AtomicUsize::new(0));

    let result = drive_then_fail(&buffer, &parked);
    assert!(matches!(result, Err(SyncError::InvariantViolation(_))));
    // Both consumers were interrupted and joined on the way out.
    assert_eq!(parked.load(Ordering::SeqCst), 0);
    assert!(buffer.is_empty());
}
