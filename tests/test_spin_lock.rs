// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Spin lock guarding plain (non-atomic) data.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use libcoord::SpinLock;

#[test]
fn basic_lock_unlock() {
    let lock = SpinLock::new(0u32);
    *lock.lock() += 1;
    *lock.lock() += 1;
    assert_eq!(lock.into_inner(), 2);
}

#[test]
fn try_lock_respects_holder() {
    let lock = SpinLock::new(Vec::<u8>::new());
    let guard = lock.lock();
    assert!(lock.try_lock().is_none());
    drop(guard);
    let mut guard = lock.try_lock().expect("free lock");
    guard.push(1);
    drop(guard);
    assert_eq!(*lock.lock(), vec![1]);
}

#[test]
fn critical_section_is_exclusive() {
    const THREADS: u64 = 4;
    const ITERATIONS: u64 = 10_000;

    let lock = Arc::new(SpinLock::new(0u64));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                for _ in 0..ITERATIONS {
                    let mut n = lock.lock();
                    let v = *n;
                    *n = v + 1;
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("locker panicked");
    }
    assert_eq!(*lock.lock(), THREADS * ITERATIONS);
}

#[test]
fn contended_holder_eventually_yields() {
    let lock = Arc::new(SpinLock::new(false));
    let guard = lock.lock();

    let l = Arc::clone(&lock);
    let h = thread::spawn(move || {
        *l.lock() = true;
    });
    thread::sleep(Duration::from_millis(20));
    assert!(!h.is_finished());
    drop(guard);
    h.join().expect("waiter panicked");
    assert!(*lock.lock());
}
