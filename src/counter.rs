// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Shared counter with three increment strategies over the same storage:
// unsynchronized read-then-write, lock-guarded read-then-write, and a single
// atomic fetch_add.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// How [`SharedCounter::increment`] updates the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Load, add, store with nothing in between. Loses updates.
    Unsynchronized,
    /// Load, add, store under the counter's own lock.
    Guarded,
    /// One atomic read-modify-write.
    Atomic,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Unsynchronized, Strategy::Guarded, Strategy::Atomic];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Unsynchronized => "unsynchronized",
            Strategy::Guarded => "guarded",
            Strategy::Atomic => "atomic",
        })
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsynchronized" | "unsafe" => Ok(Strategy::Unsynchronized),
            "guarded" | "locked" => Ok(Strategy::Guarded),
            "atomic" => Ok(Strategy::Atomic),
            other => Err(format!("unknown counter strategy `{other}`")),
        }
    }
}

/// A counter that only ever goes up.
///
/// The value lives in an `AtomicU64` so that even the unsynchronized path is
/// memory-safe: it performs a relaxed load and a separate relaxed store, which
/// is exactly the lost-update pattern of a plain `value += 1` without being
/// undefined behaviour.
#[derive(Default)]
pub struct SharedCounter {
    value: AtomicU64,
    lock: Mutex<()>,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, add one, write. Concurrent callers overwrite each other.
    ///
    /// The thread yields between the read and the write so the race shows up
    /// even when the workers share a single core.
    pub fn increment_unsafe(&self) {
        let v = self.value.load(Ordering::Relaxed);
        std::thread::yield_now();
        self.value.store(v + 1, Ordering::Relaxed);
    }

    /// Read, add one, write while holding the counter's lock.
    /// The guard releases the lock on every path, unwinding included.
    pub fn increment_guarded(&self) {
        let _guard = self.lock.lock();
        let v = self.value.load(Ordering::Relaxed);
        self.value.store(v + 1, Ordering::Relaxed);
    }

    /// Lock-free increment.
    pub fn increment_atomic(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment(&self, strategy: Strategy) {
        match strategy {
            Strategy::Unsynchronized => self.increment_unsafe(),
            Strategy::Guarded => self.increment_guarded(),
            Strategy::Atomic => self.increment_atomic(),
        }
    }

    /// Current value. Only meaningful as a total once all writers have been
    /// joined; joining provides the happens-before edge.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}
