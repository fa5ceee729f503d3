// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Counting semaphore on a monitor.

use std::sync::Arc;

use crate::monitor::{Monitor, WaitOptions};
use crate::{Interrupt, Result, SyncError};

/// A counting semaphore whose count never exceeds its initial value.
///
/// Each `release` wakes one waiter. `parking_lot` queues condition waiters in
/// arrival order, so under bounded contention every acquirer is eventually
/// served.
pub struct Semaphore {
    monitor: Arc<Monitor<usize>>,
    limit: usize,
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            monitor: Arc::new(Monitor::new(permits)),
            limit: permits,
        }
    }

    /// Take one permit, waiting while none are left.
    pub fn acquire(&self) -> Result<()> {
        self.acquire_with(WaitOptions::forever())
    }

    /// Like [`acquire`](Self::acquire) but gives up once `interrupt` is raised.
    pub fn acquire_interruptible(&self, interrupt: &Interrupt) -> Result<()> {
        self.acquire_with(WaitOptions::interruptible(interrupt))
    }

    pub fn acquire_with(&self, opts: WaitOptions<'_>) -> Result<()> {
        let mut permits = self.monitor.lock();
        self.monitor.wait_while(&mut permits, opts, |p| *p == 0)?;
        *permits -= 1;
        Ok(())
    }

    /// Take one permit if one is available right now.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.monitor.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Return one permit and wake one waiter.
    pub fn release(&self) -> Result<()> {
        let mut permits = self.monitor.lock();
        if *permits >= self.limit {
            return Err(SyncError::InvariantViolation(
                "semaphore released more often than acquired",
            ));
        }
        *permits += 1;
        drop(permits);
        self.monitor.notify_one();
        Ok(())
    }

    pub fn available_permits(&self) -> usize {
        *self.monitor.lock()
    }

    /// The initial, and maximum, number of permits.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_up() {
        let sem = Semaphore::new(2);
        assert!(sem.try_acquire());
        sem.acquire().expect("acquire");
        assert!(!sem.try_acquire());
        assert_eq!(sem.available_permits(), 0);
        sem.release().expect("release");
        sem.release().expect("release");
        assert_eq!(sem.available_permits(), 2);
    }

    #[test]
    fn over_release_is_rejected() {
        let sem = Semaphore::new(1);
        assert!(matches!(sem.release(), Err(SyncError::InvariantViolation(_))));
        assert_eq!(sem.available_permits(), 1);
    }
}
