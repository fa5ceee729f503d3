// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Spin lock with adaptive backoff: pause → yield → sleep.
// Used where the critical section is a short, bounded scan and callers
// should never be parked by the scheduler.

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};

/// Adaptive backoff.
///
/// - k < 4:  busy spin (do nothing)
/// - k < 16: CPU pause hint
/// - k < 32: thread yield
/// - k >= 32: sleep 1ms
#[inline]
fn adaptive_yield(k: &mut u32) {
    if *k < 4 {
        // busy spin
    } else if *k < 16 {
        std::hint::spin_loop();
    } else if *k < 32 {
        std::thread::yield_now();
    } else {
        std::thread::sleep(std::time::Duration::from_millis(1));
        return;
    }
    *k += 1;
}

/// A spin lock owning the data it protects.
///
/// The lock word is swapped to 1 on lock and stored back to 0 when the guard
/// drops, with adaptive yield between retries.
pub struct SpinLock<T> {
    lc: AtomicU32,
    data: UnsafeCell<T>,
}

// Safety: access to `data` is serialized by `lc`.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    pub const fn new(data: T) -> Self {
        Self {
            lc: AtomicU32::new(0),
            data: UnsafeCell::new(data),
        }
    }

    /// Acquire the lock (spinning with adaptive backoff).
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        let mut k = 0u32;
        while self.lc.swap(1, Ordering::Acquire) != 0 {
            adaptive_yield(&mut k);
        }
        SpinLockGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    /// Acquire the lock only if it is free right now.
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        if self.lc.swap(1, Ordering::Acquire) == 0 {
            Some(SpinLockGuard {
                lock: self,
                _not_send: PhantomData,
            })
        } else {
            None
        }
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// RAII guard: the lock is held for the guard's lifetime.
///
/// Not `Send`: the lock is released by whoever drops the guard. `Sync` only
/// when `T` is, since a shared guard hands out `&T`.
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
    _not_send: PhantomData<*const ()>,
}

// Safety: sharing the guard shares `&T` and nothing else.
unsafe impl<T: Sync> Sync for SpinLockGuard<'_, T> {}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: the guard proves exclusive ownership of the lock.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: as above.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.lc.store(0, Ordering::Release);
    }
}
