// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Mutex + condition variable pair guarding one state value.
// Waiters block while a predicate holds, re-checking it after every wake,
// and can be released early by an `Interrupt` or a deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::interrupt::Waker;
use crate::{Interrupt, Result, SyncError};

/// How a monitor wait may end besides the predicate clearing.
#[derive(Clone, Copy, Default)]
pub struct WaitOptions<'a> {
    interrupt: Option<&'a Interrupt>,
    deadline: Option<Instant>,
}

impl<'a> WaitOptions<'a> {
    /// Block until the predicate clears, nothing else.
    pub fn forever() -> Self {
        Self::default()
    }

    /// Also give up with [`SyncError::Interrupted`] once `interrupt` is raised.
    pub fn interruptible(interrupt: &'a Interrupt) -> Self {
        Self {
            interrupt: Some(interrupt),
            deadline: None,
        }
    }

    /// Also give up with [`SyncError::TimedOut`] after `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub(crate) fn interrupt(&self) -> Option<&'a Interrupt> {
        self.interrupt
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// A monitor: one lock, one condition, one piece of state.
///
/// Generalizes the mutex/condition/quit-flag triple: the quit flag is now a
/// per-caller [`Interrupt`], and waiting is always a predicate loop so spurious
/// and stolen wakeups are harmless.
pub struct Monitor<S> {
    state: Mutex<S>,
    cond: Condvar,
}

impl<S> Monitor<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Mutex::new(state),
            cond: Condvar::new(),
        }
    }

    /// Enter the monitor.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock()
    }

    /// Wake one waiter.
    pub fn notify_one(&self) {
        self.cond.notify_one();
    }

    /// Wake all waiters.
    pub fn notify_all(&self) {
        self.cond.notify_all();
    }
}

impl<S: Send + 'static> Monitor<S> {
    /// Block while `blocked(state)` is true.
    ///
    /// The predicate is evaluated before every sleep and after every wake, so
    /// `Ok(())` always means it was false with the lock held. The predicate wins
    /// over a raised interrupt: if the condition already holds, the call
    /// succeeds. On `Err` the state has not been touched by this call and a
    /// possibly consumed notification is passed on to the next waiter.
    pub fn wait_while<F>(
        self: &Arc<Self>,
        guard: &mut MutexGuard<'_, S>,
        opts: WaitOptions<'_>,
        mut blocked: F,
    ) -> Result<()>
    where
        F: FnMut(&mut S) -> bool,
    {
        let mut registration = None;
        loop {
            if !blocked(&mut **guard) {
                return Ok(());
            }
            if let Some(interrupt) = opts.interrupt {
                if interrupt.is_raised() {
                    self.cond.notify_one();
                    return Err(SyncError::Interrupted);
                }
                if registration.is_none() {
                    registration = Some(interrupt.register(self.waker()));
                    // Re-check the flag now that a raise is guaranteed to reach us.
                    continue;
                }
            }
            match opts.deadline {
                None => self.cond.wait(guard),
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        self.cond.notify_one();
                        return Err(SyncError::TimedOut);
                    }
                    // Timeouts are re-checked at the top of the loop.
                    let _ = self.cond.wait_until(guard, deadline);
                }
            }
        }
    }

    fn waker(self: &Arc<Self>) -> Waker {
        let monitor = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(monitor) = monitor.upgrade() {
                // Barrier: a registered waiter holding the lock is either
                // about to re-check the flag or already inside cond.wait.
                drop(monitor.state.lock());
                monitor.cond.notify_all();
            }
        })
    }
}
