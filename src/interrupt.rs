// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Cancellation token for blocked workers.
// A raised interrupt sets a sticky flag, disconnects a closed-signal channel
// (for channel-based waits) and runs every registered waker (for monitor waits).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::{Result, SyncError};

pub(crate) type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Wakers {
    next_id: u64,
    entries: Vec<(u64, Waker)>,
}

struct Inner {
    raised: AtomicBool,
    wakers: Mutex<Wakers>,
    closed_tx: Mutex<Option<Sender<()>>>,
    closed_rx: Receiver<()>,
}

/// A cancellation signal delivered from outside a worker.
///
/// Cloning yields a handle to the same signal. Once raised it stays raised:
/// every wait that observes it returns [`SyncError::Interrupted`], so a worker
/// that bails out of one primitive cannot block again on the next one.
#[derive(Clone)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

impl Interrupt {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                raised: AtomicBool::new(false),
                wakers: Mutex::new(Wakers::default()),
                closed_tx: Mutex::new(Some(tx)),
                closed_rx: rx,
            }),
        }
    }

    /// Raise the interrupt and wake every waiter parked on it.
    pub fn raise(&self) {
        if self.inner.raised.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::trace!("interrupt raised");
        // Dropping the only sender disconnects every `closed()` receiver.
        self.inner.closed_tx.lock().take();
        // Snapshot under the lock, run outside it: wakers take monitor locks.
        let wakers: Vec<Waker> = self
            .inner
            .wakers
            .lock()
            .entries
            .iter()
            .map(|(_, w)| Arc::clone(w))
            .collect();
        for wake in wakers {
            wake();
        }
    }

    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` if raised, for loops that poll between blocking calls.
    pub fn check(&self) -> Result<()> {
        if self.is_raised() {
            Err(SyncError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration`, cut short with `Err(Interrupted)` by a raise.
    pub fn sleep(&self, duration: Duration) -> Result<()> {
        match self.inner.closed_rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => Ok(()),
            // Nothing is ever sent; any other outcome means the sender is gone.
            _ => Err(SyncError::Interrupted),
        }
    }

    /// Receiver that becomes disconnected once the interrupt is raised.
    /// Meant for `crossbeam_channel::select!`.
    pub(crate) fn closed(&self) -> &Receiver<()> {
        &self.inner.closed_rx
    }

    /// Register a waker run on `raise`. The caller must re-check
    /// [`is_raised`](Self::is_raised) after registering and before blocking.
    pub(crate) fn register(&self, waker: Waker) -> Registration<'_> {
        let mut wakers = self.inner.wakers.lock();
        let id = wakers.next_id;
        wakers.next_id += 1;
        wakers.entries.push((id, waker));
        Registration {
            interrupt: self,
            id,
        }
    }

    fn unregister(&self, id: u64) {
        self.inner.wakers.lock().entries.retain(|(eid, _)| *eid != id);
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interrupt")
            .field("raised", &self.is_raised())
            .finish()
    }
}

/// RAII registration of a waker; unregisters on drop.
pub(crate) struct Registration<'a> {
    interrupt: &'a Interrupt,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.interrupt.unregister(self.id);
    }
}
