// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Two-party rendezvous: each side offers a value and leaves with the other's.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use crate::monitor::{Monitor, WaitOptions};
use crate::{Interrupt, Result, SyncError};

enum Slot<T> {
    /// Nobody is waiting.
    Empty,
    /// The first party deposited `value` and is parked.
    Offered { value: T, ticket: u64 },
    /// The second party left `value` for the first, who has not collected it yet.
    Answered { value: T, ticket: u64 },
}

struct Rendezvous<T> {
    slot: Slot<T>,
    next_ticket: u64,
}

/// A synchronization point where two threads swap values.
///
/// The first caller deposits its value and blocks; the second takes it, leaves
/// its own in exchange and returns immediately; the first then wakes up,
/// collects the reply and frees the slot for the next cycle.
///
/// Strictly pairwise. With three or more callers in flight, which two get
/// paired is unspecified; a caller arriving while a reply is still uncollected
/// waits for the slot to clear.
pub struct Exchanger<T> {
    monitor: Arc<Monitor<Rendezvous<T>>>,
}

impl<T: Send + 'static> Exchanger<T> {
    pub fn new() -> Self {
        Self {
            monitor: Arc::new(Monitor::new(Rendezvous {
                slot: Slot::Empty,
                next_ticket: 0,
            })),
        }
    }

    /// Offer `value` and wait for the partner's.
    pub fn exchange(&self, value: T) -> Result<T> {
        self.exchange_with(value, WaitOptions::forever())
    }

    /// Like [`exchange`](Self::exchange) but gives up once `interrupt` is raised.
    pub fn exchange_interruptible(&self, value: T, interrupt: &Interrupt) -> Result<T> {
        self.exchange_with(value, WaitOptions::interruptible(interrupt))
    }

    /// Like [`exchange`](Self::exchange) but gives up after `timeout`.
    pub fn exchange_timeout(&self, value: T, timeout: Duration) -> Result<T> {
        self.exchange_with(value, WaitOptions::forever().timeout(timeout))
    }

    /// Swap values with a partner.
    ///
    /// If the wait ends with an error the offered value is withdrawn and
    /// dropped, and the exchanger is as if this call never happened. A reply
    /// that arrived before the interrupt or deadline was noticed wins: the
    /// exchange completes normally.
    pub fn exchange_with(&self, value: T, opts: WaitOptions<'_>) -> Result<T> {
        let mut st = self.monitor.lock();
        self.monitor
            .wait_while(&mut st, opts, |st| matches!(st.slot, Slot::Answered { .. }))?;

        match mem::replace(&mut st.slot, Slot::Empty) {
            Slot::Offered {
                value: theirs,
                ticket,
            } => {
                st.slot = Slot::Answered { value, ticket };
                tracing::trace!(ticket, "exchange paired, second party");
                drop(st);
                self.monitor.notify_all();
                Ok(theirs)
            }
            Slot::Empty => {
                let ticket = st.next_ticket;
                st.next_ticket += 1;
                st.slot = Slot::Offered { value, ticket };
                tracing::trace!(ticket, "offer deposited, waiting for partner");

                let waited = self.monitor.wait_while(&mut st, opts, |st| {
                    !matches!(st.slot, Slot::Answered { ticket: t, .. } if t == ticket)
                });
                match (waited, mem::replace(&mut st.slot, Slot::Empty)) {
                    (Ok(()), Slot::Answered { value: theirs, .. }) => {
                        tracing::trace!(ticket, "exchange paired, first party");
                        drop(st);
                        // A third caller may be waiting for the slot to clear.
                        self.monitor.notify_all();
                        Ok(theirs)
                    }
                    (Err(err), Slot::Offered { ticket: t, .. }) if t == ticket => {
                        tracing::debug!(ticket, %err, "offer withdrawn");
                        Err(err)
                    }
                    (_, other) => {
                        st.slot = other;
                        Err(SyncError::InvariantViolation("exchange slot changed hands"))
                    }
                }
            }
            Slot::Answered { .. } => {
                Err(SyncError::InvariantViolation("woken while a reply was pending"))
            }
        }
    }

    /// Whether no party is waiting and no reply is pending.
    pub fn is_idle(&self) -> bool {
        matches!(self.monitor.lock().slot, Slot::Empty)
    }
}

impl<T: Send + 'static> Default for Exchanger<T> {
    fn default() -> Self {
        Self::new()
    }
}
