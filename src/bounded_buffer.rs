// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Fixed-capacity FIFO with blocking put/get.
// Two implementations of one contract: a hand-built monitor over a VecDeque,
// and a bounded crossbeam channel used to cross-validate it.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::monitor::{Monitor, WaitOptions};
use crate::{Interrupt, Result, SyncError};

/// Blocking bounded FIFO shared by producers and consumers.
///
/// `put` blocks while the buffer is full, `get` while it is empty. A wait that
/// ends with an error leaves the buffer untouched; the item passed to a
/// failed `put` is dropped.
pub trait BlockingBuffer<T>: Send + Sync {
    /// Append `item`, waiting for room as described by `opts`.
    fn put_with(&self, item: T, opts: WaitOptions<'_>) -> Result<()>;

    /// Remove the oldest item, waiting for one as described by `opts`.
    fn get_with(&self, opts: WaitOptions<'_>) -> Result<T>;

    /// Number of items currently buffered.
    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn put(&self, item: T) -> Result<()> {
        self.put_with(item, WaitOptions::forever())
    }

    fn get(&self) -> Result<T> {
        self.get_with(WaitOptions::forever())
    }

    fn put_interruptible(&self, item: T, interrupt: &Interrupt) -> Result<()> {
        self.put_with(item, WaitOptions::interruptible(interrupt))
    }

    fn get_interruptible(&self, interrupt: &Interrupt) -> Result<T> {
        self.get_with(WaitOptions::interruptible(interrupt))
    }
}

// ---------------------------------------------------------------------------
// Monitor implementation
// ---------------------------------------------------------------------------

struct Queue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> Queue<T> {
    fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

/// Bounded buffer built from a mutex, a condition variable and a `VecDeque`.
///
/// Every state change wakes all waiters; each re-checks its own condition.
pub struct MonitorBuffer<T> {
    monitor: Arc<Monitor<Queue<T>>>,
    capacity: usize,
}

impl<T: Send + 'static> MonitorBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SyncError::InvalidArgument("buffer capacity must be at least 1"));
        }
        Ok(Self {
            monitor: Arc::new(Monitor::new(Queue {
                items: VecDeque::with_capacity(capacity),
                capacity,
            })),
            capacity,
        })
    }
}

impl<T: Send + 'static> BlockingBuffer<T> for MonitorBuffer<T> {
    fn put_with(&self, item: T, opts: WaitOptions<'_>) -> Result<()> {
        let mut q = self.monitor.lock();
        if q.is_full() {
            tracing::debug!(len = q.items.len(), "buffer full, waiting");
        }
        self.monitor.wait_while(&mut q, opts, |q| q.is_full())?;
        q.items.push_back(item);
        debug_assert!(q.items.len() <= q.capacity);
        tracing::trace!(len = q.items.len(), "put");
        drop(q);
        self.monitor.notify_all();
        Ok(())
    }

    fn get_with(&self, opts: WaitOptions<'_>) -> Result<T> {
        let mut q = self.monitor.lock();
        if q.items.is_empty() {
            tracing::debug!("buffer empty, waiting");
        }
        self.monitor.wait_while(&mut q, opts, |q| q.items.is_empty())?;
        let item = q
            .items
            .pop_front()
            .ok_or(SyncError::InvariantViolation("woken on an empty buffer"))?;
        tracing::trace!(len = q.items.len(), "get");
        drop(q);
        self.monitor.notify_all();
        Ok(item)
    }

    fn len(&self) -> usize {
        self.monitor.lock().items.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

// ---------------------------------------------------------------------------
// Channel implementation
// ---------------------------------------------------------------------------

/// Bounded buffer backed by a `crossbeam_channel::bounded` channel.
///
/// Holds both ends, so the channel never disconnects while the buffer lives.
pub struct ChannelBuffer<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    capacity: usize,
}

impl<T: Send> ChannelBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SyncError::InvalidArgument("buffer capacity must be at least 1"));
        }
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Ok(Self { tx, rx, capacity })
    }
}

const DISCONNECTED: SyncError = SyncError::InvariantViolation("buffer channel disconnected");

impl<T: Send> BlockingBuffer<T> for ChannelBuffer<T> {
    fn put_with(&self, item: T, opts: WaitOptions<'_>) -> Result<()> {
        // Room available wins over a raised interrupt, like the monitor.
        let item = match self.tx.try_send(item) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Disconnected(_)) => return Err(DISCONNECTED),
            Err(TrySendError::Full(item)) => item,
        };
        tracing::debug!(len = self.rx.len(), "buffer full, waiting");
        let closed = closed_or_never(&opts);
        let timer = timer_or_never(&opts);
        crossbeam_channel::select! {
            send(self.tx, item) -> res => res.map_err(|_| DISCONNECTED),
            recv(closed) -> _ => Err(SyncError::Interrupted),
            recv(timer) -> _ => Err(SyncError::TimedOut),
        }
    }

    fn get_with(&self, opts: WaitOptions<'_>) -> Result<T> {
        if let Ok(item) = self.rx.try_recv() {
            return Ok(item);
        }
        tracing::debug!("buffer empty, waiting");
        let closed = closed_or_never(&opts);
        let timer = timer_or_never(&opts);
        crossbeam_channel::select! {
            recv(self.rx) -> res => res.map_err(|_| DISCONNECTED),
            recv(closed) -> _ => Err(SyncError::Interrupted),
            recv(timer) -> _ => Err(SyncError::TimedOut),
        }
    }

    fn len(&self) -> usize {
        self.rx.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

fn closed_or_never(opts: &WaitOptions<'_>) -> Receiver<()> {
    match opts.interrupt() {
        Some(interrupt) => interrupt.closed().clone(),
        None => crossbeam_channel::never(),
    }
}

fn timer_or_never(opts: &WaitOptions<'_>) -> Receiver<std::time::Instant> {
    match opts.deadline() {
        Some(deadline) => crossbeam_channel::at(deadline),
        None => crossbeam_channel::never(),
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which [`BlockingBuffer`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferKind {
    #[default]
    Monitor,
    Channel,
}

impl BufferKind {
    /// Build a shareable buffer of this kind.
    pub fn build<T: Send + 'static>(self, capacity: usize) -> Result<Arc<dyn BlockingBuffer<T>>> {
        Ok(match self {
            BufferKind::Monitor => Arc::new(MonitorBuffer::new(capacity)?),
            BufferKind::Channel => Arc::new(ChannelBuffer::new(capacity)?),
        })
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BufferKind::Monitor => "monitor",
            BufferKind::Channel => "channel",
        })
    }
}

impl FromStr for BufferKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "monitor" => Ok(BufferKind::Monitor),
            "channel" => Ok(BufferKind::Channel),
            other => Err(format!("unknown buffer kind `{other}`")),
        }
    }
}
