// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Coordination primitives for threads sharing mutable state: a racy vs.
// guarded vs. atomic counter, a bounded blocking buffer, a single-direction
// corridor monitor, a slotted resource pool and a two-party exchanger.
// Every blocking wait can be cut short by an `Interrupt`.

mod error;
pub use error::{Result, SyncError};

mod interrupt;
pub use interrupt::Interrupt;

pub mod monitor;
pub use monitor::{Monitor, WaitOptions};

pub mod spin_lock;
pub use spin_lock::{SpinLock, SpinLockGuard};

pub mod counter;
pub use counter::{SharedCounter, Strategy};

pub mod bounded_buffer;
pub use bounded_buffer::{BlockingBuffer, BufferKind, ChannelBuffer, MonitorBuffer};

pub mod corridor;
pub use corridor::{Corridor, Direction, Passage};

pub mod semaphore;
pub use semaphore::Semaphore;

pub mod resource_pool;
pub use resource_pool::{Lease, ResourcePool};

pub mod exchanger;
pub use exchanger::Exchanger;

pub mod worker;
pub use worker::Worker;

pub mod config;
pub mod logging;
pub mod scenario;
