// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Pool of N numbered slots gated by N counting permits.
//
// Two independent exclusion domains:
//   - the permit count, a blocking semaphore;
//   - the slot bitmap, a spin lock held only for a bounded scan.
// They stay consistent by caller protocol, not by a shared lock: take a permit
// strictly before assigning a slot, free the slot strictly before returning
// the permit.

use crate::monitor::WaitOptions;
use crate::semaphore::Semaphore;
use crate::spin_lock::SpinLock;
use crate::{Interrupt, Result, SyncError};

/// A fixed set of slots, each handed to at most one holder at a time.
///
/// Between the two steps of the protocol the number of occupied slots may lag
/// `capacity - available_permits` by the callers currently in that window;
/// outside it the two agree.
pub struct ResourcePool {
    permits: Semaphore,
    slots: SpinLock<Vec<bool>>,
}

impl ResourcePool {
    /// A pool of `size` free slots and `size` permits.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SyncError::InvalidArgument("pool needs at least one slot"));
        }
        Ok(Self {
            permits: Semaphore::new(size),
            slots: SpinLock::new(vec![false; size]),
        })
    }

    pub fn capacity(&self) -> usize {
        self.permits.limit()
    }

    /// Wait for one of the pool's permits.
    pub fn acquire_permit(&self) -> Result<()> {
        tracing::trace!("waiting for permit");
        self.permits.acquire()?;
        tracing::trace!("permit granted");
        Ok(())
    }

    /// Like [`acquire_permit`](Self::acquire_permit) but gives up once
    /// `interrupt` is raised, holding nothing.
    pub fn acquire_permit_interruptible(&self, interrupt: &Interrupt) -> Result<()> {
        self.permits.acquire_interruptible(interrupt)
    }

    /// Return a permit, waking one blocked acquirer.
    pub fn release_permit(&self) -> Result<()> {
        self.permits.release()?;
        tracing::trace!(available = self.permits.available_permits(), "permit released");
        Ok(())
    }

    /// Claim the lowest free slot, or `None` if every slot is taken.
    ///
    /// Never blocks. After a successful permit acquisition `None` means the
    /// protocol was broken somewhere.
    pub fn assign_slot(&self) -> Option<usize> {
        let mut slots = self.slots.lock();
        let index = slots.iter().position(|taken| !taken)?;
        slots[index] = true;
        Some(index)
    }

    /// Mark `index` free again.
    pub fn release_slot(&self, index: usize) -> Result<()> {
        let mut slots = self.slots.lock();
        let size = slots.len();
        match slots.get_mut(index) {
            None => Err(SyncError::InvalidSlot { index, size }),
            Some(taken) if !*taken => {
                Err(SyncError::InvariantViolation("released a slot that was not taken"))
            }
            Some(taken) => {
                *taken = false;
                Ok(())
            }
        }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots.lock().iter().filter(|taken| **taken).count()
    }

    /// Take a permit, then a slot, and hand both back as a [`Lease`].
    pub fn check_out(&self) -> Result<Lease<'_>> {
        self.check_out_with(WaitOptions::forever())
    }

    /// Like [`check_out`](Self::check_out) but gives up once `interrupt` is
    /// raised while waiting for a permit.
    pub fn check_out_interruptible(&self, interrupt: &Interrupt) -> Result<Lease<'_>> {
        self.check_out_with(WaitOptions::interruptible(interrupt))
    }

    pub fn check_out_with(&self, opts: WaitOptions<'_>) -> Result<Lease<'_>> {
        self.permits.acquire_with(opts)?;
        match self.assign_slot() {
            Some(slot) => Ok(Lease { pool: self, slot }),
            None => {
                tracing::error!(
                    available = self.available_permits(),
                    "permit granted but no free slot"
                );
                self.release_permit()?;
                Err(SyncError::NoFreeSlot)
            }
        }
    }
}

/// A held permit plus the slot assigned under it.
///
/// Dropping the lease frees the slot and then returns the permit, on every
/// exit path including unwinding.
#[derive(Debug)]
pub struct Lease<'a> {
    pool: &'a ResourcePool,
    slot: usize,
}

impl Lease<'_> {
    /// Zero-based index of the assigned slot.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.pool.release_slot(self.slot) {
            tracing::error!(slot = self.slot, %err, "failed to release slot");
        }
        if let Err(err) = self.pool.release_permit() {
            tracing::error!(%err, "failed to release permit");
        }
    }
}

impl std::fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePool")
            .field("capacity", &self.capacity())
            .field("available_permits", &self.available_permits())
            .field("occupied_slots", &self.occupied_slots())
            .finish()
    }
}
