// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Error taxonomy shared by every coordination primitive.

use thiserror::Error;

/// Errors surfaced by the coordination primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The caller's [`Interrupt`](crate::Interrupt) was raised while it was
    /// waiting. Protected state is unchanged.
    #[error("interrupted while waiting")]
    Interrupted,

    /// A timed wait expired before the awaited condition held.
    #[error("timed out while waiting")]
    TimedOut,

    /// A slot index outside `[0, size)` was handed back to a pool.
    #[error("slot {index} is out of range for a pool of {size}")]
    InvalidSlot { index: usize, size: usize },

    /// A primitive detected a broken invariant, e.g. leaving an empty corridor.
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// A permit was granted but every slot was occupied. Permits and slots are
    /// kept in lockstep by caller protocol, so this is a protocol violation.
    #[error("permit granted but no free slot")]
    NoFreeSlot,

    /// A constructor received an argument it cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker `{name}`: {reason}")]
    Spawn { name: String, reason: String },

    /// A worker thread panicked before it could be joined.
    #[error("worker `{0}` panicked")]
    WorkerPanicked(String),
}

impl SyncError {
    /// Whether this error stems from an external interrupt rather than a bug.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, SyncError::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
