// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named worker threads that can be interrupted and joined.

use std::thread::{self, JoinHandle};

use crate::{Interrupt, Result, SyncError};

/// Handle to a spawned worker.
///
/// The worker body receives its own [`Interrupt`]; [`interrupt`](Self::interrupt)
/// raises it from the outside. Everything the body logs is recorded inside a
/// `worker` span carrying its name.
///
/// Dropping a worker that was never joined raises its interrupt and joins it,
/// so an early return in the spawning code cannot strand a thread parked in
/// an interruptible wait.
pub struct Worker<R> {
    name: String,
    interrupt: Interrupt,
    handle: Option<JoinHandle<R>>,
}

/// Start `body` on a new thread called `name`.
pub fn spawn<F, R>(name: impl Into<String>, body: F) -> Result<Worker<R>>
where
    F: FnOnce(&Interrupt) -> R + Send + 'static,
    R: Send + 'static,
{
    let name = name.into();
    let interrupt = Interrupt::new();
    let worker_interrupt = interrupt.clone();
    let span_name = name.clone();
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            let span = tracing::info_span!("worker", name = %span_name);
            let _entered = span.enter();
            body(&worker_interrupt)
        })
        .map_err(|e| SyncError::Spawn {
            name: name.clone(),
            reason: e.to_string(),
        })?;
    Ok(Worker {
        name,
        interrupt,
        handle: Some(handle),
    })
}

impl<R> Worker<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the worker to stop. Any interruptible wait it is parked in returns
    /// `Interrupted`.
    pub fn interrupt(&self) {
        tracing::debug!(worker = %self.name, "interrupting");
        self.interrupt.raise();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the worker to finish and take its result.
    pub fn join(mut self) -> Result<R> {
        let name = std::mem::take(&mut self.name);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| SyncError::WorkerPanicked(name)),
            None => Err(SyncError::InvariantViolation("worker joined twice")),
        }
    }
}

impl<R> Drop for Worker<R> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        tracing::debug!(worker = %self.name, "dropped unjoined, interrupting");
        self.interrupt.raise();
        if handle.join().is_err() {
            tracing::warn!(worker = %self.name, "dropped worker had panicked");
        }
    }
}

/// Join every worker, in order. All of them are joined even when one fails;
/// the first failure is returned.
pub fn join_all<R>(workers: Vec<Worker<R>>) -> Result<Vec<R>> {
    let mut results = Vec::with_capacity(workers.len());
    let mut first_err = None;
    for worker in workers {
        match worker.join() {
            Ok(r) => results.push(r),
            Err(err) => {
                first_err.get_or_insert(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(results),
    }
}
