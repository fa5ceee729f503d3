// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Single-lane corridor monitor.
// Any number of callers travelling the same way may be inside at once;
// callers travelling the other way wait until the lane drains.

use std::fmt;
use std::sync::Arc;

use crate::monitor::{Monitor, WaitOptions};
use crate::{Interrupt, Result, SyncError};

/// Travel direction through a [`Corridor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

struct Lane<D> {
    count: usize,
    direction: Option<D>,
}

impl<D: PartialEq> Lane<D> {
    /// Occupied by traffic going the other way.
    fn blocks(&self, direction: &D) -> bool {
        self.count > 0 && self.direction.as_ref() != Some(direction)
    }
}

/// Exclusive-direction monitor.
///
/// States are `FREE` (`count == 0`, no direction) and
/// `OCCUPIED(direction, count)`. While occupied, callers with the recorded
/// direction are admitted immediately and callers with any other direction
/// wait until the count drops to zero.
///
/// Admission is not FIFO: as long as same-direction callers keep arriving
/// before the lane drains, a waiter going the other way is never admitted.
/// That starvation is part of the contract.
pub struct Corridor<D = Direction> {
    monitor: Arc<Monitor<Lane<D>>>,
}

impl<D> Corridor<D>
where
    D: Copy + Eq + fmt::Debug + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            monitor: Arc::new(Monitor::new(Lane {
                count: 0,
                direction: None,
            })),
        }
    }

    /// Enter travelling in `direction`, waiting while opposite traffic is inside.
    pub fn enter(&self, direction: D) -> Result<()> {
        self.enter_with(direction, WaitOptions::forever())
    }

    /// Like [`enter`](Self::enter) but gives up once `interrupt` is raised.
    pub fn enter_interruptible(&self, direction: D, interrupt: &Interrupt) -> Result<()> {
        self.enter_with(direction, WaitOptions::interruptible(interrupt))
    }

    pub fn enter_with(&self, direction: D, opts: WaitOptions<'_>) -> Result<()> {
        let mut lane = self.monitor.lock();
        if lane.blocks(&direction) {
            tracing::debug!(
                wants = ?direction,
                occupied_by = ?lane.direction,
                count = lane.count,
                "corridor busy, waiting"
            );
        }
        self.monitor
            .wait_while(&mut lane, opts, |lane| lane.blocks(&direction))?;
        lane.count += 1;
        lane.direction = Some(direction);
        tracing::debug!(?direction, count = lane.count, "entered corridor");
        Ok(())
    }

    /// Leave the corridor.
    ///
    /// The claimed direction is logged but not checked against the occupants.
    /// When the last occupant leaves, the direction resets and every waiter
    /// is woken.
    pub fn exit(&self, direction: D) -> Result<()> {
        let mut lane = self.monitor.lock();
        if lane.count == 0 {
            return Err(SyncError::InvariantViolation("exit from an empty corridor"));
        }
        lane.count -= 1;
        tracing::debug!(?direction, remaining = lane.count, "left corridor");
        if lane.count == 0 {
            lane.direction = None;
            drop(lane);
            tracing::debug!("corridor free");
            self.monitor.notify_all();
        }
        Ok(())
    }

    /// Enter and return a guard that exits on drop.
    pub fn pass(&self, direction: D) -> Result<Passage<'_, D>> {
        self.enter(direction)?;
        Ok(Passage {
            corridor: self,
            direction,
        })
    }

    /// Like [`pass`](Self::pass) but gives up once `interrupt` is raised.
    pub fn pass_interruptible(&self, direction: D, interrupt: &Interrupt) -> Result<Passage<'_, D>> {
        self.enter_interruptible(direction, interrupt)?;
        Ok(Passage {
            corridor: self,
            direction,
        })
    }

    /// `(count, direction)` as of this instant.
    pub fn occupancy(&self) -> (usize, Option<D>) {
        let lane = self.monitor.lock();
        (lane.count, lane.direction)
    }
}

impl<D> Default for Corridor<D>
where
    D: Copy + Eq + fmt::Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of being inside a [`Corridor`]; leaves on drop.
pub struct Passage<'a, D>
where
    D: Copy + Eq + fmt::Debug + Send + 'static,
{
    corridor: &'a Corridor<D>,
    direction: D,
}

impl<D> Passage<'_, D>
where
    D: Copy + Eq + fmt::Debug + Send + 'static,
{
    pub fn direction(&self) -> D {
        self.direction
    }
}

impl<D> Drop for Passage<'_, D>
where
    D: Copy + Eq + fmt::Debug + Send + 'static,
{
    fn drop(&mut self) {
        // Cannot fail: this passage accounts for one occupant.
        let _ = self.corridor.exit(self.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_resets_when_drained() {
        let c: Corridor = Corridor::new();
        c.enter(Direction::Left).expect("enter");
        c.enter(Direction::Left).expect("enter");
        assert_eq!(c.occupancy(), (2, Some(Direction::Left)));
        c.exit(Direction::Left).expect("exit");
        assert_eq!(c.occupancy(), (1, Some(Direction::Left)));
        c.exit(Direction::Left).expect("exit");
        assert_eq!(c.occupancy(), (0, None));
    }

    #[test]
    fn exit_on_empty_corridor_is_rejected() {
        let c: Corridor = Corridor::new();
        assert!(matches!(
            c.exit(Direction::Right),
            Err(SyncError::InvariantViolation(_))
        ));
    }

    #[test]
    fn exit_does_not_validate_direction() {
        let c: Corridor = Corridor::new();
        c.enter(Direction::Left).expect("enter");
        c.exit(Direction::Right).expect("exit");
        assert_eq!(c.occupancy(), (0, None));
    }

    #[test]
    fn passage_exits_on_drop() {
        let c: Corridor = Corridor::new();
        {
            let p = c.pass(Direction::Right).expect("pass");
            assert_eq!(p.direction(), Direction::Right);
            assert_eq!(c.occupancy().0, 1);
        }
        assert_eq!(c.occupancy(), (0, None));
    }
}
