// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Vehicles in alternating directions sharing a single-lane corridor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::CorridorConfig;
use crate::corridor::{Corridor, Direction};
use crate::scenario::jitter;
use crate::{worker, Interrupt, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficReport {
    pub crossed: usize,
    /// Most vehicles seen inside at once.
    pub peak_occupancy: usize,
    /// Entries that found opposite traffic inside. Must be zero.
    pub opposite_overlaps: usize,
}

/// Independent bookkeeping of who is inside, updated only between a
/// successful `enter` and the matching `exit`.
#[derive(Default)]
struct Observer {
    inside: [AtomicUsize; 2],
    peak: AtomicUsize,
    overlaps: AtomicUsize,
}

fn lane(direction: Direction) -> usize {
    match direction {
        Direction::Left => 0,
        Direction::Right => 1,
    }
}

impl Observer {
    fn entered(&self, direction: Direction) {
        let now = self.inside[lane(direction)].fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if self.inside[lane(direction.opposite())].load(Ordering::SeqCst) > 0 {
            tracing::error!(%direction, "opposite traffic inside the corridor");
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn leaving(&self, direction: Direction) {
        self.inside[lane(direction)].fetch_sub(1, Ordering::SeqCst);
    }
}

fn drive(
    corridor: &Corridor,
    observer: &Observer,
    direction: Direction,
    config: &CorridorConfig,
    interrupt: &Interrupt,
) -> Result<()> {
    tracing::info!(%direction, "arrived, wants to enter");
    let passage = corridor.pass_interruptible(direction, interrupt)?;
    observer.entered(direction);
    tracing::info!(%direction, "crossing");
    let crossed = interrupt.sleep(jitter(config.min_crossing, config.crossing_jitter));
    observer.leaving(direction);
    drop(passage);
    crossed?;
    tracing::info!(%direction, "left the corridor");
    Ok(())
}

/// Even-numbered vehicles travel left, odd-numbered ones right.
pub fn run(config: &CorridorConfig) -> Result<TrafficReport> {
    let corridor: Arc<Corridor> = Arc::new(Corridor::new());
    let observer = Arc::new(Observer::default());
    tracing::info!(vehicles = config.vehicles, "traffic starting");

    let vehicles = (0..config.vehicles)
        .map(|i| {
            let direction = if i % 2 == 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            let corridor = Arc::clone(&corridor);
            let observer = Arc::clone(&observer);
            let config = config.clone();
            worker::spawn(format!("car-{}", i + 1), move |interrupt| {
                drive(&corridor, &observer, direction, &config, interrupt)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut crossed = 0;
    for result in worker::join_all(vehicles)? {
        result?;
        crossed += 1;
    }
    tracing::info!(crossed, "every vehicle crossed");

    Ok(TrafficReport {
        crossed,
        peak_occupancy: observer.peak.load(Ordering::SeqCst),
        opposite_overlaps: observer.overlaps.load(Ordering::SeqCst),
    })
}
