// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Scenario parameters. Defaults reproduce the classic demo set-ups; every
// timing knob is a `Duration` so tests can shrink it to zero.

use std::time::Duration;

use crate::bounded_buffer::BufferKind;
use crate::counter::Strategy;

/// Many workers hammering one counter.
#[derive(Debug, Clone)]
pub struct CounterConfig {
    pub workers: usize,
    pub increments_per_worker: usize,
    pub strategy: Strategy,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            workers: 100,
            increments_per_worker: 1000,
            strategy: Strategy::Guarded,
        }
    }
}

impl CounterConfig {
    /// Final value of an exact run, saturating at `u64::MAX`.
    pub fn expected(&self) -> u64 {
        (self.workers as u64).saturating_mul(self.increments_per_worker as u64)
    }
}

/// Finite producers, open-ended consumers stopped by interrupt.
#[derive(Debug, Clone)]
pub struct BufferConfig {
    pub kind: BufferKind,
    pub capacity: usize,
    /// Items each producer puts, one entry per producer.
    pub producers: Vec<usize>,
    pub consumers: usize,
    /// Upper bound of the random pause after each put.
    pub max_produce_pause: Duration,
    /// Upper bound of the random pause after each get.
    pub max_consume_pause: Duration,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            kind: BufferKind::Monitor,
            capacity: 22,
            producers: vec![5, 8, 7, 3],
            consumers: 2,
            max_produce_pause: Duration::from_millis(3000),
            max_consume_pause: Duration::from_millis(1000),
        }
    }
}

impl BufferConfig {
    pub fn total_items(&self) -> usize {
        self.producers.iter().sum()
    }
}

/// Vehicles alternating direction through a single lane.
#[derive(Debug, Clone)]
pub struct CorridorConfig {
    pub vehicles: usize,
    /// Minimum time a vehicle spends inside.
    pub min_crossing: Duration,
    /// Extra random crossing time on top of the minimum.
    pub crossing_jitter: Duration,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            vehicles: 10,
            min_crossing: Duration::from_millis(1000),
            crossing_jitter: Duration::from_millis(2000),
        }
    }
}

/// Electric vehicles competing for charging stations.
#[derive(Debug, Clone)]
pub struct ChargingConfig {
    pub stations: usize,
    pub vehicles: usize,
    /// Delay between consecutive arrivals.
    pub arrival_stagger: Duration,
    /// A charge takes 1 to 3 of these.
    pub charge_unit: Duration,
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            stations: 5,
            vehicles: 10,
            arrival_stagger: Duration::from_millis(200),
            charge_unit: Duration::from_secs(1),
        }
    }
}

/// A loader and an unloader trading containers.
#[derive(Debug, Clone)]
pub struct LogisticsConfig {
    /// Number of exchange cycles; `None` picks 3 to 5 at random.
    pub cycles: Option<usize>,
    /// Pause between cycles on each side.
    pub pause_between_cycles: Duration,
}

impl Default for LogisticsConfig {
    fn default() -> Self {
        Self {
            cycles: None,
            pause_between_cycles: Duration::from_secs(3),
        }
    }
}
