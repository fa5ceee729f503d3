// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Worker drivers exercising each primitive with many threads.
// Every driver spawns its workers, joins them and returns a report with the
// invariants it observed along the way.

pub mod charging;
pub mod counter_race;
pub mod logistics;
pub mod producer_consumer;
pub mod traffic;

pub use charging::ChargingReport;
pub use counter_race::CounterReport;
pub use logistics::{Container, LogisticsReport, Product, SideReport};
pub use producer_consumer::{Item, ProducerConsumerReport};
pub use traffic::TrafficReport;

use std::time::Duration;

use rand::Rng;

/// `base` plus a uniformly random extra in `[0, spread]`, millisecond grain.
pub(crate) fn jitter(base: Duration, spread: Duration) -> Duration {
    if spread.is_zero() {
        return base;
    }
    let extra = rand::thread_rng().gen_range(0..=spread.as_millis() as u64);
    base + Duration::from_millis(extra)
}
