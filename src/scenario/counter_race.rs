// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Counter race: N workers each increment one shared counter M times.

use std::sync::Arc;

use crate::config::CounterConfig;
use crate::counter::{SharedCounter, Strategy};
use crate::{worker, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterReport {
    pub strategy: Strategy,
    pub expected: u64,
    pub observed: u64,
}

impl CounterReport {
    /// Increments overwritten by a concurrent writer.
    pub fn lost(&self) -> u64 {
        self.expected.saturating_sub(self.observed)
    }

    pub fn is_exact(&self) -> bool {
        self.expected == self.observed
    }
}

pub fn run(config: &CounterConfig) -> Result<CounterReport> {
    let counter = Arc::new(SharedCounter::new());
    let strategy = config.strategy;
    let increments = config.increments_per_worker;

    let workers = (0..config.workers)
        .map(|i| {
            let counter = Arc::clone(&counter);
            worker::spawn(format!("counter-{i}"), move |_| {
                for _ in 0..increments {
                    counter.increment(strategy);
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;
    worker::join_all(workers)?;

    let report = CounterReport {
        strategy,
        expected: config.expected(),
        observed: counter.get(),
    };
    if report.is_exact() {
        tracing::info!(%strategy, value = report.observed, "counter matches");
    } else {
        tracing::warn!(
            %strategy,
            expected = report.expected,
            observed = report.observed,
            lost = report.lost(),
            "race detected"
        );
    }
    Ok(report)
}
