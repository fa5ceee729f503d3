// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Usage:
//   demo_counter [--workers N] [--increments M] [--strategy unsynchronized|guarded|atomic]
//
// N workers each increment one shared counter M times. Without --strategy
// every strategy runs once, so the unsynchronized loss is visible next to the
// exact guarded and atomic totals.

use clap::Parser;

use libcoord::config::CounterConfig;
use libcoord::scenario::counter_race;
use libcoord::{logging, Strategy};

#[derive(Debug, Parser)]
#[command(about = "Race workers on a shared counter")]
struct Args {
    #[arg(long, default_value_t = 100)]
    workers: usize,
    #[arg(long, default_value_t = 1000)]
    increments: usize,
    #[arg(long)]
    strategy: Option<Strategy>,
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log)?;

    let strategies = match args.strategy {
        Some(strategy) => vec![strategy],
        None => Strategy::ALL.to_vec(),
    };
    for strategy in strategies {
        let config = CounterConfig {
            workers: args.workers,
            increments_per_worker: args.increments,
            strategy,
        };
        let report = counter_race::run(&config)?;
        println!(
            "{:<15} expected: {:>9}  observed: {:>9}  lost: {}",
            report.strategy,
            report.expected,
            report.observed,
            report.lost()
        );
    }
    Ok(())
}
