// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Usage:
//   demo_corridor [--vehicles N] [--min-crossing-ms MS] [--jitter-ms MS]
//
// Vehicles alternate direction and cross a single-lane corridor. Same
// direction traffic shares the lane; opposite traffic waits for it to empty.

use std::time::Duration;

use clap::Parser;

use libcoord::config::CorridorConfig;
use libcoord::logging;
use libcoord::scenario::traffic;

#[derive(Debug, Parser)]
#[command(about = "Vehicles sharing a single-lane corridor")]
struct Args {
    #[arg(long, default_value_t = 10)]
    vehicles: usize,
    #[arg(long, default_value_t = 1000)]
    min_crossing_ms: u64,
    #[arg(long, default_value_t = 2000)]
    jitter_ms: u64,
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log)?;

    let config = CorridorConfig {
        vehicles: args.vehicles,
        min_crossing: Duration::from_millis(args.min_crossing_ms),
        crossing_jitter: Duration::from_millis(args.jitter_ms),
    };
    let report = traffic::run(&config)?;
    println!("crossed:           {}", report.crossed);
    println!("peak occupancy:    {}", report.peak_occupancy);
    println!("opposite overlaps: {}", report.opposite_overlaps);
    if report.opposite_overlaps > 0 {
        anyhow::bail!("opposite traffic met inside the corridor");
    }
    Ok(())
}
