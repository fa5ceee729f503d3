// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Usage:
//   demo_logistics [--cycles N] [--pause-ms MS]
//
// An unloader fills its container and trades it for the loader's empty one,
// N times (3 to 5 at random when --cycles is omitted).

use std::time::Duration;

use clap::Parser;

use libcoord::config::LogisticsConfig;
use libcoord::logging;
use libcoord::scenario::logistics;

#[derive(Debug, Parser)]
#[command(about = "Two vehicles trading containers through an exchanger")]
struct Args {
    #[arg(long)]
    cycles: Option<usize>,
    #[arg(long, default_value_t = 3000)]
    pause_ms: u64,
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log)?;

    let config = LogisticsConfig {
        cycles: args.cycles,
        pause_between_cycles: Duration::from_millis(args.pause_ms),
    };
    let report = logistics::run(&config)?;
    println!("cycles: {}", report.cycles);
    for (cycle, (sent, received)) in report
        .unloader
        .sent
        .iter()
        .zip(&report.unloader.received)
        .enumerate()
    {
        println!("  #{}: unloader sent {sent}, got {received}", cycle + 1);
    }
    println!("unloader ends with {}", report.unloader.final_container);
    println!("loader ends with   {}", report.loader.final_container);
    println!("consistent: {}", report.is_consistent());
    Ok(())
}
