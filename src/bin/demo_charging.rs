// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Usage:
//   demo_charging [--stations S] [--vehicles N] [--stagger-ms MS] [--unit-ms MS]
//
// Vehicles arrive one by one and queue for S numbered charging stations.
// Each takes a permit, then the lowest free station, charges for one to
// three units and hands both back.

use std::time::Duration;

use clap::Parser;

use libcoord::config::ChargingConfig;
use libcoord::logging;
use libcoord::scenario::charging;

#[derive(Debug, Parser)]
#[command(about = "Electric vehicles sharing numbered charging stations")]
struct Args {
    #[arg(long, default_value_t = 5)]
    stations: usize,
    #[arg(long, default_value_t = 10)]
    vehicles: usize,
    #[arg(long, default_value_t = 200)]
    stagger_ms: u64,
    #[arg(long, default_value_t = 1000)]
    unit_ms: u64,
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log)?;

    let config = ChargingConfig {
        stations: args.stations,
        vehicles: args.vehicles,
        arrival_stagger: Duration::from_millis(args.stagger_ms),
        charge_unit: Duration::from_millis(args.unit_ms),
    };
    let report = charging::run(&config)?;
    println!("charged:          {}", report.charged);
    println!("peak concurrent:  {} of {}", report.peak_concurrent, config.stations);
    println!("slot conflicts:   {}", report.slot_conflicts);
    let stations: Vec<usize> = report.stations_used.iter().map(|s| s + 1).collect();
    println!("stations used:    {stations:?}");
    println!(
        "after close:      {} permits free, {} stations occupied",
        report.available_permits, report.occupied_slots
    );
    Ok(())
}
