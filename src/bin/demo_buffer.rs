// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Usage:
//   demo_buffer [--kind monitor|channel] [--capacity C] [--producers 5,8,7,3]
//               [--consumers K] [--produce-pause-ms P] [--consume-pause-ms Q]
//   demo_buffer --handoff N [--kind ...] [--capacity C] [--produce-pause-ms P]
//
// Producers put a fixed number of random values into one bounded buffer;
// consumers take until they are interrupted once the buffer has drained.
// With --handoff a single producer and consumer move N items and stop on
// their own.

use std::time::Duration;

use clap::Parser;

use libcoord::config::BufferConfig;
use libcoord::scenario::producer_consumer;
use libcoord::{logging, BufferKind};

#[derive(Debug, Parser)]
#[command(about = "Producers and consumers sharing a bounded buffer")]
struct Args {
    #[arg(long, default_value_t = BufferKind::Monitor)]
    kind: BufferKind,
    #[arg(long, default_value_t = 22)]
    capacity: usize,
    /// Items per producer, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [5, 8, 7, 3])]
    producers: Vec<usize>,
    #[arg(long, default_value_t = 2)]
    consumers: usize,
    #[arg(long, default_value_t = 3000)]
    produce_pause_ms: u64,
    #[arg(long, default_value_t = 1000)]
    consume_pause_ms: u64,
    /// Run the fixed single-producer hand-off with this many items instead.
    #[arg(long)]
    handoff: Option<usize>,
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log)?;

    if let Some(items) = args.handoff {
        let got = producer_consumer::run_fixed_handoff(
            args.kind,
            args.capacity,
            items,
            Duration::from_millis(args.produce_pause_ms),
        )?;
        println!("hand-off ({}): took {} items in order {:?}", args.kind, got.len(), got);
        return Ok(());
    }

    let config = BufferConfig {
        kind: args.kind,
        capacity: args.capacity,
        producers: args.producers,
        consumers: args.consumers,
        max_produce_pause: Duration::from_millis(args.produce_pause_ms),
        max_consume_pause: Duration::from_millis(args.consume_pause_ms),
    };
    let report = producer_consumer::run(&config)?;
    println!("buffer:   {} (capacity {})", config.kind, config.capacity);
    println!("produced: {}", report.produced);
    for (i, items) in report.consumed.iter().enumerate() {
        println!("consumer-{}: {} items", i + 1, items.len());
    }
    println!("leftover: {}", report.leftover);
    println!("fifo:     {}", if report.fifo_preserved() { "ok" } else { "VIOLATED" });
    Ok(())
}
