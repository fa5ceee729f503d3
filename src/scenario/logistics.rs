// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Container logistics: an unloader trades full containers for empty ones with
// a loader, one exchange per cycle.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::config::LogisticsConfig;
use crate::exchanger::Exchanger;
use crate::{worker, Interrupt, Result};

/// Container contents. `Empty` marks a container ready to be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Empty,
    Sawdust,
    Oranges,
    Padlocks,
    Water,
    Wood,
}

impl Product {
    /// Everything that can actually be shipped.
    pub const CARGO: [Product; 5] = [
        Product::Sawdust,
        Product::Oranges,
        Product::Padlocks,
        Product::Water,
        Product::Wood,
    ];
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Product::Empty => "nothing",
            Product::Sawdust => "sawdust",
            Product::Oranges => "oranges",
            Product::Padlocks => "padlocks",
            Product::Water => "water",
            Product::Wood => "wood",
        })
    }
}

/// A container with a fixed identity, mutated only by whoever holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: u32,
    content: Product,
}

impl Container {
    pub fn new(id: u32, content: Product) -> Self {
        Self { id, content }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn content(&self) -> Product {
        self.content
    }

    pub fn fill(&mut self, product: Product) {
        self.content = product;
    }

    pub fn empty(&mut self) {
        self.content = Product::Empty;
    }

    pub fn is_empty(&self) -> bool {
        self.content == Product::Empty
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container <{}> holding <{}>", self.id, self.content)
    }
}

/// What one side of the exchange did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideReport {
    pub cycles: usize,
    /// Content offered on each cycle.
    pub sent: Vec<Product>,
    /// Content received on each cycle, before any local processing.
    pub received: Vec<Product>,
    /// Cycles where the received container was not what this side expected.
    pub mismatches: usize,
    pub final_container: Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogisticsReport {
    pub cycles: usize,
    pub unloader: SideReport,
    pub loader: SideReport,
    /// No offer or reply was left behind in the exchanger.
    pub exchanger_idle: bool,
}

impl LogisticsReport {
    /// Each side received exactly what the other offered, cycle by cycle.
    pub fn is_consistent(&self) -> bool {
        self.unloader.sent == self.loader.received
            && self.loader.sent == self.unloader.received
            && self.unloader.mismatches == 0
            && self.loader.mismatches == 0
            && self.exchanger_idle
    }
}

/// Fills its container with random cargo and trades it for an empty one.
fn unload(
    exchanger: &Exchanger<Container>,
    mut container: Container,
    config: &LogisticsConfig,
    cycles: usize,
    interrupt: &Interrupt,
) -> Result<SideReport> {
    let mut rng = rand::thread_rng();
    let mut report = SideReport {
        cycles: 0,
        sent: Vec::with_capacity(cycles),
        received: Vec::with_capacity(cycles),
        mismatches: 0,
        final_container: container.clone(),
    };
    for cycle in 1..=cycles {
        let product = Product::CARGO[rng.gen_range(0..Product::CARGO.len())];
        container.fill(product);
        tracing::info!(cycle, %container, "ready to trade for an empty container");

        report.sent.push(container.content());
        container = exchanger.exchange_interruptible(container, interrupt)?;
        report.received.push(container.content());
        tracing::info!(cycle, %container, "traded");

        if container.is_empty() {
            tracing::info!(cycle, "empty container, ready for the next cycle");
        } else {
            tracing::warn!(cycle, %container, "expected an empty container");
            report.mismatches += 1;
        }
        report.cycles = cycle;
        if cycle < cycles {
            interrupt.sleep(config.pause_between_cycles)?;
        }
    }
    tracing::info!("work finished");
    report.final_container = container;
    Ok(report)
}

/// Trades an empty container for a full one and empties it.
fn load(
    exchanger: &Exchanger<Container>,
    mut container: Container,
    config: &LogisticsConfig,
    cycles: usize,
    interrupt: &Interrupt,
) -> Result<SideReport> {
    let mut report = SideReport {
        cycles: 0,
        sent: Vec::with_capacity(cycles),
        received: Vec::with_capacity(cycles),
        mismatches: 0,
        final_container: container.clone(),
    };
    for cycle in 1..=cycles {
        container.empty();
        tracing::info!(cycle, %container, "ready to trade for a full container");

        report.sent.push(container.content());
        container = exchanger.exchange_interruptible(container, interrupt)?;
        report.received.push(container.content());
        tracing::info!(cycle, %container, "traded");

        if container.is_empty() {
            tracing::warn!(cycle, %container, "expected a full container");
            report.mismatches += 1;
        } else {
            tracing::info!(cycle, product = %container.content(), "unloading");
            container.empty();
        }
        report.cycles = cycle;
        if cycle < cycles {
            interrupt.sleep(config.pause_between_cycles)?;
        }
    }
    tracing::info!("work finished");
    report.final_container = container;
    Ok(report)
}

pub fn run(config: &LogisticsConfig) -> Result<LogisticsReport> {
    let cycles = config
        .cycles
        .unwrap_or_else(|| rand::thread_rng().gen_range(3..=5));
    let exchanger: Arc<Exchanger<Container>> = Arc::new(Exchanger::new());
    let unloader_start = Container::new(1, Product::Empty);
    let loader_start = Container::new(2, Product::Empty);
    tracing::info!(cycles, unloader = %unloader_start, loader = %loader_start, "logistics starting");

    let unloader = {
        let exchanger = Arc::clone(&exchanger);
        let config = config.clone();
        worker::spawn("unloader", move |interrupt| {
            unload(&exchanger, unloader_start, &config, cycles, interrupt)
        })?
    };
    let loader = {
        let exchanger = Arc::clone(&exchanger);
        let config = config.clone();
        worker::spawn("loader", move |interrupt| {
            load(&exchanger, loader_start, &config, cycles, interrupt)
        })?
    };

    // On failure the other side is dropped, which interrupts and joins it.
    let unloader = unloader.join()??;
    let loader = loader.join()??;
    tracing::info!("every vehicle completed its cycles");

    Ok(LogisticsReport {
        cycles,
        unloader,
        loader,
        exchanger_idle: exchanger.is_idle(),
    })
}
