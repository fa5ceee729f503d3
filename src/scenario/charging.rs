// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Electric vehicles queueing for a limited set of numbered charging stations.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use rand::Rng;

use crate::config::ChargingConfig;
use crate::resource_pool::ResourcePool;
use crate::{worker, Interrupt, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargingReport {
    pub charged: usize,
    /// Most vehicles charging at once.
    pub peak_concurrent: usize,
    /// Times a station was handed to a vehicle while another still held it.
    pub slot_conflicts: usize,
    /// Station (zero-based) each vehicle used, in vehicle order.
    pub stations_used: Vec<usize>,
    pub available_permits: usize,
    pub occupied_slots: usize,
}

struct Tracker {
    holders: Vec<AtomicBool>,
    active: AtomicUsize,
    peak: AtomicUsize,
    conflicts: AtomicUsize,
}

impl Tracker {
    fn new(stations: usize) -> Self {
        Self {
            holders: (0..stations).map(|_| AtomicBool::new(false)).collect(),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            conflicts: AtomicUsize::new(0),
        }
    }

    fn plug_in(&self, station: usize) {
        if self.holders[station].swap(true, Ordering::SeqCst) {
            tracing::error!(station, "station handed out twice");
            self.conflicts.fetch_add(1, Ordering::SeqCst);
        }
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn unplug(&self, station: usize) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.holders[station].store(false, Ordering::SeqCst);
    }
}

fn charge(
    pool: &ResourcePool,
    tracker: &Tracker,
    config: &ChargingConfig,
    interrupt: &Interrupt,
) -> Result<usize> {
    tracing::info!("arrived, waiting for a permit");
    let lease = pool.check_out_interruptible(interrupt)?;
    let station = lease.slot();
    tracker.plug_in(station);
    tracing::info!(station = station + 1, "assigned");

    let units = rand::thread_rng().gen_range(1..=3u32);
    tracing::info!(units, "charging");
    let charged = interrupt.sleep(config.charge_unit * units);

    // Release order: station bookkeeping, then the lease (slot, then permit).
    tracker.unplug(station);
    drop(lease);
    charged?;
    tracing::info!(
        station = station + 1,
        available = pool.available_permits(),
        "charge finished"
    );
    Ok(station)
}

/// Vehicles arrive one by one, `arrival_stagger` apart.
pub fn run(config: &ChargingConfig) -> Result<ChargingReport> {
    let pool = Arc::new(ResourcePool::new(config.stations)?);
    let tracker = Arc::new(Tracker::new(config.stations));
    tracing::info!(
        stations = config.stations,
        vehicles = config.vehicles,
        "charging station open"
    );

    let mut vehicles = Vec::with_capacity(config.vehicles);
    for i in 0..config.vehicles {
        let pool = Arc::clone(&pool);
        let tracker = Arc::clone(&tracker);
        let config_for_vehicle = config.clone();
        vehicles.push(worker::spawn(format!("ev-{}", i + 1), move |interrupt| {
            charge(&pool, &tracker, &config_for_vehicle, interrupt)
        })?);
        thread::sleep(config.arrival_stagger);
    }

    let stations_used = worker::join_all(vehicles)?
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    Ok(ChargingReport {
        charged: stations_used.len(),
        peak_concurrent: tracker.peak.load(Ordering::SeqCst),
        slot_conflicts: tracker.conflicts.load(Ordering::SeqCst),
        stations_used,
        available_permits: pool.available_permits(),
        occupied_slots: pool.occupied_slots(),
    })
}
