// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Producers with a fixed amount of work feeding consumers that run until
// interrupted, through one bounded buffer.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::bounded_buffer::{BlockingBuffer, BufferKind};
use crate::config::BufferConfig;
use crate::scenario::jitter;
use crate::{worker, Interrupt, Result, SyncError};

/// What travels through the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub producer: usize,
    /// Position in its producer's output.
    pub seq: usize,
    pub value: u32,
}

#[derive(Debug, Clone)]
pub struct ProducerConsumerReport {
    pub produced: usize,
    /// Items in the order each consumer received them.
    pub consumed: Vec<Vec<Item>>,
    /// Items still buffered after the consumers stopped.
    pub leftover: usize,
}

impl ProducerConsumerReport {
    pub fn consumed_total(&self) -> usize {
        self.consumed.iter().map(Vec::len).sum()
    }

    /// Every consumer saw each producer's items in production order.
    pub fn fifo_preserved(&self) -> bool {
        self.consumed.iter().all(|items| {
            let mut last: Vec<Option<usize>> = Vec::new();
            items.iter().all(|item| {
                if last.len() <= item.producer {
                    last.resize(item.producer + 1, None);
                }
                let ok = last[item.producer].map_or(true, |prev| prev < item.seq);
                last[item.producer] = Some(item.seq);
                ok
            })
        })
    }
}

fn produce(
    buffer: &dyn BlockingBuffer<Item>,
    producer: usize,
    count: usize,
    max_pause: Duration,
    interrupt: &Interrupt,
) -> Result<usize> {
    let mut rng = rand::thread_rng();
    for seq in 0..count {
        let value = rng.gen_range(0..=100);
        buffer.put_interruptible(Item { producer, seq, value }, interrupt)?;
        tracing::info!(value, "produced");
        interrupt.sleep(jitter(Duration::ZERO, max_pause))?;
    }
    tracing::info!(count, "finished producing");
    Ok(count)
}

fn consume(
    buffer: &dyn BlockingBuffer<Item>,
    max_pause: Duration,
    interrupt: &Interrupt,
) -> Result<Vec<Item>> {
    let mut got = Vec::new();
    loop {
        match buffer.get_interruptible(interrupt) {
            Ok(item) => {
                tracing::info!(value = item.value, producer = item.producer, "consumed");
                got.push(item);
                if interrupt.sleep(jitter(Duration::ZERO, max_pause)).is_err() {
                    break;
                }
            }
            Err(SyncError::Interrupted) => break,
            Err(err) => return Err(err),
        }
    }
    tracing::info!(consumed = got.len(), "interrupted, stopping");
    Ok(got)
}

/// Run the producers to completion, let the consumers drain the buffer, then
/// interrupt the consumers and join them.
pub fn run(config: &BufferConfig) -> Result<ProducerConsumerReport> {
    if config.consumers == 0 {
        return Err(SyncError::InvalidArgument("need at least one consumer"));
    }
    let buffer: Arc<dyn BlockingBuffer<Item>> = config.kind.build(config.capacity)?;

    let consumers = (0..config.consumers)
        .map(|i| {
            let buffer = Arc::clone(&buffer);
            let pause = config.max_consume_pause;
            worker::spawn(format!("consumer-{}", i + 1), move |interrupt| {
                consume(buffer.as_ref(), pause, interrupt)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let producers = config
        .producers
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let buffer = Arc::clone(&buffer);
            let pause = config.max_produce_pause;
            worker::spawn(format!("producer-{}", i + 1), move |interrupt| {
                produce(buffer.as_ref(), i, count, pause, interrupt)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut produced = 0;
    for result in worker::join_all(producers)? {
        produced += result?;
    }
    tracing::info!(produced, "producers finished");

    // Dropping `consumers` on an early return interrupts and joins them.
    while !buffer.is_empty() && !consumers.iter().all(|c| c.is_finished()) {
        thread::sleep(Duration::from_millis(1));
    }
    tracing::info!("interrupting consumers");
    for consumer in &consumers {
        consumer.interrupt();
    }
    let consumed = worker::join_all(consumers)?
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    Ok(ProducerConsumerReport {
        produced,
        consumed,
        leftover: buffer.len(),
    })
}

/// One producer and one consumer agreeing on an item count up front. Neither
/// is interrupted unless the other fails. Returns the items in the order the
/// consumer took them.
pub fn run_fixed_handoff(
    kind: BufferKind,
    capacity: usize,
    items: usize,
    pause: Duration,
) -> Result<Vec<usize>> {
    let buffer: Arc<dyn BlockingBuffer<usize>> = kind.build(capacity)?;

    let tx = Arc::clone(&buffer);
    let producer = worker::spawn("producer", move |interrupt| -> Result<()> {
        for i in 0..items {
            tx.put_interruptible(i, interrupt)?;
            tracing::info!(item = i, len = tx.len(), "put");
            thread::sleep(pause);
        }
        tracing::info!("finished producing");
        Ok(())
    })?;

    let rx = Arc::clone(&buffer);
    let consumer = worker::spawn("consumer", move |interrupt| -> Result<Vec<usize>> {
        let mut got = Vec::with_capacity(items);
        for _ in 0..items {
            let item = rx.get_interruptible(interrupt)?;
            tracing::info!(item, len = rx.len(), "took");
            got.push(item);
            thread::sleep(pause);
        }
        tracing::info!("finished consuming");
        Ok(got)
    })?;

    producer.join()??;
    let got = consumer.join()??;
    tracing::info!(left = buffer.len(), "hand-off finished");
    Ok(got)
}
