//! Shared generators for integration tests
//!
//! - Synthetic power series with a single load step and bounded noise
//! - Tray event streams with known round-trip durations
//! - A small deterministic RNG so failures reproduce

#![allow(dead_code)]

use sensorscope_core::{Event, EventSeries, Label, SampleSeries, Timestamp};

/// Ten-minute aggregation window, in milliseconds
pub const WINDOW_MS: u64 = 600_000;

/// Xorshift RNG, deterministic per seed
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / 16_777_216.0
    }

    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// `before` for `step_at` samples, then `after` for the rest
pub fn step_series(len: usize, step_at: usize, before: f64, after: f64) -> SampleSeries {
    let values: Vec<f64> = (0..len)
        .map(|i| if i < step_at { before } else { after })
        .collect();
    SampleSeries::from_values(0, WINDOW_MS, &values).unwrap()
}

/// Step series with uniform noise of amplitude `noise` added to every sample
pub fn noisy_step_series(
    rng: &mut TestRng,
    len: usize,
    step_at: usize,
    before: f64,
    after: f64,
    noise: f64,
) -> SampleSeries {
    let values: Vec<f64> = (0..len)
        .map(|i| {
            let level = if i < step_at { before } else { after };
            level + rng.gen_range(-noise, noise)
        })
        .collect();
    SampleSeries::from_values(0, WINDOW_MS, &values).unwrap()
}

/// Trays circulating in a fixed order with a constant lap time
///
/// Every `idle_every`-th slot reports the sentinel label instead.
pub fn circulating_trays(
    trays: &[Label],
    laps: usize,
    slot_ms: u64,
    idle_every: Option<usize>,
) -> EventSeries {
    let mut events = Vec::new();
    let mut t: Timestamp = 0;
    let mut slot = 0usize;

    for _ in 0..laps {
        for &tray in trays {
            if let Some(n) = idle_every {
                if slot % n == n - 1 {
                    events.push(Event::new(t, 0));
                    t += slot_ms;
                    slot += 1;
                }
            }
            events.push(Event::new(t, tray));
            t += slot_ms;
            slot += 1;
        }
    }
    EventSeries::new(events).unwrap()
}
