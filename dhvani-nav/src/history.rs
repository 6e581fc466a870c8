//! Sampled position history with oscillation and loop detection.
//!
//! A fixed-capacity ring of player positions sampled on a tick cadence.
//! Insertion overwrites the oldest slot once the ring is full.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::horizontal_distance_sq;

/// Position history settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Ring capacity in samples.
    /// Default: 30 (about 5 s at one sample per 10 ticks)
    pub capacity: usize,

    /// Samples examined for oscillation.
    /// Default: 6
    pub oscillation_window: usize,

    /// Summed X/Z variance above which movement counts as back-and-forth.
    /// Default: 500000
    pub oscillation_variance: f32,

    /// Squared net displacement below which the window made no progress.
    /// Default: 1000000
    pub oscillation_net_sq: f32,

    /// Minimum sample age for a revisit to count as a loop.
    /// Default: 18
    pub loop_min_age: usize,

    /// Squared radius within which a revisit counts as a loop.
    /// Default: 1000000
    pub loop_radius_sq: f32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            oscillation_window: 6,
            oscillation_variance: 500_000.0,
            oscillation_net_sq: 1_000_000.0,
            loop_min_age: 18,
            loop_radius_sq: 1_000_000.0,
        }
    }
}

/// One sampled player position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionRecord {
    /// Player position.
    pub position: Vec3,
    /// Host time of the sample (ms).
    pub timestamp_ms: u64,
}

/// Fixed-capacity ring buffer of [`PositionRecord`]s.
#[derive(Clone, Debug)]
pub struct PositionHistory {
    config: HistoryConfig,
    records: Vec<PositionRecord>,
    /// Slot the next record will be written to.
    next: usize,
}

impl PositionHistory {
    /// Create an empty history.
    pub fn new(config: HistoryConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            config: HistoryConfig { capacity, ..config },
            records: Vec::with_capacity(capacity),
            next: 0,
        }
    }

    /// Record a sample, overwriting the oldest once full.
    pub fn record(&mut self, position: Vec3, timestamp_ms: u64) {
        let record = PositionRecord {
            position,
            timestamp_ms,
        };
        if self.records.len() < self.config.capacity {
            self.records.push(record);
        } else {
            self.records[self.next] = record;
        }
        self.next = (self.next + 1) % self.config.capacity;
    }

    /// Number of stored samples (saturates at capacity).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ring capacity.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Slot the next sample will overwrite.
    pub fn write_index(&self) -> usize {
        self.next
    }

    /// Sample `age` steps back (0 = newest).
    pub fn get(&self, age: usize) -> Option<&PositionRecord> {
        if age >= self.records.len() {
            return None;
        }
        let cap = self.config.capacity;
        let idx = (self.next + cap - 1 - age) % cap;
        self.records.get(idx)
    }

    /// Samples from newest to oldest.
    pub fn iter_recent(&self) -> impl Iterator<Item = &PositionRecord> + '_ {
        (0..self.records.len()).filter_map(move |age| self.get(age))
    }

    /// Drop every sample.
    pub fn clear(&mut self) {
        self.records.clear();
        self.next = 0;
    }

    /// Whether the newest window shows back-and-forth motion.
    ///
    /// High positional variance over the window combined with low net
    /// displacement from its oldest to its newest sample.
    pub fn is_oscillating(&self) -> bool {
        let window = self.config.oscillation_window;
        if window < 2 || self.records.len() < window {
            return false;
        }

        let samples: Vec<Vec3> = self
            .iter_recent()
            .take(window)
            .map(|r| r.position)
            .collect();
        let n = samples.len() as f64;

        let (sum_x, sum_z) = samples
            .iter()
            .fold((0.0f64, 0.0f64), |(x, z), p| (x + p.x as f64, z + p.z as f64));
        let (mean_x, mean_z) = (sum_x / n, sum_z / n);
        let (var_x, var_z) = samples.iter().fold((0.0f64, 0.0f64), |(vx, vz), p| {
            let dx = p.x as f64 - mean_x;
            let dz = p.z as f64 - mean_z;
            (vx + dx * dx / n, vz + dz * dz / n)
        });

        let newest = samples[0];
        let oldest = samples[samples.len() - 1];
        let net_sq = horizontal_distance_sq(oldest, newest);

        var_x + var_z > self.config.oscillation_variance as f64
            && net_sq < self.config.oscillation_net_sq
    }

    /// Whether the newest sample revisits a much older one.
    ///
    /// Returns the age (in samples) of the first revisited record.
    pub fn detect_loop(&self) -> Option<usize> {
        let newest = self.get(0)?.position;
        (self.config.loop_min_age..self.records.len()).find(|&age| {
            self.get(age).is_some_and(|r| {
                horizontal_distance_sq(r.position, newest) < self.config.loop_radius_sq
            })
        })
    }
}
