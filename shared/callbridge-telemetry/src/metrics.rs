//! Metrics primitives

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter, shared between clones
#[derive(Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Simple histogram metric (stores samples for percentile calculation)
#[derive(Clone)]
pub struct Histogram {
    samples: Arc<parking_lot::Mutex<Vec<f64>>>,
    name: String,
    max_samples: usize,
}

impl Histogram {
    pub fn new(name: &str) -> Self {
        Self {
            samples: Arc::new(parking_lot::Mutex::new(Vec::with_capacity(256))),
            name: name.to_string(),
            max_samples: 4096,
        }
    }

    pub fn record(&self, value: f64) {
        let mut samples = self.samples.lock();
        if samples.len() >= self.max_samples {
            samples.remove(0);
        }
        samples.push(value);
    }

    pub fn percentile(&self, p: f64) -> f64 {
        let mut sorted = self.samples.lock().clone();
        if sorted.is_empty() {
            return 0.0;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        let idx = ((sorted.len() as f64) * p / 100.0) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    pub fn mean(&self) -> f64 {
        let samples = self.samples.lock();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn count(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Point-in-time view of a histogram, for JSON stats endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub p95: f64,
}

impl From<&Histogram> for MetricsSnapshot {
    fn from(hist: &Histogram) -> Self {
        Self {
            name: hist.name().to_string(),
            count: hist.count(),
            mean: hist.mean(),
            p95: hist.percentile(95.0),
        }
    }
}
