//! Evaluation metrics

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

/// Monotonic counter
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicU64,
}

impl Counter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

/// Samples kept per histogram for percentile queries
pub const DEFAULT_SAMPLE_CAPACITY: usize = 1024;

/// Histogram of observed values (seconds, for durations).
///
/// `count`, `sum` and `avg` cover every observation. Percentiles are taken
/// over the most recent samples only, so memory stays fixed however long the
/// histogram lives.
#[derive(Debug)]
pub struct Histogram {
    name: String,
    capacity: usize,
    state: Mutex<HistogramState>,
}

#[derive(Debug, Default)]
struct HistogramState {
    count: u64,
    sum: f64,
    samples: VecDeque<f64>,
}

impl Histogram {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_SAMPLE_CAPACITY)
    }

    /// Keep at most `capacity` recent samples (at least one)
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name: name.into(),
            capacity,
            state: Mutex::new(HistogramState {
                samples: VecDeque::with_capacity(capacity),
                ..HistogramState::default()
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> MutexGuard<'_, HistogramState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn observe(&self, value: f64) {
        let mut state = self.state();
        state.count += 1;
        state.sum += value;
        if state.samples.len() == self.capacity {
            state.samples.pop_front();
        }
        state.samples.push_back(value);
    }

    pub fn observe_duration(&self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    /// Observations recorded since creation or the last reset
    pub fn count(&self) -> usize {
        self.state().count as usize
    }

    pub fn sum(&self) -> f64 {
        self.state().sum
    }

    pub fn avg(&self) -> f64 {
        let state = self.state();
        if state.count == 0 {
            0.0
        } else {
            state.sum / state.count as f64
        }
    }

    /// Samples currently held for percentile queries
    pub fn retained(&self) -> usize {
        self.state().samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get percentile (0-100) over the retained samples
    pub fn percentile(&self, p: f64) -> f64 {
        let mut values: Vec<f64> = self.state().samples.iter().copied().collect();
        if values.is_empty() {
            return 0.0;
        }

        values.sort_by(f64::total_cmp);
        let index = ((p.clamp(0.0, 100.0) / 100.0) * (values.len() - 1) as f64).round() as usize;
        values[index]
    }

    pub fn reset(&self) {
        let mut state = self.state();
        state.count = 0;
        state.sum = 0.0;
        state.samples.clear();
    }
}

/// Sink for evaluator metrics
pub trait Metrics: Send + Sync {
    /// Get (or create) a counter
    fn counter(&self, name: &str) -> Arc<Counter>;

    /// Get (or create) a histogram
    fn histogram(&self, name: &str) -> Arc<Histogram>;

    /// Record how long one operation took
    fn record_duration(&self, operation: &str, duration: Duration) {
        self.histogram(&format!("{}_duration_seconds", operation))
            .observe_duration(duration);
    }

    /// Record one failure of the given kind
    fn record_error(&self, kind: &str) {
        self.counter("errors_total").inc();
        self.counter(&format!("errors.{}", kind)).inc();
    }
}

/// Point-in-time copy of all metrics, suitable for serializing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub histograms: BTreeMap<String, HistogramSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistogramSummary {
    pub count: usize,
    pub avg: f64,
    pub p50: f64,
    pub p99: f64,
}

/// Default in-memory metrics registry
#[derive(Default)]
pub struct MetricsCollector {
    counters: RwLock<HashMap<String, Arc<Counter>>>,
    histograms: RwLock<HashMap<String, Arc<Histogram>>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter_names(&self) -> Vec<String> {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, c)| (name.clone(), c.get()))
            .collect();
        let histograms = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, h)| {
                (
                    name.clone(),
                    HistogramSummary {
                        count: h.count(),
                        avg: h.avg(),
                        p50: h.percentile(50.0),
                        p99: h.percentile(99.0),
                    },
                )
            })
            .collect();

        MetricsSnapshot {
            counters,
            histograms,
        }
    }

    pub fn reset_all(&self) {
        for counter in self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            counter.reset();
        }
        for histogram in self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            histogram.reset();
        }
    }
}

impl Metrics for MetricsCollector {
    fn counter(&self, name: &str) -> Arc<Counter> {
        if let Some(counter) = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(counter);
        }
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Counter::new(name)))
            .clone()
    }

    fn histogram(&self, name: &str) -> Arc<Histogram> {
        self.histograms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Histogram::new(name)))
            .clone()
    }
}
