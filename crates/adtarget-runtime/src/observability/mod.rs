//! Observability module
//!
//! In-process evaluation metrics (counters and latency histograms). Logging
//! goes through the `tracing` macros directly.

pub mod metrics;

pub use metrics::{Counter, Histogram, Metrics, MetricsCollector, MetricsSnapshot};
