//! Metrics for the rating tracker
//!
//! This module provides Prometheus metrics describing matchup processing.

pub mod collector;

pub use collector::{MetricsCollector, MetricsTimer, PerformanceMetrics, TrackerMetrics};
