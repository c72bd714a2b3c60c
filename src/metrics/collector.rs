//! Metrics collection using Prometheus
//!
//! Counters and histograms describing how the tracker processed its
//! matchups. Attach a collector to a registry with
//! [`CompetitorRegistry::with_metrics`](crate::tracker::CompetitorRegistry::with_metrics).

use crate::types::RatingChange;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the rating tracker
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Matchup and competitor metrics
    tracker_metrics: TrackerMetrics,

    /// Performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Matchup and competitor metrics
#[derive(Clone)]
pub struct TrackerMetrics {
    /// Matchups that produced rating changes
    pub matchups_processed_total: IntCounter,

    /// Matchups skipped, by reason
    pub matchups_skipped_total: IntCounterVec,

    /// Competitors registered on first appearance
    pub competitors_created_total: IntCounter,

    /// Competitors currently in the registry
    pub competitors: IntGauge,

    /// Size of individual rating changes
    pub rating_delta_abs: Histogram,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Time spent in the rating update for one matchup
    pub rating_calculation_duration: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let tracker_metrics = TrackerMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            tracker_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn tracker(&self) -> &TrackerMetrics {
        &self.tracker_metrics
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a processed matchup and the time its rating update took
    pub fn record_matchup(&self, changes: &[RatingChange], duration: Duration) {
        self.tracker_metrics.matchups_processed_total.inc();
        for change in changes {
            self.tracker_metrics
                .rating_delta_abs
                .observe(change.delta().abs());
        }

        self.performance_metrics
            .rating_calculation_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a skipped matchup
    pub fn record_skipped_matchup(&self, reason: &str) {
        self.tracker_metrics
            .matchups_skipped_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Record a newly registered competitor
    pub fn record_competitor_created(&self) {
        self.tracker_metrics.competitors_created_total.inc();
    }

    pub fn set_competitor_count(&self, count: usize) {
        self.tracker_metrics.competitors.set(count as i64);
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field(
                "matchups_processed",
                &self.tracker_metrics.matchups_processed_total.get(),
            )
            .field(
                "competitors_created",
                &self.tracker_metrics.competitors_created_total.get(),
            )
            .finish_non_exhaustive()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl TrackerMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matchups_processed_total = IntCounter::new(
            "multielo_matchups_processed_total",
            "Total matchups that produced rating changes",
        )?;
        registry.register(Box::new(matchups_processed_total.clone()))?;

        let matchups_skipped_total = IntCounterVec::new(
            Opts::new(
                "multielo_matchups_skipped_total",
                "Total matchups skipped without rating changes",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(matchups_skipped_total.clone()))?;

        let competitors_created_total = IntCounter::new(
            "multielo_competitors_created_total",
            "Total competitors registered",
        )?;
        registry.register(Box::new(competitors_created_total.clone()))?;

        let competitors = IntGauge::new("multielo_competitors", "Competitors in the registry")?;
        registry.register(Box::new(competitors.clone()))?;

        let rating_delta_abs = Histogram::with_opts(
            HistogramOpts::new(
                "multielo_rating_delta_abs",
                "Absolute rating change per competitor per matchup",
            )
            .buckets(vec![1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 80.0, 160.0]),
        )?;
        registry.register(Box::new(rating_delta_abs.clone()))?;

        Ok(Self {
            matchups_processed_total,
            matchups_skipped_total,
            competitors_created_total,
            competitors,
            rating_delta_abs,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let rating_calculation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "multielo_rating_calculation_duration_seconds",
                "Rating update duration in seconds",
            )
            .buckets(vec![0.000001, 0.00001, 0.0001, 0.001, 0.01]),
        )?;
        registry.register(Box::new(rating_calculation_duration.clone()))?;

        Ok(Self {
            rating_calculation_duration,
        })
    }
}
