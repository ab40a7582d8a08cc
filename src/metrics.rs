// Run metrics
//
// Lightweight counters for one export run, logged when the run finishes

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters collected while sweeping variants.
///
/// Atomics keep the type `Sync` so a front end can read it through an `Arc` while the
/// controller is running.
#[derive(Debug)]
pub struct Metrics {
    /// Variants whose bodies were all exported
    pub variants_completed: AtomicUsize,

    /// Parameter expressions successfully written to the design
    pub parameters_applied: AtomicUsize,

    /// Explicit recomputes requested from the host
    pub recomputes: AtomicUsize,

    /// Bodies written to disk
    pub bodies_exported: AtomicUsize,

    /// Time spent inside host export calls, in milliseconds
    pub total_export_time_ms: AtomicU64,

    /// Time spent waiting for the design to settle, in milliseconds
    pub total_settle_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            variants_completed: AtomicUsize::new(0),
            parameters_applied: AtomicUsize::new(0),
            recomputes: AtomicUsize::new(0),
            bodies_exported: AtomicUsize::new(0),
            total_export_time_ms: AtomicU64::new(0),
            total_settle_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_variant_completed(&self) {
        self.variants_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parameter_applied(&self) {
        self.parameters_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recompute(&self) {
        self.recomputes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one successful body export and the time the host took for it
    pub fn record_export(&self, duration: Duration) {
        self.bodies_exported.fetch_add(1, Ordering::Relaxed);
        self.total_export_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_settle(&self, duration: Duration) {
        self.total_settle_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average host export time per body in milliseconds
    pub fn avg_export_time_ms(&self) -> f64 {
        let total = self.total_export_time_ms.load(Ordering::Relaxed);
        let count = self.bodies_exported.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Export Run Metrics ===");
        tracing::info!("Elapsed: {:.2}s", self.elapsed().as_secs_f64());
        tracing::info!(
            "Variants completed: {}, parameters applied: {}, recomputes: {}",
            self.variants_completed.load(Ordering::Relaxed),
            self.parameters_applied.load(Ordering::Relaxed),
            self.recomputes.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Bodies exported: {} (avg: {:.2}ms per body), settle time: {:.2}s",
            self.bodies_exported.load(Ordering::Relaxed),
            self.avg_export_time_ms(),
            self.total_settle_time_ms.load(Ordering::Relaxed) as f64 / 1000.0
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
