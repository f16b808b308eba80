// src/pipeline/metrics.rs
//
// Counters for the frame loop. Atomics so the alert dispatcher task can
// report into the same instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub total_frames: Arc<AtomicU64>,
    pub objects_evaluated: Arc<AtomicU64>,
    pub dangerous_verdicts: Arc<AtomicU64>,
    pub objects_pruned: Arc<AtomicU64>,
    pub alerts_dispatched: Arc<AtomicU64>,
    pub alerts_suppressed: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            total_frames: Arc::new(AtomicU64::new(0)),
            objects_evaluated: Arc::new(AtomicU64::new(0)),
            dangerous_verdicts: Arc::new(AtomicU64::new(0)),
            objects_pruned: Arc::new(AtomicU64::new(0)),
            alerts_dispatched: Arc::new(AtomicU64::new(0)),
            alerts_suppressed: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn fps(&self) -> f64 {
        let frames = self.total_frames.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames.load(Ordering::Relaxed),
            fps: self.fps(),
            objects_evaluated: self.objects_evaluated.load(Ordering::Relaxed),
            dangerous_verdicts: self.dangerous_verdicts.load(Ordering::Relaxed),
            objects_pruned: self.objects_pruned.load(Ordering::Relaxed),
            alerts_dispatched: self.alerts_dispatched.load(Ordering::Relaxed),
            alerts_suppressed: self.alerts_suppressed.load(Ordering::Relaxed),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub fps: f64,
    pub objects_evaluated: u64,
    pub dangerous_verdicts: u64,
    pub objects_pruned: u64,
    pub alerts_dispatched: u64,
    pub alerts_suppressed: u64,
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = PipelineMetrics::new();
        let handle = metrics.clone();
        handle.inc(&handle.alerts_dispatched);
        metrics.add(&metrics.objects_pruned, 3);
        let summary = metrics.summary();
        assert_eq!(summary.alerts_dispatched, 1);
        assert_eq!(summary.objects_pruned, 3);
    }
}
