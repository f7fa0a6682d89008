//! Prometheus metrics for the keeper workers.
//!
//! The [`WorkerMetrics`] struct owns a dedicated [`Registry`] the embedding
//! process can encode into the Prometheus text exposition format.

use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_with_registry, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry,
};

/// Central collection of worker-level Prometheus metrics.
pub struct WorkerMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Per-job counters (label: job name) ──────────────────────────────
    /// Firings that acquired the run-lock and executed.
    pub job_runs: IntCounterVec,
    /// Executions that ended in a job-level error.
    pub job_failures: IntCounterVec,
    /// Firings dropped because the previous run still held the run-lock.
    pub job_skips: IntCounterVec,
    /// Wall-clock run duration, seconds.
    pub job_duration_seconds: HistogramVec,

    // ── Gauges (updated by the stats jobs) ──────────────────────────────
    /// Nodes staked on the network, per the latest snapshot.
    pub nodes_staked: IntGauge,
    /// Applications staked on the network, per the latest snapshot.
    pub apps_staked: IntGauge,
}

impl WorkerMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let job_runs = register_int_counter_vec_with_registry!(
            Opts::new("keeper_job_runs_total", "Job firings that executed"),
            &["job"],
            registry
        )
        .expect("failed to register job_runs counter");

        let job_failures = register_int_counter_vec_with_registry!(
            Opts::new(
                "keeper_job_failures_total",
                "Job executions that ended in an error"
            ),
            &["job"],
            registry
        )
        .expect("failed to register job_failures counter");

        let job_skips = register_int_counter_vec_with_registry!(
            Opts::new(
                "keeper_job_skips_total",
                "Job firings dropped because the previous run was still in flight"
            ),
            &["job"],
            registry
        )
        .expect("failed to register job_skips counter");

        let job_duration_seconds = register_histogram_vec_with_registry!(
            HistogramOpts::new("keeper_job_duration_seconds", "Job run duration in seconds"),
            &["job"],
            registry
        )
        .expect("failed to register job_duration histogram");

        let nodes_staked = register_int_gauge_with_registry!(
            Opts::new("keeper_nodes_staked", "Nodes staked per the latest snapshot"),
            registry
        )
        .expect("failed to register nodes_staked gauge");

        let apps_staked = register_int_gauge_with_registry!(
            Opts::new(
                "keeper_apps_staked",
                "Applications staked per the latest snapshot"
            ),
            registry
        )
        .expect("failed to register apps_staked gauge");

        Self {
            registry,
            job_runs,
            job_failures,
            job_skips,
            job_duration_seconds,
            nodes_staked,
            apps_staked,
        }
    }
}

impl Default for WorkerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_increment() {
        let metrics = WorkerMetrics::new();
        assert_eq!(metrics.job_runs.with_label_values(&["fill"]).get(), 0);
        metrics.job_runs.with_label_values(&["fill"]).inc();
        assert_eq!(metrics.job_runs.with_label_values(&["fill"]).get(), 1);
        // Other jobs' series are independent.
        assert_eq!(metrics.job_runs.with_label_values(&["stake"]).get(), 0);
    }

    #[test]
    fn registries_are_isolated_per_instance() {
        let a = WorkerMetrics::new();
        let b = WorkerMetrics::new();
        a.nodes_staked.set(7);
        assert_eq!(b.nodes_staked.get(), 0);
    }
}
