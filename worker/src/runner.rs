//! The job runner — the boundary every job body runs behind.
//!
//! Owns per-invocation timing, structured outcome logging, the per-job
//! run-lock, and failure isolation: a job body's error is converted into a
//! [`JobOutcome`] here and goes no further, so it can never cancel the
//! scheduler loop or another job.

use std::future::Future;
use std::time::Instant;

use tokio::sync::Mutex;

use keeper_types::Timestamp;
use keeper_utils::format_duration;

use crate::{JobError, WorkerMetrics};

/// What happened to one firing of a job.
#[derive(Debug)]
pub enum JobStatus {
    /// The body ran to completion; the string is its summary line.
    Completed(String),
    /// The body returned an error; logged and counted, not propagated.
    Failed(JobError),
    /// The previous invocation still held the run-lock; this firing was
    /// dropped, not queued.
    Skipped,
}

/// Record of one firing: when it started, how long it took, how it ended.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: &'static str,
    pub started_at: Timestamp,
    pub elapsed_secs: f64,
    pub status: JobStatus,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, JobStatus::Completed(_))
    }

    pub fn skipped(&self) -> bool {
        matches!(self.status, JobStatus::Skipped)
    }
}

/// Run one firing of a job behind the run-lock.
///
/// `body` is invoked only if the lock is free; the returned outcome is fully
/// logged and counted before this function returns.
pub async fn run_job<F, Fut>(
    job: &'static str,
    run_lock: &Mutex<()>,
    metrics: &WorkerMetrics,
    body: F,
) -> JobOutcome
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, JobError>>,
{
    let started_at = Timestamp::now();

    let Ok(_guard) = run_lock.try_lock() else {
        tracing::warn!(job, "previous run still in flight, skipping this firing");
        metrics.job_skips.with_label_values(&[job]).inc();
        return JobOutcome {
            job,
            started_at,
            elapsed_secs: 0.0,
            status: JobStatus::Skipped,
        };
    };

    tracing::info!(job, started_at = started_at.as_secs(), "job started");
    metrics.job_runs.with_label_values(&[job]).inc();

    let timer = Instant::now();
    let result = body().await;
    let elapsed_secs = timer.elapsed().as_secs_f64();
    metrics
        .job_duration_seconds
        .with_label_values(&[job])
        .observe(elapsed_secs);

    let status = match result {
        Ok(summary) => {
            tracing::info!(
                job,
                elapsed = %format_duration(elapsed_secs as u64),
                elapsed_secs,
                %summary,
                "job completed"
            );
            JobStatus::Completed(summary)
        }
        Err(error) => {
            tracing::error!(
                job,
                elapsed_secs,
                kind = ?error.kind(),
                %error,
                "job failed; next firing will retry"
            );
            metrics.job_failures.with_label_values(&[job]).inc();
            JobStatus::Failed(error)
        }
    };

    JobOutcome {
        job,
        started_at,
        elapsed_secs,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobErrorKind;
    use std::sync::Arc;

    fn metrics() -> WorkerMetrics {
        WorkerMetrics::new()
    }

    #[tokio::test]
    async fn completed_body_yields_summary() {
        let lock = Mutex::new(());
        let m = metrics();
        let outcome = run_job("test_job", &lock, &m, || async {
            Ok("did 3 things".to_string())
        })
        .await;
        assert!(outcome.succeeded());
        assert!(matches!(outcome.status, JobStatus::Completed(ref s) if s == "did 3 things"));
    }

    #[tokio::test]
    async fn failing_body_is_contained() {
        let lock = Mutex::new(());
        let m = metrics();
        let outcome = run_job("test_job", &lock, &m, || async {
            Err(JobError::EmptyNetworkResult { what: "staked nodes" })
        })
        .await;
        assert!(!outcome.succeeded());
        match outcome.status {
            JobStatus::Failed(e) => assert_eq!(e.kind(), JobErrorKind::EmptyNetworkResult),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn held_lock_skips_the_firing() {
        let lock = Arc::new(Mutex::new(()));
        let m = metrics();
        let _held = lock.lock().await;
        let outcome = run_job("test_job", &lock, &m, || async {
            Ok("should not run".to_string())
        })
        .await;
        assert!(outcome.skipped());
    }

    #[tokio::test]
    async fn lock_is_released_between_runs() {
        let lock = Mutex::new(());
        let m = metrics();
        let first = run_job("test_job", &lock, &m, || async { Ok("one".to_string()) }).await;
        let second = run_job("test_job", &lock, &m, || async { Ok("two".to_string()) }).await;
        assert!(first.succeeded());
        assert!(second.succeeded());
    }
}
