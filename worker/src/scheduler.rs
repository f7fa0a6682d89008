//! Recurring job loops.
//!
//! Each job gets its own tokio task with an independent fixed interval.
//! The loop fires the job body through the runner on every tick and exits
//! on the shutdown broadcast. There is no scheduler-level retry or backoff:
//! a failed run simply waits for the next tick.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::runner::run_job;
use crate::{JobError, WorkerMetrics};

/// Spawn a recurring job loop.
///
/// `body` is called once per firing to produce that firing's future. The
/// first firing happens immediately on spawn (tokio intervals tick once at
/// zero), which gives the pool a fill pass at startup instead of a dead
/// minute.
pub fn spawn_recurring<F, Fut>(
    job: &'static str,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
    metrics: Arc<WorkerMetrics>,
    body: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, JobError>> + Send,
{
    let run_lock = Arc::new(Mutex::new(()));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!(job, "job loop shutting down");
                    break;
                }
                _ = interval.tick() => {
                    run_job(job, &run_lock, &metrics, &body).await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn fires_on_cadence_until_shutdown() {
        let (tx, rx) = broadcast::channel(1);
        let metrics = Arc::new(WorkerMetrics::new());
        let fired = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&fired);
        let handle = spawn_recurring(
            "cadence_test",
            Duration::from_secs(60),
            rx,
            metrics,
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("fired".to_string())
                }
            },
        );

        // Immediate first tick plus two scheduled ones.
        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 3);

        tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn one_failing_job_does_not_stop_its_loop_or_others() {
        let (tx, _) = broadcast::channel(1);
        let metrics = Arc::new(WorkerMetrics::new());

        let failing_fired = Arc::new(AtomicU32::new(0));
        let healthy_fired = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&failing_fired);
        let failing = spawn_recurring(
            "always_fails",
            Duration::from_secs(60),
            tx.subscribe(),
            Arc::clone(&metrics),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(JobError::Internal("boom".to_string()))
                }
            },
        );

        let counter = Arc::clone(&healthy_fired);
        let healthy = spawn_recurring(
            "stays_healthy",
            Duration::from_secs(60),
            tx.subscribe(),
            Arc::clone(&metrics),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("fine".to_string())
                }
            },
        );

        tokio::time::sleep(Duration::from_secs(125)).await;

        // The failing job keeps getting re-fired, and the healthy job is
        // unaffected by its neighbour's failures.
        assert_eq!(failing_fired.load(Ordering::SeqCst), 3);
        assert_eq!(healthy_fired.load(Ordering::SeqCst), 3);

        tx.send(()).unwrap();
        failing.await.unwrap();
        healthy.await.unwrap();
    }
}
