//! Recurring reconciliation workers for the relay network dashboard backend.
//!
//! Two worker families run on independent fixed cadences:
//! - the **pool reconciler** converges each chain's reserve of pre-staked
//!   application accounts toward its configured capacity
//!   (fill → stake → decommission), and
//! - the **stats aggregator** recomputes network-wide staking statistics and
//!   per-chain node counts from the external network.
//!
//! Every job body runs behind the job runner, which owns timing, structured
//! outcome logging, failure isolation (one job's failure never reaches the
//! scheduler or another job), and the per-job run-lock that makes overlap
//! behavior explicit: a firing that lands while the previous run is still in
//! flight is skipped, not queued.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod keeper;
pub mod metrics;
pub mod reconciler;
pub mod runner;
pub mod scheduler;
pub mod shutdown;

pub use aggregator::{NodeCountReport, StatsAggregator, StatsReport};
pub use config::WorkerConfig;
pub use error::{JobError, JobErrorKind};
pub use keeper::Keeper;
pub use metrics::WorkerMetrics;
pub use reconciler::{DecommissionReport, FillReport, PoolReconciler, StakeReport};
pub use runner::{run_job, JobOutcome, JobStatus};
pub use scheduler::spawn_recurring;
pub use shutdown::ShutdownController;
