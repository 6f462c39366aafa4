//! Ward scheduling: greedy assignment, optimizer orchestration, beds and
//! metrics.
//!
//! # Algorithm
//!
//! [`GreedyAssigner`] makes one specialty-matched pass over the patients,
//! picking the best-scoring perfect-match doctor by load balance, seniority
//! and urgency. [`Scheduler`] runs the GA when requested and falls back to
//! the greedy pass on any optimizer fault.
//!
//! # Metrics
//!
//! [`ScheduleMetrics`] summarizes match quality, referrals and doctor
//! utilization; [`quality_series`] gives the running match quality used
//! as the convergence series on the greedy paths.

mod beds;
mod greedy;
mod metrics;
mod orchestrator;

pub use beds::{allocate_beds, bed_for};
pub use greedy::GreedyAssigner;
pub use metrics::{GA_TECHNIQUE, HEURISTIC_TECHNIQUE, ScheduleMetrics, quality_series, series_csv};
pub use orchestrator::{ScheduleOutcome, Scheduler, Strategy};
