//! Strategy selection: optimizer, greedy, or greedy fallback.
//!
//! # Flow
//!
//! 1. If the request carries a [`GaConfig`], run the GA and decode its best
//!    chromosome. Any [`OptimizerError`] discards all optimizer output and
//!    the greedy assigner runs instead ([`Strategy::Fallback`]).
//! 2. Without a GA config the greedy assigner runs ([`Strategy::Heuristic`]).
//! 3. Beds are allocated round-robin and metrics are computed.

use tracing::{info, warn};

use super::beds::allocate_beds;
use super::greedy::GreedyAssigner;
use super::metrics::{ScheduleMetrics, quality_series};
use crate::config::SchedulingConfig;
use crate::error::OptimizerError;
use crate::ga::{GaConfig, GaRunner, WardGaProblem};
use crate::models::Schedule;
use crate::request::ScheduleRequest;

/// Path that produced a schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Greedy assigner, no optimizer requested.
    Heuristic,
    /// GA result.
    Optimized,
    /// GA requested but failed; greedy result instead.
    Fallback {
        /// The optimizer fault.
        reason: OptimizerError,
    },
}

impl Strategy {
    /// Short name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Heuristic => "heuristic",
            Strategy::Optimized => "optimized",
            Strategy::Fallback { .. } => "fallback",
        }
    }
}

/// Result of [`Scheduler::run`].
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Assignments in intake order, beds filled in.
    pub schedule: Schedule,
    /// Path taken.
    pub strategy: Strategy,
    /// Aggregate statistics.
    pub metrics: ScheduleMetrics,
    /// Quality series (greedy paths) or best-fitness history (optimizer).
    pub series: Vec<f64>,
}

/// Successful optimizer run.
struct OptimizedSchedule {
    schedule: Schedule,
    best_fitness: f64,
    history: Vec<f64>,
}

/// Runs scheduling requests against a fixed configuration.
///
/// # Example
///
/// ```
/// use u_ward::config::SchedulingConfig;
/// use u_ward::models::{Doctor, Patient};
/// use u_ward::request::ScheduleRequest;
/// use u_ward::scheduler::{Scheduler, Strategy};
///
/// let config = SchedulingConfig::default();
/// let request = ScheduleRequest::new(
///     vec![Doctor::new("Dr. 1", "General")],
///     vec![Patient::new("P1", "Fever")],
/// );
/// let outcome = Scheduler::new(&config).run(&request);
/// assert_eq!(outcome.strategy, Strategy::Heuristic);
/// assert_eq!(outcome.schedule.entries[0].bed, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Scheduler<'a> {
    config: &'a SchedulingConfig,
}

impl<'a> Scheduler<'a> {
    /// Creates a scheduler.
    pub fn new(config: &'a SchedulingConfig) -> Self {
        Self { config }
    }

    /// Produces a schedule for the request. Never fails.
    pub fn run(&self, request: &ScheduleRequest) -> ScheduleOutcome {
        let (mut schedule, strategy, optimized) = match &request.optimizer {
            None => (self.greedy(request), Strategy::Heuristic, None),
            Some(ga) => match self.optimize(request, ga) {
                Ok(result) => {
                    let OptimizedSchedule {
                        schedule,
                        best_fitness,
                        history,
                    } = result;
                    (schedule, Strategy::Optimized, Some((best_fitness, history)))
                }
                Err(reason) => {
                    warn!(%reason, "optimizer failed, falling back to greedy assignment");
                    (self.greedy(request), Strategy::Fallback { reason }, None)
                }
            },
        };

        allocate_beds(&mut schedule, request.beds);

        let metrics = ScheduleMetrics::calculate(&schedule, request.doctors.len(), request.beds)
            .with_strategy(strategy.name());
        let (metrics, series) = match optimized {
            Some((best_fitness, history)) => (
                metrics.with_optimizer(best_fitness, history.len()),
                history,
            ),
            None => (metrics, quality_series(&schedule)),
        };

        info!(
            strategy = strategy.name(),
            patients = schedule.len(),
            perfect = metrics.perfect_matches,
            "schedule complete"
        );

        ScheduleOutcome {
            schedule,
            strategy,
            metrics,
            series,
        }
    }

    fn greedy(&self, request: &ScheduleRequest) -> Schedule {
        GreedyAssigner::new(&self.config.specialties).assign(&request.doctors, &request.patients)
    }

    fn optimize(
        &self,
        request: &ScheduleRequest,
        ga: &GaConfig,
    ) -> Result<OptimizedSchedule, OptimizerError> {
        let problem = WardGaProblem::new(
            &request.doctors,
            &request.patients,
            &self.config.specialties,
            ga,
        )?;
        let result = GaRunner::run(&problem, ga)?;
        let schedule = problem.decode(&result.best)?;
        Ok(OptimizedSchedule {
            schedule,
            best_fitness: result.best_fitness,
            history: result.history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Doctor, MatchLabel, Patient};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn request_from(record: serde_json::Value) -> ScheduleRequest {
        ScheduleRequest::from_value(&record, &SchedulingConfig::default()).unwrap()
    }

    fn small_ga() -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_max_generations(15)
            .with_seed(7)
    }

    #[test]
    fn test_scenario_a_heuristic() {
        let request = request_from(json!({
            "Doctors": 2,
            "Patients": 2,
            "Urgency": [9, 3],
            "DoctorDetails": [{"Specialty": "Cardiology"}, {"Specialty": "General"}],
            "PatientDetails": [{"Disease": "Heart Attack"}, {"Disease": "Fever"}],
        }));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);

        assert_eq!(outcome.strategy, Strategy::Heuristic);
        let e = &outcome.schedule.entries;
        assert_eq!((e[0].doctor_index, e[0].bed), (Some(0), 1));
        assert_eq!((e[1].doctor_index, e[1].bed), (Some(1), 2));
        assert!(e.iter().all(|x| x.label == MatchLabel::PerfectMatch));
        assert_eq!(outcome.series.len(), 2);
        assert!((outcome.metrics.match_success_rate - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_scenario_b_unsupported_disease() {
        let request = request_from(json!({
            "Doctors": 1,
            "Patients": 1,
            "DoctorDetails": [{"Specialty": "Cardiology"}],
            "PatientDetails": [{"Disease": "Broken Toe"}],
        }));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);

        let entry = &outcome.schedule.entries[0];
        assert_eq!(entry.doctor_index, None);
        assert_eq!(entry.label, MatchLabel::DiseaseNotInSystem);
        assert_eq!(outcome.metrics.no_matches, 1);
    }

    #[test]
    fn test_scenario_c_referral() {
        let request = request_from(json!({
            "Doctors": 1,
            "Patients": 1,
            "DoctorDetails": [{"Specialty": "General"}],
            "PatientDetails": [{"Disease": "Heart Attack"}],
        }));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);

        let entry = &outcome.schedule.entries[0];
        assert_eq!(entry.doctor_index, None);
        assert_eq!(entry.label, MatchLabel::ReferralTo("Cardiology".into()));
        assert_eq!(outcome.metrics.referrals, 1);
    }

    #[test]
    fn test_scenario_d_ga_reproducible() {
        let record = json!({
            "Doctors": 3,
            "Patients": 6,
            "Urgency": [9, 2, 7, 5, 10, 1],
            "DoctorDetails": [
                {"Specialty": "Cardiology"},
                {"Specialty": "Neurology"},
                {"Specialty": "General"},
            ],
            "PatientDetails": [
                {"Disease": "Heart Attack"},
                {"Disease": "Cold"},
                {"Disease": "Stroke"},
                {"Disease": "Fracture"},
                {"Disease": "Hypertension"},
                {"Disease": "Fever"},
            ],
            "UseGA": true,
            "GAPopulation": 24,
            "GAGenerations": 20,
            "GASeed": 99,
        });
        let config = SchedulingConfig::default();
        let scheduler = Scheduler::new(&config);

        let a = scheduler.run(&request_from(record.clone()));
        let b = scheduler.run(&request_from(record));

        assert_eq!(a.strategy, Strategy::Optimized);
        assert_eq!(a.series, b.series);
        assert_eq!(
            serde_json::to_string(&a.schedule.entries).unwrap(),
            serde_json::to_string(&b.schedule.entries).unwrap()
        );
        assert_eq!(a.metrics.generations_run, Some(a.series.len()));
        assert!(a.metrics.best_fitness.is_some());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let doctors = vec![
            Doctor::new("Dr. 1", "Pediatrics"),
            Doctor::new("Dr. 2", "General"),
        ];
        let patients: Vec<Patient> = ["Fever", "Cold", "Asthma", "Infection"]
            .iter()
            .enumerate()
            .map(|(i, d)| Patient::new(format!("P{i}"), *d).with_urgency(3 + i as i32))
            .collect();
        let config = SchedulingConfig::default();
        let scheduler = Scheduler::new(&config);

        let seq = ScheduleRequest::new(doctors.clone(), patients.clone())
            .with_optimizer(small_ga().with_parallel(false));
        let par = ScheduleRequest::new(doctors, patients)
            .with_optimizer(small_ga().with_parallel(true));

        let a = scheduler.run(&seq);
        let b = scheduler.run(&par);
        assert_eq!(a.schedule, b.schedule);
        assert_eq!(a.series, b.series);
    }

    #[test]
    fn test_fallback_without_doctors() {
        let request = request_from(json!({
            "Doctors": 0,
            "Patients": 2,
            "PatientDetails": [{"Disease": "Fever"}, {"Disease": "Broken Toe"}],
            "UseGA": true,
        }));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);

        assert_eq!(
            outcome.strategy,
            Strategy::Fallback {
                reason: OptimizerError::NoDoctors
            }
        );
        assert_eq!(outcome.schedule.len(), 2);
        assert_eq!(outcome.schedule.unassigned_count(), 2);
        assert_eq!(outcome.metrics.technique, crate::scheduler::HEURISTIC_TECHNIQUE);
        assert_eq!(outcome.metrics.best_fitness, None);
        assert_eq!(outcome.series.len(), 2);
    }

    #[test]
    fn test_fallback_on_invalid_rate() {
        let request = ScheduleRequest::new(
            vec![Doctor::new("Dr. 1", "General")],
            vec![Patient::new("P1", "Fever")],
        )
        .with_optimizer(small_ga().with_mutation_rate(1.5));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);

        assert!(matches!(
            outcome.strategy,
            Strategy::Fallback {
                reason: OptimizerError::InvalidRate { .. }
            }
        ));
        assert_eq!(outcome.schedule.entries[0].label, MatchLabel::PerfectMatch);
    }

    #[test]
    fn test_fallback_on_oversized_population() {
        let request = request_from(json!({
            "Doctors": 1,
            "Patients": 1,
            "PatientDetails": [{"Disease": "Fever"}],
            "UseGA": true,
            "GAPopulation": 4e18,
            "GAGenerations": 1,
        }));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);

        assert!(matches!(
            outcome.strategy,
            Strategy::Fallback {
                reason: OptimizerError::ResourceExhausted(_)
            }
        ));
        assert_eq!(outcome.schedule.len(), 1);
        assert_eq!(outcome.schedule.entries[0].label, MatchLabel::PerfectMatch);
    }

    #[test]
    fn test_fallback_on_cancel() {
        let request = ScheduleRequest::new(
            vec![Doctor::new("Dr. 1", "General")],
            vec![Patient::new("P1", "Fever")],
        )
        .with_optimizer(small_ga().with_cancel_flag(Arc::new(AtomicBool::new(true))));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);

        assert_eq!(
            outcome.strategy,
            Strategy::Fallback {
                reason: OptimizerError::Cancelled(0)
            }
        );
        assert_eq!(outcome.metrics.strategy, "fallback");
    }

    #[test]
    fn test_beds_follow_position() {
        let request = request_from(json!({"Doctors": 1, "Patients": 5, "Beds": 2}));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);
        let beds: Vec<usize> = outcome.schedule.entries.iter().map(|e| e.bed).collect();
        assert_eq!(beds, vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn test_empty_request() {
        let request = request_from(json!({"Doctors": 0, "Patients": 0, "UseGA": true}));
        let config = SchedulingConfig::default();
        let outcome = Scheduler::new(&config).run(&request);
        assert!(outcome.schedule.is_empty());
        assert_eq!(outcome.metrics.match_success_rate, 0.0);
    }
}
