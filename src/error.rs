//! Error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Caller-visible scheduling errors.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The input record cannot be repaired by defaulting.
    #[error("structural input error: {}", join_messages(.0))]
    StructuralInput(Vec<ValidationError>),
    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading input or writing results failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Genetic optimizer faults.
///
/// Never surfaced to callers of the orchestrator; every variant triggers
/// the greedy fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// The roster is empty, so no gene can name a doctor.
    #[error("no doctors available to assign")]
    NoDoctors,
    /// Population size is zero.
    #[error("population is empty")]
    EmptyPopulation,
    /// A probability parameter is outside [0, 1].
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidRate {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Fitness evaluation produced NaN or infinity.
    #[error("non-finite fitness {0} in generation {1}")]
    NonFiniteFitness(f64, usize),
    /// The best individual does not decode against the roster.
    #[error("malformed individual: {0}")]
    MalformedIndividual(String),
    /// The requested search would not fit in memory.
    #[error("resource limit exceeded: {0}")]
    ResourceExhausted(String),
    /// The run was cancelled between generations.
    #[error("cancelled after {0} generations")]
    Cancelled(usize),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
