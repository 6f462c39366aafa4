//! GA-based ward scheduling optimization.
//!
//! Searches the patient → doctor assignment space with a generational GA
//! under the shared fitness model in [`crate::scoring`].
//!
//! # Encoding
//!
//! One gene per patient: a doctor's roster index, or `None` for a
//! referral. See [`AssignmentChromosome`].
//!
//! # Operators
//!
//! - Tournament selection (4 distinct samples)
//! - Two-point crossover
//! - Per-gene mutation
//! - Elitism (top 5 %, rounded up)
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

mod chromosome;
mod problem;
mod runner;

pub use chromosome::{AssignmentChromosome, Gene, gene_mutation, two_point_crossover};
pub use problem::{MAX_MODEL_CELLS, MAX_POPULATION_GENES, WardGaProblem};
pub use runner::{GaConfig, GaProblem, GaResult, GaRunner, Individual, MAX_POPULATION};
