//! Ward GA problem definition.
//!
//! Implements [`GaProblem`] for patient → doctor assignment and decodes the
//! winning chromosome into a [`Schedule`].

use rand::Rng;

use super::chromosome::{AssignmentChromosome, gene_mutation, two_point_crossover};
use super::{GaConfig, GaProblem};
use crate::error::OptimizerError;
use crate::models::{Doctor, MatchLabel, Patient, Schedule, ScheduleEntry, SpecialtyTable};
use crate::scoring::FitnessModel;

/// Largest patients × doctors match matrix the fitness model may hold.
pub const MAX_MODEL_CELLS: usize = 10_000_000;
/// Largest total gene count of one population, seeds included.
pub const MAX_POPULATION_GENES: usize = 10_000_000;

/// GA problem for one scheduling request.
///
/// Borrows the roster and patient list; the fitness model is precomputed
/// once and shared read-only by every evaluation.
///
/// # Example
///
/// ```
/// use u_ward::ga::{GaConfig, GaRunner, WardGaProblem};
/// use u_ward::models::{Doctor, Patient, SpecialtyTable};
///
/// let doctors = vec![Doctor::new("Dr. 1", "General")];
/// let patients = vec![Patient::new("P1", "Fever")];
/// let table = SpecialtyTable::standard();
/// let config = GaConfig::default().with_seed(1).with_max_generations(5);
///
/// let problem = WardGaProblem::new(&doctors, &patients, &table, &config).unwrap();
/// let result = GaRunner::run(&problem, &config).unwrap();
/// let schedule = problem.decode(&result.best).unwrap();
/// assert_eq!(schedule.len(), 1);
/// ```
pub struct WardGaProblem<'a> {
    doctors: &'a [Doctor],
    patients: &'a [Patient],
    model: FitnessModel,
    mutation_rate: f64,
    referral_rate: f64,
    greedy_seeds: usize,
}

impl<'a> WardGaProblem<'a> {
    /// Creates a problem from the request entities and GA settings.
    ///
    /// # Errors
    /// [`OptimizerError::ResourceExhausted`] if the match matrix would exceed
    /// [`MAX_MODEL_CELLS`] or one population would exceed
    /// [`MAX_POPULATION_GENES`]. Both are checked before allocating.
    pub fn new(
        doctors: &'a [Doctor],
        patients: &'a [Patient],
        specialties: &SpecialtyTable,
        config: &GaConfig,
    ) -> Result<Self, OptimizerError> {
        let cells = patients.len().checked_mul(doctors.len());
        if !cells.is_some_and(|c| c <= MAX_MODEL_CELLS) {
            return Err(OptimizerError::ResourceExhausted(format!(
                "{} patients x {} doctors exceeds {MAX_MODEL_CELLS} match cells",
                patients.len(),
                doctors.len()
            )));
        }
        let genes = config
            .population_size
            .checked_add(config.greedy_seeds.min(config.population_size))
            .and_then(|n| n.checked_mul(patients.len()));
        if !genes.is_some_and(|g| g <= MAX_POPULATION_GENES) {
            return Err(OptimizerError::ResourceExhausted(format!(
                "population {} for {} patients exceeds {MAX_POPULATION_GENES} genes",
                config.population_size,
                patients.len()
            )));
        }

        Ok(Self {
            doctors,
            patients,
            model: FitnessModel::new(doctors, patients, specialties),
            mutation_rate: config.mutation_rate,
            referral_rate: config.referral_rate,
            greedy_seeds: config.greedy_seeds,
        })
    }

    /// The precomputed fitness model.
    pub fn model(&self) -> &FitnessModel {
        &self.model
    }

    /// Decodes a chromosome into a schedule.
    ///
    /// Labels: perfect match, generalist, partial/no match, or referral for
    /// an unassigned gene. Beds are left at their default; the caller
    /// allocates them.
    ///
    /// # Errors
    /// [`OptimizerError::MalformedIndividual`] if the chromosome length or
    /// any gene disagrees with the roster.
    pub fn decode(&self, chromosome: &AssignmentChromosome) -> Result<Schedule, OptimizerError> {
        if chromosome.len() != self.patients.len() {
            return Err(OptimizerError::MalformedIndividual(format!(
                "{} genes for {} patients",
                chromosome.len(),
                self.patients.len()
            )));
        }

        let mut schedule = Schedule::new(self.doctors.len());
        for (i, (patient, &gene)) in self.patients.iter().zip(&chromosome.genes).enumerate() {
            let entry = match gene {
                None => ScheduleEntry::unassigned(i, patient, MatchLabel::Referral),
                Some(d) => {
                    let doctor = self.doctors.get(d).ok_or_else(|| {
                        OptimizerError::MalformedIndividual(format!(
                            "gene {i} names doctor {d} of {}",
                            self.doctors.len()
                        ))
                    })?;
                    let label = if self.model.is_perfect(i, d) {
                        MatchLabel::PerfectMatch
                    } else if self.model.is_generalist(d) {
                        MatchLabel::Generalist
                    } else {
                        MatchLabel::PartialOrNoMatch
                    };
                    ScheduleEntry::assigned(i, patient, d, doctor, label)
                }
            };
            schedule.add_entry(entry);
        }
        Ok(schedule)
    }
}

impl GaProblem for WardGaProblem<'_> {
    type Individual = AssignmentChromosome;

    fn check(&self) -> Result<(), OptimizerError> {
        if self.doctors.is_empty() && !self.patients.is_empty() {
            return Err(OptimizerError::NoDoctors);
        }
        Ok(())
    }

    fn create_individual<R: Rng>(&self, rng: &mut R) -> AssignmentChromosome {
        AssignmentChromosome::random(
            self.patients.len(),
            self.doctors.len(),
            self.referral_rate,
            rng,
        )
    }

    fn seed_individuals(&self, population_size: usize) -> Vec<AssignmentChromosome> {
        let seed = AssignmentChromosome::greedy(&self.model);
        vec![seed; self.greedy_seeds.min(population_size)]
    }

    fn evaluate(&self, individual: &AssignmentChromosome) -> f64 {
        self.model.fitness(&individual.genes)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &AssignmentChromosome,
        parent2: &AssignmentChromosome,
        rng: &mut R,
    ) -> (AssignmentChromosome, AssignmentChromosome) {
        two_point_crossover(parent1, parent2, rng)
    }

    fn mutate<R: Rng>(&self, individual: &mut AssignmentChromosome, rng: &mut R) {
        gene_mutation(
            individual,
            self.doctors.len(),
            self.mutation_rate,
            self.referral_rate,
            rng,
        );
    }
}
