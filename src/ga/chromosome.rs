//! Assignment-vector chromosome for the ward GA.
//!
//! # Encoding
//!
//! One gene per patient, in request order. A gene is either a doctor's
//! roster index or `None` (unassigned / referral). The length always equals
//! the patient count; crossover and mutation preserve it.

use rand::Rng;

use super::Individual;
use crate::scoring::FitnessModel;

/// A gene: assigned doctor index, or `None` for a referral.
pub type Gene = Option<usize>;

/// Patient → doctor assignment vector.
///
/// Higher fitness = better assignment (maximization convention).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentChromosome {
    /// One gene per patient.
    pub genes: Vec<Gene>,
    /// Fitness value (higher = better).
    pub fitness: f64,
}

impl Individual for AssignmentChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl AssignmentChromosome {
    /// Wraps a gene vector with unevaluated fitness.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Creates a random chromosome.
    ///
    /// Each gene is `None` with probability `referral_rate`, otherwise a
    /// uniformly drawn doctor index. `doctor_count` must be non-zero unless
    /// `patient_count` is zero.
    pub fn random<R: Rng>(
        patient_count: usize,
        doctor_count: usize,
        referral_rate: f64,
        rng: &mut R,
    ) -> Self {
        let genes = (0..patient_count)
            .map(|_| random_gene(doctor_count, referral_rate, rng))
            .collect();
        Self::new(genes)
    }

    /// One-pass greedy construction.
    ///
    /// Each patient gets the lowest-index doctor who perfectly treats the
    /// disease, or `None` if there is none.
    pub fn greedy(model: &FitnessModel) -> Self {
        let genes = (0..model.patient_count())
            .map(|p| (0..model.doctor_count()).find(|&d| model.is_perfect(p, d)))
            .collect();
        Self::new(genes)
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether there are no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Validates length and gene range against a roster.
    pub fn is_valid(&self, patient_count: usize, doctor_count: usize) -> bool {
        self.genes.len() == patient_count
            && self
                .genes
                .iter()
                .all(|g| g.map_or(true, |d| d < doctor_count))
    }
}

/// Draws one gene.
fn random_gene<R: Rng>(doctor_count: usize, referral_rate: f64, rng: &mut R) -> Gene {
    if doctor_count == 0 || rng.random_bool(referral_rate) {
        None
    } else {
        Some(rng.random_range(0..doctor_count))
    }
}

// ======================== Crossover operators ========================

/// Two-point crossover.
///
/// Draws `i` uniformly from `[0, n)` and `j` uniformly from `[i, n)`, then
/// swaps the segment `[i, j)` between the parents. Parents shorter than two
/// genes are copied unchanged.
pub fn two_point_crossover<R: Rng>(
    p1: &AssignmentChromosome,
    p2: &AssignmentChromosome,
    rng: &mut R,
) -> (AssignmentChromosome, AssignmentChromosome) {
    let n = p1.genes.len().min(p2.genes.len());
    if n < 2 {
        return (
            AssignmentChromosome::new(p1.genes.clone()),
            AssignmentChromosome::new(p2.genes.clone()),
        );
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(i..n);

    let mut c1 = p1.genes.clone();
    let mut c2 = p2.genes.clone();
    c1[i..j].copy_from_slice(&p2.genes[i..j]);
    c2[i..j].copy_from_slice(&p1.genes[i..j]);
    (AssignmentChromosome::new(c1), AssignmentChromosome::new(c2))
}

// ======================== Mutation operators ========================

/// Per-gene mutation.
///
/// Each gene is replaced with probability `mutation_rate`; a replaced gene
/// becomes `None` with probability `referral_rate`, else a random doctor.
pub fn gene_mutation<R: Rng>(
    chromosome: &mut AssignmentChromosome,
    doctor_count: usize,
    mutation_rate: f64,
    referral_rate: f64,
    rng: &mut R,
) {
    for gene in chromosome.genes.iter_mut() {
        if rng.random_bool(mutation_rate) {
            *gene = random_gene(doctor_count, referral_rate, rng);
        }
    }
}
