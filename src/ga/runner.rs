//! Generational GA loop.
//!
//! # Algorithm
//!
//! 1. Build `population_size` random individuals plus the problem's seed
//!    individuals, then evaluate them.
//! 2. Each generation: copy the top `⌈elite_ratio · population_size⌉`
//!    individuals unchanged, fill the rest by tournament selection,
//!    crossover and mutation, then evaluate the new population.
//! 3. Stop after `max_generations`, or once past the warm-up window when
//!    the best-in-generation fitness moves by less than the threshold.
//!
//! Evaluation may run on the rayon pool. All random draws happen on the
//! calling thread from a single seeded RNG, so a fixed seed reproduces the
//! run regardless of `parallel`.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::OptimizerError;

/// Largest accepted `population_size`.
pub const MAX_POPULATION: usize = 100_000;

/// A member of the GA population.
pub trait Individual: Clone + Send + Sync {
    /// Current fitness (higher = better).
    fn fitness(&self) -> f64;

    /// Stores an evaluated fitness.
    fn set_fitness(&mut self, fitness: f64);
}

/// Problem definition consumed by [`GaRunner`].
pub trait GaProblem: Sync {
    /// Individual type.
    type Individual: Individual;

    /// Checks the problem can be searched at all.
    fn check(&self) -> Result<(), OptimizerError> {
        Ok(())
    }

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Extra non-random individuals added to the initial population.
    fn seed_individuals(&self, _population_size: usize) -> Vec<Self::Individual> {
        Vec::new()
    }

    /// Evaluates fitness (higher = better). Must not mutate shared state.
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Produces two children from two parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> (Self::Individual, Self::Individual);

    /// Mutates an individual in place.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);
}

/// GA hyperparameters.
///
/// # Example
///
/// ```
/// use u_ward::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_max_generations(60)
///     .with_seed(7)
///     .with_parallel(false);
/// assert_eq!(config.population_size, 40);
/// assert_eq!(config.elite_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Individuals per generation (default: 80).
    pub population_size: usize,
    /// Generation limit (default: 120).
    pub max_generations: usize,
    /// Per-gene mutation probability (default: 0.06).
    pub mutation_rate: f64,
    /// Probability a drawn gene is a referral (default: 0.08).
    pub referral_rate: f64,
    /// Greedy-constructed individuals in the initial population (default: 6).
    pub greedy_seeds: usize,
    /// Fraction of the population carried over unchanged (default: 0.05).
    pub elite_ratio: f64,
    /// Individuals sampled per tournament (default: 4).
    pub tournament_size: usize,
    /// Best-fitness change below which the run has converged (default: 1e-6).
    pub convergence_threshold: f64,
    /// Generation index after which early stopping is allowed (default: 10).
    pub min_generations: usize,
    /// RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Evaluate fitness on the rayon pool (default: true).
    pub parallel: bool,
    /// Cooperative cancellation flag, checked between generations.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 80,
            max_generations: 120,
            mutation_rate: 0.06,
            referral_rate: 0.08,
            greedy_seeds: 6,
            elite_ratio: 0.05,
            tournament_size: 4,
            convergence_threshold: 1e-6,
            min_generations: 10,
            seed: None,
            parallel: true,
            cancel: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation limit.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the referral probability for drawn genes.
    pub fn with_referral_rate(mut self, rate: f64) -> Self {
        self.referral_rate = rate;
        self
    }

    /// Sets the number of greedy seed individuals.
    pub fn with_greedy_seeds(mut self, count: usize) -> Self {
        self.greedy_seeds = count;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Attaches a cancellation flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Number of elites: `⌈elite_ratio · population_size⌉`, at least one.
    pub fn elite_count(&self) -> usize {
        let n = (self.elite_ratio * self.population_size as f64).ceil() as usize;
        n.clamp(1, self.population_size.max(1))
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.population_size == 0 {
            return Err(OptimizerError::EmptyPopulation);
        }
        if self.population_size > MAX_POPULATION {
            return Err(OptimizerError::ResourceExhausted(format!(
                "population {} exceeds {MAX_POPULATION}",
                self.population_size
            )));
        }
        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("referral_rate", self.referral_rate),
            ("elite_ratio", self.elite_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(OptimizerError::InvalidRate { name, value });
            }
        }
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    /// Best individual seen in any generation.
    pub best: I,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Best fitness of each generation, in order.
    pub history: Vec<f64>,
    /// Generations executed.
    pub generations: usize,
}

/// Runs a [`GaProblem`] under a [`GaConfig`].
pub struct GaRunner;

impl GaRunner {
    /// Executes the GA.
    ///
    /// # Errors
    /// Returns an [`OptimizerError`] for invalid or oversized parameters, a
    /// problem that fails its own check, non-finite fitness, or cancellation.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, OptimizerError> {
        config.validate()?;
        problem.check()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        population.extend(problem.seed_individuals(config.population_size));
        evaluate_all(problem, &mut population, config.parallel, 0)?;

        let (mut best, mut best_fitness) = fittest(&population)
            .map(|ind| (ind.clone(), ind.fitness()))
            .ok_or(OptimizerError::EmptyPopulation)?;

        let elite_count = config.elite_count().min(population.len());
        let mut history: Vec<f64> = Vec::new();

        for generation in 0..config.max_generations {
            if config.is_cancelled() {
                return Err(OptimizerError::Cancelled(generation));
            }

            let mut ranked: Vec<usize> = (0..population.len()).collect();
            ranked.sort_by(|&a, &b| population[b].fitness().total_cmp(&population[a].fitness()));

            let mut next: Vec<P::Individual> = Vec::with_capacity(config.population_size);
            next.extend(ranked.iter().take(elite_count).map(|&i| population[i].clone()));

            while next.len() < config.population_size {
                let a = tournament(&population, config.tournament_size, &mut rng);
                let b = tournament(&population, config.tournament_size, &mut rng);
                let (mut c1, mut c2) = problem.crossover(&population[a], &population[b], &mut rng);
                problem.mutate(&mut c1, &mut rng);
                problem.mutate(&mut c2, &mut rng);
                next.push(c1);
                if next.len() < config.population_size {
                    next.push(c2);
                }
            }

            population = next;
            evaluate_all(problem, &mut population, config.parallel, generation)?;

            let Some(gen_best) = fittest(&population) else {
                return Err(OptimizerError::EmptyPopulation);
            };
            let gen_fitness = gen_best.fitness();
            if gen_fitness > best_fitness {
                best_fitness = gen_fitness;
                best = gen_best.clone();
            }
            history.push(gen_fitness);
            debug!(generation, best = gen_fitness, best_ever = best_fitness, "ga generation");

            if generation > config.min_generations {
                if let [.., prev, last] = history.as_slice() {
                    if (last - prev).abs() < config.convergence_threshold {
                        debug!(generation, "ga converged");
                        break;
                    }
                }
            }
        }

        info!(generations = history.len(), best_fitness, "ga finished");

        Ok(GaResult {
            best,
            best_fitness,
            generations: history.len(),
            history,
        })
    }
}

/// Evaluates every individual, rejecting non-finite fitness.
fn evaluate_all<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
    generation: usize,
) -> Result<(), OptimizerError> {
    if parallel {
        population
            .par_iter_mut()
            .for_each(|ind| ind.set_fitness(problem.evaluate(ind)));
    } else {
        for ind in population.iter_mut() {
            ind.set_fitness(problem.evaluate(ind));
        }
    }
    match population.iter().map(Individual::fitness).find(|f| !f.is_finite()) {
        Some(bad) => Err(OptimizerError::NonFiniteFitness(bad, generation)),
        None => Ok(()),
    }
}

/// Fittest individual; the earliest wins ties.
fn fittest<I: Individual>(population: &[I]) -> Option<&I> {
    population.iter().fold(None, |best, ind| match best {
        Some(b) if b.fitness() >= ind.fitness() => Some(b),
        _ => Some(ind),
    })
}

/// Tournament selection: index of the fittest of `size` distinct samples.
fn tournament<I: Individual, R: Rng>(population: &[I], size: usize, rng: &mut R) -> usize {
    let k = size.max(1).min(population.len());
    let mut winner: Option<usize> = None;
    for i in index::sample(rng, population.len(), k).iter() {
        match winner {
            Some(w) if population[w].fitness() >= population[i].fitness() => {}
            _ => winner = Some(i),
        }
    }
    winner.unwrap_or(0)
}
