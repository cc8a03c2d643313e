//! A solution strategy for assembling the puzzle using evolution.

use crate::analysis::CompatibilityIndex;
use crate::chromosome::Chromosome;
use crate::crossover::crossover;
use crate::error::Error;
use crate::fitness::EdgeFitness;
use crate::population::Population;
use crate::puzzle::PieceSet;
use crate::select;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use std::cell::RefCell;
use std::fmt;
use thread_local::ThreadLocal;

const DEFAULT_MAX_STALE_GENERATIONS: usize = 10;
const DEFAULT_ELITISM_RATE: f64 = 0.02;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TryFromEvolveBuilderError(pub &'static str);

/// The Evolve strategy analyzes the piece set once, initializes a random
/// population of chromosomes, then runs through generations in a loop:
/// * calculate [fitness](crate::fitness) for all chromosomes
/// * copy the top elites into the next generation unchanged
/// * [select](crate::select) parent pairs by roulette wheel
/// * produce one child per pair via [crossover](crate::crossover)
/// * check ending conditions
///
/// The run ends at the generation cap, or earlier when the best fitness
/// has not strictly improved for `max_stale_generations` generations.
///
/// See [EvolveBuilder] for initialization options.
///
/// Example:
/// ```
/// use image::RgbImage;
/// use jigsolve::evolve::Evolve;
/// use jigsolve::puzzle::PieceSet;
///
/// let image = RgbImage::from_fn(64, 64, |x, y| image::Rgb([x as u8, y as u8, 0]));
/// let pieces = PieceSet::from_image(&image, 32).unwrap();
///
/// let mut evolve = Evolve::builder()
///     .with_piece_set(pieces)
///     .with_target_population_size(50)
///     .with_max_generations(20)
///     .with_rng_seed_from_u64(0)
///     .build()
///     .unwrap();
///
/// let best = evolve.call().unwrap();
/// assert_eq!(best.genes.len(), 4);
/// ```
pub struct Evolve {
    pub piece_set: PieceSet,
    pub config: EvolveConfig,
    pub state: EvolveState,
}

#[derive(Clone, Debug)]
pub struct EvolveConfig {
    pub target_population_size: usize,
    pub max_generations: usize,
    pub max_stale_generations: usize,
    pub elitism_rate: f64,
    pub par_fitness: bool,
    pub par_crossover: bool,
    pub rng_seed: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct EvolveState {
    pub current_generation: usize,
    pub best_generation: usize,
    pub best_chromosome: Option<Chromosome>,
}

impl Evolve {
    pub fn builder() -> EvolveBuilder {
        EvolveBuilder::new()
    }

    /// Runs the generational loop and returns the fittest chromosome seen.
    pub fn call(&mut self) -> Result<Chromosome, Error> {
        self.state = EvolveState::default();
        let index = CompatibilityIndex::analyze(&self.piece_set);
        let fitness = EdgeFitness::new(&index);

        let mut rng = match self.config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let rows = self.piece_set.rows();
        let columns = self.piece_set.columns();
        let population_size = self.config.target_population_size;
        let elite_size = ((population_size as f64 * self.config.elitism_rate) as usize)
            .clamp(1, population_size - 1);

        let mut population = Population::new(
            (0..population_size)
                .map(|_| Chromosome::random(rows, columns, &mut rng))
                .collect(),
        );

        while self.state.current_generation < self.config.max_generations {
            self.state.current_generation += 1;

            fitness.call_for_population(&mut population, self.config.par_fitness);
            self.update_best_chromosome(&population);
            self.report_round(&population);
            if self.is_finished_by_max_stale_generations() {
                log::debug!(
                    "early stop: no improvement for {} generations",
                    self.config.max_stale_generations
                );
                break;
            }

            let elites = population.elites(elite_size)?;
            let pairs =
                select::parent_pairs(&population, population_size - elite_size, &mut rng)?;
            let children = self.reproduce(&population, &pairs, &index, &mut rng);
            population = Population::new(elites.into_iter().chain(children).collect());
        }

        self.state
            .best_chromosome
            .clone()
            .ok_or(Error::FitnessNotReady)
    }

    /// One crossover per parent pair. Parallel reproduction draws per-worker
    /// rngs from entropy; a seeded run stays sequential so the outcome is a
    /// function of the seed alone.
    fn reproduce<R: Rng>(
        &self,
        population: &Population,
        pairs: &[(usize, usize)],
        index: &CompatibilityIndex,
        rng: &mut R,
    ) -> Vec<Chromosome> {
        if self.config.par_crossover && self.config.rng_seed.is_none() {
            let worker_rng: ThreadLocal<RefCell<SmallRng>> = ThreadLocal::new();
            pairs
                .par_iter()
                .map(|&(first, second)| {
                    let mut rng = worker_rng
                        .get_or(|| RefCell::new(SmallRng::from_entropy()))
                        .borrow_mut();
                    crossover(
                        &population.chromosomes[first],
                        &population.chromosomes[second],
                        index,
                        &mut *rng,
                    )
                })
                .collect()
        } else {
            pairs
                .iter()
                .map(|&(first, second)| {
                    crossover(
                        &population.chromosomes[first],
                        &population.chromosomes[second],
                        index,
                        rng,
                    )
                })
                .collect()
        }
    }

    fn update_best_chromosome(&mut self, population: &Population) {
        let contending = population.best_chromosome();
        let improved = match (&self.state.best_chromosome, contending) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(current), Some(contending)) => {
                contending.fitness_score > current.fitness_score
            }
        };
        if improved {
            self.state.best_chromosome = contending.cloned();
            self.state.best_generation = self.state.current_generation;
        }
    }

    fn is_finished_by_max_stale_generations(&self) -> bool {
        self.state.current_generation - self.state.best_generation
            >= self.config.max_stale_generations
    }

    fn report_round(&self, population: &Population) {
        log::debug!(
            "generation (current/best): {}/{}, fitness score (best/count/median/mean/stddev/cardinality): {:?} / {} / {:?} / {:.3} / {:.3} / {:?}",
            self.state.current_generation,
            self.state.best_generation,
            self.state.best_chromosome.as_ref().and_then(|c| c.fitness_score),
            population.fitness_score_count(),
            population.fitness_score_median(),
            population.fitness_score_mean(),
            population.fitness_score_stddev(),
            population.fitness_score_cardinality(),
        );
    }
}

/// The builder for an Evolve struct.
#[derive(Clone, Debug, Default)]
pub struct EvolveBuilder {
    pub piece_set: Option<PieceSet>,
    pub target_population_size: usize,
    pub max_generations: Option<usize>,
    pub max_stale_generations: Option<usize>,
    pub elitism_rate: Option<f64>,
    pub par_fitness: bool,
    pub par_crossover: bool,
    pub rng_seed: Option<u64>,
}

impl EvolveBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_piece_set(mut self, piece_set: PieceSet) -> Self {
        self.piece_set = Some(piece_set);
        self
    }
    pub fn with_target_population_size(mut self, target_population_size: usize) -> Self {
        self.target_population_size = target_population_size;
        self
    }
    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = Some(max_generations);
        self
    }
    pub fn with_max_stale_generations(mut self, max_stale_generations: usize) -> Self {
        self.max_stale_generations = Some(max_stale_generations);
        self
    }
    pub fn with_elitism_rate(mut self, elitism_rate: f64) -> Self {
        self.elitism_rate = Some(elitism_rate);
        self
    }
    pub fn with_par_fitness(mut self, par_fitness: bool) -> Self {
        self.par_fitness = par_fitness;
        self
    }
    pub fn with_par_crossover(mut self, par_crossover: bool) -> Self {
        self.par_crossover = par_crossover;
        self
    }
    pub fn with_rng_seed_from_u64(mut self, rng_seed: u64) -> Self {
        self.rng_seed = Some(rng_seed);
        self
    }
    pub fn build(self) -> Result<Evolve, TryFromEvolveBuilderError> {
        self.try_into()
    }
}

impl TryFrom<EvolveBuilder> for Evolve {
    type Error = TryFromEvolveBuilderError;

    fn try_from(builder: EvolveBuilder) -> Result<Self, Self::Error> {
        if builder.piece_set.is_none() {
            Err(TryFromEvolveBuilderError("Evolve requires a PieceSet"))
        } else if builder.target_population_size < 2 {
            Err(TryFromEvolveBuilderError(
                "Evolve requires a target_population_size >= 2",
            ))
        } else if builder.max_generations.map_or(true, |g| g == 0) {
            Err(TryFromEvolveBuilderError(
                "Evolve requires max_generations >= 1",
            ))
        } else {
            Ok(Self {
                piece_set: builder.piece_set.unwrap(),
                config: EvolveConfig {
                    target_population_size: builder.target_population_size,
                    max_generations: builder.max_generations.unwrap(),
                    max_stale_generations: builder
                        .max_stale_generations
                        .unwrap_or(DEFAULT_MAX_STALE_GENERATIONS),
                    elitism_rate: builder.elitism_rate.unwrap_or(DEFAULT_ELITISM_RATE),
                    par_fitness: builder.par_fitness,
                    par_crossover: builder.par_crossover,
                    rng_seed: builder.rng_seed,
                },
                state: EvolveState::default(),
            })
        }
    }
}

impl fmt::Display for EvolveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "evolve_config:")?;
        writeln!(
            f,
            "  target_population_size: {}",
            self.target_population_size
        )?;
        writeln!(f, "  max_generations: {}", self.max_generations)?;
        writeln!(
            f,
            "  max_stale_generations: {}",
            self.max_stale_generations
        )?;
        writeln!(f, "  elitism_rate: {}", self.elitism_rate)?;
        writeln!(f, "  par_fitness: {}", self.par_fitness)?;
        writeln!(f, "  par_crossover: {}", self.par_crossover)?;
        writeln!(f, "  rng_seed: {:?}", self.rng_seed)
    }
}

impl fmt::Display for EvolveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "evolve_state:")?;
        writeln!(f, "  current generation: {}", self.current_generation)?;
        writeln!(f, "  best generation: {}", self.best_generation)?;
        writeln!(f, "  best fitness score: {:?}", self.best_fitness_score())
    }
}

impl EvolveState {
    pub fn best_fitness_score(&self) -> Option<crate::fitness::FitnessValue> {
        self.best_chromosome.as_ref().and_then(|c| c.fitness_score)
    }
}
