//! Fitness of a chromosome: inverse of the summed dissimilarity over all
//! adjacent piece pairs in its grid.

use crate::analysis::CompatibilityIndex;
use crate::chromosome::Chromosome;
use crate::orientation::PairOrientation;
use crate::population::Population;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

/// Fitness scores are reals; `OrderedFloat` gives them the total order
/// needed for sorting and best-of selection.
pub type FitnessValue = OrderedFloat<f64>;

/// Scaling constant `K` in `fitness = K / (1/K + Σ diss)`. A perfectly
/// assembled puzzle (zero total dissimilarity) scores `K²`.
pub const FITNESS_FACTOR: f64 = 1000.0;

/// Evaluates chromosomes against a [`CompatibilityIndex`].
///
/// Higher is better. Scores are cached on the chromosome: the population
/// sweep only fills chromosomes whose slot is still empty, so elites carry
/// their score across generations and a score is never recomputed.
#[derive(Clone, Copy, Debug)]
pub struct EdgeFitness<'a> {
    index: &'a CompatibilityIndex,
}

impl<'a> EdgeFitness<'a> {
    pub fn new(index: &'a CompatibilityIndex) -> Self {
        Self { index }
    }

    /// Fills the missing fitness scores of a population, in parallel when
    /// `par` is set. The index is read-only, so workers share it freely.
    pub fn call_for_population(&self, population: &mut Population, par: bool) {
        if par {
            population
                .chromosomes
                .par_iter_mut()
                .filter(|c| c.fitness_score.is_none())
                .for_each(|c| self.call_for_chromosome(c));
        } else {
            population
                .chromosomes
                .iter_mut()
                .filter(|c| c.fitness_score.is_none())
                .for_each(|c| self.call_for_chromosome(c));
        }
    }

    pub fn call_for_chromosome(&self, chromosome: &mut Chromosome) {
        chromosome.fitness_score = Some(self.calculate_for_chromosome(chromosome));
    }

    pub fn calculate_for_chromosome(&self, chromosome: &Chromosome) -> FitnessValue {
        let mut total = 1.0 / FITNESS_FACTOR;
        // horizontal adjacencies
        for row in 0..chromosome.rows {
            for column in 0..chromosome.columns - 1 {
                let position = row * chromosome.columns + column;
                total += self.index.dissimilarity(
                    chromosome.genes[position],
                    chromosome.genes[position + 1],
                    PairOrientation::LeftRight,
                );
            }
        }
        // vertical adjacencies
        for row in 0..chromosome.rows - 1 {
            for column in 0..chromosome.columns {
                let position = row * chromosome.columns + column;
                total += self.index.dissimilarity(
                    chromosome.genes[position],
                    chromosome.genes[position + chromosome.columns],
                    PairOrientation::TopDown,
                );
            }
        }
        OrderedFloat(FITNESS_FACTOR / total)
    }
}
