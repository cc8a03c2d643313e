//! The population is a container for [Chromosomes](Chromosome).

use crate::chromosome::Chromosome;
use crate::error::Error;
use crate::fitness::FitnessValue;
use cardinality_estimator::CardinalityEstimator;
use itertools::Itertools;
use std::cmp::Reverse;

#[derive(Clone, Debug, Default)]
pub struct Population {
    pub chromosomes: Vec<Chromosome>,
}

impl Population {
    pub fn new(chromosomes: Vec<Chromosome>) -> Self {
        Self { chromosomes }
    }

    pub fn size(&self) -> usize {
        self.chromosomes.len()
    }

    /// The chromosome with the highest fitness score. Unscored chromosomes
    /// never win; `None` when nothing is scored yet.
    pub fn best_chromosome(&self) -> Option<&Chromosome> {
        self.chromosomes
            .iter()
            .filter(|c| c.fitness_score.is_some())
            .max_by_key(|c| c.fitness_score)
    }

    /// The `amount` fittest chromosomes, descending by fitness, cloned for
    /// transfer into the next generation.
    ///
    /// Requires every chromosome to be scored; elitism on a partially
    /// evaluated population is a driver bug.
    pub fn elites(&self, amount: usize) -> Result<Vec<Chromosome>, Error> {
        if self.chromosomes.iter().any(|c| c.fitness_score.is_none()) {
            return Err(Error::FitnessNotReady);
        }
        Ok(self
            .chromosomes
            .iter()
            .sorted_unstable_by_key(|c| Reverse(c.fitness_score))
            .take(amount)
            .cloned()
            .collect())
    }

    /// Applies a detached score list, position by position. The list
    /// length must match the population size.
    pub fn set_fitness_scores(&mut self, scores: &[FitnessValue]) -> Result<(), Error> {
        if scores.len() != self.size() {
            return Err(Error::FitnessCountMismatch {
                expected: self.size(),
                actual: scores.len(),
            });
        }
        for (chromosome, &score) in self.chromosomes.iter_mut().zip(scores) {
            chromosome.fitness_score = Some(score);
        }
        Ok(())
    }

    pub fn fitness_score_count(&self) -> usize {
        self.chromosomes
            .iter()
            .filter(|c| c.fitness_score.is_some())
            .count()
    }

    pub fn fitness_score_mean(&self) -> f64 {
        stats::mean(self.scored())
    }

    pub fn fitness_score_median(&self) -> Option<f64> {
        stats::median(self.scored())
    }

    pub fn fitness_score_stddev(&self) -> f64 {
        stats::stddev(self.scored())
    }

    /// Estimated number of distinct fitness scores, a cheap convergence
    /// signal for the per-generation report.
    pub fn fitness_score_cardinality(&self) -> Option<usize> {
        let mut values = self
            .chromosomes
            .iter()
            .filter_map(|c| c.fitness_score)
            .peekable();
        if values.peek().is_some() {
            let mut estimator = CardinalityEstimator::<FitnessValue>::new();
            values.for_each(|score| estimator.insert(&score));
            Some(estimator.estimate())
        } else {
            None
        }
    }

    fn scored(&self) -> impl Iterator<Item = f64> + '_ {
        self.chromosomes
            .iter()
            .filter_map(|c| c.fitness_score)
            .map(|score| score.into_inner())
    }
}

impl From<Vec<Chromosome>> for Population {
    fn from(chromosomes: Vec<Chromosome>) -> Self {
        Self::new(chromosomes)
    }
}
