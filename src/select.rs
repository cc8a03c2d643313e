//! Roulette-wheel parent selection.

use crate::error::Error;
use crate::population::Population;
use rand::prelude::*;

/// Draws `count` parent pairs by fitness-proportional selection.
///
/// Cumulative fitness forms a wheel of intervals; each draw samples a
/// uniform value in `[0, total]` and binary-searches the interval it
/// lands in. Returned values are indices into the population.
///
/// Every chromosome must carry a fitness score ([`Error::FitnessNotReady`]
/// otherwise).
pub fn parent_pairs<R: Rng>(
    population: &Population,
    count: usize,
    rng: &mut R,
) -> Result<Vec<(usize, usize)>, Error> {
    let mut intervals = Vec::with_capacity(population.size());
    let mut total = 0.0;
    for chromosome in &population.chromosomes {
        let score = chromosome.fitness_score.ok_or(Error::FitnessNotReady)?;
        total += score.into_inner();
        intervals.push(total);
    }

    let mut select_parent = || {
        let sample = rng.gen_range(0.0..=total);
        intervals
            .partition_point(|&upper| upper < sample)
            .min(intervals.len() - 1)
    };

    Ok((0..count)
        .map(|_| (select_parent(), select_parent()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Chromosome;
    use ordered_float::OrderedFloat;
    use rand::rngs::SmallRng;

    fn scored_population(scores: &[f64]) -> Population {
        let chromosomes = scores
            .iter()
            .map(|&score| {
                let mut chromosome = Chromosome::solved(1, 2);
                chromosome.fitness_score = Some(OrderedFloat(score));
                chromosome
            })
            .collect();
        Population::new(chromosomes)
    }

    #[test]
    fn returns_requested_pair_count() {
        let population = scored_population(&[1.0, 2.0, 3.0]);
        let mut rng = SmallRng::seed_from_u64(0);
        let pairs = parent_pairs(&population, 5, &mut rng).unwrap();
        assert_eq!(pairs.len(), 5);
        assert!(pairs.iter().all(|&(a, b)| a < 3 && b < 3));
    }

    #[test]
    fn dominant_fitness_dominates_selection() {
        let population = scored_population(&[0.0, 1000.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(0);
        let pairs = parent_pairs(&population, 20, &mut rng).unwrap();
        assert!(pairs.iter().all(|&(a, b)| a == 1 && b == 1));
    }

    #[test]
    fn unevaluated_population_is_rejected() {
        let population = Population::new(vec![Chromosome::solved(1, 2)]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            parent_pairs(&population, 1, &mut rng),
            Err(Error::FitnessNotReady)
        ));
    }
}
