//! A candidate solution: a permutation of piece ids on an R×C grid.

use crate::fitness::FitnessValue;
use crate::orientation::Side;
use crate::piece::PieceId;
use rand::prelude::*;

/// One possible arrangement of all puzzle pieces.
///
/// `genes` lists piece ids in row-major grid order. Apart from the
/// one-shot `fitness_score` slot, a chromosome is never mutated after
/// construction; crossover builds new chromosomes instead.
#[derive(Clone, Debug)]
pub struct Chromosome {
    pub genes: Vec<PieceId>,
    pub rows: usize,
    pub columns: usize,
    /// Filled exactly once by the fitness evaluator, `None` until then.
    pub fitness_score: Option<FitnessValue>,
    position_of: Vec<usize>,
}

impl Chromosome {
    /// Builds a chromosome from an explicit row-major arrangement.
    pub fn from_genes(genes: Vec<PieceId>, rows: usize, columns: usize) -> Self {
        debug_assert_eq!(genes.len(), rows * columns);
        let mut position_of = vec![0; genes.len()];
        for (position, &id) in genes.iter().enumerate() {
            position_of[id] = position;
        }
        Self {
            genes,
            rows,
            columns,
            fitness_score: None,
            position_of,
        }
    }

    /// A uniformly random arrangement of the `rows * columns` piece ids.
    pub fn random<R: Rng>(rows: usize, columns: usize, rng: &mut R) -> Self {
        let mut genes: Vec<PieceId> = (0..rows * columns).collect();
        genes.shuffle(rng);
        Self::from_genes(genes, rows, columns)
    }

    /// The identity arrangement: every piece at its cutting position.
    pub fn solved(rows: usize, columns: usize) -> Self {
        Self::from_genes((0..rows * columns).collect(), rows, columns)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Linear grid index of the piece with `id`.
    pub fn position_of(&self, id: PieceId) -> usize {
        self.position_of[id]
    }

    /// The id of the piece adjacent to `id` in `side` direction, or `None`
    /// when `id` sits on that boundary of the grid.
    pub fn edge(&self, id: PieceId, side: Side) -> Option<PieceId> {
        let position = self.position_of[id];
        match side {
            Side::Top if position >= self.columns => Some(self.genes[position - self.columns]),
            Side::Right if position % self.columns < self.columns - 1 => {
                Some(self.genes[position + 1])
            }
            Side::Down if position < (self.rows - 1) * self.columns => {
                Some(self.genes[position + self.columns])
            }
            Side::Left if position % self.columns > 0 => Some(self.genes[position - 1]),
            _ => None,
        }
    }
}
