//! Kernel-growth crossover.
//!
//! A child is grown from a single seed piece by repeatedly gluing the most
//! promising piece onto the boundary of the part already assembled (the
//! kernel). Candidates come from three tiers: edges both parents agree on,
//! mutual-best-match buddies backed by at least one parent, and plain best
//! matches from the compatibility rankings. The kernel grows on an
//! unbounded lattice; a bounding-box check keeps it inside an R×C window,
//! and the finished kernel is cropped to the child's grid.

use crate::analysis::CompatibilityIndex;
use crate::chromosome::Chromosome;
use crate::orientation::Side;
use crate::piece::PieceId;
use fixedbitset::FixedBitSet;
use ordered_float::OrderedFloat;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Priority of a piece both parents place on the same edge.
const SHARED_PRIORITY: f64 = -10.0;
/// Priority of a mutual best match backed by at least one parent.
const BUDDY_PRIORITY: f64 = -1.0;

type Position = (i32, i32);

/// A queued proposal to place `piece` at `position`. `source` remembers
/// which kernel piece and side proposed it, so a stale entry (its piece
/// got placed elsewhere first) can be re-proposed for the same position.
///
/// The derived lexicographic order makes the heap pop by ascending
/// priority; the remaining fields only break ties deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    priority: OrderedFloat<f64>,
    position: Position,
    piece: PieceId,
    source: (PieceId, Side),
}

/// Produces a child chromosome from two parents, seeded at a piece drawn
/// uniformly from the first parent.
///
/// Both parents must arrange the same piece set on the same grid. The
/// child conserves the piece multiset and the grid dimensions.
pub fn crossover<R: Rng>(
    first_parent: &Chromosome,
    second_parent: &Chromosome,
    index: &CompatibilityIndex,
    rng: &mut R,
) -> Chromosome {
    let root = first_parent.genes[rng.gen_range(0..first_parent.len())];
    crossover_from_root(first_parent, second_parent, index, root)
}

/// [`crossover`] with an explicit seed piece, for reproducible growth.
pub fn crossover_from_root(
    first_parent: &Chromosome,
    second_parent: &Chromosome,
    index: &CompatibilityIndex,
    root: PieceId,
) -> Chromosome {
    debug_assert_eq!(first_parent.len(), second_parent.len());
    debug_assert_eq!(first_parent.columns, second_parent.columns);
    KernelGrowth::new(first_parent, second_parent, index).run(root)
}

struct KernelGrowth<'a> {
    first_parent: &'a Chromosome,
    second_parent: &'a Chromosome,
    index: &'a CompatibilityIndex,
    rows: i32,
    columns: i32,
    length: usize,
    // bounding box of all accepted positions, seed at the origin
    min_row: i32,
    max_row: i32,
    min_col: i32,
    max_col: i32,
    kernel: Vec<Option<Position>>,
    placed: FixedBitSet,
    placed_count: usize,
    taken: FxHashSet<Position>,
    candidates: BinaryHeap<Reverse<Candidate>>,
}

impl<'a> KernelGrowth<'a> {
    fn new(
        first_parent: &'a Chromosome,
        second_parent: &'a Chromosome,
        index: &'a CompatibilityIndex,
    ) -> Self {
        let length = first_parent.len();
        Self {
            first_parent,
            second_parent,
            index,
            rows: first_parent.rows as i32,
            columns: first_parent.columns as i32,
            length,
            min_row: 0,
            max_row: 0,
            min_col: 0,
            max_col: 0,
            kernel: vec![None; length],
            placed: FixedBitSet::with_capacity(length),
            placed_count: 0,
            taken: FxHashSet::default(),
            candidates: BinaryHeap::new(),
        }
    }

    fn run(mut self, root: PieceId) -> Chromosome {
        self.place(root, (0, 0));

        while let Some(Reverse(candidate)) = self.candidates.pop() {
            if self.taken.contains(&candidate.position) {
                continue;
            }
            if self.placed.contains(candidate.piece) {
                // stale: the piece went elsewhere first, re-propose for
                // this position from the original source edge
                let (source, side) = candidate.source;
                self.add_candidate(source, side, candidate.position);
                continue;
            }
            self.place(candidate.piece, candidate.position);
        }

        self.into_chromosome()
    }

    fn place(&mut self, piece: PieceId, position: Position) {
        self.kernel[piece] = Some(position);
        self.placed.insert(piece);
        self.placed_count += 1;
        self.taken.insert(position);
        for (side, neighbor) in self.available_boundaries(position) {
            self.add_candidate(piece, side, neighbor);
        }
    }

    /// Free neighbor positions of `position` that fit the R×C window.
    ///
    /// The bounding box is updated here, when a position is enumerated and
    /// accepted, not when its piece is eventually placed. Once the box is
    /// R rows tall, positions above and below it stop being generated,
    /// which is what confines the kernel to the child's frame.
    fn available_boundaries(&mut self, (row, column): Position) -> Vec<(Side, Position)> {
        let mut boundaries = Vec::with_capacity(4);
        if self.placed_count == self.length {
            return boundaries;
        }
        for side in Side::ALL {
            let neighbor = match side {
                Side::Top => (row - 1, column),
                Side::Right => (row, column + 1),
                Side::Down => (row + 1, column),
                Side::Left => (row, column - 1),
            };
            if !self.taken.contains(&neighbor) && self.is_in_range(neighbor) {
                self.update_boundaries(neighbor);
                boundaries.push((side, neighbor));
            }
        }
        boundaries
    }

    fn is_in_range(&self, (row, column): Position) -> bool {
        self.max_row.max(row) - self.min_row.min(row) < self.rows
            && self.max_col.max(column) - self.min_col.min(column) < self.columns
    }

    fn update_boundaries(&mut self, (row, column): Position) {
        self.min_row = self.min_row.min(row);
        self.max_row = self.max_row.max(row);
        self.min_col = self.min_col.min(column);
        self.max_col = self.max_col.max(column);
    }

    /// Proposes a piece for `position`, the free neighbor on `side` of the
    /// kernel piece `source`. The first tier that yields a piece not yet
    /// in the kernel wins; shared edges outrank buddies, buddies outrank
    /// best matches, and best matches compete on raw dissimilarity.
    fn add_candidate(&mut self, source: PieceId, side: Side, position: Position) {
        if let Some(shared) = self.shared_edge(source, side) {
            self.push(SHARED_PRIORITY, position, shared, (source, side));
        } else if let Some(buddy) = self.buddy_edge(source, side) {
            self.push(BUDDY_PRIORITY, position, buddy, (source, side));
        } else if let Some((best, priority)) = self.best_match_edge(source, side) {
            self.push(priority, position, best, (source, side));
        }
    }

    fn push(&mut self, priority: f64, position: Position, piece: PieceId, source: (PieceId, Side)) {
        self.candidates.push(Reverse(Candidate {
            priority: OrderedFloat(priority),
            position,
            piece,
            source,
        }));
    }

    /// Tier 1: both parents agree on the neighbor.
    fn shared_edge(&self, source: PieceId, side: Side) -> Option<PieceId> {
        match (
            self.first_parent.edge(source, side),
            self.second_parent.edge(source, side),
        ) {
            (Some(first), Some(second)) if first == second && !self.placed.contains(first) => {
                Some(first)
            }
            _ => None,
        }
    }

    /// Tier 2: mutual best match, present on this edge in either parent.
    fn buddy_edge(&self, source: PieceId, side: Side) -> Option<PieceId> {
        let buddy = self.index.best_match(source, side);
        if self.index.best_match(buddy, side.complement()) != source {
            return None;
        }
        let in_either_parent = self.first_parent.edge(source, side) == Some(buddy)
            || self.second_parent.edge(source, side) == Some(buddy);
        if in_either_parent && !self.placed.contains(buddy) {
            Some(buddy)
        } else {
            None
        }
    }

    /// Tier 3: the best-ranked piece not yet in the kernel.
    fn best_match_edge(&self, source: PieceId, side: Side) -> Option<(PieceId, f64)> {
        self.index
            .best_matches(source, side)
            .iter()
            .find(|&&(piece, _)| !self.placed.contains(piece))
            .copied()
    }

    fn into_chromosome(self) -> Chromosome {
        let columns = self.columns as usize;
        let mut genes: Vec<Option<PieceId>> = vec![None; self.length];
        for (piece, position) in self.kernel.iter().enumerate() {
            if let Some((row, column)) = position {
                let position =
                    (row - self.min_row) as usize * columns + (column - self.min_col) as usize;
                genes[position] = Some(piece);
            }
        }

        // A starved queue can leave holes (see the crate docs on degenerate
        // crossover); fill them with the unused ids, ascending into
        // ascending slots, so the child stays a permutation.
        if self.placed_count < self.length {
            log::trace!(
                "kernel starved at {}/{} pieces, filling remaining slots",
                self.placed_count,
                self.length
            );
            let mut unused = (0..self.length).filter(|&piece| !self.placed.contains(piece));
            for slot in genes.iter_mut() {
                if slot.is_none() {
                    *slot = unused.next();
                }
            }
        }

        let genes = genes.into_iter().flatten().collect();
        Chromosome::from_genes(genes, self.rows as usize, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PieceSet;
    use image::RgbImage;
    use rand::prelude::*;
    use rand::rngs::SmallRng;

    fn noisy_index(rows: u32, columns: u32) -> CompatibilityIndex {
        let mut rng = SmallRng::seed_from_u64(42);
        let image = RgbImage::from_fn(columns * 8, rows * 8, |_, _| {
            image::Rgb([rng.gen(), rng.gen(), rng.gen()])
        });
        let pieces = PieceSet::from_image(&image, 8).unwrap();
        CompatibilityIndex::analyze(&pieces)
    }

    #[test]
    fn kernel_stays_within_grid_window() {
        let index = noisy_index(4, 4);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let first = Chromosome::random(4, 4, &mut rng);
            let second = Chromosome::random(4, 4, &mut rng);
            let root = first.genes[rng.gen_range(0..first.len())];

            let mut growth = KernelGrowth::new(&first, &second, &index);
            growth.place(root, (0, 0));
            while let Some(Reverse(candidate)) = growth.candidates.pop() {
                if growth.taken.contains(&candidate.position) {
                    continue;
                }
                if growth.placed.contains(candidate.piece) {
                    let (source, side) = candidate.source;
                    growth.add_candidate(source, side, candidate.position);
                    continue;
                }
                growth.place(candidate.piece, candidate.position);
            }

            assert_eq!(growth.placed_count, 16);
            assert!(growth.max_row - growth.min_row <= 3);
            assert!(growth.max_col - growth.min_col <= 3);
            for position in growth.kernel.iter().flatten() {
                assert!(position.0 >= growth.min_row && position.0 <= growth.max_row);
                assert!(position.1 >= growth.min_col && position.1 <= growth.max_col);
            }
        }
    }

    #[test]
    fn starved_kernel_fills_remaining_slots_deterministically() {
        let index = noisy_index(2, 2);
        let first = Chromosome::solved(2, 2);
        let second = Chromosome::solved(2, 2);

        let mut growth = KernelGrowth::new(&first, &second, &index);
        growth.place(3, (0, 0));
        growth.candidates.clear();
        let child = growth.into_chromosome();

        // the bounding box grew upward while enumerating the seed's
        // neighbors, so the placed piece lands in the second grid row;
        // holes fill with the unused ids in ascending order
        assert_eq!(child.genes, vec![0, 1, 3, 2]);
        assert_eq!((child.rows, child.columns), (2, 2));
    }
}
