//! Edge-compatibility analysis: the pairwise dissimilarity tables and the
//! per-(piece, side) neighbor rankings everything downstream reads from.

use crate::orientation::{PairOrientation, Side};
use crate::piece::{Piece, PieceId};
use crate::puzzle::PieceSet;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

/// Color difference across the abutting edge strip of two pieces.
///
/// For `LeftRight` the rightmost column of `first` is compared against the
/// leftmost column of `second`; for `TopDown` the bottom row of `first`
/// against the top row of `second`. Samples are normalized to `[0, 1]` per
/// channel, differences squared and summed over the strip, and the square
/// root taken, i.e. an L2 norm in normalized color space. The measure is
/// not symmetric in its arguments: the edges compared are different.
pub fn dissimilarity_measure(first: &Piece, second: &Piece, orientation: PairOrientation) -> f64 {
    let size = first.size();
    let mut total = 0.0;
    for offset in 0..size {
        let (a, b) = match orientation {
            PairOrientation::LeftRight => (first.sample(size - 1, offset), second.sample(0, offset)),
            PairOrientation::TopDown => (first.sample(offset, size - 1), second.sample(offset, 0)),
        };
        for channel in 0..3 {
            // subtract in a signed type, the samples are u8
            let difference = (a[channel] as i32 - b[channel] as i32) as f64 / 255.0;
            total += difference * difference;
        }
    }
    total.sqrt()
}

/// Process-scoped analysis table, built once per puzzle by [`analyze`](Self::analyze).
///
/// Holds the dissimilarity of every ordered piece pair in both pair
/// orientations, and for every piece and side a list of all other pieces
/// sorted by ascending dissimilarity. Read-only after construction and
/// safe to share across crossover workers without locking.
#[derive(Clone, Debug)]
pub struct CompatibilityIndex {
    num_pieces: usize,
    /// `d(left, right, LR)` at `left * num_pieces + right`.
    left_right: Vec<f64>,
    /// `d(top, bottom, TD)` at `top * num_pieces + bottom`.
    top_down: Vec<f64>,
    /// Ranking for `(id, side)` at `id * 4 + side.index()`.
    best_match: Vec<Vec<(PieceId, f64)>>,
}

impl CompatibilityIndex {
    /// Measures every ordered pair of pieces in both orientations and
    /// builds the sorted neighbor rankings.
    ///
    /// Θ(N²) measures of Θ(S) work each. The pair matrix rows and the
    /// rankings are filled in parallel; each cell depends only on the two
    /// pieces involved, so no coordination is needed beyond the joins.
    pub fn analyze(pieces: &PieceSet) -> Self {
        let num_pieces = pieces.len();
        let mut left_right = vec![0.0; num_pieces * num_pieces];
        let mut top_down = vec![0.0; num_pieces * num_pieces];

        left_right
            .par_chunks_mut(num_pieces.max(1))
            .zip(top_down.par_chunks_mut(num_pieces.max(1)))
            .enumerate()
            .for_each(|(first, (lr_row, td_row))| {
                for second in 0..num_pieces {
                    if second == first {
                        continue;
                    }
                    lr_row[second] = dissimilarity_measure(
                        pieces.piece(first),
                        pieces.piece(second),
                        PairOrientation::LeftRight,
                    );
                    td_row[second] = dissimilarity_measure(
                        pieces.piece(first),
                        pieces.piece(second),
                        PairOrientation::TopDown,
                    );
                }
            });

        let best_match = (0..num_pieces * 4)
            .into_par_iter()
            .map(|slot| {
                let id = slot / 4;
                let side = Side::ALL[slot % 4];
                let mut ranking: Vec<(PieceId, f64)> = (0..num_pieces)
                    .filter(|&other| other != id)
                    .map(|other| {
                        let measure = match side {
                            // other piece placed on that side of `id`
                            Side::Right => left_right[id * num_pieces + other],
                            Side::Left => left_right[other * num_pieces + id],
                            Side::Down => top_down[id * num_pieces + other],
                            Side::Top => top_down[other * num_pieces + id],
                        };
                        (other, measure)
                    })
                    .collect();
                // stable sort keeps ascending-id order among equal measures
                ranking.sort_by_key(|&(_, measure)| OrderedFloat(measure));
                ranking
            })
            .collect();

        Self {
            num_pieces,
            left_right,
            top_down,
            best_match,
        }
    }

    pub fn num_pieces(&self) -> usize {
        self.num_pieces
    }

    /// Dissimilarity of the ordered pair `(first, second)` in `orientation`.
    /// Both orderings are stored; `dissimilarity(a, b, LR)` and
    /// `dissimilarity(b, a, LR)` are different numbers.
    pub fn dissimilarity(
        &self,
        first: PieceId,
        second: PieceId,
        orientation: PairOrientation,
    ) -> f64 {
        debug_assert_ne!(first, second);
        match orientation {
            PairOrientation::LeftRight => self.left_right[first * self.num_pieces + second],
            PairOrientation::TopDown => self.top_down[first * self.num_pieces + second],
        }
    }

    /// All other pieces as candidates for `side` of `id`, ascending by
    /// dissimilarity.
    pub fn best_matches(&self, id: PieceId, side: Side) -> &[(PieceId, f64)] {
        &self.best_match[id * 4 + side.index()]
    }

    /// The single best match for `side` of `id`.
    pub fn best_match(&self, id: PieceId, side: Side) -> PieceId {
        self.best_match[id * 4 + side.index()][0].0
    }
}
