mod support;

use jigsolve::analysis::CompatibilityIndex;
use jigsolve::chromosome::Chromosome;
use jigsolve::crossover::{crossover, crossover_from_root};
use jigsolve::puzzle::PieceSet;
use rand::prelude::*;
use rand::rngs::SmallRng;

#[test]
fn child_conserves_pieces_and_dimensions() {
    let pieces = support::noise_pieces(4, 4, 8, 10);
    let index = CompatibilityIndex::analyze(&pieces);
    let mut rng = SmallRng::seed_from_u64(0);

    for _ in 0..30 {
        let first = Chromosome::random(4, 4, &mut rng);
        let second = Chromosome::random(4, 4, &mut rng);
        let child = crossover(&first, &second, &index, &mut rng);

        assert_eq!(child.rows, 4);
        assert_eq!(child.columns, 4);
        assert_eq!(child.len(), 16);
        let mut genes = child.genes.clone();
        genes.sort_unstable();
        assert_eq!(genes, (0..16).collect::<Vec<_>>());
    }
}

#[test]
fn child_conserves_pieces_on_rectangular_grids() {
    let pieces = support::noise_pieces(3, 5, 8, 11);
    let index = CompatibilityIndex::analyze(&pieces);
    let mut rng = SmallRng::seed_from_u64(1);

    for _ in 0..20 {
        let first = Chromosome::random(3, 5, &mut rng);
        let second = Chromosome::random(3, 5, &mut rng);
        let child = crossover(&first, &second, &index, &mut rng);

        assert_eq!((child.rows, child.columns), (3, 5));
        let mut genes = child.genes.clone();
        genes.sort_unstable();
        assert_eq!(genes, (0..15).collect::<Vec<_>>());
    }
}

#[test]
fn shared_edge_is_placed_first() {
    // both parents put piece 1 immediately right of piece 0; nothing else
    // is agreed upon, so the shared edge must be the first growth step
    let pieces = support::noise_pieces(2, 2, 8, 12);
    let index = CompatibilityIndex::analyze(&pieces);
    let first = Chromosome::from_genes(vec![0, 1, 2, 3], 2, 2);
    let second = Chromosome::from_genes(vec![0, 1, 3, 2], 2, 2);

    let child = crossover_from_root(&first, &second, &index, 0);

    let position = child.position_of(0);
    assert_eq!(position % child.columns, 0, "room to the right of the seed");
    assert_eq!(child.position_of(1), position + 1);
}

#[test]
fn buddy_edge_is_honored_when_one_parent_has_it() {
    // two pieces are trivially mutual best matches; only the first parent
    // arranges them as neighbors, which is enough for the buddy tier
    let pieces = support::noise_pieces(1, 2, 8, 13);
    let index = CompatibilityIndex::analyze(&pieces);
    let first = Chromosome::from_genes(vec![0, 1], 1, 2);
    let second = Chromosome::from_genes(vec![1, 0], 1, 2);

    let child = crossover_from_root(&first, &second, &index, 0);
    assert_eq!(child.genes, vec![0, 1]);
}

#[test]
fn seamless_parents_converge_on_true_adjacencies() {
    // with a seamless cut, mutual best matches are the true neighbors, so
    // a child of two random parents keeps the true left-right pair glued
    // once a parent exhibits it
    let image = support::seamless_image(2, 2, 32);
    let pieces = PieceSet::from_image(&image, 32).unwrap();
    let index = CompatibilityIndex::analyze(&pieces);

    let first = Chromosome::from_genes(vec![0, 1, 2, 3], 2, 2);
    let second = Chromosome::from_genes(vec![2, 3, 0, 1], 2, 2);
    // both parents agree on (0 left of 1) and (2 left of 3)
    let child = crossover_from_root(&first, &second, &index, 0);

    let mut genes = child.genes.clone();
    genes.sort_unstable();
    assert_eq!(genes, vec![0, 1, 2, 3]);
    assert_eq!(child.position_of(1), child.position_of(0) + 1);
    assert_eq!(child.position_of(3), child.position_of(2) + 1);
}
