mod support;

use approx::assert_relative_eq;
use image::{Rgb, RgbImage};
use jigsolve::evolve::Evolve;
use jigsolve::fitness::FITNESS_FACTOR;
use jigsolve::puzzle::PieceSet;

#[test]
fn solves_a_tiny_seamless_puzzle() {
    let image = support::seamless_image(2, 2, 32);
    let pieces = PieceSet::from_image(&image, 32).unwrap();

    let mut evolve = Evolve::builder()
        .with_piece_set(pieces)
        .with_target_population_size(150)
        .with_max_generations(100)
        .with_max_stale_generations(100)
        .with_rng_seed_from_u64(0)
        .build()
        .unwrap();

    let best = evolve.call().unwrap();

    let mut genes = best.genes.clone();
    genes.sort_unstable();
    assert_eq!(genes, vec![0, 1, 2, 3]);
    assert_relative_eq!(
        best.fitness_score.unwrap().into_inner(),
        FITNESS_FACTOR * FITNESS_FACTOR
    );
}

#[test]
fn stops_after_stale_generations() {
    // a uniform image gives every arrangement the ceiling fitness, so the
    // very first generation is the last improvement
    let image = RgbImage::from_pixel(64, 64, Rgb([7, 7, 7]));
    let pieces = PieceSet::from_image(&image, 32).unwrap();

    let mut evolve = Evolve::builder()
        .with_piece_set(pieces)
        .with_target_population_size(20)
        .with_max_generations(100)
        .with_max_stale_generations(10)
        .with_rng_seed_from_u64(0)
        .build()
        .unwrap();

    let best = evolve.call().unwrap();

    assert_eq!(evolve.state.best_generation, 1);
    assert_eq!(evolve.state.current_generation, 11);
    assert_relative_eq!(
        best.fitness_score.unwrap().into_inner(),
        FITNESS_FACTOR * FITNESS_FACTOR
    );
}

#[test]
fn respects_the_generation_cap() {
    let pieces = support::noise_pieces(3, 3, 8, 20);

    let mut evolve = Evolve::builder()
        .with_piece_set(pieces)
        .with_target_population_size(30)
        .with_max_generations(5)
        .with_max_stale_generations(50)
        .with_rng_seed_from_u64(0)
        .build()
        .unwrap();

    let best = evolve.call().unwrap();
    assert_eq!(evolve.state.current_generation, 5);
    assert_eq!(best.len(), 9);
}

#[test]
fn builder_requires_a_piece_set() {
    let result = Evolve::builder()
        .with_target_population_size(10)
        .with_max_generations(10)
        .build();
    assert!(result.is_err());
}

#[test]
fn builder_rejects_degenerate_population_sizes() {
    let pieces = support::noise_pieces(2, 2, 8, 21);
    let result = Evolve::builder()
        .with_piece_set(pieces)
        .with_target_population_size(1)
        .with_max_generations(10)
        .build();
    assert!(result.is_err());
}

#[test]
fn builder_rejects_a_missing_generation_cap() {
    let pieces = support::noise_pieces(2, 2, 8, 22);
    let result = Evolve::builder()
        .with_piece_set(pieces)
        .with_target_population_size(10)
        .build();
    assert!(result.is_err());
}
