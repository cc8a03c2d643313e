mod support;

use image::{Rgb, RgbImage};
use jigsolve::error::Error;
use jigsolve::puzzle::PieceSet;
use jigsolve::size_detector::detect_piece_size;
use rand::prelude::*;
use rand::rngs::SmallRng;

#[test]
fn single_candidate_is_returned_directly() {
    // 64x64 admits only 32 as a piece size, no scoring needed
    let image = RgbImage::from_pixel(64, 64, Rgb([50, 50, 50]));
    assert_eq!(detect_piece_size(&image).unwrap(), 32);
}

#[test]
fn detects_the_true_size_of_a_scrambled_puzzle() {
    // 128x128 admits 32 and 64; a puzzle cut at 32 must score 32 highest
    let image = support::seamless_image(4, 4, 32);
    let pieces = PieceSet::from_image(&image, 32).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);
    let puzzle = pieces.shuffled_image(&mut rng).unwrap();

    assert_eq!(detect_piece_size(&puzzle).unwrap(), 32);
}

#[test]
fn prefers_the_coarser_grid_when_pieces_are_larger() {
    // same dimensions, but cut at 64: the 32 grid dilutes its seam signal
    // with smooth in-piece columns and must lose
    let image = support::seamless_image(2, 2, 64);
    let pieces = PieceSet::from_image(&image, 64).unwrap();
    let puzzle = pieces.assemble(&[3, 2, 1, 0]).unwrap();

    assert_eq!(detect_piece_size(&puzzle).unwrap(), 64);
}

#[test]
fn rejects_images_without_an_admissible_size() {
    // 50x50 has no divisor in the admissible range
    let image = RgbImage::from_pixel(50, 50, Rgb([0, 0, 0]));
    assert!(matches!(
        detect_piece_size(&image),
        Err(Error::NoPieceSize { .. })
    ));
}
