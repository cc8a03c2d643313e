//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use image::{Rgb, RgbImage};
use jigsolve::puzzle::PieceSet;
use rand::prelude::*;
use rand::rngs::SmallRng;

/// An image of constant-color tiles, laid out row-major, cuttable into a
/// `PieceSet` whose piece ids match the tile order.
pub fn tiled_image(tiles: &[[u8; 3]], rows: u32, columns: u32, piece_size: u32) -> RgbImage {
    assert_eq!(tiles.len() as u32, rows * columns);
    RgbImage::from_fn(columns * piece_size, rows * piece_size, |x, y| {
        let tile = (y / piece_size) * columns + x / piece_size;
        Rgb(tiles[tile as usize])
    })
}

/// A smooth gradient image whose abutting pixel columns and rows are
/// *equal* across every piece boundary of `piece_size`: cutting it yields
/// a puzzle where all true adjacencies have dissimilarity exactly zero,
/// while any other pairing stays visibly discontinuous.
pub fn seamless_image(rows: u32, columns: u32, piece_size: u32) -> RgbImage {
    let ramp = |t: u32| (t - t / piece_size) as u8;
    RgbImage::from_fn(columns * piece_size, rows * piece_size, |x, y| {
        Rgb([ramp(x), ramp(y), 0])
    })
}

/// Per-pixel random noise, seeded.
pub fn noise_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = SmallRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]))
}

pub fn noise_pieces(rows: u32, columns: u32, piece_size: u32, seed: u64) -> PieceSet {
    let image = noise_image(columns * piece_size, rows * piece_size, seed);
    PieceSet::from_image(&image, piece_size).unwrap()
}
