//! A genetic algorithm solver for square-piece jigsaw puzzles.
//!
//! A puzzle is an image cut into a grid of equal-sized square pieces and
//! randomly permuted. The solver searches for the permutation minimizing
//! color discontinuity across adjacent piece edges. There are three main
//! elements to this approach:
//! * The [CompatibilityIndex](crate::analysis::CompatibilityIndex): pairwise
//!   edge dissimilarity of all pieces plus per-side neighbor rankings, built
//!   once per puzzle
//! * The kernel-growth [crossover](crate::crossover): grows a child solution
//!   piece by piece, guided by parental agreement and the index
//! * The [Evolve](crate::evolve::Evolve) strategy: the generational loop of
//!   fitness evaluation, elitism, roulette selection and crossover
//!
//! Terminology:
//! * [PieceSet](crate::puzzle::PieceSet): the immutable ordered collection of
//!   puzzle pieces, cut row-major from the source image
//! * [Chromosome](crate::chromosome): one candidate solution, a permutation
//!   of piece ids on an R×C grid
//! * [Fitness](crate::fitness): inverse of the summed edge dissimilarity over
//!   all adjacent pairs in the grid; higher is better
//! * Buddy: a mutual best match, `b` is the best match of `a` on side `s`
//!   and `a` is the best match of `b` on the complement of `s`
//!
//! Multithreading uses [rayon::iter] throughout: index construction, fitness
//! evaluation and the crossovers within a generation all parallelize.
//!
//! ## Quick Usage
//!
//! ```rust
//! use image::RgbImage;
//! use jigsolve::evolve::Evolve;
//! use jigsolve::puzzle::PieceSet;
//!
//! // the puzzle: a 64x64 image cut into four 32x32 pieces
//! let image = RgbImage::from_fn(64, 64, |x, y| image::Rgb([x as u8, y as u8, 0]));
//! let pieces = PieceSet::from_image(&image, 32).unwrap();
//!
//! // the search strategy
//! let mut evolve = Evolve::builder()
//!     .with_piece_set(pieces.clone())
//!     .with_target_population_size(50)    // evolve with 50 chromosomes
//!     .with_max_generations(20)           // generation cap
//!     .with_max_stale_generations(10)     // stop early without improvement
//!     .with_rng_seed_from_u64(0)          // deterministic run
//!     .build()
//!     .unwrap();
//!
//! // it's all about the best chromosome after all
//! let best = evolve.call().unwrap();
//! let solution = pieces.assemble(&best.genes).unwrap();
//! assert_eq!(solution.dimensions(), (64, 64));
//! ```
//!
//! ## Tests
//!
//! Use the `.with_rng_seed_from_u64(0)` builder step to create deterministic
//! test results. A seeded run keeps crossovers sequential; unseeded runs
//! parallelize them with per-worker rngs.

pub mod analysis;
pub mod chromosome;
pub mod crossover;
pub mod error;
pub mod evolve;
pub mod fitness;
pub mod orientation;
pub mod piece;
pub mod population;
pub mod puzzle;
pub mod select;
pub mod size_detector;
