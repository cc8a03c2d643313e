//! Crate-wide error type.

/// Errors surfaced to the driver. None of these are retried internally;
/// the solver run is aborted and the error is reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The puzzle image cannot be cut into an integer grid of square pieces.
    #[error("image dimensions {width}x{height} are not divisible by piece size {piece_size}")]
    ShapeMismatch {
        width: u32,
        height: u32,
        piece_size: u32,
    },

    /// A fitness score was read before the chromosome was evaluated.
    #[error("fitness score read before evaluation")]
    FitnessNotReady,

    /// A detached fitness score list does not line up with the population.
    #[error("expected {expected} fitness scores for the population, got {actual}")]
    FitnessCountMismatch { expected: usize, actual: usize },

    /// Piece size autodetection found no admissible candidate.
    #[error("no admissible piece size for a {width}x{height} image")]
    NoPieceSize { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
