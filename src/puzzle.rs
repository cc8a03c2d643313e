//! Cutting a puzzle image into pieces and stitching pieces back together.

use crate::error::Error;
use crate::piece::{Piece, PieceId};
use image::{imageops, GenericImage, RgbImage};
use rand::prelude::*;

/// An immutable ordered collection of the puzzle's pieces.
///
/// Pieces are cut from the source image in row-major order (top-to-bottom
/// rows, left-to-right within a row) and assigned ids `0..N` in that same
/// order, so the id doubles as the piece's position in the solved puzzle.
#[derive(Clone, Debug)]
pub struct PieceSet {
    pieces: Vec<Piece>,
    rows: usize,
    columns: usize,
    piece_size: u32,
}

impl PieceSet {
    /// Cuts `image` into square pieces of `piece_size` pixels.
    ///
    /// Both image dimensions must be integer multiples of `piece_size`,
    /// otherwise [`Error::ShapeMismatch`] is returned.
    pub fn from_image(image: &RgbImage, piece_size: u32) -> Result<Self, Error> {
        let (width, height) = image.dimensions();
        if piece_size == 0 || width % piece_size != 0 || height % piece_size != 0 {
            return Err(Error::ShapeMismatch {
                width,
                height,
                piece_size,
            });
        }

        let rows = (height / piece_size) as usize;
        let columns = (width / piece_size) as usize;
        let mut pieces = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                let x = column as u32 * piece_size;
                let y = row as u32 * piece_size;
                let pixels = imageops::crop_imm(image, x, y, piece_size, piece_size).to_image();
                pieces.push(Piece::new(pieces.len(), pixels));
            }
        }

        Ok(Self {
            pieces,
            rows,
            columns,
            piece_size,
        })
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn piece_size(&self) -> u32 {
        self.piece_size
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id]
    }

    /// Stitches an ordered arrangement of piece ids back into an image.
    /// `genes` is row-major, like the cutting order.
    pub fn assemble(&self, genes: &[PieceId]) -> Result<RgbImage, Error> {
        let width = self.columns as u32 * self.piece_size;
        let height = self.rows as u32 * self.piece_size;
        let mut target = RgbImage::new(width, height);
        for (position, &id) in genes.iter().enumerate() {
            let x = (position % self.columns) as u32 * self.piece_size;
            let y = (position / self.columns) as u32 * self.piece_size;
            target.copy_from(self.piece(id).pixels(), x, y)?;
        }
        Ok(target)
    }

    /// A scrambled rendition of the puzzle: pieces in random order.
    pub fn shuffled_image<R: Rng>(&self, rng: &mut R) -> Result<RgbImage, Error> {
        let mut genes: Vec<PieceId> = (0..self.len()).collect();
        genes.shuffle(rng);
        self.assemble(&genes)
    }
}
