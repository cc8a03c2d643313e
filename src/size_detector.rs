//! Piece-size autodetection for scrambled puzzle images.

use crate::error::Error;
use image::RgbImage;
use itertools::Itertools;
use ordered_float::OrderedFloat;

pub const MIN_PIECE_SIZE: u32 = 32;
pub const MAX_PIECE_SIZE: u32 = 128;

/// Guesses the piece size of a scrambled puzzle image.
///
/// Candidates are the common divisors of both image dimensions in
/// `[MIN_PIECE_SIZE, min(w, h) / 2]`. A lone candidate is returned as-is.
/// Otherwise candidates are scored by contrast: the mean color
/// discontinuity across the grid seams the candidate implies, minus the
/// mean discontinuity everywhere else. Shuffled pieces leave visible cuts
/// exactly along the true grid, so the true size scores highest; a
/// multiple of the true size loses because the cuts it ignores inflate
/// its interior term.
pub fn detect_piece_size(image: &RgbImage) -> Result<u32, Error> {
    let (width, height) = image.dimensions();
    let candidates = possible_piece_sizes(width, height);

    match candidates[..] {
        [] => Err(Error::NoPieceSize { width, height }),
        [only] => Ok(only),
        _ => {
            let gaps = GapProfile::new(image);
            Ok(candidates
                .iter()
                .copied()
                .max_by_key(|&size| OrderedFloat(gaps.seam_contrast(size)))
                .expect("candidate list is non-empty"))
        }
    }
}

fn possible_piece_sizes(width: u32, height: u32) -> Vec<u32> {
    (MIN_PIECE_SIZE..=width.min(height) / 2)
        .filter(|size| width % size == 0 && height % size == 0)
        .collect_vec()
}

/// Summed squared normalized color difference between each pair of
/// adjacent pixel columns and rows, precomputed once so every candidate
/// size is scored in O(w + h).
struct GapProfile {
    column_gaps: Vec<f64>,
    row_gaps: Vec<f64>,
    samples_per_column: f64,
    samples_per_row: f64,
}

impl GapProfile {
    fn new(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut column_gaps = vec![0.0; width as usize];
        let mut row_gaps = vec![0.0; height as usize];

        for x in 1..width {
            for y in 0..height {
                column_gaps[x as usize] += pixel_distance(image, (x - 1, y), (x, y));
            }
        }
        for y in 1..height {
            for x in 0..width {
                row_gaps[y as usize] += pixel_distance(image, (x, y - 1), (x, y));
            }
        }

        Self {
            column_gaps,
            row_gaps,
            samples_per_column: height as f64,
            samples_per_row: width as f64,
        }
    }

    fn seam_contrast(&self, size: u32) -> f64 {
        let mut seam_total = 0.0;
        let mut seam_samples = 0.0;
        let mut interior_total = 0.0;
        let mut interior_samples = 0.0;

        for (x, gap) in self.column_gaps.iter().enumerate().skip(1) {
            if x as u32 % size == 0 {
                seam_total += *gap;
                seam_samples += self.samples_per_column;
            } else {
                interior_total += *gap;
                interior_samples += self.samples_per_column;
            }
        }
        for (y, gap) in self.row_gaps.iter().enumerate().skip(1) {
            if y as u32 % size == 0 {
                seam_total += *gap;
                seam_samples += self.samples_per_row;
            } else {
                interior_total += *gap;
                interior_samples += self.samples_per_row;
            }
        }

        seam_total / seam_samples - interior_total / interior_samples
    }
}

fn pixel_distance(image: &RgbImage, first: (u32, u32), second: (u32, u32)) -> f64 {
    let a = image.get_pixel(first.0, first.1).0;
    let b = image.get_pixel(second.0, second.1).0;
    (0..3)
        .map(|channel| {
            let difference = (a[channel] as i32 - b[channel] as i32) as f64 / 255.0;
            difference * difference
        })
        .sum()
}
