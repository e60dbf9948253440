use image::Rgb32FImage;
use rayon::prelude::*;
use tracing::debug;

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::LightFieldFrame;
use crate::light_field::refocus::aperture::ApertureWeights;
use crate::light_field::refocus::realign::{focal_shift, realign_view};

/// How realigned views are combined.
#[derive(Debug, Clone, Copy)]
pub enum Weighting<'a> {
    /// Plain mean over all views.
    Uniform,
    /// Weighted sum; the weights are already normalized.
    Weighted(&'a ApertureWeights),
}

/// Realigns every view of `frame` for `alpha` and fuses them in floating point.
///
/// Views are realigned (and weighted) in parallel, each into its own buffer. The buffers
/// are then summed in view-id order, so the result is identical from run to run
/// regardless of how the work was scheduled.
pub fn accumulate(frame: &LightFieldFrame, alpha: f32, weighting: Weighting<'_>) -> Result<Rgb32FImage> {
    let grid = frame.grid();
    let view_count = grid.view_count();

    if let Weighting::Weighted(weights) = weighting {
        if weights.len() != view_count {
            return Err(LightFieldError::ViewCountMismatch {
                expected: view_count,
                got: weights.len(),
            });
        }
    }

    let contributions: Vec<Vec<f32>> = frame
        .views()
        .par_iter()
        .enumerate()
        .map(|(view_id, view)| {
            let (dx, dy) = focal_shift(grid, grid.coord(view_id), alpha);
            let mut realigned = realign_view(view, dx, dy).into_raw();
            if let Weighting::Weighted(weights) = weighting {
                let weight = weights.as_slice()[view_id];
                realigned.iter_mut().for_each(|value| *value *= weight);
            }
            realigned
        })
        .collect();

    let (width, height) = (frame.width(), frame.height());
    let mut sum = vec![0.0f32; contributions[0].len()];
    for contribution in &contributions {
        for (acc, value) in sum.iter_mut().zip(contribution) {
            *acc += value;
        }
    }

    if let Weighting::Uniform = weighting {
        let count = view_count as f32;
        sum.iter_mut().for_each(|value| *value /= count);
    }

    debug!(views = view_count, width, height, alpha, "Accumulated views");

    Rgb32FImage::from_raw(width, height, sum)
        .ok_or(LightFieldError::InvalidDimensions(width, height))
}
