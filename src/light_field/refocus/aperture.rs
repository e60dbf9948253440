//! Aperture weight model
//!
//! Maps a scalar aperture in `[0, 1]` to a normalized blending weight per view. Weights
//! fall off as `exp(-dist * sigma)` with the squared normalized distance of the view from
//! the grid centre, where `sigma = (1 - aperture) * 4`. A full aperture gives uniform
//! weights; smaller apertures concentrate weight on central views and shrink the
//! emulated depth of field.

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::ViewGrid;

/// Falloff sharpness at aperture 0.
const MAX_FALLOFF: f32 = 4.0;

/// Normalized per-view weights, indexed by view id. Always sums to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureWeights {
    weights: Vec<f32>,
}

impl ApertureWeights {
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn get(&self, view_id: usize) -> Option<f32> {
        self.weights.get(view_id).copied()
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

pub fn validate_aperture(aperture: f32) -> Result<()> {
    if (0.0..=1.0).contains(&aperture) {
        Ok(())
    } else {
        Err(LightFieldError::InvalidAperture(aperture))
    }
}

/// Computes the blending weight of every view of `grid` for `aperture`.
pub fn aperture_weights(grid: ViewGrid, aperture: f32) -> Result<ApertureWeights> {
    validate_aperture(aperture)?;

    let center = grid.center();
    let sigma = (1.0 - aperture) * MAX_FALLOFF;
    // A 1×1 grid has no extent to normalize by; its only view sits at distance 0.
    let norm = if center > 0.0 { center * center } else { 1.0 };

    let raw: Vec<f32> = grid
        .coords()
        .map(|(_, coord)| {
            let du = coord.u as f32 - center;
            let dv = coord.v as f32 - center;
            let dist = (du * du + dv * dv) / norm;
            (-dist * sigma).exp()
        })
        .collect();

    let total: f32 = raw.iter().sum();
    Ok(ApertureWeights {
        weights: raw.into_iter().map(|w| w / total).collect(),
    })
}
