use image::GrayImage;

use crate::light_field::common::error::Result;
use crate::light_field::model::PointF;
use crate::light_field::tracking::types::TrackOutcome;

/// Sparse correspondence between two 8-bit luma images.
pub trait CorrespondenceEstimator {
    /// Locates `point` of `prev` in `next`.
    fn estimate(&self, prev: &GrayImage, next: &GrayImage, point: PointF) -> Result<TrackOutcome>;
}
