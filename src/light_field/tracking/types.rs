//! Point tracking types

use crate::light_field::model::PointF;

/// Result of looking for a point in the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackOutcome {
    /// The point was located at this position
    Found(PointF),
    /// The estimator could not locate the point (flat texture or it left the image)
    NotFound,
}

impl TrackOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, TrackOutcome::Found(_))
    }

    pub fn point(&self) -> Option<PointF> {
        match self {
            TrackOutcome::Found(point) => Some(*point),
            TrackOutcome::NotFound => None,
        }
    }
}
