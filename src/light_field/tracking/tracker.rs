use image::GrayImage;
use image::imageops::grayscale;
use tracing::{debug, info, instrument};

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::{LightFieldVideo, PointF, to_display};
use crate::light_field::tracking::estimator::CorrespondenceEstimator;
use crate::light_field::tracking::lucas_kanade::PyramidalLucasKanade;
use crate::light_field::tracking::types::TrackOutcome;

/// Tracks points of the central view from one frame to the next.
pub struct PointTracker<'a, E: CorrespondenceEstimator> {
    video: &'a LightFieldVideo,
    estimator: E,
}

impl<'a> PointTracker<'a, PyramidalLucasKanade> {
    pub fn new(video: &'a LightFieldVideo) -> Self {
        Self {
            video,
            estimator: PyramidalLucasKanade::default(),
        }
    }
}

impl<'a, E: CorrespondenceEstimator> PointTracker<'a, E> {
    pub fn with_estimator(video: &'a LightFieldVideo, estimator: E) -> Self {
        Self { video, estimator }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Central view of `frame_id` as 8-bit luma.
    fn reference_luma(&self, frame_id: usize) -> Result<GrayImage> {
        let view = self.video.central_view(frame_id)?;
        Ok(grayscale(&to_display(view)))
    }

    /// Locates `point`, given in the central view of `frame_id`, in frame `frame_id + 1`.
    #[instrument(skip(self))]
    pub fn track(&self, point: PointF, frame_id: usize) -> Result<TrackOutcome> {
        let next_id = frame_id
            .checked_add(1)
            .filter(|&next| next < self.video.frame_count())
            .ok_or(LightFieldError::FrameOutOfRange {
                frame_id: frame_id.saturating_add(1),
                frame_count: self.video.frame_count(),
            })?;

        let (prev, next) = {
            let _span = tracing::info_span!("convert_reference_views").entered();
            (self.reference_luma(frame_id)?, self.reference_luma(next_id)?)
        };

        let outcome = {
            let _span = tracing::info_span!("estimate_correspondence").entered();
            self.estimator.estimate(&prev, &next, point)?
        };

        match outcome {
            TrackOutcome::Found(p) => debug!(x = p.x, y = p.y, "Tracked point"),
            TrackOutcome::NotFound => debug!("Point not found in next frame"),
        }
        Ok(outcome)
    }

    /// Follows `point` from `start` through consecutive frames up to `end` (inclusive).
    ///
    /// The returned path starts with `point` and holds one position per frame reached; it
    /// ends early at the first frame where the point is lost.
    pub fn track_through(&self, point: PointF, start: usize, end: usize) -> Result<Vec<PointF>> {
        self.video.frame(start)?;
        self.video.frame(end)?;

        let mut path = vec![point];
        let mut current = point;
        for frame_id in start..end {
            match self.track(current, frame_id)? {
                TrackOutcome::Found(next) => {
                    path.push(next);
                    current = next;
                }
                TrackOutcome::NotFound => {
                    info!(frame_id = frame_id + 1, "Lost track of point");
                    break;
                }
            }
        }
        Ok(path)
    }
}
