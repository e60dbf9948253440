use image::Rgb32FImage;
use tracing::{debug, instrument};

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::{LightFieldVideo, RenderedFrame, to_display};
use crate::light_field::refocus::accumulator::{Weighting, accumulate};
use crate::light_field::refocus::aperture::{aperture_weights, validate_aperture};

/// Renders refocused frames from a loaded light-field video.
///
/// Holds only a shared reference to the video; every call allocates its own buffers, so
/// one `Refocuser` can serve concurrent callers.
#[derive(Debug, Clone, Copy)]
pub struct Refocuser<'a> {
    video: &'a LightFieldVideo,
}

impl<'a> Refocuser<'a> {
    pub fn new(video: &'a LightFieldVideo) -> Self {
        Self { video }
    }

    pub fn video(&self) -> &'a LightFieldVideo {
        self.video
    }

    /// Refocuses frame `frame_id` at focus offset `alpha` with the given aperture and
    /// converts the result to 8 bits.
    ///
    /// Apertures below 1 use the weighted path; a full aperture takes the uniform path.
    #[instrument(skip(self))]
    pub fn render(&self, frame_id: usize, alpha: f32, aperture: f32) -> Result<RenderedFrame> {
        let fused = self.render_accumulated(frame_id, alpha, aperture)?;

        let image = {
            let _span = tracing::info_span!("to_display").entered();
            to_display(&fused)
        };

        Ok(RenderedFrame {
            image,
            frame_id,
            alpha,
            aperture,
        })
    }

    /// Same as [`Refocuser::render`] but returns the floating-point image before range
    /// conversion.
    pub fn render_accumulated(&self, frame_id: usize, alpha: f32, aperture: f32) -> Result<Rgb32FImage> {
        self.video.frame(frame_id)?;
        validate_aperture(aperture)?;
        if !alpha.is_finite() {
            return Err(LightFieldError::InvalidAlpha(alpha));
        }

        if aperture < 1.0 {
            self.render_weighted(frame_id, alpha, aperture)
        } else {
            self.render_uniform(frame_id, alpha)
        }
    }

    /// Mean of all realigned views.
    pub fn render_uniform(&self, frame_id: usize, alpha: f32) -> Result<Rgb32FImage> {
        let frame = self.video.frame(frame_id)?;
        debug!(frame_id, alpha, "Rendering uniform synthetic aperture");

        let _span = tracing::info_span!("accumulate_uniform").entered();
        accumulate(frame, alpha, Weighting::Uniform)
    }

    /// Aperture-weighted sum of all realigned views.
    pub fn render_weighted(&self, frame_id: usize, alpha: f32, aperture: f32) -> Result<Rgb32FImage> {
        let frame = self.video.frame(frame_id)?;
        debug!(frame_id, alpha, aperture, "Rendering weighted synthetic aperture");

        let weights = {
            let _span = tracing::info_span!("aperture_weights").entered();
            aperture_weights(frame.grid(), aperture)?
        };

        let _span = tracing::info_span!("accumulate_weighted").entered();
        accumulate(frame, alpha, Weighting::Weighted(&weights))
    }
}
