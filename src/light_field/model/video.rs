use image::RgbImage;
use tracing::{debug, warn};

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::grid::{GridCoord, ViewGrid};
use crate::light_field::model::types::{
    DisparityMap, LightFieldFrame, PointF, SubApertureView, to_display,
};

/// Focus offset decoded from a raw disparity of 0.
pub const MIN_DISPARITY: f32 = -10.0;
/// Focus offset decoded from a raw disparity of 255.
pub const MAX_DISPARITY: f32 = 10.0;

/// A loaded light-field video: frames and their disparity maps.
///
/// The sequence is read-only once built, so it can be shared across threads and
/// rendered concurrently. Frames and disparity maps are loaded independently and their
/// counts may differ; every lookup is checked against the list it reads from.
#[derive(Debug, Clone)]
pub struct LightFieldVideo {
    grid: ViewGrid,
    frames: Vec<LightFieldFrame>,
    disparity: Vec<DisparityMap>,
}

impl LightFieldVideo {
    pub fn new(
        grid: ViewGrid,
        frames: Vec<LightFieldFrame>,
        disparity: Vec<DisparityMap>,
    ) -> Result<Self> {
        if frames.is_empty() {
            return Err(LightFieldError::EmptySequence(
                "no light-field frames".to_string(),
            ));
        }
        if disparity.is_empty() {
            return Err(LightFieldError::EmptySequence(
                "no disparity maps".to_string(),
            ));
        }
        if let Some(frame) = frames.iter().find(|frame| frame.grid() != grid) {
            return Err(LightFieldError::InvalidGrid(format!(
                "frame grid {}x{} does not match sequence grid {}x{}",
                frame.grid().size(),
                frame.grid().size(),
                grid.size(),
                grid.size()
            )));
        }
        if frames.len() != disparity.len() {
            warn!(
                frames = frames.len(),
                disparity_maps = disparity.len(),
                "Frame and disparity counts differ"
            );
        }

        Ok(Self {
            grid,
            frames,
            disparity,
        })
    }

    pub fn grid(&self) -> ViewGrid {
        self.grid
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn disparity_count(&self) -> usize {
        self.disparity.len()
    }

    pub fn view_count(&self) -> usize {
        self.grid.view_count()
    }

    /// Size of a single view of the first frame.
    pub fn view_size(&self) -> (u32, u32) {
        (self.frames[0].width(), self.frames[0].height())
    }

    pub fn frame(&self, frame_id: usize) -> Result<&LightFieldFrame> {
        self.frames
            .get(frame_id)
            .ok_or(LightFieldError::FrameOutOfRange {
                frame_id,
                frame_count: self.frames.len(),
            })
    }

    pub fn view_by_id(&self, frame_id: usize, view_id: usize) -> Result<&SubApertureView> {
        let frame = self.frame(frame_id)?;
        frame.view(view_id).ok_or(LightFieldError::ViewOutOfRange {
            view_id,
            view_count: self.grid.view_count(),
        })
    }

    /// Resolves the view nearest to a normalized grid position, `(0, 0)` being the
    /// top-left view and `(1, 1)` the bottom-right one.
    pub fn view_by_normalized_coord(
        &self,
        frame_id: usize,
        uf: f32,
        vf: f32,
    ) -> Result<&SubApertureView> {
        let view_id = self.normalized_view_id(uf, vf)?;
        self.view_by_id(frame_id, view_id)
    }

    /// Same lookup as [`LightFieldVideo::view_by_normalized_coord`], range-converted to
    /// the 8-bit display format.
    pub fn view_by_normalized_coord_u8(
        &self,
        frame_id: usize,
        uf: f32,
        vf: f32,
    ) -> Result<RgbImage> {
        self.view_by_normalized_coord(frame_id, uf, vf)
            .map(to_display)
    }

    /// View id for a normalized grid position: `round(uf * (n - 1)) + round(vf * (n - 1)) * n`.
    pub fn normalized_view_id(&self, uf: f32, vf: f32) -> Result<usize> {
        let in_unit = |value: f32| (0.0..=1.0).contains(&value);
        if !in_unit(uf) || !in_unit(vf) {
            return Err(LightFieldError::InvalidNormalizedCoord(uf, vf));
        }

        let last = (self.grid.size() - 1) as f32;
        let coord = GridCoord {
            u: (uf * last).round() as usize,
            v: (vf * last).round() as usize,
        };
        debug!(u = coord.u, v = coord.v, "Resolved normalized view coordinate");
        Ok(self.grid.view_id(coord))
    }

    /// The nominal reference view of a frame, see [`ViewGrid::central_view_id`].
    pub fn central_view(&self, frame_id: usize) -> Result<&SubApertureView> {
        self.view_by_id(frame_id, self.grid.central_view_id())
    }

    pub fn disparity_map(&self, frame_id: usize) -> Result<&DisparityMap> {
        self.disparity
            .get(frame_id)
            .ok_or(LightFieldError::FrameOutOfRange {
                frame_id,
                frame_count: self.disparity.len(),
            })
    }

    /// Focus offset at `pixel`, decoded from the raw disparity `r` as
    /// `r / 255 * (MAX - MIN) + MIN`. Sub-pixel positions are truncated.
    pub fn disparity_at(&self, frame_id: usize, pixel: PointF) -> Result<f32> {
        let map = self.disparity_map(frame_id)?;
        let (width, height) = map.dimensions();
        let out_of_bounds = || LightFieldError::PixelOutOfBounds {
            x: pixel.x,
            y: pixel.y,
            width,
            height,
        };

        if !(pixel.x >= 0.0 && pixel.y >= 0.0) {
            return Err(out_of_bounds());
        }
        let (x, y) = (pixel.x as u32, pixel.y as u32);
        if x >= width || y >= height {
            return Err(out_of_bounds());
        }

        Ok(decode_disparity(map.get_pixel(x, y).0[0]))
    }
}

/// Linear map from a raw 8-bit disparity to a focus offset in `[MIN_DISPARITY, MAX_DISPARITY]`.
pub fn decode_disparity(raw: u8) -> f32 {
    f32::from(raw) / 255.0 * (MAX_DISPARITY - MIN_DISPARITY) + MIN_DISPARITY
}
