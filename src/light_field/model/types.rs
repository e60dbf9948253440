//! Light-field data types

use image::{GrayImage, Rgb, Rgb32FImage, RgbImage};

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::grid::ViewGrid;

/// One sub-aperture view, stored as f32 per channel on the 0..255 scale of the source
/// raster so that warps and blending do not requantize.
pub type SubApertureView = Rgb32FImage;

/// Per-frame single-channel quantized disparity.
pub type DisparityMap = GrayImage;

/// Sub-pixel image position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PointF) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// All views of one temporal sample, in canonical view-id order.
#[derive(Debug, Clone)]
pub struct LightFieldFrame {
    grid: ViewGrid,
    views: Vec<SubApertureView>,
}

impl LightFieldFrame {
    /// Builds a frame, checking the view count against the grid and that every view has
    /// the size of view 0.
    pub fn new(grid: ViewGrid, views: Vec<SubApertureView>) -> Result<Self> {
        if views.len() != grid.view_count() {
            return Err(LightFieldError::ViewCountMismatch {
                expected: grid.view_count(),
                got: views.len(),
            });
        }

        let expected = views[0].dimensions();
        if expected.0 == 0 || expected.1 == 0 {
            return Err(LightFieldError::InvalidDimensions(expected.0, expected.1));
        }
        if let Some((view_id, view)) = views
            .iter()
            .enumerate()
            .find(|(_, view)| view.dimensions() != expected)
        {
            return Err(LightFieldError::ViewSizeMismatch {
                view_id,
                expected,
                got: view.dimensions(),
            });
        }

        Ok(Self { grid, views })
    }

    pub fn grid(&self) -> ViewGrid {
        self.grid
    }

    pub fn views(&self) -> &[SubApertureView] {
        &self.views
    }

    /// View by id, `None` when the id is outside the grid.
    pub fn view(&self, view_id: usize) -> Option<&SubApertureView> {
        self.views.get(view_id)
    }

    pub fn width(&self) -> u32 {
        self.views[0].width()
    }

    pub fn height(&self) -> u32 {
        self.views[0].height()
    }
}

/// Range-converts a float view to the 8-bit display format, rounding to nearest and
/// saturating to `[0, 255]`.
pub fn to_display(image: &Rgb32FImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        Rgb(image.get_pixel(x, y).0.map(|value| value.round().clamp(0.0, 255.0) as u8))
    })
}

/// Fused 8-bit output of one render call.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub image: RgbImage,
    /// Source frame in the video sequence
    pub frame_id: usize,
    /// Focus offset the views were realigned with
    pub alpha: f32,
    pub aperture: f32,
}

impl RenderedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views(count: usize, width: u32, height: u32) -> Vec<SubApertureView> {
        (0..count)
            .map(|_| SubApertureView::from_pixel(width, height, Rgb([1.0, 2.0, 3.0])))
            .collect()
    }

    #[test]
    fn test_frame_accepts_full_grid() {
        let frame = LightFieldFrame::new(ViewGrid::default(), views(64, 6, 4)).unwrap();
        assert_eq!(frame.views().len(), 64);
        assert_eq!((frame.width(), frame.height()), (6, 4));
        assert!(frame.view(63).is_some());
        assert!(frame.view(64).is_none());
    }

    #[test]
    fn test_frame_rejects_wrong_view_count() {
        let result = LightFieldFrame::new(ViewGrid::default(), views(63, 6, 4));
        assert!(matches!(
            result,
            Err(LightFieldError::ViewCountMismatch { expected: 64, got: 63 })
        ));
    }

    #[test]
    fn test_frame_rejects_mismatched_view() {
        let mut all = views(64, 6, 4);
        all[17] = SubApertureView::new(5, 4);
        let result = LightFieldFrame::new(ViewGrid::default(), all);
        assert!(matches!(
            result,
            Err(LightFieldError::ViewSizeMismatch { view_id: 17, .. })
        ));
    }

    #[test]
    fn test_to_display_rounds_and_saturates() {
        let mut image = Rgb32FImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([-4.0, 12.4, 12.5]));
        image.put_pixel(1, 0, Rgb([254.6, 255.0, 300.0]));
        let display = to_display(&image);
        assert_eq!(display.get_pixel(0, 0).0, [0, 12, 13]);
        assert_eq!(display.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_point_distance() {
        let a = PointF::new(1.0, 1.0);
        let b = PointF::new(4.0, 5.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }
}
