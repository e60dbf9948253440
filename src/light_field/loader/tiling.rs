//! Splitting a tiled capture into sub-aperture views.

use image::{Rgb, RgbImage};
use tracing::warn;

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::{LightFieldFrame, SubApertureView, ViewGrid};

/// Cuts `capture` into an n×n grid of equal tiles, row-major, and converts each tile to a
/// float view. Tile `(w, h)` becomes view `w + h * n`. Rows or columns left over when the
/// raster size is not a multiple of `n` are dropped.
pub fn split_capture(capture: &RgbImage, grid: ViewGrid) -> Result<LightFieldFrame> {
    let n = grid.size() as u32;
    let (width, height) = capture.dimensions();
    let tile_width = width / n;
    let tile_height = height / n;

    if tile_width == 0 || tile_height == 0 {
        return Err(LightFieldError::InvalidDimensions(width, height));
    }
    if width % n != 0 || height % n != 0 {
        warn!(
            width,
            height,
            grid = n,
            "Capture size is not a multiple of the grid, dropping remainder"
        );
    }

    let views = (0..grid.view_count())
        .map(|view_id| {
            let coord = grid.coord(view_id);
            let x0 = coord.u as u32 * tile_width;
            let y0 = coord.v as u32 * tile_height;
            SubApertureView::from_fn(tile_width, tile_height, |x, y| {
                let Rgb([r, g, b]) = *capture.get_pixel(x0 + x, y0 + y);
                Rgb([f32::from(r), f32::from(g), f32::from(b)])
            })
        })
        .collect();

    LightFieldFrame::new(grid, views)
}
