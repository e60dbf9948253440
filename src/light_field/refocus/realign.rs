//! Per-view realignment to a focal plane.

use image::Rgb;

use crate::light_field::model::{GridCoord, SubApertureView, ViewGrid};

/// Shift that brings the view at `coord` onto the focal plane selected by `alpha`:
/// `((u - A) * alpha / 4, (v - A) * alpha / 4)` with `A` the grid anchor.
pub fn focal_shift(grid: ViewGrid, coord: GridCoord, alpha: f32) -> (f32, f32) {
    let anchor = grid.anchor();
    let dx = (coord.u as f32 - anchor) * alpha / 4.0;
    let dy = (coord.v as f32 - anchor) * alpha / 4.0;
    (dx, dy)
}

/// Translates `view` by `(-dx, -dy)`: `out(x, y) = view(x + dx, y + dy)`.
///
/// Sub-pixel shifts use bilinear sampling. Source samples outside the view are zero, so
/// the uncovered border fades to black.
pub fn realign_view(view: &SubApertureView, dx: f32, dy: f32) -> SubApertureView {
    if dx == 0.0 && dy == 0.0 {
        return view.clone();
    }

    let (width, height) = view.dimensions();
    // Every sample lands outside the view.
    if !(dx.abs() < width as f32 && dy.abs() < height as f32) {
        return SubApertureView::new(width, height);
    }

    // The shift is constant over the image, so the integer offset and the bilinear
    // fractions are shared by every output pixel.
    let ix = dx.floor();
    let iy = dy.floor();
    let fx = dx - ix;
    let fy = dy - iy;
    let (ix, iy) = (ix as i64, iy as i64);

    let sample = |x: i64, y: i64| -> [f32; 3] {
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            [0.0; 3]
        } else {
            view.get_pixel(x as u32, y as u32).0
        }
    };

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    SubApertureView::from_fn(width, height, |x, y| {
        let sx = i64::from(x).saturating_add(ix);
        let sy = i64::from(y).saturating_add(iy);
        let (sx1, sy1) = (sx.saturating_add(1), sy.saturating_add(1));
        let p00 = sample(sx, sy);
        let p10 = sample(sx1, sy);
        let p01 = sample(sx, sy1);
        let p11 = sample(sx1, sy1);

        let mut out = [0.0f32; 3];
        for c in 0..3 {
            out[c] = w00 * p00[c] + w10 * p10[c] + w01 * p01[c] + w11 * p11[c];
        }
        Rgb(out)
    })
}
