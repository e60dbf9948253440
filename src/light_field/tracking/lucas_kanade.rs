//! Pyramidal Lucas-Kanade point tracker.
//!
//! Coarse-to-fine: the displacement found on a coarse pyramid level seeds the search on
//! the next finer one, so motions larger than the window stay trackable. On each level
//! the window's structure tensor is solved iteratively against the intensity residual.

use image::{GrayImage, ImageBuffer, Luma};
use tracing::debug;

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::PointF;
use crate::light_field::tracking::estimator::CorrespondenceEstimator;
use crate::light_field::tracking::types::TrackOutcome;

type GrayFloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Pyramid levels stop before either side drops below this many pixels.
const MIN_LEVEL_SIZE: u32 = 8;

#[derive(Debug, Clone)]
pub struct PyramidalLucasKanade {
    /// Side of the square integration window, in pixels
    pub window_size: u32,
    /// Number of levels above the full-resolution image
    pub max_level: usize,
    pub max_iterations: usize,
    /// Convergence threshold on the per-iteration update, in pixels
    pub epsilon: f32,
    /// Smallest accepted eigenvalue of the window-averaged structure tensor
    pub min_eigen_threshold: f32,
}

impl Default for PyramidalLucasKanade {
    fn default() -> Self {
        Self {
            window_size: 41,
            max_level: 3,
            max_iterations: 30,
            epsilon: 0.01,
            min_eigen_threshold: 1e-4,
        }
    }
}

impl PyramidalLucasKanade {
    pub fn with_window_size(window_size: u32) -> Self {
        Self {
            window_size,
            ..Default::default()
        }
    }

    fn build_pyramid(&self, image: &GrayImage) -> Vec<GrayFloatImage> {
        let base = GrayFloatImage::from_fn(image.width(), image.height(), |x, y| {
            Luma([f32::from(image.get_pixel(x, y).0[0]) / 255.0])
        });

        let mut pyramid = vec![base];
        for _ in 0..self.max_level {
            let last = &pyramid[pyramid.len() - 1];
            if last.width() / 2 < MIN_LEVEL_SIZE || last.height() / 2 < MIN_LEVEL_SIZE {
                break;
            }
            let next = pyr_down(last);
            pyramid.push(next);
        }
        pyramid
    }

    /// Displacement of `point` (given in level coordinates) between `prev` and `next`,
    /// starting from `guess`. `None` when the window has no usable texture.
    fn track_level(
        &self,
        prev: &GrayFloatImage,
        next: &GrayFloatImage,
        point: (f32, f32),
        guess: (f32, f32),
    ) -> Option<(f32, f32)> {
        let half = (self.window_size / 2) as i32;

        let mut template = Vec::with_capacity((self.window_size * self.window_size) as usize);
        let (mut gxx, mut gxy, mut gyy) = (0.0f32, 0.0f32, 0.0f32);
        for j in -half..=half {
            for i in -half..=half {
                let x = point.0 + i as f32;
                let y = point.1 + j as f32;
                let ix = (sample(prev, x + 1.0, y) - sample(prev, x - 1.0, y)) / 2.0;
                let iy = (sample(prev, x, y + 1.0) - sample(prev, x, y - 1.0)) / 2.0;
                gxx += ix * ix;
                gxy += ix * iy;
                gyy += iy * iy;
                template.push((i as f32, j as f32, sample(prev, x, y), ix, iy));
            }
        }

        let area = template.len() as f32;
        let trace = gxx + gyy;
        let min_eigen = (trace - ((gxx - gyy).powi(2) + 4.0 * gxy * gxy).sqrt()) / (2.0 * area);
        let det = gxx * gyy - gxy * gxy;
        if min_eigen < self.min_eigen_threshold || det.abs() < f32::EPSILON {
            return None;
        }

        let mut d = (0.0f32, 0.0f32);
        for _ in 0..self.max_iterations {
            let (mut bx, mut by) = (0.0f32, 0.0f32);
            for &(i, j, value, ix, iy) in &template {
                let x = point.0 + guess.0 + d.0 + i;
                let y = point.1 + guess.1 + d.1 + j;
                let residual = value - sample(next, x, y);
                bx += residual * ix;
                by += residual * iy;
            }

            let eta_x = (gyy * bx - gxy * by) / det;
            let eta_y = (gxx * by - gxy * bx) / det;
            d.0 += eta_x;
            d.1 += eta_y;

            if eta_x * eta_x + eta_y * eta_y < self.epsilon * self.epsilon {
                break;
            }
        }

        Some(d)
    }
}

impl CorrespondenceEstimator for PyramidalLucasKanade {
    fn estimate(&self, prev: &GrayImage, next: &GrayImage, point: PointF) -> Result<TrackOutcome> {
        if prev.dimensions() != next.dimensions() {
            let (width, height) = next.dimensions();
            return Err(LightFieldError::InvalidDimensions(width, height));
        }

        let prev_pyramid = self.build_pyramid(prev);
        let next_pyramid = self.build_pyramid(next);
        let levels = prev_pyramid.len();

        let mut guess = (0.0f32, 0.0f32);
        for level in (0..levels).rev() {
            let scale = (1u32 << level) as f32;
            let level_point = (point.x / scale, point.y / scale);

            let d = match self.track_level(
                &prev_pyramid[level],
                &next_pyramid[level],
                level_point,
                guess,
            ) {
                Some(d) => d,
                // Coarse levels can wash out fine texture; carry the guess down instead.
                None if level > 0 => {
                    debug!(level, "Degenerate structure tensor on coarse level, skipping");
                    (0.0, 0.0)
                }
                None => {
                    debug!("Degenerate structure tensor, point lost");
                    return Ok(TrackOutcome::NotFound);
                }
            };

            guess = if level > 0 {
                (2.0 * (guess.0 + d.0), 2.0 * (guess.1 + d.1))
            } else {
                (guess.0 + d.0, guess.1 + d.1)
            };
        }

        let tracked = PointF::new(point.x + guess.0, point.y + guess.1);
        let (width, height) = prev.dimensions();
        let inside = tracked.x >= 0.0
            && tracked.y >= 0.0
            && tracked.x <= (width - 1) as f32
            && tracked.y <= (height - 1) as f32;
        if !tracked.x.is_finite() || !tracked.y.is_finite() || !inside {
            return Ok(TrackOutcome::NotFound);
        }

        Ok(TrackOutcome::Found(tracked))
    }
}

/// Bilinear sample with coordinates clamped to the image.
fn sample(image: &GrayFloatImage, x: f32, y: f32) -> f32 {
    let max_x = (image.width() - 1) as f32;
    let max_y = (image.height() - 1) as f32;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as u32, y0 as u32);
    let x1 = (x0 + 1).min(image.width() - 1);
    let y1 = (y0 + 1).min(image.height() - 1);

    let p = |x: u32, y: u32| image.get_pixel(x, y).0[0];
    (1.0 - fx) * (1.0 - fy) * p(x0, y0)
        + fx * (1.0 - fy) * p(x1, y0)
        + (1.0 - fx) * fy * p(x0, y1)
        + fx * fy * p(x1, y1)
}

/// Halves the image after smoothing with the 5-tap binomial kernel.
fn pyr_down(image: &GrayFloatImage) -> GrayFloatImage {
    const KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];
    let (width, height) = image.dimensions();
    let clamp_x = |x: i64| x.clamp(0, i64::from(width) - 1) as u32;
    let clamp_y = |y: i64| y.clamp(0, i64::from(height) - 1) as u32;

    GrayFloatImage::from_fn(width / 2, height / 2, |x, y| {
        let cx = i64::from(x) * 2;
        let cy = i64::from(y) * 2;
        let mut acc = 0.0;
        for (j, ky) in KERNEL.iter().enumerate() {
            for (i, kx) in KERNEL.iter().enumerate() {
                let sx = clamp_x(cx + i as i64 - 2);
                let sy = clamp_y(cy + j as i64 - 2);
                acc += kx * ky * image.get_pixel(sx, sy).0[0];
            }
        }
        Luma([acc])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(width: u32, height: u32, center: PointF, sigma: f32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            let value = 20.0 + 180.0 * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
            Luma([value.round() as u8])
        })
    }

    #[test]
    fn test_static_point_stays_put() {
        let image = blob(64, 64, PointF::new(30.0, 30.0), 5.0);
        let outcome = PyramidalLucasKanade::default()
            .estimate(&image, &image, PointF::new(30.0, 30.0))
            .unwrap();
        assert!(outcome.is_found());
        let point = outcome.point().unwrap();
        assert!(point.distance(&PointF::new(30.0, 30.0)) < 0.05);
    }

    #[test]
    fn test_small_window_follows_small_motion() {
        let prev = blob(48, 48, PointF::new(22.0, 24.0), 3.0);
        let next = blob(48, 48, PointF::new(23.0, 23.5), 3.0);
        let lk = PyramidalLucasKanade::with_window_size(15);
        assert_eq!(lk.window_size, 15);
        assert_eq!(lk.max_level, 3);

        let outcome = lk.estimate(&prev, &next, PointF::new(22.0, 24.0)).unwrap();
        let point = outcome.point().unwrap();
        assert!(
            point.distance(&PointF::new(23.0, 23.5)) < 0.3,
            "tracked to {point:?}"
        );
    }

    #[test]
    fn test_translated_blob_is_followed() {
        let prev = blob(96, 96, PointF::new(40.0, 44.0), 6.0);
        let next = blob(96, 96, PointF::new(43.0, 42.0), 6.0);
        let outcome = PyramidalLucasKanade::default()
            .estimate(&prev, &next, PointF::new(40.0, 44.0))
            .unwrap();
        let point = outcome.point().unwrap();
        assert!(
            point.distance(&PointF::new(43.0, 42.0)) < 0.3,
            "tracked to {point:?}"
        );
    }

    #[test]
    fn test_flat_image_is_not_found() {
        let flat = GrayImage::from_pixel(48, 48, Luma([90]));
        let outcome = PyramidalLucasKanade::default()
            .estimate(&flat, &flat, PointF::new(20.0, 20.0))
            .unwrap();
        assert_eq!(outcome, TrackOutcome::NotFound);
        assert!(!outcome.is_found());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let a = GrayImage::new(32, 32);
        let b = GrayImage::new(16, 32);
        assert!(matches!(
            PyramidalLucasKanade::default().estimate(&a, &b, PointF::new(1.0, 1.0)),
            Err(LightFieldError::InvalidDimensions(16, 32))
        ));
    }

    #[test]
    fn test_pyramid_respects_min_level_size() {
        let lk = PyramidalLucasKanade::default();
        assert_eq!(lk.build_pyramid(&GrayImage::new(64, 64)).len(), 4);
        assert_eq!(lk.build_pyramid(&GrayImage::new(20, 20)).len(), 2);
        assert_eq!(lk.build_pyramid(&GrayImage::new(10, 10)).len(), 1);
    }

    #[test]
    fn test_pyr_down_preserves_constant() {
        let image = GrayFloatImage::from_pixel(10, 6, Luma([0.5]));
        let down = pyr_down(&image);
        assert_eq!(down.dimensions(), (5, 3));
        assert!(down.pixels().all(|p| (p.0[0] - 0.5).abs() < 1e-6));
    }
}
