//! Synthetic light-field data
//!
//! Deterministic frames and videos for unit tests, so the refocusing pipeline can be
//! exercised without captured data on disk.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::light_field::model::{
    DisparityMap, LightFieldFrame, LightFieldVideo, PointF, SubApertureView, ViewGrid,
};

/// Grey level of view `view_id` in frame `frame_id` of an [`indexed_video`].
pub fn indexed_value(frame_id: usize, view_id: usize) -> f32 {
    ((frame_id * 64 + view_id) % 256) as f32
}

/// Frame whose views are flat grey images, each at [`indexed_value`].
pub fn indexed_frame(grid: ViewGrid, frame_id: usize, width: u32, height: u32) -> LightFieldFrame {
    flat_frame(grid, width, height, |view_id| {
        let value = indexed_value(frame_id, view_id);
        [value, value, value]
    })
}

/// Video of `frame_count` [`indexed_frame`]s with all-zero disparity maps.
pub fn indexed_video(grid: ViewGrid, frame_count: usize, width: u32, height: u32) -> LightFieldVideo {
    let frames = (0..frame_count)
        .map(|frame_id| indexed_frame(grid, frame_id, width, height))
        .collect();
    video_from_frames(grid, frames)
}

/// Frame where view `id` is filled with `color(id)`.
pub fn flat_frame(
    grid: ViewGrid,
    width: u32,
    height: u32,
    color: impl Fn(usize) -> [f32; 3],
) -> LightFieldFrame {
    let views = (0..grid.view_count())
        .map(|view_id| SubApertureView::from_pixel(width, height, Rgb(color(view_id))))
        .collect();
    // Every view shares the requested size, so construction cannot fail for width,
    // height > 0.
    LightFieldFrame::new(grid, views).expect("synthetic views share one size")
}

/// A distinct flat colour per view, all channels in 0..255.
pub fn distinct_color(view_id: usize) -> [f32; 3] {
    [
        (view_id * 4 % 256) as f32,
        (255 - view_id * 3 % 256) as f32,
        (view_id * 37 % 256) as f32,
    ]
}

/// Grey image with a Gaussian blob of peak 200 over a background of 20.
pub fn blob_view(width: u32, height: u32, center: PointF, sigma: f32) -> SubApertureView {
    SubApertureView::from_fn(width, height, |x, y| {
        let dx = x as f32 - center.x;
        let dy = y as f32 - center.y;
        let value = 20.0 + 180.0 * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
        Rgb([value, value, value])
    })
}

/// Frame where every view shows the same blob, so any view can act as the reference.
pub fn blob_frame(grid: ViewGrid, width: u32, height: u32, center: PointF, sigma: f32) -> LightFieldFrame {
    let view = blob_view(width, height, center, sigma);
    LightFieldFrame::new(grid, vec![view; grid.view_count()])
        .expect("synthetic views share one size")
}

/// Video of blob frames, one per entry of `centers`.
pub fn moving_blob_video(
    grid: ViewGrid,
    width: u32,
    height: u32,
    centers: &[PointF],
    sigma: f32,
) -> LightFieldVideo {
    let frames = centers
        .iter()
        .map(|&center| blob_frame(grid, width, height, center, sigma))
        .collect();
    video_from_frames(grid, frames)
}

/// Disparity map whose raw value increases left to right, saturating at 255.
pub fn ramp_disparity(width: u32, height: u32) -> DisparityMap {
    GrayImage::from_fn(width, height, |x, _| Luma([x.min(255) as u8]))
}

/// Row-major mosaic of `grid` tiles of `tile_width`×`tile_height`, tile `id` filled with
/// `[id, id, id]`, as a capture camera would write it to disk.
pub fn tiled_capture(grid: ViewGrid, tile_width: u32, tile_height: u32) -> RgbImage {
    let n = grid.size() as u32;
    RgbImage::from_fn(tile_width * n, tile_height * n, |x, y| {
        let id = (x / tile_width + (y / tile_height) * n) as u8;
        Rgb([id, id, id])
    })
}

fn video_from_frames(grid: ViewGrid, frames: Vec<LightFieldFrame>) -> LightFieldVideo {
    let (width, height) = (frames[0].width(), frames[0].height());
    let disparity = vec![DisparityMap::new(width, height); frames.len()];
    LightFieldVideo::new(grid, frames, disparity).expect("synthetic video is non-empty")
}
