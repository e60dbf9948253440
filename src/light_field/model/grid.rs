//! Angular sampling grid of a light-field capture.

use crate::light_field::common::error::{LightFieldError, Result};

/// Grid dimension of the capture rig the pipeline was built for (8×8 = 64 views).
pub const DEFAULT_GRID_SIZE: usize = 8;

/// Position of a view on the capture grid. `u` is the column, `v` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub u: usize,
    pub v: usize,
}

/// Square n×n grid of sub-aperture views, addressed row-major by `id = u + v * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewGrid {
    size: usize,
}

impl ViewGrid {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(LightFieldError::InvalidGrid(
                "grid dimension must be at least 1".to_string(),
            ));
        }
        // Tiles are cut with u32 pixel arithmetic and ids must fit in usize.
        if u32::try_from(size).is_err() || size.checked_mul(size).is_none() {
            return Err(LightFieldError::InvalidGrid(format!(
                "grid dimension {size} is too large"
            )));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn view_count(&self) -> usize {
        self.size * self.size
    }

    /// Grid coordinate of `view_id`. The id is not range-checked.
    pub fn coord(&self, view_id: usize) -> GridCoord {
        let u = view_id % self.size;
        let v = (view_id - u) / self.size;
        GridCoord { u, v }
    }

    pub fn view_id(&self, coord: GridCoord) -> usize {
        coord.u + coord.v * self.size
    }

    pub fn contains(&self, view_id: usize) -> bool {
        view_id < self.view_count()
    }

    /// Geometric centre `(n - 1) / 2`, used by the aperture weight falloff.
    pub fn center(&self) -> f32 {
        (self.size - 1) as f32 / 2.0
    }

    /// Integer anchor `(n - 1) div 2` that focal shifts are measured from.
    ///
    /// For an even grid this sits half a view off [`ViewGrid::center`] (3 vs 3.5 on 8×8).
    /// Renders depend on the exact value.
    pub fn anchor(&self) -> f32 {
        ((self.size - 1) / 2) as f32
    }

    /// Nominal reference view, `n² / 2` (32 on 8×8).
    ///
    /// NOTE: under `u + v * n` addressing this is `(0, n/2)`, the first view of the middle
    /// row, not the geometric centre. Consumers rely on the exact id.
    pub fn central_view_id(&self) -> usize {
        self.view_count() / 2
    }

    /// Iterator over every `(view_id, coord)` in canonical order.
    pub fn coords(&self) -> impl Iterator<Item = (usize, GridCoord)> + '_ {
        (0..self.view_count()).map(move |id| (id, self.coord(id)))
    }
}

impl Default for ViewGrid {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
        }
    }
}
