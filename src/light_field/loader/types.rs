//! Loading configuration types

use crate::light_field::model::DEFAULT_GRID_SIZE;

/// Configuration for loading a light-field video from disk
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Views per side of the capture grid
    pub grid_size: usize,
    /// Sub-directory of the dataset root holding the tiled captures
    pub capture_dir_name: String,
    /// Sub-directory of the dataset root holding the disparity maps
    pub disparity_dir_name: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            capture_dir_name: "lightfield".to_string(),
            disparity_dir_name: "disparity".to_string(),
        }
    }
}

impl LoadConfig {
    pub fn builder() -> LoadConfigBuilder {
        LoadConfigBuilder::default()
    }
}

/// Builder for LoadConfig
#[derive(Default)]
pub struct LoadConfigBuilder {
    grid_size: Option<usize>,
    capture_dir_name: Option<String>,
    disparity_dir_name: Option<String>,
}

impl LoadConfigBuilder {
    pub fn grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    pub fn capture_dir_name(mut self, name: impl Into<String>) -> Self {
        self.capture_dir_name = Some(name.into());
        self
    }

    pub fn disparity_dir_name(mut self, name: impl Into<String>) -> Self {
        self.disparity_dir_name = Some(name.into());
        self
    }

    pub fn build(self) -> LoadConfig {
        let default = LoadConfig::default();
        LoadConfig {
            grid_size: self.grid_size.unwrap_or(default.grid_size),
            capture_dir_name: self.capture_dir_name.unwrap_or(default.capture_dir_name),
            disparity_dir_name: self.disparity_dir_name.unwrap_or(default.disparity_dir_name),
        }
    }
}
