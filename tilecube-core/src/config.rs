/// Scene configuration
use std::time::Duration;

use crate::layout::LayoutConfig;
use crate::projection::ProjectionMode;

/// Sizes, camera parameters and timing for a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Side of a floor tile; also the lattice spacing
    pub tile_size: i64,
    /// Side of the cube
    pub cube_size: f64,
    /// Distance from the eye to the screen plane
    pub focal_length: f64,
    /// Angle added per rotation key press and per animation tick (radians)
    pub rotation_step: f64,
    pub animation_period: Duration,
    pub mode: ProjectionMode,
    pub layout: LayoutConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tile_size: 50,
            cube_size: 16.0,
            focal_length: 500.0,
            rotation_step: 5f64.to_radians(),
            animation_period: Duration::from_millis(40),
            mode: ProjectionMode::default(),
            layout: LayoutConfig::default(),
        }
    }
}
