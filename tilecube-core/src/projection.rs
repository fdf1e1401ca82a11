/// Camera and projection utilities
use nalgebra::{Point2, Point3};

use crate::transform::{rotate_xy, rotate_z, RotationState};

/// Depths closer than this to the eye plane have no perspective image
const MIN_DEPTH: f64 = 1e-9;

/// Projection used for the floor tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Top-down view, model x/y used as-is
    Flat,
    /// Fixed 2:1 axonometric view
    Dimetric,
    /// Rotated weak perspective
    #[default]
    Perspective,
}

impl ProjectionMode {
    pub fn name(self) -> &'static str {
        match self {
            ProjectionMode::Flat => "flat",
            ProjectionMode::Dimetric => "dimetric",
            ProjectionMode::Perspective => "perspective",
        }
    }
}

/// Bird's eye projection
pub fn project_flat(point: &Point3<f64>) -> Point2<f64> {
    Point2::new(point.x, point.y)
}

/// Dimetric projection with a 2:1 pixel ratio
pub fn project_dimetric(point: &Point3<f64>) -> Point2<f64> {
    Point2::new(
        (point.x - point.y) * 3f64.sqrt() / 2.0,
        (point.x + point.y) / 2.0 - point.z,
    )
}

/// Weak perspective projection with the eye `focal_length` in front of the
/// screen. The depth is passed through for face-normal tests.
///
/// Returns `None` when the point lies on the eye plane (`focal_length + z == 0`).
pub fn project_perspective(point: &Point3<f64>, focal_length: f64) -> Option<Point3<f64>> {
    let denom = focal_length + point.z;
    if denom.abs() < MIN_DEPTH {
        return None;
    }

    let scale = focal_length / denom;
    Some(Point3::new(point.x * scale, point.y * scale, point.z))
}

/// Camera configuration for rendering the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub angles: RotationState,
    pub focal_length: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(focal_length: f64, mode: ProjectionMode) -> Self {
        Self {
            angles: RotationState::zero(),
            focal_length,
            mode,
        }
    }

    /// Project a point of the tile plane according to the current mode.
    ///
    /// Only the perspective mode honors the camera angles.
    pub fn project_tile_vertex(&self, point: &Point3<f64>) -> Option<Point2<f64>> {
        match self.mode {
            ProjectionMode::Flat => Some(project_flat(point)),
            ProjectionMode::Dimetric => Some(project_dimetric(point)),
            ProjectionMode::Perspective => {
                let rolled = rotate_z(point, self.angles.z);
                self.project_cube_vertex(&rolled).map(|p| Point2::new(p.x, p.y))
            }
        }
    }

    /// Pitch, yaw and perspective-project a point that has already been
    /// rolled. Keeps the depth in `z`.
    pub fn project_cube_vertex(&self, rolled: &Point3<f64>) -> Option<Point3<f64>> {
        let rotated = rotate_xy(rolled, self.angles.x, self.angles.y);
        project_perspective(&rotated, self.focal_length)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(500.0, ProjectionMode::default())
    }
}
