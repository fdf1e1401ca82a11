/// tilecube core library - tiles, cube and the projection pipeline
///
/// This library holds the stateless math (rotations, projections), the
/// procedural tile layout, the scene state with its key commands, and a
/// renderer that paints onto any path-based 2D `Surface`.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod projection;
pub mod render;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use config::SceneConfig;
pub use error::{LayoutError, SceneError};
pub use geometry::{Cube, CubeFace, Direction, Rgba, Tile, TileSet};
pub use input::{Axis, Command};
pub use layout::LayoutConfig;
pub use projection::{Camera, ProjectionMode};
pub use render::{CubeFill, DrawCommand, FrameStats, Recorder, Renderer, Surface, Viewport};
pub use scene::{Response, Scene, ScheduledTick, Tick};
pub use transform::RotationState;
