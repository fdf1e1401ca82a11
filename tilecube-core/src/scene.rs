/// Scene state: tiles, the active tile, camera and animation flag
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::geometry::{Direction, Rgba, Tile, TileSet};
use crate::input::{Axis, Command};
use crate::layout;
use crate::projection::{Camera, ProjectionMode};
use crate::transform::RotationState;

/// Fill for tiles created by moving the cube into empty space
pub const NAVIGATED_TILE_COLOR: Rgba = Rgba::RED;

/// A tick the host should run after `delay`
///
/// `generation` identifies the animation run the tick belongs to. Every start
/// begins a new run, so a tick still pending from a run that was stopped is
/// refused even if the animation has been restarted since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub delay: Duration,
    pub generation: u32,
}

/// Outcome of one animation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Angles advanced; repaint and run the next tick
    Continue(ScheduledTick),
    /// Animation is off or the tick is stale; do not reschedule
    Stop,
}

/// What the host should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub repaint: bool,
    /// First tick of a run, when the command started one
    pub schedule_tick: Option<ScheduledTick>,
}

impl Response {
    fn repaint_if(repaint: bool) -> Self {
        Self {
            repaint,
            schedule_tick: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    tiles: TileSet,
    active: usize,
    camera: Camera,
    animating: bool,
    generation: u32,
    config: SceneConfig,
}

impl Scene {
    /// Build a scene over a procedurally generated layout
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: SceneConfig) -> Result<Self, SceneError> {
        let tiles = layout::generate(rng, config.tile_size, &config.layout)?;
        Self::from_tiles(tiles, config)
    }

    /// Build a scene over the given tiles with the cube on the first one
    pub fn from_tiles(tiles: TileSet, config: SceneConfig) -> Result<Self, SceneError> {
        if tiles.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        Ok(Self {
            tiles,
            active: 0,
            camera: Camera::new(config.focal_length, config.mode),
            animating: false,
            generation: 0,
            config,
        })
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The tile the cube rests on
    pub fn active_tile(&self) -> &Tile {
        &self.tiles.as_slice()[self.active]
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Current animation run, bumped by every start
    pub fn animation_generation(&self) -> u32 {
        self.generation
    }

    fn next_tick(&self) -> ScheduledTick {
        ScheduledTick {
            delay: self.config.animation_period,
            generation: self.generation,
        }
    }

    pub fn set_active(&mut self, index: usize) -> Result<(), SceneError> {
        if index >= self.tiles.len() {
            return Err(SceneError::ActiveOutOfRange {
                index,
                len: self.tiles.len(),
            });
        }
        self.active = index;
        Ok(())
    }

    pub fn set_angles(&mut self, angles: RotationState) {
        self.camera.angles = angles;
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        if self.camera.mode != mode {
            info!(mode = mode.name(), "projection mode changed");
        }
        self.camera.mode = mode;
    }

    /// Nearest tile strictly in `direction` from `from` and in the same row
    /// or column (perpendicular offset below one tile size).
    ///
    /// Ties keep the earliest tile in layout order.
    pub fn find_nearest_in_direction(&self, from: &Tile, direction: Direction) -> Option<usize> {
        let size = self.config.tile_size;
        let mut nearest = None;
        let mut min_distance = f64::MAX;

        for (index, tile) in self.tiles.iter().enumerate() {
            let dx = tile.x - from.x;
            let dy = tile.y - from.y;
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            if distance <= 0.0 || distance >= min_distance {
                continue;
            }

            let qualifies = match direction {
                Direction::Left => dx < 0 && dy.abs() < size,
                Direction::Right => dx > 0 && dy.abs() < size,
                Direction::Up => dy < 0 && dx.abs() < size,
                Direction::Down => dy > 0 && dx.abs() < size,
            };
            if qualifies {
                nearest = Some(index);
                min_distance = distance;
            }
        }

        nearest
    }

    /// Step one tile from the active tile, creating a marked tile there if
    /// the lattice cell is empty. Returns the new active index.
    pub fn navigate(&mut self, direction: Direction) -> usize {
        let size = self.config.tile_size;
        let (dx, dy) = direction.offset();
        let from = *self.active_tile();
        let (x, y) = (from.x + dx * size, from.y + dy * size);

        self.active = match self.tiles.position_of(x, y) {
            Some(index) => index,
            None => {
                debug!(x, y, "creating tile");
                let tile = Tile::with_color(x, y, NAVIGATED_TILE_COLOR);
                // The key was just checked to be free
                self.tiles.insert(tile).unwrap_or(self.active)
            }
        };
        self.active
    }

    /// Move the cube to the nearest tile in `direction`, or onto a new
    /// adjacent tile when none lies that way
    pub fn move_cube(&mut self, direction: Direction) -> usize {
        let from = *self.active_tile();
        match self.find_nearest_in_direction(&from, direction) {
            Some(index) => self.active = index,
            None => {
                self.navigate(direction);
            }
        }

        let tile = self.active_tile();
        debug!(?direction, x = tile.x, y = tile.y, "cube moved");
        self.active
    }

    pub fn rotate(&mut self, axis: Axis, positive: bool) {
        let step = if positive {
            self.config.rotation_step
        } else {
            -self.config.rotation_step
        };

        match axis {
            Axis::Pitch => self.camera.angles.rotate(step, 0.0, 0.0),
            Axis::Yaw => self.camera.angles.rotate(0.0, step, 0.0),
            Axis::Roll => self.camera.angles.rotate(0.0, 0.0, step),
        }
    }

    /// Turn animation on. Returns `false` if it was already running.
    pub fn start_animation(&mut self) -> bool {
        if self.animating {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.animating = true;
        info!(generation = self.generation, "animation started");
        true
    }

    pub fn stop_animation(&mut self) {
        if self.animating {
            info!("animation stopped");
        }
        self.animating = false;
    }

    /// One animation step: pitch and yaw advance together while the run
    /// `generation` is the current one. Stopping ends the run, so its pending
    /// tick returns `Stop` even after a restart.
    pub fn advance_animation(&mut self, generation: u32) -> Tick {
        if !self.animating || generation != self.generation {
            debug!(generation, current = self.generation, "tick dropped");
            return Tick::Stop;
        }

        let step = self.config.rotation_step;
        self.camera.angles.rotate(step, step, 0.0);
        Tick::Continue(self.next_tick())
    }

    /// Execute a key command.
    ///
    /// Moves always repaint. Other commands repaint only while the animation
    /// loop is not already repainting.
    pub fn apply(&mut self, command: Command) -> Response {
        match command {
            Command::Move(direction) => {
                self.move_cube(direction);
                Response::repaint_if(true)
            }
            Command::Rotate { axis, positive } => {
                self.rotate(axis, positive);
                Response::repaint_if(!self.animating)
            }
            Command::StartAnimation => {
                if self.start_animation() {
                    Response {
                        repaint: true,
                        schedule_tick: Some(self.next_tick()),
                    }
                } else {
                    Response::repaint_if(false)
                }
            }
            Command::StopAnimation => {
                self.stop_animation();
                Response::repaint_if(true)
            }
            Command::SetMode(mode) => {
                self.set_mode(mode);
                Response::repaint_if(!self.animating)
            }
            Command::Noop => Response::repaint_if(!self.animating),
        }
    }
}
