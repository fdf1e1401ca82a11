/// Painting the scene onto a 2D drawing surface
use nalgebra::{Point2, Point3};
use tracing::debug;

use crate::geometry::{face_normal, Cube, CubeFace, Rgba};
use crate::scene::Scene;
use crate::transform::rotate_z;

/// Fill for tiles without a color override
pub const TILE_COLOR: Rgba = Rgba::WHITE;
pub const CUBE_COLOR: Rgba = Rgba::CYAN;

/// Size of the drawing area; the projection center is its midpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A path-based 2D drawing surface, in the style of an HTML canvas context.
///
/// `fill` and `stroke` act on the current path, which persists until the
/// next `begin_path`.
pub trait Surface {
    fn clear(&mut self, viewport: &Viewport);
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point2<f64>);
    fn line_to(&mut self, point: Point2<f64>);
    fn close_path(&mut self);
    fn fill(&mut self, color: Rgba);
    fn stroke(&mut self);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Viewport),
    BeginPath,
    MoveTo(Point2<f64>),
    LineTo(Point2<f64>),
    ClosePath,
    Fill(Rgba),
    Stroke,
}

/// Surface that records every call instead of drawing
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for Recorder {
    fn clear(&mut self, viewport: &Viewport) {
        self.commands.push(DrawCommand::Clear(*viewport));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Point2<f64>) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point2<f64>) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}

/// How cube faces are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubeFill {
    /// Fill after every face, culled or not. A culled face re-fills whatever
    /// path was traced last (the previous visible face, or the last tile).
    #[default]
    EveryFace,
    /// Fill only faces that pass the culling test, each inside its own path
    VisibleFaces,
}

/// A cube face after rotation and projection (before centering)
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFace {
    pub face: CubeFace,
    pub points: [Point3<f64>; 4],
    pub front_facing: bool,
}

/// Rotate and project the cube on the active tile, face by face in painting
/// order. Faces with a vertex on the eye plane are left out.
pub fn project_cube(scene: &Scene) -> Vec<ProjectedFace> {
    let camera = scene.camera();
    let cube = Cube::on_tile(scene.active_tile(), scene.config().cube_size)
        .map(|v| rotate_z(v, camera.angles.z));

    CubeFace::ALL
        .iter()
        .filter_map(|&face| {
            let [a, b, c, d] = cube.face(face);
            let points = [
                camera.project_cube_vertex(&a)?,
                camera.project_cube_vertex(&b)?,
                camera.project_cube_vertex(&c)?,
                camera.project_cube_vertex(&d)?,
            ];
            let normal = face_normal(&points[0], &points[1], &points[2]);

            Some(ProjectedFace {
                face,
                points,
                front_facing: normal.z < 0.0,
            })
        })
        .collect()
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub tiles_drawn: usize,
    pub tiles_skipped: usize,
    pub faces_stroked: usize,
    pub faces_culled: usize,
    pub faces_skipped: usize,
}

/// Draws the tiles and the cube of a scene
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    cube_fill: CubeFill,
}

impl Renderer {
    pub fn new(cube_fill: CubeFill) -> Self {
        Self { cube_fill }
    }

    /// Clear the viewport and repaint everything
    pub fn render<S: Surface + ?Sized>(
        &self,
        scene: &Scene,
        viewport: &Viewport,
        surface: &mut S,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let center = viewport.center().coords;

        surface.clear(viewport);
        self.render_tiles(scene, center, surface, &mut stats);
        self.render_cube(scene, center, surface, &mut stats);

        debug!(
            tiles = stats.tiles_drawn,
            stroked = stats.faces_stroked,
            culled = stats.faces_culled,
            "frame rendered"
        );
        stats
    }

    fn render_tiles<S: Surface + ?Sized>(
        &self,
        scene: &Scene,
        center: nalgebra::Vector2<f64>,
        surface: &mut S,
        stats: &mut FrameStats,
    ) {
        let camera = scene.camera();
        let size = scene.config().tile_size as f64;

        for tile in scene.tiles() {
            let corners = tile.corners(size);
            let projected: Option<Vec<Point2<f64>>> = corners
                .iter()
                .map(|corner| camera.project_tile_vertex(corner).map(|p| p + center))
                .collect();

            let Some(points) = projected else {
                debug!(x = tile.x, y = tile.y, "tile corner on the eye plane, skipped");
                stats.tiles_skipped += 1;
                continue;
            };

            surface.begin_path();
            trace_polygon(surface, &points);
            surface.fill(tile.color.unwrap_or(TILE_COLOR));
            surface.stroke();
            stats.tiles_drawn += 1;
        }
    }

    fn render_cube<S: Surface + ?Sized>(
        &self,
        scene: &Scene,
        center: nalgebra::Vector2<f64>,
        surface: &mut S,
        stats: &mut FrameStats,
    ) {
        let faces = project_cube(scene);
        stats.faces_skipped = CubeFace::ALL.len() - faces.len();

        for face in &faces {
            let points = face.points.map(|p| Point2::new(p.x, p.y) + center);

            if face.front_facing {
                surface.begin_path();
                trace_polygon(surface, &points);
                if self.cube_fill == CubeFill::VisibleFaces {
                    surface.fill(CUBE_COLOR);
                }
                surface.stroke();
                stats.faces_stroked += 1;
            } else {
                stats.faces_culled += 1;
            }

            if self.cube_fill == CubeFill::EveryFace {
                surface.fill(CUBE_COLOR);
            }
        }
    }
}

fn trace_polygon<S: Surface + ?Sized>(surface: &mut S, points: &[Point2<f64>]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    surface.move_to(*first);
    for point in rest {
        surface.line_to(*point);
    }
    surface.close_path();
}
