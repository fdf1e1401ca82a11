/// Geometry primitives: lattice tiles, paint colors and the cube
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

use crate::transform::cross_product;

/// An RGBA paint color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const CYAN: Rgba = Rgba::opaque(0, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS `rgba(...)` notation, as understood by canvas fill styles
    pub fn to_css(&self) -> String {
        let alpha = self.a as f64 / 255.0;
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// A lattice direction for moving the cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Lattice step in units of one tile: screen y grows downwards
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// A floor square on the lattice
///
/// `x` and `y` are model-space units and always a multiple of the tile size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub x: i64,
    pub y: i64,
    pub color: Option<Rgba>,
}

impl Tile {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y, color: None }
    }

    pub fn with_color(x: i64, y: i64, color: Rgba) -> Self {
        Self {
            x,
            y,
            color: Some(color),
        }
    }

    pub fn key(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// The four corners of a square of side `size` centered on the tile,
    /// clockwise from the top left in screen orientation
    pub fn corners(&self, size: f64) -> [Point3<f64>; 4] {
        let half = size / 2.0;
        let (x, y) = (self.x as f64, self.y as f64);
        [
            Point3::new(x - half, y - half, 0.0),
            Point3::new(x + half, y - half, 0.0),
            Point3::new(x + half, y + half, 0.0),
            Point3::new(x - half, y + half, 0.0),
        ]
    }
}

/// Ordered tiles with unique lattice keys
///
/// Insertion order is layout order; it drives painting order and tie-breaks
/// in nearest-tile searches.
#[derive(Debug, Clone, Default)]
pub struct TileSet {
    tiles: Vec<Tile>,
    index: HashMap<(i64, i64), usize>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tile, or return `None` if its key is already taken
    pub fn insert(&mut self, tile: Tile) -> Option<usize> {
        if self.index.contains_key(&tile.key()) {
            return None;
        }
        let position = self.tiles.len();
        self.index.insert(tile.key(), position);
        self.tiles.push(tile);
        Some(position)
    }

    pub fn position_of(&self, x: i64, y: i64) -> Option<usize> {
        self.index.get(&(x, y)).copied()
    }

    pub fn get(&self, position: usize) -> Option<&Tile> {
        self.tiles.get(position)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

/// The six cube faces in painting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Back,
    Right,
    Front,
    Left,
    Top,
    Bottom,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Back,
        CubeFace::Right,
        CubeFace::Front,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
    ];

    /// Vertex indices into [`Cube::vertices`], wound so that a face turned
    /// towards the viewer has a negative projected normal
    pub fn indices(self) -> [usize; 4] {
        match self {
            CubeFace::Back => [0, 1, 2, 3],
            CubeFace::Right => [1, 5, 6, 2],
            CubeFace::Front => [5, 4, 7, 6],
            CubeFace::Left => [4, 0, 3, 7],
            CubeFace::Top => [3, 2, 6, 7],
            CubeFace::Bottom => [4, 5, 1, 0],
        }
    }
}

/// A cube resting on a tile
#[derive(Debug, Clone)]
pub struct Cube {
    pub vertices: [Point3<f64>; 8],
}

impl Cube {
    /// Build the cube centered over `tile`, lifted one unit above the tile
    /// plane so its base does not coincide with it
    pub fn on_tile(tile: &Tile, side: f64) -> Self {
        let half = side / 2.0;
        let (x, y) = (tile.x as f64, tile.y as f64);
        let lift = half + 1.0;
        let (near, far) = (-half + lift, half + lift);

        Self {
            vertices: [
                Point3::new(x - half, y - half, near),
                Point3::new(x + half, y - half, near),
                Point3::new(x + half, y + half, near),
                Point3::new(x - half, y + half, near),
                Point3::new(x - half, y - half, far),
                Point3::new(x + half, y - half, far),
                Point3::new(x + half, y + half, far),
                Point3::new(x - half, y + half, far),
            ],
        }
    }

    pub fn face(&self, face: CubeFace) -> [Point3<f64>; 4] {
        face.indices().map(|i| self.vertices[i])
    }

    pub fn map(&self, f: impl Fn(&Point3<f64>) -> Point3<f64>) -> Self {
        Self {
            vertices: self.vertices.map(|v| f(&v)),
        }
    }
}

/// Unnormalized normal of the triangle `p0, p1, p2`
pub fn face_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    cross_product(&(p1 - p0), &(p2 - p0))
}
