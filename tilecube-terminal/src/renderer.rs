/// ASCII rasterizer implementing the path-based drawing surface
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use tilecube_core::{Rgba, Surface, Viewport};

const FILL_GLYPH: char = ':';
const STROKE_GLYPH: char = '*';
const STROKE_COLOR: Color = Color::DarkGrey;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// ASCII surface that rasterizes filled and stroked paths into terminal cells
///
/// Scene coordinates are scaled down by `zoom` scene units per column.
pub struct AsciiSurface {
    width: usize,
    height: usize,
    zoom: f64,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    subpaths: Vec<Vec<(f64, f64)>>,
}

impl AsciiSurface {
    pub fn new(width: usize, height: usize, zoom: f64) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            zoom,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            subpaths: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.zoom);
    }

    /// Scene-space size of the whole terminal
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width as f64 * self.zoom,
            self.height as f64 * self.zoom * CELL_ASPECT,
        )
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Color)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    fn to_cell(&self, point: Point2<f64>) -> (f64, f64) {
        (point.x / self.zoom, point.y / (self.zoom * CELL_ASPECT))
    }

    fn plot(&mut self, x: i64, y: i64, glyph: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = glyph;
        self.color_buffer[idx] = color;
    }

    fn rasterize_triangle(&mut self, coords: [(f64, f64); 3], glyph: char, color: Color) {
        let [v0, v1, v2] = coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, (px, py)) {
                    // Either winding counts as inside
                    let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                        || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                    if inside {
                        self.plot(x, y, glyph, color);
                    }
                }
            }
        }
    }

    fn rasterize_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        // Points near the eye plane project millions of cells away; only the
        // visible part of the segment is stepped
        let bounds = (self.width as f64, self.height as f64);
        let Some((from, to)) = clip_segment(from, to, bounds) else {
            return;
        };

        let (mut x0, mut y0) = (from.0.floor() as i64, from.1.floor() as i64);
        let (x1, y1) = (to.0.floor() as i64, to.1.floor() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, STROKE_GLYPH, STROKE_COLOR);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for AsciiSurface {
    fn clear(&mut self, _viewport: &Viewport) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
        self.subpaths.clear();
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, point: Point2<f64>) {
        let cell = self.to_cell(point);
        self.subpaths.push(vec![cell]);
    }

    fn line_to(&mut self, point: Point2<f64>) {
        let cell = self.to_cell(point);
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(cell),
            None => self.subpaths.push(vec![cell]),
        }
    }

    fn close_path(&mut self) {
        if let Some(subpath) = self.subpaths.last_mut() {
            if let Some(&first) = subpath.first() {
                subpath.push(first);
            }
        }
    }

    fn fill(&mut self, color: Rgba) {
        let color = terminal_color(color);
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            // Fan triangulation; the projected tiles and faces are convex
            for i in 1..subpath.len().saturating_sub(1) {
                self.rasterize_triangle([subpath[0], subpath[i], subpath[i + 1]], FILL_GLYPH, color);
            }
        }
        self.subpaths = subpaths;
    }

    fn stroke(&mut self) {
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for segment in subpath.windows(2) {
                self.rasterize_line(segment[0], segment[1]);
            }
        }
        self.subpaths = subpaths;
    }
}

fn terminal_color(color: Rgba) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Liang-Barsky clip of a segment to the rectangle `[0, max_x] x [0, max_y]`
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    (max_x, max_y): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, from.0),
        (dx, max_x - from.0),
        (-dy, from.1),
        (dy, max_y - from.1),
    ] {
        if p == 0.0 {
            // Parallel to this edge and outside it
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    if !(t0.is_finite() && t1.is_finite()) {
        return None;
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use std::time::{Duration, Instant};
    use tilecube_core::{Renderer, RotationState, Scene, SceneConfig, Tile, TileSet};

    fn square(surface: &mut AsciiSurface, x0: f64, y0: f64, x1: f64, y1: f64) {
        surface.begin_path();
        surface.move_to(Point2::new(x0, y0));
        surface.line_to(Point2::new(x1, y0));
        surface.line_to(Point2::new(x1, y1));
        surface.line_to(Point2::new(x0, y1));
        surface.close_path();
    }

    #[test]
    fn test_viewport_scales_with_zoom() {
        let surface = AsciiSurface::new(80, 24, 4.0);
        assert_eq!(surface.viewport(), Viewport::new(320.0, 192.0));
    }

    #[test]
    fn test_fill_covers_interior() {
        let mut surface = AsciiSurface::new(20, 10, 1.0);
        // 2..10 columns, 1..4 rows
        square(&mut surface, 2.0, 2.0, 10.0, 8.0);
        surface.fill(Rgba::RED);

        let red = Color::Rgb { r: 255, g: 0, b: 0 };
        assert_eq!(surface.cell(5, 2), Some((FILL_GLYPH, red)));
        assert_eq!(surface.cell(15, 2), Some((' ', Color::Reset)));
        assert_eq!(surface.cell(5, 8), Some((' ', Color::Reset)));
    }

    #[test]
    fn test_clockwise_and_counterclockwise_fill() {
        let mut a = AsciiSurface::new(20, 10, 1.0);
        square(&mut a, 2.0, 2.0, 10.0, 8.0);
        a.fill(Rgba::WHITE);

        let mut b = AsciiSurface::new(20, 10, 1.0);
        square(&mut b, 10.0, 2.0, 2.0, 8.0);
        b.fill(Rgba::WHITE);

        assert_eq!(a.char_buffer, b.char_buffer);
    }

    #[test]
    fn test_stroke_outlines_path() {
        let mut surface = AsciiSurface::new(20, 10, 1.0);
        square(&mut surface, 2.0, 2.0, 10.0, 8.0);
        surface.stroke();

        assert_eq!(surface.cell(2, 1).map(|c| c.0), Some(STROKE_GLYPH));
        assert_eq!(surface.cell(10, 1).map(|c| c.0), Some(STROKE_GLYPH));
        assert_eq!(surface.cell(6, 2).map(|c| c.0), Some(' '));
    }

    #[test]
    fn test_clip_segment() {
        let bounds = (20.0, 10.0);
        let (a, b) = clip_segment((-1e12, 5.0), (1e12, 5.0), bounds).unwrap();
        assert!(a.0.abs() < 1e-3 && (b.0 - 20.0).abs() < 1e-3);
        assert_eq!((a.1, b.1), (5.0, 5.0));
        assert_eq!(
            clip_segment((2.0, 3.0), (4.0, 6.0), bounds),
            Some(((2.0, 3.0), (4.0, 6.0)))
        );
        assert_eq!(clip_segment((-5.0, -5.0), (-1.0, 30.0), bounds), None);
        assert_eq!(clip_segment((25.0, 1.0), (1e13, 1e13), bounds), None);
    }

    #[test]
    fn test_stroke_far_off_screen_stays_fast() {
        let mut surface = AsciiSurface::new(20, 10, 1.0);
        let start = Instant::now();
        surface.begin_path();
        surface.move_to(Point2::new(-1e13, 4.0));
        surface.line_to(Point2::new(1e13, 4.0));
        surface.stroke();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(surface.cell(0, 2).map(|c| c.0), Some(STROKE_GLYPH));
        assert_eq!(surface.cell(19, 2).map(|c| c.0), Some(STROKE_GLYPH));
    }

    #[test]
    fn test_frame_near_eye_plane_renders_quickly() {
        // The far tile lands a hair in front of the eye plane once the view
        // is pitched a quarter turn, so its corners project very far out
        let config = SceneConfig {
            focal_length: 525.00001,
            ..SceneConfig::default()
        };
        let mut tiles = TileSet::new();
        tiles.insert(Tile::new(0, 0));
        tiles.insert(Tile::new(0, -500));
        let mut scene = Scene::from_tiles(tiles, config).unwrap();
        scene.set_angles(RotationState::new(FRAC_PI_2, 0.0, 0.0));

        let mut surface = AsciiSurface::new(80, 24, 4.0);
        let viewport = surface.viewport();
        let start = Instant::now();
        Renderer::default().render(&scene, &viewport, &mut surface);

        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_fill_reuses_current_path() {
        let mut surface = AsciiSurface::new(20, 10, 1.0);
        square(&mut surface, 2.0, 2.0, 10.0, 8.0);
        surface.stroke();
        surface.fill(Rgba::CYAN);
        surface.fill(Rgba::CYAN);

        let cyan = Color::Rgb { r: 0, g: 255, b: 255 };
        assert_eq!(surface.cell(5, 2), Some((FILL_GLYPH, cyan)));
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut surface = AsciiSurface::new(20, 10, 1.0);
        square(&mut surface, 0.0, 0.0, 20.0, 20.0);
        surface.fill(Rgba::WHITE);
        surface.clear(&Viewport::new(20.0, 20.0));
        assert!(surface.char_buffer.iter().all(|&c| c == ' '));
    }

    #[test]
    fn test_scene_renders_into_cells() {
        let mut tiles = TileSet::new();
        tiles.insert(Tile::new(0, 0));
        let scene = Scene::from_tiles(tiles, SceneConfig::default()).unwrap();

        let mut surface = AsciiSurface::new(80, 24, 4.0);
        let viewport = surface.viewport();
        Renderer::default().render(&scene, &viewport, &mut surface);

        // The cube sits in the middle of the screen
        assert!(surface.cell(40, 12).is_some_and(|(c, _)| c != ' '));
        assert_eq!(surface.cell(0, 0), Some((' ', Color::Reset)));
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let surface = AsciiSurface::new(4, 2, 1.0);
        let mut out = Vec::new();
        surface.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("    \r\n    "));
    }
}
