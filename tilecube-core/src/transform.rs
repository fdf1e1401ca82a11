/// Rotations, translation and the accumulated camera angles
use nalgebra::{Point3, Rotation3, Vector3};
use std::f64::consts::TAU;

/// Rotation state around three axes (in radians)
///
/// `x` pitches the scene, `y` yaws it and `z` rolls it about the view axis.
/// The angles accumulate without wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// The same orientation with every angle reduced to `[0, 2π)`
    pub fn wrapped(&self) -> Self {
        Self {
            x: self.x.rem_euclid(TAU),
            y: self.y.rem_euclid(TAU),
            z: self.z.rem_euclid(TAU),
        }
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

pub fn rotate_x(point: &Point3<f64>, angle: f64) -> Point3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle) * point
}

pub fn rotate_y(point: &Point3<f64>, angle: f64) -> Point3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle) * point
}

/// Roll about the view axis
pub fn rotate_z(point: &Point3<f64>, angle: f64) -> Point3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle) * point
}

/// Combined pitch/yaw used by the perspective pipeline.
///
/// This is not `rotate_x(rotate_y(p))`: the yawed depth enters with its sign
/// flipped, so a point at zero angles comes out with `z' = -z`. The rendered
/// views depend on this exact formula.
pub fn rotate_xy(point: &Point3<f64>, angle_x: f64, angle_y: f64) -> Point3<f64> {
    let (sin_x, cos_x) = angle_x.sin_cos();
    let (sin_y, cos_y) = angle_y.sin_cos();
    let depth = sin_y * point.x - cos_y * point.z;

    Point3::new(
        cos_y * point.x + sin_y * point.z,
        cos_x * point.y - sin_x * depth,
        cos_x * depth + sin_x * point.y,
    )
}

pub fn cross_product(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

/// Shift a point in the tile plane, leaving its height alone
pub fn translate(point: &Point3<f64>, dx: f64, dy: f64) -> Point3<f64> {
    Point3::new(point.x + dx, point.y + dy, point.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

    fn assert_close(a: &Point3<f64>, b: &Point3<f64>) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-12);
        assert!((state.y - 0.2).abs() < 1e-12);
        assert!((state.z - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_wrapped_angles() {
        let state = RotationState::new(TAU + 0.5, -0.5, 2.0 * TAU + 1.0);
        let wrapped = state.wrapped();
        assert!((wrapped.x - 0.5).abs() < 1e-9);
        assert!((wrapped.y - (TAU - 0.5)).abs() < 1e-9);
        assert!((wrapped.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_axis_rotations_match_right_handed_formulas() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let a: f64 = 0.7;
        let (s, c) = a.sin_cos();

        assert_close(
            &rotate_x(&p, a),
            &Point3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c),
        );
        assert_close(
            &rotate_y(&p, a),
            &Point3::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c),
        );
        assert_close(
            &rotate_z(&p, a),
            &Point3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z),
        );
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let p = rotate_z(&Point3::new(1.0, 0.0, 5.0), FRAC_PI_2);
        assert_close(&p, &Point3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_rotate_xy_closed_form() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let (ax, ay) = (FRAC_PI_6, FRAC_PI_4);
        let (cx, sx, cy, sy) = (ax.cos(), ax.sin(), ay.cos(), ay.sin());

        let expected = Point3::new(
            cy * 1.0 + sy * 3.0,
            cx * 2.0 - sx * (sy * 1.0 - cy * 3.0),
            cx * (sy * 1.0 - cy * 3.0) + sx * 2.0,
        );
        let got = rotate_xy(&p, ax, ay);
        assert!((got.x - expected.x).abs() < 1e-9);
        assert!((got.y - expected.y).abs() < 1e-9);
        assert!((got.z - expected.z).abs() < 1e-9);

        assert!((got.x - 2.828_427_124_746_19).abs() < 1e-9);
        assert!((got.y - 2.439_157_588_755_425).abs() < 1e-9);
        assert!((got.z + 0.224_744_871_391_589_5).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_xy_is_not_naive_composition() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let combined = rotate_xy(&p, FRAC_PI_6, FRAC_PI_4);
        let chained = rotate_x(&rotate_y(&p, FRAC_PI_4), FRAC_PI_6);
        assert!((combined - chained).norm() > 1e-3);
    }

    #[test]
    fn test_rotate_xy_flips_depth_at_zero() {
        let p = rotate_xy(&Point3::new(4.0, -2.0, 7.0), 0.0, 0.0);
        assert_close(&p, &Point3::new(4.0, -2.0, -7.0));
    }

    #[test]
    fn test_cross_product_antisymmetry() {
        let vectors = [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-4.0, 0.5, 2.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(7.0, -3.0, -1.5),
        ];
        for a in &vectors {
            for b in &vectors {
                let ab = cross_product(a, b);
                let ba = cross_product(b, a);
                assert!((ab + ba).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cross_product_of_axes() {
        let z = cross_product(&Vector3::x(), &Vector3::y());
        assert_eq!(z, Vector3::z());
    }

    #[test]
    fn test_translate_keeps_height() {
        let p = translate(&Point3::new(1.0, 2.0, 3.0), 10.0, -5.0);
        assert_eq!(p, Point3::new(11.0, -3.0, 3.0));
    }
}
