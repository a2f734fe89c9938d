//! Points and tolerance predicates.
//!
//! Machine locations are 3D vectors; all vector arithmetic comes from
//! nalgebra. The named epsilons below are the tolerances used by the
//! rest of the workspace: position identity is much tighter than the
//! sanity tolerance geometry code applies to arc radii.

use nalgebra::{Rotation3, Vector3};

/// A machine location or direction in 3D space.
pub type Point = Vector3<f64>;

/// Tolerance for treating two positions as the same point.
pub const EPS_POINT: f64 = 1e-7;

/// Looser tolerance used for arc radius sanity checks.
pub const EPS_ARC: f64 = 5e-4;

/// Tolerance for the blade realignment radius check.
pub const EPS_BLADE: f64 = 1e-5;

/// Builds a point from its coordinates.
#[inline]
pub fn point(x: f64, y: f64, z: f64) -> Point {
    Vector3::new(x, y, z)
}

/// Returns true if `p` and `q` are within `eps` of each other.
#[inline]
pub fn within_eps(p: &Point, q: &Point, eps: f64) -> bool {
    (p - q).norm() <= eps
}

/// Rotates `p` about the Z axis by `radians`.
#[inline]
pub fn rotate_z(p: &Point, radians: f64) -> Point {
    Rotation3::from_axis_angle(&Vector3::z_axis(), radians) * p
}

/// Projects `p` onto the XY plane.
#[inline]
pub fn xy(p: &Point) -> Point {
    point(p.x, p.y, 0.0)
}

/// XY-plane distance between two points, ignoring Z.
#[inline]
pub fn planar_distance(p: &Point, q: &Point) -> f64 {
    (xy(p) - xy(q)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_within_eps() {
        let p = point(1.0, 2.0, 3.0);
        let q = point(1.0, 2.0, 3.0 + 1e-9);
        assert!(within_eps(&p, &q, EPS_POINT));
        assert!(!within_eps(&p, &point(1.0, 2.0, 3.1), EPS_POINT));
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let r = rotate_z(&point(1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_z_preserves_z() {
        let r = rotate_z(&point(1.0, 1.0, 5.0), 1.234);
        assert_relative_eq!(r.z, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_planar_distance_ignores_z() {
        let p = point(0.0, 0.0, 0.0);
        let q = point(3.0, 4.0, 100.0);
        assert_relative_eq!(planar_distance(&p, &q), 5.0, epsilon = 1e-12);
    }
}
