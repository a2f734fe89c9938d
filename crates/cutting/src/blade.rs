//! Drag-knife blade alignment geometry.
//!
//! A drag knife is a trailing-point tool: the cutting point trails the
//! pivot in the direction of travel, so a heading change must be made
//! by cutting a small arc around the pivot until the blade points the
//! new way. [`align_coords`] computes that realignment arc.

use camber_core::error::{Error, Result};
use camber_core::geom::{rotate_z, Point, EPS_BLADE, EPS_POINT};
use camber_core::instr::ArcKind;

use crate::cut::CircularArc;

/// Unsigned angle between two directions, in degrees (0–180).
/// Zero if either direction is degenerate.
pub fn angle_between(u: &Point, v: &Point) -> f64 {
    if u.norm() <= EPS_POINT || v.norm() <= EPS_POINT {
        return 0.0;
    }
    u.angle(v).to_degrees()
}

/// Computes the arc that swings the blade from `current_orient` to
/// `desired_orient`, ending at `desired_pos` with pivot radius `r`.
///
/// The arc's center is one blade radius behind `desired_pos` along the
/// desired heading; its start is that center swung back through the
/// heading change. Rotation sense follows the angular positions of the
/// endpoints about the center.
pub fn align_coords(
    desired_orient: &Point,
    desired_pos: &Point,
    current_orient: &Point,
    r: f64,
) -> Result<CircularArc> {
    use std::f64::consts::{PI, TAU};

    if desired_orient.norm() <= EPS_POINT {
        return Err(Error::DegenerateCurve {
            context: "blade realignment with zero desired orientation".to_string(),
        });
    }

    let theta = angle_between(desired_orient, current_orient).to_radians();
    let ef = r * desired_orient.normalize();
    let center = desired_pos - ef;
    let start_offset = -rotate_z(&ef, theta);
    let start = center - start_offset;

    let actual = start_offset.norm();
    if (actual - r).abs() > EPS_BLADE {
        return Err(Error::BladeGeometry {
            expected: r,
            actual,
        });
    }

    let a_start = (start.y - center.y).atan2(start.x - center.x);
    let a_end = (desired_pos.y - center.y).atan2(desired_pos.x - center.x);
    let mut sweep = a_end - a_start;
    if sweep > PI {
        sweep -= TAU;
    } else if sweep <= -PI {
        sweep += TAU;
    }
    let direction = if sweep > 0.0 { ArcKind::Ccw } else { ArcKind::Cw };

    CircularArc::new(start, *desired_pos, start_offset, direction)
}
