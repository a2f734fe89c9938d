//! The cut model: parametric machining curves with machine settings.
//!
//! A [`Cut`] is an abstract curve over `t ∈ [0, 1]` tagged with the
//! tool that executes it and the machine settings it runs under. Cuts
//! are value types, independent of the instruction IR; code generation
//! converts them to instruction blocks.
//!
//! A [`CutGeometry::Safe`] move is geometrically a straight line but
//! semantically a non-machining reposition; schedulers and printers
//! must never treat it as material removal.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use camber_core::error::{Error, Result};
use camber_core::geom::{point, rotate_z, within_eps, Point, EPS_ARC, EPS_POINT};
use camber_core::instr::{ArcKind, Plane};
use camber_core::value::Value;

/// The tool a cut is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tool {
    /// Not yet assigned.
    #[default]
    None,
    /// Trailing-point blade.
    DragKnife,
    /// Drill bit.
    Drill,
}

/// Per-cut machine settings. Omitted values fall back to machine or
/// parameter defaults at code generation time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineSettings {
    pub feedrate: Value,
    pub spindle_speed: Value,
    pub active_tool: Value,
}

/// A circular arc with its center expressed as an offset from the
/// start point.
///
/// Construction enforces that both endpoints are equidistant from the
/// center (within [`EPS_ARC`]); the fields stay private so the
/// invariant survives transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircularArc {
    start: Point,
    end: Point,
    start_offset: Point,
    direction: ArcKind,
    plane: Plane,
}

impl CircularArc {
    /// Builds an arc from `start` to `end` around `start + start_offset`.
    pub fn new(start: Point, end: Point, start_offset: Point, direction: ArcKind) -> Result<Self> {
        let center = start + start_offset;
        let start_radius = (center - start).norm();
        let end_radius = (center - end).norm();
        if (start_radius - end_radius).abs() > EPS_ARC {
            return Err(Error::ArcRadiusMismatch {
                start_radius,
                end_radius,
                tolerance: EPS_ARC,
            });
        }
        Ok(Self {
            start,
            end,
            start_offset,
            direction,
            plane: Plane::Xy,
        })
    }

    /// Rebuilds without re-validation; for transforms that preserve the
    /// radius invariant (translation, uniform scaling).
    fn new_unchecked(start: Point, end: Point, start_offset: Point, direction: ArcKind) -> Self {
        Self {
            start,
            end,
            start_offset,
            direction,
            plane: Plane::Xy,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn start_offset(&self) -> Point {
        self.start_offset
    }

    pub fn center(&self) -> Point {
        self.start + self.start_offset
    }

    pub fn radius(&self) -> f64 {
        self.start_offset.norm()
    }

    pub fn direction(&self) -> ArcKind {
        self.direction
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Signed sweep angle in radians. Coincident endpoints are a full
    /// circle, matching G2/G3 semantics.
    fn sweep(&self) -> f64 {
        use std::f64::consts::TAU;
        let c = self.center();
        let a0 = (self.start.y - c.y).atan2(self.start.x - c.x);
        let a1 = (self.end.y - c.y).atan2(self.end.x - c.x);
        let mut d = a1 - a0;
        match self.direction {
            ArcKind::Ccw => {
                if d <= EPS_POINT {
                    d += TAU;
                }
            }
            ArcKind::Cw => {
                if d >= -EPS_POINT {
                    d -= TAU;
                }
            }
        }
        d
    }

    /// Position on the arc at parameter `t ∈ [0, 1]`. Z interpolates
    /// linearly between the endpoint heights.
    pub fn point_at(&self, t: f64) -> Point {
        let c = self.center();
        let radial = self.start - c;
        let mut p = c + rotate_z(&radial, t * self.sweep());
        p.z = self.start.z + t * (self.end.z - self.start.z);
        p
    }

    /// Unit tangent (direction of travel) in the XY plane at `t`.
    /// Zero for a degenerate zero-radius arc.
    pub fn tangent_at(&self, t: f64) -> Point {
        use std::f64::consts::FRAC_PI_2;
        let c = self.center();
        let radial = rotate_z(&(self.start - c), t * self.sweep());
        let quarter = match self.direction {
            ArcKind::Ccw => FRAC_PI_2,
            ArcKind::Cw => -FRAC_PI_2,
        };
        let mut tangent = rotate_z(&radial, quarter);
        tangent.z = 0.0;
        if tangent.norm() <= EPS_POINT {
            Point::zeros()
        } else {
            tangent.normalize()
        }
    }

    pub fn arc_length(&self) -> f64 {
        self.sweep().abs() * self.radius()
    }
}

/// The curve shape of a cut.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CutGeometry {
    /// Straight machining move.
    Linear { start: Point, end: Point },
    /// Circular machining move.
    Arc(CircularArc),
    /// Non-machining rapid reposition.
    Safe { start: Point, end: Point },
    /// Zero-length curve at a drill location.
    Hole { loc: Point, radius: f64 },
}

/// A machining curve plus the tool and settings it runs under.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cut {
    pub geom: CutGeometry,
    pub tool: Tool,
    pub settings: MachineSettings,
}

impl Cut {
    fn from_geom(geom: CutGeometry) -> Self {
        Self {
            geom,
            tool: Tool::default(),
            settings: MachineSettings::default(),
        }
    }

    /// Straight cut from `start` to `end`.
    pub fn linear(start: Point, end: Point) -> Self {
        Self::from_geom(CutGeometry::Linear { start, end })
    }

    /// Non-machining reposition from `start` to `end`.
    pub fn safe(start: Point, end: Point) -> Self {
        Self::from_geom(CutGeometry::Safe { start, end })
    }

    /// Drill point of the given radius.
    pub fn hole(loc: Point, radius: f64) -> Self {
        Self::from_geom(CutGeometry::Hole { loc, radius })
    }

    /// Circular cut around `start + start_offset`.
    pub fn arc(start: Point, end: Point, start_offset: Point, direction: ArcKind) -> Result<Self> {
        Ok(Self::from_geom(CutGeometry::Arc(CircularArc::new(
            start,
            end,
            start_offset,
            direction,
        )?)))
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_settings(mut self, settings: MachineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_feedrate(mut self, feedrate: f64) -> Self {
        self.settings.feedrate = Value::Literal(feedrate);
        self
    }

    /// Curve value at `t = 0`.
    pub fn start(&self) -> Point {
        match &self.geom {
            CutGeometry::Linear { start, .. } | CutGeometry::Safe { start, .. } => *start,
            CutGeometry::Arc(arc) => arc.start(),
            CutGeometry::Hole { loc, .. } => *loc,
        }
    }

    /// Curve value at `t = 1`.
    pub fn end(&self) -> Point {
        match &self.geom {
            CutGeometry::Linear { end, .. } | CutGeometry::Safe { end, .. } => *end,
            CutGeometry::Arc(arc) => arc.end(),
            CutGeometry::Hole { loc, .. } => *loc,
        }
    }

    /// Curve value at `t ∈ [0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        match &self.geom {
            CutGeometry::Linear { start, end } | CutGeometry::Safe { start, end } => {
                start + t * (end - start)
            }
            CutGeometry::Arc(arc) => arc.point_at(t),
            CutGeometry::Hole { loc, .. } => *loc,
        }
    }

    /// Curve length; zero for holes.
    pub fn length(&self) -> f64 {
        match &self.geom {
            CutGeometry::Linear { start, end } | CutGeometry::Safe { start, end } => {
                (end - start).norm()
            }
            CutGeometry::Arc(arc) => arc.arc_length(),
            CutGeometry::Hole { .. } => 0.0,
        }
    }

    /// True for cuts that remove material.
    pub fn is_machining(&self) -> bool {
        !matches!(self.geom, CutGeometry::Safe { .. })
    }

    /// Planar direction of travel at the start of the curve, normalized.
    /// `None` for holes and for curves with no XY extent.
    pub fn start_direction(&self) -> Option<Point> {
        match &self.geom {
            CutGeometry::Linear { start, end } | CutGeometry::Safe { start, end } => {
                planar_direction(start, end)
            }
            CutGeometry::Arc(arc) => {
                let t = arc.tangent_at(0.0);
                (t.norm() > EPS_POINT).then_some(t)
            }
            CutGeometry::Hole { .. } => None,
        }
    }

    /// Planar direction of travel at the end of the curve, normalized.
    pub fn end_direction(&self) -> Option<Point> {
        match &self.geom {
            CutGeometry::Linear { start, end } | CutGeometry::Safe { start, end } => {
                planar_direction(start, end)
            }
            CutGeometry::Arc(arc) => {
                let t = arc.tangent_at(1.0);
                (t.norm() > EPS_POINT).then_some(t)
            }
            CutGeometry::Hole { .. } => None,
        }
    }

    /// Translates the cut by `delta`, preserving tool and settings.
    pub fn shift(&self, delta: Point) -> Cut {
        let geom = match &self.geom {
            CutGeometry::Linear { start, end } => CutGeometry::Linear {
                start: start + delta,
                end: end + delta,
            },
            CutGeometry::Safe { start, end } => CutGeometry::Safe {
                start: start + delta,
                end: end + delta,
            },
            CutGeometry::Arc(arc) => CutGeometry::Arc(CircularArc::new_unchecked(
                arc.start + delta,
                arc.end + delta,
                arc.start_offset,
                arc.direction,
            )),
            CutGeometry::Hole { loc, radius } => CutGeometry::Hole {
                loc: loc + delta,
                radius: *radius,
            },
        };
        Cut { geom, ..*self }
    }

    /// Scales the cut uniformly about the origin.
    pub fn scale(&self, s: f64) -> Cut {
        let geom = match &self.geom {
            CutGeometry::Linear { start, end } => CutGeometry::Linear {
                start: start * s,
                end: end * s,
            },
            CutGeometry::Safe { start, end } => CutGeometry::Safe {
                start: start * s,
                end: end * s,
            },
            CutGeometry::Arc(arc) => CutGeometry::Arc(CircularArc::new_unchecked(
                arc.start * s,
                arc.end * s,
                arc.start_offset * s,
                arc.direction,
            )),
            CutGeometry::Hole { loc, radius } => CutGeometry::Hole {
                loc: loc * s,
                radius: radius * s,
            },
        };
        Cut { geom, ..*self }
    }

    /// Scales X and Y about the origin, leaving Z untouched.
    pub fn scale_xy(&self, s: f64) -> Cut {
        let sxy = |p: &Point| point(p.x * s, p.y * s, p.z);
        let geom = match &self.geom {
            CutGeometry::Linear { start, end } => CutGeometry::Linear {
                start: sxy(start),
                end: sxy(end),
            },
            CutGeometry::Safe { start, end } => CutGeometry::Safe {
                start: sxy(start),
                end: sxy(end),
            },
            CutGeometry::Arc(arc) => CutGeometry::Arc(CircularArc::new_unchecked(
                sxy(&arc.start),
                sxy(&arc.end),
                sxy(&arc.start_offset),
                arc.direction,
            )),
            CutGeometry::Hole { loc, radius } => CutGeometry::Hole {
                loc: sxy(loc),
                radius: radius * s,
            },
        };
        Cut { geom, ..*self }
    }
}

fn planar_direction(start: &Point, end: &Point) -> Option<Point> {
    let mut d = end - start;
    d.z = 0.0;
    if d.norm() <= EPS_POINT {
        None
    } else {
        Some(d.normalize())
    }
}

/// True if `a` ends where `b` starts.
pub fn adjacent(a: &Cut, b: &Cut) -> bool {
    within_eps(&a.end(), &b.start(), EPS_POINT)
}
