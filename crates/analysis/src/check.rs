//! Concrete program checkers.
//!
//! Each checker is an [`Observer`] over the forward sweep; each also
//! has a free-function wrapper that runs a pass and returns the warning
//! count (0 = clean). Checkers report every violation they find rather
//! than stopping at the first.

use std::collections::HashSet;

use camber_core::geom::{Point, EPS_POINT};
use camber_core::instr::{Instruction, MoveKind};
use camber_core::program::Program;

use crate::pass::{run, Observer, Report};
use crate::state::Tracked;

/// Axis-aligned machine envelope.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl Bounds {
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self { x, y, z }
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.x.0 <= p.x
            && p.x <= self.x.1
            && self.y.0 <= p.y
            && p.y <= self.y.1
            && self.z.0 <= p.z
            && p.z <= self.z.1
    }
}

/// Warns whenever a rapid or feed move ends outside the envelope.
#[derive(Debug)]
pub struct BoundsChecker {
    bounds: Bounds,
}

impl BoundsChecker {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }
}

impl Observer for BoundsChecker {
    fn observe(
        &mut self,
        index: usize,
        instr: &Instruction,
        tracked: &Tracked,
        report: &mut Report,
    ) {
        let checked = matches!(
            instr,
            Instruction::Move {
                kind: MoveKind::Rapid | MoveKind::Linear,
                ..
            }
        );
        if checked && !self.bounds.contains(&tracked.position.after) {
            let p = tracked.position.after;
            report.add_warning(format!(
                "instruction {index}: move to ({:.4}, {:.4}, {:.4}) leaves machine bounds",
                p.x, p.y, p.z
            ));
        }
    }
}

/// Replays `program` from `origin` and counts moves that leave `bounds`.
pub fn check_bounds(program: &Program, origin: Point, bounds: &Bounds) -> u32 {
    let mut checker = BoundsChecker::new(*bounds);
    run(program, origin, &mut [&mut checker]).count()
}

/// Warns on every tool select outside the permitted set.
#[derive(Debug)]
pub struct ForbiddenToolChecker {
    permitted: HashSet<i32>,
}

impl ForbiddenToolChecker {
    pub fn new(permitted: HashSet<i32>) -> Self {
        Self { permitted }
    }
}

impl Observer for ForbiddenToolChecker {
    fn observe(
        &mut self,
        index: usize,
        instr: &Instruction,
        _tracked: &Tracked,
        report: &mut Report,
    ) {
        if let Instruction::ToolSelect(n) = instr {
            if !self.permitted.contains(n) {
                report.add_warning(format!("instruction {index}: tool T{n} is not permitted"));
            }
        }
    }
}

/// Counts tool selects outside `permitted`.
pub fn check_tools(program: &Program, permitted: &HashSet<i32>) -> u32 {
    let mut checker = ForbiddenToolChecker::new(permitted.clone());
    run(program, Point::zeros(), &mut [&mut checker]).count()
}

/// Warns on rapids that move in Z and XY simultaneously.
///
/// A diagonal rapid implies uncontrolled simultaneous-axis motion at
/// traverse speed; safe programs split the Z change from the XY travel.
#[derive(Debug, Default)]
pub struct DiagonalRapidChecker;

impl Observer for DiagonalRapidChecker {
    fn observe(
        &mut self,
        index: usize,
        instr: &Instruction,
        tracked: &Tracked,
        report: &mut Report,
    ) {
        if !instr.is_rapid() {
            return;
        }
        let diff = tracked.position.diff;
        if diff.z.abs() > EPS_POINT && (diff.x.abs() > EPS_POINT || diff.y.abs() > EPS_POINT) {
            report.add_warning(format!(
                "instruction {index}: diagonal rapid (dx={:.4}, dy={:.4}, dz={:.4})",
                diff.x, diff.y, diff.z
            ));
        }
    }
}

/// Counts diagonal rapids when replaying from `origin`.
pub fn check_diagonal_rapids(program: &Program, origin: Point) -> u32 {
    let mut checker = DiagonalRapidChecker;
    run(program, origin, &mut [&mut checker]).count()
}
