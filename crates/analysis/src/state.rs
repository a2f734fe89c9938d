//! Built-in state trackers for the forward sweep.
//!
//! State updates are wired at compile time in dependency order:
//! [`Tracked::update`] advances the orientation tracker first, then the
//! position tracker reads the orientation already updated for the same
//! instruction. A missing dependency is therefore a type error, not a
//! runtime lookup failure.

use camber_core::geom::Point;
use camber_core::instr::Instruction;
use camber_core::program::{apply_axes, Orient};

/// Tracks the coordinate interpretation mode (G90/G91).
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationState {
    pub current: Orient,
}

impl OrientationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, instr: &Instruction) {
        match instr {
            Instruction::SetAbsolute => self.current = Orient::Absolute,
            Instruction::SetRelative => self.current = Orient::Relative,
            _ => {}
        }
    }
}

/// Tracks the machine position across instructions.
///
/// `before` and `after` are the positions at the instruction's entry
/// and exit boundaries; `diff` is their difference. The update rule is
/// the same replay rule as `Program::all_positions_starting_at`.
#[derive(Debug, Clone, Copy)]
pub struct PositionState {
    pub before: Point,
    pub after: Point,
    pub diff: Point,
}

impl PositionState {
    pub fn new(origin: Point) -> Self {
        Self {
            before: origin,
            after: origin,
            diff: Point::zeros(),
        }
    }

    pub fn update(&mut self, instr: &Instruction, orientation: &OrientationState) {
        self.before = self.after;
        match instr {
            Instruction::Move { x, y, z, .. } | Instruction::Arc { x, y, z, .. } => {
                self.after = apply_axes(&self.before, x, y, z, orientation.current);
            }
            _ => {}
        }
        self.diff = self.after - self.before;
    }
}

/// The built-in tracker set handed to every observer.
#[derive(Debug, Clone, Copy)]
pub struct Tracked {
    pub orientation: OrientationState,
    pub position: PositionState,
}

impl Tracked {
    pub fn new(origin: Point) -> Self {
        Self {
            orientation: OrientationState::new(),
            position: PositionState::new(origin),
        }
    }

    /// Advances every tracker by one instruction, in dependency order.
    pub fn update(&mut self, instr: &Instruction) {
        self.orientation.update(instr);
        self.position.update(instr, &self.orientation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camber_core::geom::{point, within_eps, EPS_POINT};
    use camber_core::instr::Instruction;

    #[test]
    fn test_orientation_flips_on_g91() {
        let mut state = OrientationState::new();
        assert_eq!(state.current, Orient::Absolute);
        state.update(&Instruction::SetRelative);
        assert_eq!(state.current, Orient::Relative);
        state.update(&Instruction::rapid(1.0, 0.0, 0.0));
        assert_eq!(state.current, Orient::Relative);
        state.update(&Instruction::SetAbsolute);
        assert_eq!(state.current, Orient::Absolute);
    }

    #[test]
    fn test_position_diff_absolute() {
        let mut tracked = Tracked::new(point(0.0, 0.0, 0.0));
        tracked.update(&Instruction::rapid(3.0, 4.0, 0.0));
        assert!(within_eps(
            &tracked.position.after,
            &point(3.0, 4.0, 0.0),
            EPS_POINT
        ));
        assert!(within_eps(
            &tracked.position.diff,
            &point(3.0, 4.0, 0.0),
            EPS_POINT
        ));
    }

    #[test]
    fn test_position_diff_relative() {
        let mut tracked = Tracked::new(point(1.0, 1.0, 1.0));
        tracked.update(&Instruction::SetRelative);
        tracked.update(&Instruction::rapid(0.5, 0.0, -0.25));
        assert!(within_eps(
            &tracked.position.after,
            &point(1.5, 1.0, 0.75),
            EPS_POINT
        ));
        assert!(within_eps(
            &tracked.position.diff,
            &point(0.5, 0.0, -0.25),
            EPS_POINT
        ));
    }

    #[test]
    fn test_non_motion_instructions_do_not_move() {
        let mut tracked = Tracked::new(point(2.0, 2.0, 2.0));
        tracked.update(&Instruction::SpindleOn);
        tracked.update(&Instruction::ToolSelect(3));
        assert!(within_eps(
            &tracked.position.after,
            &point(2.0, 2.0, 2.0),
            EPS_POINT
        ));
        assert!(within_eps(&tracked.position.diff, &Point::zeros(), EPS_POINT));
    }
}
