//! # Camber Analysis
//!
//! Forward-sweep analysis over [`camber_core::Program`]s.
//!
//! A [`Pass`] replays a program once, instruction by instruction,
//! keeping a set of derived state trackers current ([`Tracked`]:
//! coordinate orientation and machine position) and handing each
//! instruction plus the updated state to registered [`Observer`]s.
//! Observers report non-fatal findings through a shared [`Report`];
//! the warning count is the exit contract (0 = clean).
//!
//! ## Built-in checkers
//!
//! - [`BoundsChecker`] / [`check_bounds`] - moves leaving the machine
//!   envelope
//! - [`ForbiddenToolChecker`] / [`check_tools`] - tool selects outside
//!   a permitted set
//! - [`DiagonalRapidChecker`] / [`check_diagonal_rapids`] - rapids that
//!   combine Z and XY motion
//!
//! ```rust
//! use camber_analysis::{check_bounds, Bounds};
//! use camber_core::point;
//! use camber_gcode::parse;
//!
//! let program = parse("G0 X12.5 Y-10.3 Z0.0\nM2").unwrap();
//! let bounds = Bounds::new((0.0, 30.0), (-20.0, -10.0), (-5.0, 2.0));
//! assert_eq!(check_bounds(&program, point(0.0, 0.0, 0.0), &bounds), 0);
//! ```

pub mod check;
pub mod pass;
pub mod state;

// Re-exports
pub use check::{
    check_bounds, check_diagonal_rapids, check_tools, Bounds, BoundsChecker, DiagonalRapidChecker,
    ForbiddenToolChecker,
};
pub use pass::{run, Observer, Pass, Report};
pub use state::{OrientationState, PositionState, Tracked};
