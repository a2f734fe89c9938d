//! # Camber Cutting
//!
//! Cut model and toolpath synthesis for the Camber CAM toolchain.
//!
//! Takes abstract 2D/2.5D cut geometry (lines, arcs, drill points)
//! from a geometry frontend and produces a single safe, tool-grouped
//! motion sequence, rendered as G-code instruction blocks.
//!
//! ## Pipeline
//!
//! 1. **Schedule** ([`schedule_cuts`]): group cuts that are already
//!    connected into chains and move drilling to the front.
//! 2. **Connect** ([`insert_transitions`]): synthesize retract /
//!    traverse / plunge motion between non-adjacent cuts, with blade
//!    realignment arcs for the drag knife.
//! 3. **Render** ([`gcode_blocks_for_cuts`]): emit one instruction
//!    block per cut plus tool preambles and the machine footer.
//!
//! [`shape_layout_to_gcode`] runs all three and returns a
//! [`camber_core::Program`].
//!
//! ```rust
//! use camber_core::point;
//! use camber_cutting::{shape_layout_to_gcode, Cut, CutParams, Tool};
//!
//! let cuts = vec![
//!     Cut::linear(point(1.0, 1.0, -0.1), point(2.0, 1.0, -0.1)).with_tool(Tool::Drill),
//! ];
//! let params = CutParams::default().with_default_feedrate(30.0);
//! let program = shape_layout_to_gcode(cuts, &params).unwrap();
//! assert!(!program.is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod blade;
pub mod codegen;
pub mod cut;
pub mod params;
pub mod schedule;
pub mod transition;

// Re-exports
pub use blade::{align_coords, angle_between};
pub use codegen::{gcode_blocks_for_cuts, shape_layout_to_gcode, Block};
pub use cut::{adjacent, CircularArc, Cut, CutGeometry, MachineSettings, Tool};
pub use params::{CutParams, TargetMachine, ToolSet};
pub use schedule::{chain_cuts, schedule_cuts};
pub use transition::{
    cuts_are_adjacent, from_to_with_g0_height, insert_move_home, insert_transitions,
    move_to_next_cut, move_to_next_cut_dn, move_to_next_cut_drill,
};
