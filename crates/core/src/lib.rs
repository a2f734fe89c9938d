//! # Camber Core
//!
//! Instruction IR and value model for the Camber CAM toolchain.
//!
//! This crate provides the foundational types shared by the parser,
//! the analysis passes, and cut synthesis:
//!
//! - **Value model**: [`Value`] - literal numbers, `#n` parameter
//!   references, and omitted words, with tolerance-based literal
//!   equality.
//! - **Geometry**: [`Point`] (a nalgebra `Vector3<f64>`) plus the
//!   workspace tolerance constants and rotation helpers.
//! - **Instruction IR**: [`Instruction`] - a closed set of instruction
//!   kinds matched exhaustively by every consumer.
//! - **Program container**: [`Program`] - an append-only instruction
//!   sequence whose position replay is the single source of truth for
//!   machine location.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geom;
pub mod instr;
pub mod program;
pub mod value;

// Re-exports
pub use error::{Error, Result};
pub use geom::{point, within_eps, Point, EPS_ARC, EPS_BLADE, EPS_POINT};
pub use instr::{ArcKind, Instruction, MoveKind, Plane};
pub use program::{apply_axes, Orient, Program};
pub use value::{Value, VALUE_EPS};
