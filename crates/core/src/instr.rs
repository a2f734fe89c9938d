//! The instruction IR.
//!
//! A closed set of instruction kinds covering the subset of G-code this
//! toolchain manipulates. Every consumer dispatches on the enum with an
//! exhaustive `match`, so an unhandled kind is a compile error rather
//! than a runtime fallback.
//!
//! Instructions are immutable values: transformations build new
//! instructions instead of mutating in place. Equality is structural
//! and field-wise, inheriting the tolerance semantics of [`Value`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Motion kind for straight moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    /// G0, non-cutting maximum-speed reposition.
    Rapid,
    /// G1, controlled feed motion.
    Linear,
    /// G53, motion in machine coordinates.
    MachineCoord,
}

/// Rotation sense for circular moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArcKind {
    /// G2, clockwise.
    Cw,
    /// G3, counter-clockwise.
    Ccw,
}

/// Working plane for circular moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Plane {
    /// G17.
    #[default]
    Xy,
    /// G18.
    Zx,
    /// G19.
    Yz,
}

/// A single machine instruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Instruction {
    /// Straight motion (G0 / G1 / G53). Omitted axis words leave that
    /// axis at its previous coordinate.
    Move {
        kind: MoveKind,
        x: Value,
        y: Value,
        z: Value,
        feed: Value,
    },

    /// Circular motion (G2 / G3). I/J/K are the offsets from the start
    /// point to the arc center.
    Arc {
        kind: ArcKind,
        x: Value,
        y: Value,
        z: Value,
        i: Value,
        j: Value,
        k: Value,
        feed: Value,
        plane: Plane,
    },

    /// Tn tool select.
    ToolSelect(i32),

    /// Sn spindle speed.
    SpindleSpeed(i32),

    /// F feed rate. `axes` records which axes the rate applies to for
    /// dialects that scope feed per axis; the canonical rendering emits
    /// only the rate.
    FeedMode { rate: i32, axes: String },

    /// Inline comment with its delimiter pair.
    Comment { left: char, right: char, text: String },

    /// `#n = value` parameter assignment.
    Assign { var: i64, expr: Value },

    /// G90 absolute positioning.
    SetAbsolute,
    /// G91 relative positioning.
    SetRelative,
    /// G20 inch units.
    UnitsInch,
    /// G21 millimeter units.
    UnitsMm,
    /// G43 tool length compensation.
    ToolLengthComp,
    /// G64 path blending.
    PathBlendMode,
    /// M3 spindle on, clockwise.
    SpindleOn,
    /// M4 spindle on, counter-clockwise.
    SpindleOnCcw,
    /// M5 spindle stop.
    SpindleOff,
    /// M7 mist coolant on.
    MistOn,
    /// M8 flood coolant on.
    FloodOn,
    /// M9 coolant off.
    CoolantOff,
    /// M2 / M30 end of program.
    EndProgram,
}

impl Instruction {
    /// G0 rapid to literal coordinates.
    pub fn rapid(x: f64, y: f64, z: f64) -> Self {
        Instruction::Move {
            kind: MoveKind::Rapid,
            x: Value::Literal(x),
            y: Value::Literal(y),
            z: Value::Literal(z),
            feed: Value::Omitted,
        }
    }

    /// G1 feed move to literal coordinates.
    pub fn linear(x: f64, y: f64, z: f64, feed: Value) -> Self {
        Instruction::Move {
            kind: MoveKind::Linear,
            x: Value::Literal(x),
            y: Value::Literal(y),
            z: Value::Literal(z),
            feed,
        }
    }

    /// Parenthesized comment.
    pub fn comment(text: impl Into<String>) -> Self {
        Instruction::Comment {
            left: '(',
            right: ')',
            text: text.into(),
        }
    }

    /// Returns true for G0/G1/G53 moves.
    pub fn is_move(&self) -> bool {
        matches!(self, Instruction::Move { .. })
    }

    /// Returns true for G0 rapids.
    pub fn is_rapid(&self) -> bool {
        matches!(
            self,
            Instruction::Move {
                kind: MoveKind::Rapid,
                ..
            }
        )
    }
}

/// Writes ` L<value>` when the value is present.
fn word(f: &mut fmt::Formatter<'_>, letter: char, value: &Value) -> fmt::Result {
    if value.is_omitted() {
        Ok(())
    } else {
        write!(f, " {letter}{value}")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Move { kind, x, y, z, feed } => {
                match kind {
                    MoveKind::Rapid => write!(f, "G0")?,
                    MoveKind::Linear => write!(f, "G1")?,
                    MoveKind::MachineCoord => write!(f, "G53")?,
                }
                word(f, 'X', x)?;
                word(f, 'Y', y)?;
                word(f, 'Z', z)?;
                word(f, 'F', feed)
            }
            Instruction::Arc {
                kind,
                x,
                y,
                z,
                i,
                j,
                k,
                feed,
                ..
            } => {
                match kind {
                    ArcKind::Cw => write!(f, "G2")?,
                    ArcKind::Ccw => write!(f, "G3")?,
                }
                word(f, 'X', x)?;
                word(f, 'Y', y)?;
                word(f, 'Z', z)?;
                word(f, 'I', i)?;
                word(f, 'J', j)?;
                word(f, 'K', k)?;
                word(f, 'F', feed)
            }
            Instruction::ToolSelect(n) => write!(f, "T{n}"),
            Instruction::SpindleSpeed(n) => write!(f, "S{n}"),
            Instruction::FeedMode { rate, .. } => write!(f, "F{rate}"),
            Instruction::Comment { left, right, text } => write!(f, "{left}{text}{right}"),
            Instruction::Assign { var, expr } => write!(f, "#{var}={expr}"),
            Instruction::SetAbsolute => write!(f, "G90"),
            Instruction::SetRelative => write!(f, "G91"),
            Instruction::UnitsInch => write!(f, "G20"),
            Instruction::UnitsMm => write!(f, "G21"),
            Instruction::ToolLengthComp => write!(f, "G43"),
            Instruction::PathBlendMode => write!(f, "G64"),
            Instruction::SpindleOn => write!(f, "M3"),
            Instruction::SpindleOnCcw => write!(f, "M4"),
            Instruction::SpindleOff => write!(f, "M5"),
            Instruction::MistOn => write!(f, "M7"),
            Instruction::FloodOn => write!(f, "M8"),
            Instruction::CoolantOff => write!(f, "M9"),
            Instruction::EndProgram => write!(f, "M2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_move_skips_omitted_words() {
        let m = Instruction::Move {
            kind: MoveKind::Rapid,
            x: Value::Literal(12.5),
            y: Value::Omitted,
            z: Value::Literal(0.0),
            feed: Value::Omitted,
        };
        assert_eq!(m.to_string(), "G0 X12.5 Z0");
    }

    #[test]
    fn test_display_linear_with_feed() {
        let m = Instruction::linear(1.0, 2.0, -0.5, Value::Literal(30.0));
        assert_eq!(m.to_string(), "G1 X1 Y2 Z-0.5 F30");
    }

    #[test]
    fn test_display_arc() {
        let a = Instruction::Arc {
            kind: ArcKind::Ccw,
            x: Value::Literal(1.0),
            y: Value::Literal(1.0),
            z: Value::Omitted,
            i: Value::Literal(0.5),
            j: Value::Literal(0.0),
            k: Value::Omitted,
            feed: Value::Omitted,
            plane: Plane::Xy,
        };
        assert_eq!(a.to_string(), "G3 X1 Y1 I0.5 J0");
    }

    #[test]
    fn test_display_modes_and_words() {
        assert_eq!(Instruction::ToolSelect(6).to_string(), "T6");
        assert_eq!(Instruction::SpindleSpeed(12000).to_string(), "S12000");
        assert_eq!(Instruction::EndProgram.to_string(), "M2");
        assert_eq!(Instruction::comment("hello").to_string(), "(hello)");
        assert_eq!(
            Instruction::Assign {
                var: 5,
                expr: Value::Literal(12.5)
            }
            .to_string(),
            "#5=12.5"
        );
    }

    #[test]
    fn test_equality_inherits_value_tolerance() {
        let a = Instruction::rapid(1.0, 2.0, 3.0);
        let b = Instruction::rapid(1.0004, 2.0, 3.0);
        let c = Instruction::rapid(1.1, 2.0, 3.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_requires_same_variant() {
        let rapid = Instruction::rapid(1.0, 2.0, 3.0);
        let linear = Instruction::linear(1.0, 2.0, 3.0, Value::Omitted);
        assert_ne!(rapid, linear);
    }
}
