//! Ordered instruction sequences and position replay.
//!
//! A [`Program`] is append-only during construction: insertion order is
//! execution order, and instructions are never mutated after being
//! pushed. The replay in [`Program::all_positions_starting_at`] is the
//! single source of truth for "current machine location"; every
//! checker and transformer derives positions from it.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom::{point, Point};
use crate::instr::Instruction;
use crate::value::Value;

/// Coordinate interpretation mode, set by G90/G91.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orient {
    /// Axis words are absolute coordinates.
    #[default]
    Absolute,
    /// Axis words are offsets from the current position.
    Relative,
}

/// Applies one move's axis words to the previous position.
///
/// Absolute mode: a present word replaces that coordinate, an omitted
/// word keeps it. Relative mode: a present word offsets the coordinate,
/// an omitted word contributes zero. Variable-valued words cannot be
/// resolved statically and keep the previous coordinate.
pub fn apply_axes(prev: &Point, x: &Value, y: &Value, z: &Value, orient: Orient) -> Point {
    match orient {
        Orient::Absolute => point(
            x.as_literal().unwrap_or(prev.x),
            y.as_literal().unwrap_or(prev.y),
            z.as_literal().unwrap_or(prev.z),
        ),
        Orient::Relative => {
            prev + point(
                x.as_literal().unwrap_or(0.0),
                y.as_literal().unwrap_or(0.0),
                z.as_literal().unwrap_or(0.0),
            )
        }
    }
}

/// An ordered sequence of instructions.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Program {
    instrs: Vec<Instruction>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self { instrs: Vec::new() }
    }

    /// Appends one instruction.
    pub fn push(&mut self, instr: Instruction) {
        self.instrs.push(instr);
    }

    /// Appends every instruction from `iter`.
    pub fn extend(&mut self, iter: impl IntoIterator<Item = Instruction>) {
        self.instrs.extend(iter);
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instrs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instrs.iter()
    }

    /// Returns a new program with the instruction at `index` replaced.
    /// The original program is untouched.
    pub fn replace(&self, index: usize, instr: Instruction) -> Program {
        let mut instrs = self.instrs.clone();
        instrs[index] = instr;
        Program { instrs }
    }

    /// Replays the program from `origin` and returns the machine
    /// position at every instruction boundary.
    ///
    /// The result has `len() + 1` entries: the origin, then the
    /// position after each instruction. G90/G91 switch how subsequent
    /// axis words are interpreted but do not themselves move the
    /// machine; non-motion instructions leave the position unchanged.
    pub fn all_positions_starting_at(&self, origin: Point) -> Vec<Point> {
        let mut positions = Vec::with_capacity(self.len() + 1);
        let mut pos = origin;
        let mut orient = Orient::Absolute;
        positions.push(pos);

        for instr in &self.instrs {
            match instr {
                Instruction::SetAbsolute => orient = Orient::Absolute,
                Instruction::SetRelative => orient = Orient::Relative,
                Instruction::Move { x, y, z, .. } => pos = apply_axes(&pos, x, y, z, orient),
                Instruction::Arc { x, y, z, .. } => pos = apply_axes(&pos, x, y, z, orient),
                Instruction::ToolSelect(_)
                | Instruction::SpindleSpeed(_)
                | Instruction::FeedMode { .. }
                | Instruction::Comment { .. }
                | Instruction::Assign { .. }
                | Instruction::UnitsInch
                | Instruction::UnitsMm
                | Instruction::ToolLengthComp
                | Instruction::PathBlendMode
                | Instruction::SpindleOn
                | Instruction::SpindleOnCcw
                | Instruction::SpindleOff
                | Instruction::MistOn
                | Instruction::FloodOn
                | Instruction::CoolantOff
                | Instruction::EndProgram => {}
            }
            positions.push(pos);
        }

        positions
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instrs: Vec<Instruction>) -> Self {
        Program { instrs }
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Program {
            instrs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instrs.iter()
    }
}

impl fmt::Display for Program {
    /// One instruction per line, trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.instrs {
            writeln!(f, "{instr}")?;
        }
        Ok(())
    }
}
