//! Code generation: rendering cut sequences as instruction blocks.
//!
//! Each cut becomes one motion block; a tool-specific settings
//! preamble is emitted whenever the active tool changes, and a
//! machine-specific footer (retract, spindle stop, program end) is
//! appended once. [`shape_layout_to_gcode`] is the public entry point
//! for the whole synthesis pipeline.

use camber_core::error::Result;
use camber_core::geom::{point, Point, EPS_POINT};
use camber_core::instr::{Instruction, MoveKind};
use camber_core::program::Program;
use camber_core::value::{Value, VALUE_EPS};

use crate::cut::{Cut, CutGeometry, Tool};
use crate::params::{CutParams, TargetMachine};
use crate::schedule::schedule_cuts;
use crate::transition::{cuts_are_adjacent, insert_transitions};

/// An ordered group of instructions emitted as a unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    instrs: Vec<Instruction>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instr: Instruction) {
        self.instrs.push(instr);
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instrs
    }
}

impl IntoIterator for Block {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instrs.into_iter()
    }
}

impl From<Vec<Instruction>> for Block {
    fn from(instrs: Vec<Instruction>) -> Self {
        Self { instrs }
    }
}

/// Feed rate word for a machining move.
fn feed_value(cut: &Cut, params: &CutParams) -> Value {
    match cut.settings.feedrate {
        Value::Omitted if params.use_default_feedrate => Value::Literal(params.default_feedrate),
        feed => feed,
    }
}

fn axis_words(p: &Point) -> (Value, Value, Value) {
    (
        Value::Literal(p.x),
        Value::Literal(p.y),
        Value::Literal(p.z),
    )
}

/// Motion block for one cut. Holes produce no motion of their own;
/// the drilling is expressed by the transition plunge that precedes
/// them.
fn motion_block(cut: &Cut, params: &CutParams) -> Option<Block> {
    let mut block = Block::new();
    match &cut.geom {
        CutGeometry::Linear { end, .. } => {
            let (x, y, z) = axis_words(end);
            block.push(Instruction::Move {
                kind: MoveKind::Linear,
                x,
                y,
                z,
                feed: feed_value(cut, params),
            });
        }
        CutGeometry::Safe { end, .. } => {
            let (x, y, z) = axis_words(end);
            block.push(Instruction::Move {
                kind: MoveKind::Rapid,
                x,
                y,
                z,
                feed: Value::Omitted,
            });
        }
        CutGeometry::Arc(arc) => {
            let (x, y, z) = axis_words(&arc.end());
            let offset = arc.start_offset();
            let k = if offset.z.abs() < VALUE_EPS {
                Value::Omitted
            } else {
                Value::Literal(offset.z)
            };
            block.push(Instruction::Arc {
                kind: arc.direction(),
                x,
                y,
                z,
                i: Value::Literal(offset.x),
                j: Value::Literal(offset.y),
                k,
                feed: feed_value(cut, params),
                plane: arc.plane(),
            });
        }
        CutGeometry::Hole { .. } => return None,
    }
    Some(block)
}

/// Settings preamble emitted when the active tool changes. The first
/// preamble of the program also carries the machine setup modes; later
/// ones retract to safe height before the swap, since the next tool
/// group's travel originates at the job start location.
fn tool_preamble(cut: &Cut, first: bool, params: &CutParams) -> Block {
    let mut block = Block::new();
    if first {
        block.push(Instruction::SetAbsolute);
        block.push(Instruction::UnitsInch);
        if params.target_machine == TargetMachine::LinuxCnc {
            block.push(Instruction::PathBlendMode);
        }
    } else {
        block.push(Instruction::Move {
            kind: MoveKind::Rapid,
            x: Value::Omitted,
            y: Value::Omitted,
            z: Value::Literal(params.safe_height),
            feed: Value::Omitted,
        });
    }

    match cut.tool {
        Tool::DragKnife => {
            block.push(Instruction::comment("drag knife transfer"));
            if let Some(t) = cut.settings.active_tool.as_literal() {
                block.push(Instruction::ToolSelect(t as i32));
            }
            if params.target_machine == TargetMachine::LinuxCnc {
                block.push(Instruction::ToolLengthComp);
            }
            // the knife does not spin
            block.push(Instruction::SpindleOff);
        }
        Tool::Drill | Tool::None => {
            block.push(Instruction::comment("drill header"));
            if let Some(t) = cut.settings.active_tool.as_literal() {
                block.push(Instruction::ToolSelect(t as i32));
            }
            if params.target_machine == TargetMachine::LinuxCnc {
                block.push(Instruction::ToolLengthComp);
            }
            if let Some(s) = cut.settings.spindle_speed.as_literal() {
                block.push(Instruction::SpindleSpeed(s as i32));
            }
            block.push(Instruction::SpindleOn);
        }
    }
    block
}

/// Machine-specific footer: retract, spindle stop, program end.
fn footer(params: &CutParams) -> Block {
    let mut block = Block::new();
    match params.target_machine {
        TargetMachine::LinuxCnc => block.push(Instruction::Move {
            kind: MoveKind::MachineCoord,
            x: Value::Omitted,
            y: Value::Omitted,
            z: Value::Literal(params.machine_z_zero),
            feed: Value::Omitted,
        }),
        TargetMachine::Shopbot => block.push(Instruction::Move {
            kind: MoveKind::Rapid,
            x: Value::Omitted,
            y: Value::Omitted,
            z: Value::Literal(params.safe_height),
            feed: Value::Omitted,
        }),
    }
    block.push(Instruction::SpindleOff);
    block.push(Instruction::CoolantOff);
    block.push(Instruction::EndProgram);
    block
}

/// Renders an ordered cut sequence as instruction blocks.
pub fn gcode_blocks_for_cuts(cuts: &[Cut], params: &CutParams) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(cuts.len() + 2);
    let mut current_tool: Option<Tool> = None;

    for cut in cuts {
        if current_tool != Some(cut.tool) {
            blocks.push(tool_preamble(cut, current_tool.is_none(), params));
            current_tool = Some(cut.tool);
        }
        if let Some(block) = motion_block(cut, params) {
            blocks.push(block);
        }
    }

    if !cuts.is_empty() {
        blocks.push(footer(params));
    }
    blocks
}

/// Sinks machining cuts whose layout geometry sits at the material
/// surface (Z = 0) down to the configured cut depth. Cuts that already
/// carry a height pass through untouched.
fn apply_cut_depth(cuts: Vec<Cut>, params: &CutParams) -> Vec<Cut> {
    if params.cut_depth == 0.0 {
        return cuts;
    }
    let sink = point(0.0, 0.0, -params.cut_depth);
    cuts.into_iter()
        .map(|cut| {
            let at_surface =
                cut.start().z.abs() <= EPS_POINT && cut.end().z.abs() <= EPS_POINT;
            if cut.is_machining() && at_surface {
                cut.shift(sink)
            } else {
                cut
            }
        })
        .collect()
}

/// The synthesis pipeline: schedule, connect, render.
///
/// Cuts assigned to tools the machine does not have are dropped with a
/// warning. The adjacency audit runs on the connected sequence; gaps
/// are logged, never fatal.
pub fn shape_layout_to_gcode(cuts: Vec<Cut>, params: &CutParams) -> Result<Program> {
    let mut available = Vec::with_capacity(cuts.len());
    for cut in cuts {
        if params.tools.permits(cut.tool) {
            available.push(cut);
        } else {
            log::warn!("dropping cut at {:?}: {:?} is not loaded", cut.start(), cut.tool);
        }
    }

    let sunk = apply_cut_depth(available, params);
    let scheduled = schedule_cuts(sunk);
    let sequenced = insert_transitions(&scheduled, params)?;

    let gaps = cuts_are_adjacent(&sequenced);
    if gaps > 0 {
        log::warn!("synthesis produced {gaps} non-adjacent cut pairs");
    }

    let mut program = Program::new();
    for block in gcode_blocks_for_cuts(&sequenced, params) {
        program.extend(block);
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cut::MachineSettings;
    use camber_core::instr::ArcKind;

    fn drill_settings() -> MachineSettings {
        MachineSettings {
            feedrate: Value::Literal(30.0),
            spindle_speed: Value::Literal(12000.0),
            active_tool: Value::Literal(2.0),
        }
    }

    #[test]
    fn test_linear_cut_renders_g1_with_feed() {
        let cut = Cut::linear(point(0.0, 0.0, 0.0), point(1.0, 2.0, -0.1)).with_feedrate(30.0);
        let block = motion_block(&cut, &CutParams::default()).unwrap();
        assert_eq!(
            block.instructions()[0].to_string(),
            "G1 X1 Y2 Z-0.1 F30"
        );
    }

    #[test]
    fn test_safe_move_renders_g0_without_feed() {
        let cut = Cut::safe(point(0.0, 0.0, 0.0), point(1.0, 2.0, 0.5)).with_feedrate(30.0);
        let block = motion_block(&cut, &CutParams::default()).unwrap();
        assert_eq!(block.instructions()[0].to_string(), "G0 X1 Y2 Z0.5");
    }

    #[test]
    fn test_arc_renders_offsets() {
        let cut = Cut::arc(
            point(0.0, 0.0, 0.0),
            point(2.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            ArcKind::Cw,
        )
        .unwrap();
        let block = motion_block(&cut, &CutParams::default()).unwrap();
        assert_eq!(block.instructions()[0].to_string(), "G2 X2 Y0 Z0 I1 J0");
    }

    #[test]
    fn test_hole_emits_no_motion() {
        let cut = Cut::hole(point(1.0, 1.0, 0.0), 0.125);
        assert!(motion_block(&cut, &CutParams::default()).is_none());
    }

    #[test]
    fn test_default_feedrate_fallback() {
        let params = CutParams::default().with_default_feedrate(45.0);
        let cut = Cut::linear(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0));
        let block = motion_block(&cut, &params).unwrap();
        assert_eq!(block.instructions()[0].to_string(), "G1 X1 Y0 Z0 F45");
    }

    #[test]
    fn test_preamble_emitted_per_tool_group() {
        let hole = Cut::hole(point(1.0, 1.0, 0.0), 0.1)
            .with_tool(Tool::Drill)
            .with_settings(drill_settings());
        let knife = Cut::linear(point(2.0, 2.0, -0.05), point(3.0, 2.0, -0.05))
            .with_tool(Tool::DragKnife);
        let blocks = gcode_blocks_for_cuts(&[hole, knife], &CutParams::default());

        let text: Vec<String> = blocks
            .iter()
            .flat_map(|b| b.instructions().iter().map(|i| i.to_string()))
            .collect();
        assert!(text.contains(&"(drill header)".to_string()));
        assert!(text.contains(&"(drag knife transfer)".to_string()));
        assert!(text.contains(&"T2".to_string()));
        assert!(text.contains(&"S12000".to_string()));
    }

    #[test]
    fn test_footer_ends_program() {
        let cut = Cut::linear(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0));
        let blocks = gcode_blocks_for_cuts(&[cut], &CutParams::default());
        let last = blocks.last().unwrap();
        assert_eq!(
            last.instructions().last(),
            Some(&Instruction::EndProgram)
        );
    }

    #[test]
    fn test_empty_cut_list_renders_nothing() {
        assert!(gcode_blocks_for_cuts(&[], &CutParams::default()).is_empty());
    }

    #[test]
    fn test_apply_cut_depth_sinks_surface_cuts() {
        let params = CutParams::default().with_cut_depth(0.2);
        let cuts = vec![
            Cut::linear(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)),
            Cut::linear(point(0.0, 0.0, -0.5), point(1.0, 0.0, -0.5)),
        ];
        let sunk = apply_cut_depth(cuts, &params);
        assert!((sunk[0].start().z + 0.2).abs() < 1e-12);
        // cuts that already carry a height pass through
        assert!((sunk[1].start().z + 0.5).abs() < 1e-12);
    }
}
