//! Machine and job parameters for cut synthesis.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use camber_core::geom::{point, Point};

use crate::cut::Tool;

/// Which tools the target machine has loaded for this job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ToolSet {
    DrillOnly,
    DragKnifeOnly,
    #[default]
    DrillAndDragKnife,
}

impl ToolSet {
    /// Returns true if the set can run cuts assigned to `tool`.
    /// Untagged cuts are always accepted.
    pub fn permits(&self, tool: Tool) -> bool {
        match (self, tool) {
            (_, Tool::None) => true,
            (ToolSet::DrillOnly, Tool::Drill) => true,
            (ToolSet::DragKnifeOnly, Tool::DragKnife) => true,
            (ToolSet::DrillAndDragKnife, _) => true,
            _ => false,
        }
    }
}

/// Output dialect / machine profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TargetMachine {
    #[default]
    LinuxCnc,
    Shopbot,
}

/// Configuration for one synthesis job. Constructed once, read-only
/// thereafter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CutParams {
    /// Z level at which rapid XY travel is collision-free.
    pub safe_height: f64,

    /// Stock thickness.
    pub material_depth: f64,

    /// Depth below the material surface for profile cuts whose layout
    /// geometry sits at Z = 0.
    pub cut_depth: f64,

    /// How far past the material surface the blade is pushed while
    /// realigning.
    pub push_depth: f64,

    /// Machine location at job start; travel for the first cut of each
    /// tool group originates here.
    pub start_loc: Point,

    /// Blade orientation at job start.
    pub start_orient: Point,

    /// Fallback feed rate for cuts that carry none.
    pub default_feedrate: f64,

    /// Whether `default_feedrate` is applied to cuts with no feed of
    /// their own.
    pub use_default_feedrate: bool,

    /// Feed rate for plunge moves; falls back to `default_feedrate`.
    pub plunge_feedrate: Option<f64>,

    /// Machine-coordinate Z used by the final retract on machines that
    /// home in machine coordinates.
    pub machine_z_zero: f64,

    /// Largest blade heading change, in degrees, that may be absorbed
    /// by a plain transition without realigning the blade.
    pub max_orientation_diff: f64,

    /// Drag-knife pivot radius.
    pub blade_radius: f64,

    /// Tools available on the machine.
    pub tools: ToolSet,

    /// Output dialect.
    pub target_machine: TargetMachine,

    /// Restore XY to `start_loc` (at safe height) after the final
    /// retract. Default is a height-only retract.
    pub home_xy: bool,
}

impl Default for CutParams {
    fn default() -> Self {
        Self {
            safe_height: 0.5,
            material_depth: 0.0,
            cut_depth: 0.0,
            push_depth: 0.005,
            start_loc: point(0.0, 0.0, 0.0),
            start_orient: point(1.0, 0.0, 0.0),
            default_feedrate: 30.0,
            use_default_feedrate: false,
            plunge_feedrate: None,
            machine_z_zero: 0.0,
            max_orientation_diff: 15.0,
            blade_radius: 0.16,
            tools: ToolSet::default(),
            target_machine: TargetMachine::default(),
            home_xy: false,
        }
    }
}

impl CutParams {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_safe_height(mut self, height: f64) -> Self {
        self.safe_height = height;
        self
    }

    pub fn with_material_depth(mut self, depth: f64) -> Self {
        self.material_depth = depth;
        self
    }

    pub fn with_cut_depth(mut self, depth: f64) -> Self {
        self.cut_depth = depth;
        self
    }

    pub fn with_push_depth(mut self, depth: f64) -> Self {
        self.push_depth = depth;
        self
    }

    pub fn with_start_loc(mut self, loc: Point) -> Self {
        self.start_loc = loc;
        self
    }

    pub fn with_start_orient(mut self, orient: Point) -> Self {
        self.start_orient = orient;
        self
    }

    pub fn with_default_feedrate(mut self, rate: f64) -> Self {
        self.default_feedrate = rate;
        self.use_default_feedrate = true;
        self
    }

    pub fn with_plunge_feedrate(mut self, rate: f64) -> Self {
        self.plunge_feedrate = Some(rate);
        self
    }

    pub fn with_max_orientation_diff(mut self, degrees: f64) -> Self {
        self.max_orientation_diff = degrees;
        self
    }

    pub fn with_blade_radius(mut self, radius: f64) -> Self {
        self.blade_radius = radius;
        self
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_target_machine(mut self, machine: TargetMachine) -> Self {
        self.target_machine = machine;
        self
    }

    pub fn with_home_xy(mut self, home_xy: bool) -> Self {
        self.home_xy = home_xy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = CutParams::default();
        assert_eq!(params.max_orientation_diff, 15.0);
        assert_eq!(params.blade_radius, 0.16);
        assert!(!params.use_default_feedrate);
        assert!(!params.home_xy);
    }

    #[test]
    fn test_builder() {
        let params = CutParams::new()
            .with_safe_height(0.75)
            .with_default_feedrate(45.0)
            .with_home_xy(true);
        assert_eq!(params.safe_height, 0.75);
        assert_eq!(params.default_feedrate, 45.0);
        assert!(params.use_default_feedrate);
        assert!(params.home_xy);
    }

    #[test]
    fn test_tool_set_permits() {
        assert!(ToolSet::DrillOnly.permits(Tool::Drill));
        assert!(!ToolSet::DrillOnly.permits(Tool::DragKnife));
        assert!(ToolSet::DragKnifeOnly.permits(Tool::DragKnife));
        assert!(ToolSet::DrillAndDragKnife.permits(Tool::Drill));
        // untagged cuts are never rejected
        assert!(ToolSet::DrillOnly.permits(Tool::None));
    }
}
