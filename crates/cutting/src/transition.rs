//! Transition synthesis: connecting an ordered cut list into one safe
//! motion sequence.
//!
//! Consecutive cuts that are not spatially adjacent get synthesized
//! connecting motion: a retract to safe height, a rapid XY traverse,
//! and a plunge to the next cut's start. Drag-knife cuts additionally
//! get a blade realignment arc when the heading change between cuts
//! exceeds the configured limit.

use camber_core::error::Result;
use camber_core::geom::{point, within_eps, Point, EPS_POINT};
use camber_core::value::Value;

use crate::blade::{align_coords, angle_between};
use crate::cut::{Cut, CutGeometry, MachineSettings, Tool};
use crate::params::CutParams;

/// Inserts transition motion between every pair of cuts.
///
/// Synthesized cuts are tagged with the following cut's tool and
/// settings, so each tool group stays self-contained. Ends with a
/// retract of the final cut to safe height (plus an XY traverse home
/// when `params.home_xy` is set).
pub fn insert_transitions(cuts: &[Cut], params: &CutParams) -> Result<Vec<Cut>> {
    let mut out: Vec<Cut> = Vec::with_capacity(cuts.len() * 2);
    let mut last: Option<&Cut> = None;

    for next in cuts {
        let transition = move_to_next_cut(last, next, params)?;
        log::debug!(
            "transition to cut at {:?}: {} synthesized moves",
            next.start(),
            transition.len()
        );
        for mut cut in transition {
            cut.tool = next.tool;
            cut.settings.active_tool = next.settings.active_tool;
            cut.settings.spindle_speed = next.settings.spindle_speed;
            if cut.is_machining() && cut.settings.feedrate.is_omitted() {
                cut.settings.feedrate = plunge_feed(next, params);
            }
            out.push(cut);
        }
        out.push(*next);
        last = Some(next);
    }

    insert_move_home(&mut out, params);
    Ok(out)
}

/// Feed rate for synthesized plunge and realignment moves.
fn plunge_feed(next: &Cut, params: &CutParams) -> Value {
    if let Some(rate) = params.plunge_feedrate {
        Value::Literal(rate)
    } else if params.use_default_feedrate {
        Value::Literal(params.default_feedrate)
    } else {
        next.settings.feedrate
    }
}

/// Synthesizes the motion from `last` (or the job start) to `next`.
pub fn move_to_next_cut(last: Option<&Cut>, next: &Cut, params: &CutParams) -> Result<Vec<Cut>> {
    match next.tool {
        Tool::DragKnife => move_to_next_cut_dn(last, next, params),
        _ => Ok(move_to_next_cut_drill(last, next, params)),
    }
}

/// Where travel toward `next` begins: the previous cut's end for a
/// same-tool predecessor, otherwise the job start location.
fn travel_origin(last: Option<&Cut>, next: &Cut, params: &CutParams) -> Point {
    match last {
        Some(prev) if prev.tool == next.tool => prev.end(),
        _ => params.start_loc,
    }
}

/// Straight transition for drill-type tools.
pub fn move_to_next_cut_drill(last: Option<&Cut>, next: &Cut, params: &CutParams) -> Vec<Cut> {
    let from = travel_origin(last, next, params);
    let to = next.start();
    if within_eps(&from, &to, EPS_POINT) {
        return Vec::new();
    }
    from_to_with_g0_height(&from, &to, params)
}

/// Blade-aware transition for the drag knife.
///
/// A heading change at or below `params.max_orientation_diff` is
/// absorbed by the cut itself; beyond it, the blade is realigned by
/// cutting an arc at `material_depth - push_depth` just before the
/// next cut's start.
pub fn move_to_next_cut_dn(last: Option<&Cut>, next: &Cut, params: &CutParams) -> Result<Vec<Cut>> {
    let current_orient = match last {
        Some(prev) if prev.tool == next.tool => {
            prev.end_direction().unwrap_or(params.start_orient)
        }
        _ => params.start_orient,
    };
    let next_orient = match next.start_direction() {
        Some(dir) => dir,
        None => return Ok(move_to_next_cut_drill(last, next, params)),
    };

    let turn = angle_between(&current_orient, &next_orient);
    if turn <= params.max_orientation_diff {
        return Ok(move_to_next_cut_drill(last, next, params));
    }

    let from = travel_origin(last, next, params);
    let next_start = next.start();
    let align_depth = params.material_depth - params.push_depth;
    let desired_pos = point(next_start.x, next_start.y, align_depth);
    let arc = align_coords(&next_orient, &desired_pos, &current_orient, params.blade_radius)?;

    let mut cuts = from_to_with_g0_height(&from, &arc.start(), params);
    cuts.push(Cut {
        geom: CutGeometry::Arc(arc),
        tool: Tool::DragKnife,
        settings: MachineSettings::default(),
    });
    if !within_eps(&desired_pos, &next_start, EPS_POINT) {
        cuts.push(Cut::linear(desired_pos, next_start));
    }
    Ok(cuts)
}

/// Retract to safe height, rapid-traverse in XY, plunge to `to`.
///
/// Each leg is emitted only when it covers distance, so a transition
/// that is already at height or already above the target produces no
/// zero-length moves.
pub fn from_to_with_g0_height(from: &Point, to: &Point, params: &CutParams) -> Vec<Cut> {
    let mut cuts = Vec::with_capacity(3);
    let mut at = *from;

    let lifted = point(from.x, from.y, params.safe_height);
    if !within_eps(&at, &lifted, EPS_POINT) {
        cuts.push(Cut::safe(at, lifted));
        at = lifted;
    }

    let above = point(to.x, to.y, params.safe_height);
    if !within_eps(&at, &above, EPS_POINT) {
        cuts.push(Cut::safe(at, above));
        at = above;
    }

    if !within_eps(&at, to, EPS_POINT) {
        cuts.push(Cut::linear(at, *to));
    }

    cuts
}

/// Appends the final retract: the last cut's end lifted to safe
/// height, tagged with the last tool. With `params.home_xy`, also
/// traverses back over the start location.
pub fn insert_move_home(cuts: &mut Vec<Cut>, params: &CutParams) {
    let Some(last) = cuts.last() else {
        return;
    };
    let tool = last.tool;
    let settings = last.settings;
    let end = last.end();

    let lifted = point(end.x, end.y, params.safe_height);
    if !within_eps(&end, &lifted, EPS_POINT) {
        cuts.push(Cut {
            geom: CutGeometry::Safe {
                start: end,
                end: lifted,
            },
            tool,
            settings,
        });
    }

    if params.home_xy {
        let at = cuts.last().map(|c| c.end()).unwrap_or(lifted);
        let home = point(params.start_loc.x, params.start_loc.y, params.safe_height);
        if !within_eps(&at, &home, EPS_POINT) {
            cuts.push(Cut {
                geom: CutGeometry::Safe {
                    start: at,
                    end: home,
                },
                tool,
                settings,
            });
        }
    }
}

/// Audits the synthesis post-condition: every same-tool consecutive
/// pair must be spatially adjacent. Returns the number of gaps found;
/// gaps indicate a synthesis bug, not bad input, and are reported
/// rather than fatal.
pub fn cuts_are_adjacent(cuts: &[Cut]) -> u32 {
    let mut gaps = 0;
    for (index, pair) in cuts.windows(2).enumerate() {
        if pair[0].tool != pair[1].tool {
            continue;
        }
        if !within_eps(&pair[0].end(), &pair[1].start(), EPS_POINT) {
            log::warn!(
                "cuts {} and {} are not adjacent: end {:?} vs start {:?}",
                index,
                index + 1,
                pair[0].end(),
                pair[1].start()
            );
            gaps += 1;
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CutParams {
        CutParams::default().with_safe_height(0.5)
    }

    fn square(tool: Tool, depth: f64) -> Vec<Cut> {
        let corners = [
            point(1.0, 1.0, depth),
            point(2.0, 1.0, depth),
            point(2.0, 2.0, depth),
            point(1.0, 2.0, depth),
        ];
        (0..4)
            .map(|i| Cut::linear(corners[i], corners[(i + 1) % 4]).with_tool(tool))
            .collect()
    }

    #[test]
    fn test_transition_brackets_square() {
        let cuts = square(Tool::Drill, -0.1);
        let out = insert_transitions(&cuts, &params()).unwrap();

        // retract from origin + traverse + plunge, 4 cuts, final retract
        assert_eq!(out.len(), 8);
        assert!(!out.first().unwrap().is_machining());
        assert!(!out.last().unwrap().is_machining());
        assert_eq!(out.iter().filter(|c| c.is_machining()).count(), 5);
        assert_eq!(cuts_are_adjacent(&out), 0);
    }

    #[test]
    fn test_adjacent_cuts_get_no_transition() {
        let a = Cut::linear(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)).with_tool(Tool::Drill);
        let b = Cut::linear(point(1.0, 0.0, 0.0), point(1.0, 1.0, 0.0)).with_tool(Tool::Drill);
        let moved = move_to_next_cut(Some(&a), &b, &params()).unwrap();
        assert!(moved.is_empty());
    }

    #[test]
    fn test_transition_tool_tagging() {
        let cuts = square(Tool::Drill, -0.1);
        let out = insert_transitions(&cuts, &params()).unwrap();
        assert!(out.iter().all(|c| c.tool == Tool::Drill));
    }

    #[test]
    fn test_plunge_uses_plunge_feedrate() {
        let p = params().with_plunge_feedrate(10.0);
        let cut =
            Cut::linear(point(1.0, 1.0, -0.1), point(2.0, 1.0, -0.1)).with_tool(Tool::Drill);
        let out = insert_transitions(&[cut], &p).unwrap();
        let plunge = out
            .iter()
            .find(|c| c.is_machining() && matches!(c.geom, CutGeometry::Linear { .. }) && **c != cut)
            .expect("plunge cut");
        assert_eq!(plunge.settings.feedrate, Value::Literal(10.0));
    }

    #[test]
    fn test_tool_change_travels_from_start_loc() {
        let drill = Cut::hole(point(5.0, 5.0, 0.0), 0.1).with_tool(Tool::Drill);
        let knife =
            Cut::linear(point(1.0, 0.0, 0.0), point(2.0, 0.0, 0.0)).with_tool(Tool::DragKnife);
        // knife heading matches start_orient, so its transition is straight
        let out = insert_transitions(&[drill, knife], &params()).unwrap();

        let knife_cuts: Vec<&Cut> = out.iter().filter(|c| c.tool == Tool::DragKnife).collect();
        // knife travel originates at start_loc, not at the drill hole
        let first = knife_cuts.first().unwrap();
        assert!(within_eps(
            &first.start(),
            &point(0.0, 0.0, 0.0),
            EPS_POINT
        ));
    }

    #[test]
    fn test_small_heading_change_stays_straight() {
        let a = Cut::linear(point(0.0, 0.0, -0.05), point(1.0, 0.0, -0.05))
            .with_tool(Tool::DragKnife);
        // 5 degree turn, below the 15 degree default
        let dir = point(5f64.to_radians().cos(), 5f64.to_radians().sin(), 0.0);
        let b = Cut::linear(point(3.0, 0.0, -0.05), point(3.0, 0.0, -0.05) + dir)
            .with_tool(Tool::DragKnife);
        let moved = move_to_next_cut(Some(&a), &b, &params()).unwrap();
        assert!(moved
            .iter()
            .all(|c| !matches!(c.geom, CutGeometry::Arc(_))));
    }

    #[test]
    fn test_large_heading_change_realigns_blade() {
        let p = params().with_material_depth(0.1);
        let a = Cut::linear(point(0.0, 0.0, -0.05), point(1.0, 0.0, -0.05))
            .with_tool(Tool::DragKnife);
        let b = Cut::linear(point(1.0, 0.0, -0.05), point(1.0, -1.0, -0.05))
            .with_tool(Tool::DragKnife);
        let moved = move_to_next_cut(Some(&a), &b, &p).unwrap();

        let arc = moved
            .iter()
            .find_map(|c| match &c.geom {
                CutGeometry::Arc(arc) => Some(*arc),
                _ => None,
            })
            .expect("realignment arc");
        assert!((arc.radius() - p.blade_radius).abs() <= 1e-5);
        // the arc is cut below the surface, pushed past material depth
        assert!((arc.end().z - (p.material_depth - p.push_depth)).abs() <= 1e-9);

        // the synthesized sequence lands on the next cut's start
        let mut seq = moved.clone();
        seq.push(b);
        for pair in seq.windows(2) {
            assert!(within_eps(&pair[0].end(), &pair[1].start(), EPS_POINT));
        }
    }

    #[test]
    fn test_insert_move_home_is_height_only_by_default() {
        let cuts = square(Tool::Drill, -0.1);
        let out = insert_transitions(&cuts, &params()).unwrap();
        let home = out.last().unwrap();
        assert!(within_eps(&home.end(), &point(1.0, 1.0, 0.5), EPS_POINT));
    }

    #[test]
    fn test_insert_move_home_xy_restores_start() {
        let p = params().with_home_xy(true);
        let cuts = square(Tool::Drill, -0.1);
        let out = insert_transitions(&cuts, &p).unwrap();
        let home = out.last().unwrap();
        assert!(within_eps(&home.end(), &point(0.0, 0.0, 0.5), EPS_POINT));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let out = insert_transitions(&[], &params()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_adjacency_audit_reports_gaps() {
        let a = Cut::linear(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)).with_tool(Tool::Drill);
        let b = Cut::linear(point(5.0, 5.0, 0.0), point(6.0, 5.0, 0.0)).with_tool(Tool::Drill);
        assert_eq!(cuts_are_adjacent(&[a, b]), 1);
        // different tools are not expected to be adjacent
        let c = b.with_tool(Tool::DragKnife);
        assert_eq!(cuts_are_adjacent(&[a, c]), 0);
    }
}
