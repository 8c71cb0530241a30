//! Plan and map rendering.
//!
//! Both renderers are pure functions of their inputs plus the target they
//! are handed: every call is a full repaint, nothing is diffed against the
//! previous frame, and nothing from the snapshot is retained.

use crate::canvas::{palette, Canvas};
use crate::protocol::{HazardSnapshot, Plan, RoomMode, RoomPlan};
use crate::surface::PlanView;
use crate::topology::Topology;
use std::collections::HashSet;

pub const NODE_RADIUS: f32 = 14.0;
pub const EDGE_WIDTH: f32 = 3.0;
/// Labels sit this far above the node centre.
pub const LABEL_OFFSET: f32 = 20.0;

/// Shown in place of the hazard list when it is empty.
pub const NO_HAZARDS: &str = "None";

// ---------------------------------------------------------------------------
// Plan renderer
// ---------------------------------------------------------------------------

/// Replace the plan summary and repaint the map from `snapshot`.
pub fn render_plan(snapshot: &HazardSnapshot, view: &mut PlanView, topology: &Topology) {
    view.summary.replace(plan_summary_lines(snapshot));
    draw_map(&mut view.canvas, topology, &snapshot.hazards, &snapshot.plan);
}

/// Text summary of a snapshot: hazards, then one line per room, then one
/// line per door.
pub fn plan_summary_lines(snapshot: &HazardSnapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(3 + snapshot.plan.rooms.len() + snapshot.plan.doors.len());

    lines.push(format!("Hazards: {}", hazard_summary(&snapshot.hazards)));

    lines.push("Rooms:".to_string());
    for (room_id, room) in &snapshot.plan.rooms {
        lines.push(room_line(room_id, room));
    }

    lines.push("Doors:".to_string());
    for (door_id, state) in &snapshot.plan.doors {
        // Door state is trusted display text from the backend.
        lines.push(format!("{door_id}: {state}"));
    }

    lines
}

/// Comma-joined hazard ids, or `"None"`.
pub fn hazard_summary(hazards: &[String]) -> String {
    if hazards.is_empty() {
        NO_HAZARDS.to_string()
    } else {
        hazards.join(", ")
    }
}

/// `"R1: EVAC to X1"` or `"R2: LOCKDOWN"`. The exit is never shown for a
/// non-EVAC room, even when the backend sent one.
pub fn room_line(room_id: &str, room: &RoomPlan) -> String {
    match (&room.mode, room.exit.as_deref()) {
        (RoomMode::Evac, Some(exit)) => format!("{room_id}: EVAC to {exit}"),
        (RoomMode::Evac, None) => format!("{room_id}: EVAC"),
        (RoomMode::Lockdown, _) => format!("{room_id}: LOCKDOWN"),
    }
}

// ---------------------------------------------------------------------------
// Map renderer
// ---------------------------------------------------------------------------

/// Repaint the topology with hazard membership colouring.
///
/// Order: clear, every edge once, then every node (circle + label) in the
/// topology's fixed order. Node colour depends only on whether the node id
/// is in `hazards`, never on the order of `hazards`.
///
/// `_plan` does not affect geometry yet; door and route overlays will draw
/// from it.
pub fn draw_map<C: Canvas>(canvas: &mut C, topology: &Topology, hazards: &[String], _plan: &Plan) {
    let hazard_set: HashSet<&str> = hazards.iter().map(String::as_str).collect();

    canvas.clear();

    for (from, to) in topology.edge_segments() {
        canvas.stroke_line(from, to, palette::EDGE, EDGE_WIDTH);
    }

    for node in topology.nodes() {
        let fill = if hazard_set.contains(node.id) {
            palette::HAZARD
        } else {
            palette::NODE
        };
        canvas.fill_circle(node.position, NODE_RADIUS, fill);
        canvas.fill_text(node.id, node.position.offset(0.0, -LABEL_OFFSET), palette::LABEL);
    }
}
