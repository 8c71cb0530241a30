//! Building topology: the fixed node-position table and edge list the
//! hazard overlay paints onto.
//!
//! This is a static backdrop. It is not part of backend state, it is never
//! derived from a snapshot, and it is never mutated at runtime.

use crate::types::Point;

// ---------------------------------------------------------------------------
// Node table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyNode {
    pub id: &'static str,
    pub position: Point,
}

const fn node(id: &'static str, x: f32, y: f32) -> TopologyNode {
    TopologyNode {
        id,
        position: Point::new(x, y),
    }
}

/// Canvas size the position table is laid out for.
pub const MAP_WIDTH: u32 = 600;
pub const MAP_HEIGHT: u32 = 400;

/// Rooms, hallway junctions and the exit, in draw order.
static NODES: [TopologyNode; 9] = [
    node("R1", 80.0, 320.0),
    node("R2", 80.0, 80.0),
    node("R3", 250.0, 80.0),
    node("R4", 250.0, 320.0),
    node("R5", 420.0, 80.0),
    node("R6", 520.0, 80.0),
    node("H1", 250.0, 200.0),
    node("H2", 420.0, 200.0),
    node("X1", 540.0, 330.0),
];

static EDGES: [(&str, &str); 8] = [
    ("R1", "H1"),
    ("R2", "H1"),
    ("R3", "H1"),
    ("R4", "H1"),
    ("H1", "H2"),
    ("R5", "H2"),
    ("R6", "H2"),
    ("H2", "X1"),
];

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

/// Read-only view over a node table and an edge list.
#[derive(Debug, Clone, Copy)]
pub struct Topology {
    nodes: &'static [TopologyNode],
    edges: &'static [(&'static str, &'static str)],
    width: u32,
    height: u32,
}

impl Topology {
    /// The SafePath demo building.
    pub fn building() -> Self {
        Self {
            nodes: &NODES,
            edges: &EDGES,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        }
    }

    /// Nodes in their fixed draw order.
    pub fn nodes(&self) -> &'static [TopologyNode] {
        self.nodes
    }

    pub fn edges(&self) -> &'static [(&'static str, &'static str)] {
        self.edges
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.position)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Edge endpoints resolved to positions. Edges naming an unknown node
    /// are skipped.
    pub fn edge_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.edges
            .iter()
            .filter_map(|(a, b)| Some((self.position(a)?, self.position(b)?)))
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::building()
    }
}
