//! Render targets: text panels, room zone elements and their board, plus
//! the two views that group them by owner.
//!
//! Each view is written by exactly one component:
//!
//! ```text
//! PlanView  ← render::render_plan / render::draw_map
//!   ├── summary : TextPanel
//!   └── canvas  : RecordingCanvas
//! RoomView  ← reconcile::apply_room_states
//!   ├── zones   : ZoneBoard (one ZoneElement per known room)
//!   └── summary : TextPanel
//! ```

use crate::canvas::RecordingCanvas;
use crate::topology::Topology;
use crate::types::{RoomCategory, KNOWN_ROOMS};
use std::collections::BTreeMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Text panel
// ---------------------------------------------------------------------------

/// A block of display text. Content is always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextPanel {
    lines: Vec<String>,
}

impl TextPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Zone element
// ---------------------------------------------------------------------------

/// Class marker every zone carries regardless of category.
pub const ZONE_BASE_CLASS: &str = "zone";

/// One room's zone on the floorplan overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneElement {
    pub room_id: String,
    classes: Vec<String>,
}

impl ZoneElement {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            classes: vec![ZONE_BASE_CLASS.to_string()],
        }
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Categories whose marker is currently present.
    pub fn active_categories(&self) -> Vec<RoomCategory> {
        RoomCategory::ALL
            .into_iter()
            .filter(|c| self.has_class(c.class_name()))
            .collect()
    }

    /// The single active category, or `None` if the zone has never been
    /// reconciled (or is somehow in a multi-category state).
    pub fn category(&self) -> Option<RoomCategory> {
        match self.active_categories().as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Zone board
// ---------------------------------------------------------------------------

/// All zone elements, keyed by room id.
#[derive(Debug, Clone, Default)]
pub struct ZoneBoard {
    zones: BTreeMap<String, ZoneElement>,
}

impl ZoneBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// One zone per known room, none of them categorised yet.
    pub fn with_known_rooms() -> Self {
        let mut board = Self::new();
        for room in KNOWN_ROOMS {
            board.insert(ZoneElement::new(room));
        }
        board
    }

    pub fn insert(&mut self, zone: ZoneElement) {
        self.zones.insert(zone.room_id.clone(), zone);
    }

    pub fn remove(&mut self, room_id: &str) -> Option<ZoneElement> {
        self.zones.remove(room_id)
    }

    pub fn get(&self, room_id: &str) -> Option<&ZoneElement> {
        self.zones.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &str) -> Option<&mut ZoneElement> {
        self.zones.get_mut(room_id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneElement> {
        self.zones.values()
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Render target owned by the Plan and Map renderers.
#[derive(Debug, Clone)]
pub struct PlanView {
    pub summary: TextPanel,
    pub canvas: RecordingCanvas,
}

impl PlanView {
    pub fn new(topology: &Topology) -> Self {
        let (w, h) = topology.dimensions();
        Self {
            summary: TextPanel::new(),
            canvas: RecordingCanvas::new(w, h),
        }
    }
}

/// Render target owned by the Room State Reconciler.
#[derive(Debug, Clone)]
pub struct RoomView {
    pub zones: ZoneBoard,
    pub summary: TextPanel,
}

impl RoomView {
    pub fn new() -> Self {
        Self {
            zones: ZoneBoard::with_known_rooms(),
            summary: TextPanel::new(),
        }
    }
}

impl Default for RoomView {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a view. Locks are held only for a synchronous render.
pub type SharedView<T> = Arc<parking_lot::Mutex<T>>;

pub fn shared<T>(view: T) -> SharedView<T> {
    Arc::new(parking_lot::Mutex::new(view))
}
