//! Core dashboard types shared across all modules.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Hazards
// ---------------------------------------------------------------------------

/// Node ids currently flagged hazardous, in server order.
///
/// Replaced wholesale on every poll; an empty list means "no hazards".
pub type HazardList = Vec<String>;

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// The six rooms that carry a zone element and a detector feed.
pub const KNOWN_ROOMS: [&str; 6] = ["R1", "R2", "R3", "R4", "R5", "R6"];

/// Raw status assumed for a room the backend did not report.
pub const DEFAULT_ROOM_STATUS: &str = "clear";

/// Display category of a room. Exactly one applies at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    Fire,
    Gun,
    Safe,
}

impl RoomCategory {
    pub const ALL: [RoomCategory; 3] = [RoomCategory::Fire, RoomCategory::Gun, RoomCategory::Safe];

    /// Classify a raw detector label. Total: unknown labels are `Safe`.
    ///
    /// `fire_gun` is `Fire`; fire outranks a firearm in the same room.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "fire" | "fire_gun" => RoomCategory::Fire,
            "gun" => RoomCategory::Gun,
            _ => RoomCategory::Safe,
        }
    }

    /// Zone class marker for this category.
    pub fn class_name(self) -> &'static str {
        match self {
            RoomCategory::Fire => "fire",
            RoomCategory::Gun => "gun",
            RoomCategory::Safe => "safe",
        }
    }
}

impl std::fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class_name())
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend origin, without a trailing slash.
    pub base_url: String,
    /// Period of both poll loops.
    pub poll_interval_ms: u64,
    /// Per-request timeout for every backend call.
    pub request_timeout_ms: u64,
    /// When set, the map is written here as SVG after every accepted plan render.
    pub svg_out: Option<PathBuf>,
    /// Operator profile location. Defaults to the platform config dir.
    pub profile_path: Option<PathBuf>,
}

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            poll_interval_ms: 1000,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            svg_out: None,
            profile_path: None,
        }
    }
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// A zero timeout would fail every request, so it falls back to
    /// [`DEFAULT_REQUEST_TIMEOUT_MS`].
    pub fn request_timeout(&self) -> std::time::Duration {
        let ms = match self.request_timeout_ms {
            0 => DEFAULT_REQUEST_TIMEOUT_MS,
            ms => ms,
        };
        std::time::Duration::from_millis(ms)
    }
}
