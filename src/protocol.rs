//! `/api/*` wire protocol.
//!
//! This module owns **every body that crosses the HTTP boundary** between
//! the dashboard and the SafePath backend.
//!
//! ## Routes
//!
//! | Route                     | Method | Request          | Response          |
//! |---------------------------|--------|------------------|-------------------|
//! | `/api/hazards`            | GET    | –                | `HazardSnapshot`  |
//! | `/api/hazards`            | POST   | `OverrideRequest`| `HazardSnapshot`  |
//! | `/api/room_states`        | GET    | –                | `RoomStateMap`    |
//! | `/api/upload_floorplan`   | POST   | multipart `file` | `UploadResponse`  |
//! | `/api/upload_3d`          | POST   | multipart `file` | `UploadResponse`  |
//!
//! ## Design rules
//!
//! 1. Every struct is `Serialize + Deserialize` with snake_case JSON.
//! 2. Missing or `null` collections decode as empty, never as an error.
//! 3. Door states and room states are free-form labels and are never
//!    validated here. A non-string label is kept as its JSON text.
//! 4. One malformed room, door or label never rejects the whole body.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::HazardList;

// ---------------------------------------------------------------------------
// Hazard / plan snapshot  (GET|POST /api/hazards)
// ---------------------------------------------------------------------------

/// One authoritative view of the building: which nodes are hazardous and
/// what every room and door should be doing about it.
///
/// Produced fresh per request and dropped after the render that consumes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hazards: HazardList,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan: Plan,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Room id → evacuation/lockdown decision. Sorted by room id.
    #[serde(default, deserialize_with = "lenient_rooms")]
    pub rooms: BTreeMap<String, RoomPlan>,
    /// Door id → raw state label, rendered verbatim.
    #[serde(default, deserialize_with = "lenient_labels")]
    pub doors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum RoomMode {
    #[serde(rename = "EVAC")]
    Evac,
    /// `LOCKDOWN`, and anything that is not exactly `"EVAC"`: other labels,
    /// `null`, non-strings, or a missing `mode`.
    #[serde(rename = "LOCKDOWN")]
    #[default]
    Lockdown,
}

impl<'de> Deserialize<'de> for RoomMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(mode) if mode == "EVAC" => RoomMode::Evac,
            _ => RoomMode::Lockdown,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPlan {
    #[serde(default)]
    pub mode: RoomMode,
    /// Target exit node. Only meaningful when `mode` is `Evac`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<String>,
    /// Doors along the evacuation route, in traversal order.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub path_edges: Vec<String>,
}

impl RoomPlan {
    pub fn evac(exit: impl Into<String>) -> Self {
        Self {
            mode: RoomMode::Evac,
            exit: Some(exit.into()),
            path_edges: Vec::new(),
        }
    }

    pub fn lockdown() -> Self {
        Self {
            mode: RoomMode::Lockdown,
            exit: None,
            path_edges: Vec::new(),
        }
    }
}

/// Body of `POST /api/hazards`. The list is sent exactly as parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRequest {
    pub hazards: HazardList,
}

// ---------------------------------------------------------------------------
// Room states  (GET /api/room_states)
// ---------------------------------------------------------------------------

/// Room id → raw detector label (`clear`, `fire`, `gun`, `fire_gun`, …).
pub type RoomStateMap = BTreeMap<String, String>;

/// Decode a `/api/room_states` body.
///
/// Only a body that is not a JSON object (or `null`) is an error. A
/// non-string label becomes its JSON text, which classifies as safe.
pub fn decode_room_states(body: &[u8]) -> serde_json::Result<RoomStateMap> {
    let raw: Option<BTreeMap<String, Value>> = serde_json::from_slice(body)?;
    Ok(raw.map(labels_from_values).unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A room entry that is not a usable object renders as a bare lockdown.
fn lenient_rooms<'de, D>(deserializer: D) -> Result<BTreeMap<String, RoomPlan>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(id, value)| {
            let room = serde_json::from_value(value).unwrap_or_else(|_| RoomPlan::lockdown());
            (id, room)
        })
        .collect())
}

fn lenient_labels<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(labels_from_values).unwrap_or_default())
}

fn labels_from_values(raw: BTreeMap<String, Value>) -> BTreeMap<String, String> {
    raw.into_iter()
        .map(|(id, value)| {
            let label = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (id, label)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Uploads  (POST /api/upload_floorplan, /api/upload_3d)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Route helpers
// ---------------------------------------------------------------------------

/// All backend routes used by the dashboard, as constants.
pub mod routes {
    pub const HAZARDS: &str = "/api/hazards";
    pub const ROOM_STATES: &str = "/api/room_states";

    pub const UPLOAD_FLOORPLAN: &str = "/api/upload_floorplan";
    pub const UPLOAD_3D: &str = "/api/upload_3d";

    /// Background images served back after an upload.
    pub const FLOORPLAN_IMAGE: &str = "/floorplan.png";
    pub const BUILDING_3D_IMAGE: &str = "/building3d.png";
}

/// Door state labels the backend is known to emit.
///
/// Informational only: the dashboard renders whatever string it receives.
pub mod door_states {
    pub const UNLOCK: &str = "UNLOCK";
    pub const LOCK_IDLE: &str = "LOCK_IDLE";
    pub const LOCK_BLOCK_THREAT: &str = "LOCK_BLOCK_THREAT";
}
