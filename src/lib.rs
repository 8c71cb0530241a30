//! SafePath Dashboard
//!
//! Live status client for the SafePath Shield building-safety backend:
//! hazard state per node, the evacuation/lockdown plan per room, door
//! states, a topology map, and per-room detector categories.
//!
//! ## Architecture
//!
//! ```text
//! PollScheduler  (scheduler.rs)      OverrideController  (override_ctl.rs)
//!   ├── plan-poll ─┐                       │
//!   └── room-poll ─┼── DashboardService (service.rs) ◄──┘
//!                  │     ├── Backend / HttpGateway  (gateway.rs)
//!                  │     ├── SequenceGuard ×2       (sequence.rs)
//!                  │     ├── render_plan + draw_map (render.rs)  → PlanView
//!                  │     └── apply_room_states      (reconcile.rs) → RoomView
//!                  └── PlanView / RoomView (surface.rs), Topology (topology.rs)
//! ```
//!
//! Data flows one way per step: fetch → snapshot → render. The two poll
//! loops share no snapshot and no lock; each render is a full repaint of a
//! target that only one component writes.

// Rendering core is always available (no client feature needed).
pub mod canvas;
pub mod error;
pub mod profile;
pub mod protocol;
pub mod reconcile;
pub mod render;
pub mod sequence;
pub mod settings;
pub mod surface;
pub mod topology;
pub mod types;

// Network-facing modules require the `client` feature.
#[cfg(feature = "client")]
pub mod gateway;
#[cfg(feature = "client")]
pub mod override_ctl;
#[cfg(feature = "client")]
pub mod scheduler;
#[cfg(feature = "client")]
pub mod service;
#[cfg(feature = "client")]
pub mod uploads;

// Convenience re-exports (client only)
#[cfg(feature = "client")]
pub use gateway::{Backend, HttpGateway};
#[cfg(feature = "client")]
pub use override_ctl::{parse_hazard_input, OverrideController};
#[cfg(feature = "client")]
pub use scheduler::{PollScheduler, SchedulerHandle};
#[cfg(feature = "client")]
pub use service::{DashboardService, PlanOutcome, RoomOutcome};
pub use error::{DashboardError, Result};
pub use protocol::{HazardSnapshot, Plan, RoomMode, RoomPlan, RoomStateMap};
pub use topology::Topology;
pub use types::{DashboardConfig, HazardList, RoomCategory, KNOWN_ROOMS};
