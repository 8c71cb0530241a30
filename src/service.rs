//! DashboardService – one fetch-then-render step per call.
//!
//! The service owns the two render targets and the two sequence guards.
//! It is shared behind an `Arc` by the poll loops and the override
//! controller; none of them talk to each other.

use crate::error::Result;
use crate::gateway::Backend;
use crate::protocol::HazardSnapshot;
use crate::reconcile::apply_room_states;
use crate::render::render_plan;
use crate::sequence::SequenceGuard;
use crate::surface::{shared, PlanView, RoomView, SharedView};
use crate::topology::Topology;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Step outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Snapshot rendered; it is now on screen.
    Rendered,
    /// Fetch failed; the last good render stays on screen.
    Skipped,
    /// A newer response was already rendered; this one was dropped.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomOutcome {
    /// States applied; `changed` zones switched category.
    Applied { changed: usize },
    /// Fetch failed; "no data" shown, zones untouched.
    NoData,
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub plan_renders: u64,
    pub plan_fetch_failures: u64,
    pub room_applies: u64,
    pub room_no_data: u64,
    pub stale_discarded: u64,
}

#[derive(Debug, Default)]
struct Counters {
    plan_renders: AtomicU64,
    plan_fetch_failures: AtomicU64,
    room_applies: AtomicU64,
    room_no_data: AtomicU64,
    stale_discarded: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct DashboardService<B> {
    backend: B,
    topology: Topology,
    plan_view: SharedView<PlanView>,
    room_view: SharedView<RoomView>,
    plan_seq: SequenceGuard,
    room_seq: SequenceGuard,
    svg_out: Option<PathBuf>,
    counters: Counters,
}

impl<B: Backend> DashboardService<B> {
    pub fn new(backend: B, topology: Topology) -> Self {
        Self {
            backend,
            plan_view: shared(PlanView::new(&topology)),
            room_view: shared(RoomView::new()),
            topology,
            plan_seq: SequenceGuard::new(),
            room_seq: SequenceGuard::new(),
            svg_out: None,
            counters: Counters::default(),
        }
    }

    /// Also write the map as SVG to `path` after every accepted plan render.
    pub fn with_svg_out(mut self, path: Option<PathBuf>) -> Self {
        self.svg_out = path;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn plan_view(&self) -> SharedView<PlanView> {
        self.plan_view.clone()
    }

    pub fn room_view(&self) -> SharedView<RoomView> {
        self.room_view.clone()
    }

    // -----------------------------------------------------------------------
    // Hazard / plan stream
    // -----------------------------------------------------------------------

    /// One hazard/plan poll: fetch, then render. A failed fetch is logged
    /// and skipped.
    pub async fn poll_plan(&self) -> PlanOutcome {
        let ticket = self.plan_seq.issue();
        match self.backend.fetch_plan(None).await {
            Ok(snapshot) => self.commit_plan(ticket, &snapshot),
            Err(e) => {
                warn!("Hazard poll #{} failed: {}", ticket, e);
                bump(&self.counters.plan_fetch_failures);
                PlanOutcome::Skipped
            }
        }
    }

    /// Submit `hazards` as an override and render the backend's answer right
    /// away. Errors go back to the caller.
    pub async fn submit_override(&self, hazards: &[String]) -> Result<PlanOutcome> {
        let ticket = self.plan_seq.issue();
        let snapshot = self.backend.fetch_plan(Some(hazards)).await?;
        Ok(self.commit_plan(ticket, &snapshot))
    }

    /// Render `snapshot` if `ticket` is still the newest on the plan stream.
    fn commit_plan(&self, ticket: u64, snapshot: &HazardSnapshot) -> PlanOutcome {
        let svg = {
            let mut view = self.plan_view.lock();
            if !self.plan_seq.accept(ticket) {
                debug!(
                    "Discarding stale plan response #{} (rendered #{})",
                    ticket,
                    self.plan_seq.last_rendered()
                );
                bump(&self.counters.stale_discarded);
                return PlanOutcome::Discarded;
            }
            render_plan(snapshot, &mut view, &self.topology);
            bump(&self.counters.plan_renders);
            self.svg_out.as_ref().map(|_| view.canvas.to_svg())
        };

        if let (Some(path), Some(svg)) = (&self.svg_out, svg) {
            if let Err(e) = std::fs::write(path, svg) {
                warn!("Failed to write map SVG to {}: {}", path.display(), e);
            }
        }
        PlanOutcome::Rendered
    }

    // -----------------------------------------------------------------------
    // Room-state stream
    // -----------------------------------------------------------------------

    /// One room-state poll. Always reaches the reconciler, so a failed
    /// fetch surfaces as the "no data" message.
    pub async fn poll_rooms(&self) -> RoomOutcome {
        let ticket = self.room_seq.issue();
        let states = self.backend.fetch_room_states().await;

        let mut view = self.room_view.lock();
        if !self.room_seq.accept(ticket) {
            debug!("Discarding stale room-state response #{}", ticket);
            bump(&self.counters.stale_discarded);
            return RoomOutcome::Discarded;
        }

        let changed = apply_room_states(states.as_ref(), &mut view);
        match states {
            Some(_) => {
                bump(&self.counters.room_applies);
                RoomOutcome::Applied { changed }
            }
            None => {
                bump(&self.counters.room_no_data);
                RoomOutcome::NoData
            }
        }
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    pub fn stats(&self) -> DashboardStats {
        let c = &self.counters;
        DashboardStats {
            plan_renders: c.plan_renders.load(Ordering::Relaxed),
            plan_fetch_failures: c.plan_fetch_failures.load(Ordering::Relaxed),
            room_applies: c.room_applies.load(Ordering::Relaxed),
            room_no_data: c.room_no_data.load(Ordering::Relaxed),
            stale_discarded: c.stale_discarded.load(Ordering::Relaxed),
        }
    }
}
