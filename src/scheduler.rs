//! Poll Scheduler – drives the hazard/plan loop and the room-state loop.
//!
//! ## Loops
//!
//! | Loop          | Step                         | On failure                |
//! |---------------|------------------------------|---------------------------|
//! | `plan-poll`   | `DashboardService::poll_plan`  | log, keep last render   |
//! | `room-poll`   | `DashboardService::poll_rooms` | show "no data"          |
//!
//! Each loop fires every `interval` and spawns its step as a separate task,
//! so a slow request never delays the next tick and steps from different
//! ticks may overlap. The sequence guards inside the service keep a late
//! response from painting over a newer one. Neither loop knows about the
//! other or about operator overrides.
//!
//! There is no backoff: a failed tick is retried by the next tick.

use crate::gateway::Backend;
use crate::service::DashboardService;
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone)]
pub struct PollScheduler {
    interval: Duration,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn both poll loops. They run until [`SchedulerHandle::stop`].
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn start<B: Backend>(&self, service: Arc<DashboardService<B>>) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            "Starting poll loops (interval {} ms)",
            self.interval.as_millis()
        );

        let plan_svc = service.clone();
        let plan = spawn_loop("plan-poll", self.interval, shutdown_rx.clone(), move || {
            let svc = plan_svc.clone();
            async move {
                let outcome = svc.poll_plan().await;
                debug!("plan-poll: {:?}", outcome);
            }
        });

        let room_svc = service;
        let rooms = spawn_loop("room-poll", self.interval, shutdown_rx, move || {
            let svc = room_svc.clone();
            async move {
                let outcome = svc.poll_rooms().await;
                debug!("room-poll: {:?}", outcome);
            }
        });

        SchedulerHandle {
            shutdown: shutdown_tx,
            loops: vec![plan, rooms],
        }
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Owns the running loops. Dropping it without calling `stop` leaves the
/// loops running for the rest of the runtime's life.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    loops: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn is_running(&self) -> bool {
        self.loops.iter().any(|h| !h.is_finished())
    }

    /// Signal both loops and wait for them to exit.
    ///
    /// Steps already spawned are not cancelled; they finish on their own
    /// and their results still go through the sequence guards.
    pub async fn stop(self) {
        // Receivers only disappear once the loops have exited.
        let _ = self.shutdown.send(true);
        for handle in self.loops {
            if let Err(e) = handle.await {
                warn!("Poll loop ended abnormally: {}", e);
            }
        }
        info!("Poll loops stopped");
    }
}

// ---------------------------------------------------------------------------
// Loop driver
// ---------------------------------------------------------------------------

fn spawn_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut step: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    tokio::spawn(step());
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("{} loop exiting", name);
                        break;
                    }
                }
            }
        }
    })
}
