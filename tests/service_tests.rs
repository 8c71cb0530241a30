//! DashboardService, PollScheduler and OverrideController tests against a
//! scripted in-memory backend.

#![cfg(feature = "client")]

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use safepath_dashboard::{
        error::{DashboardError, Result},
        gateway::Backend,
        override_ctl::OverrideController,
        protocol::{HazardSnapshot, Plan, RoomPlan, RoomStateMap},
        reconcile::NO_DATA_MESSAGE,
        scheduler::PollScheduler,
        service::{DashboardService, PlanOutcome, RoomOutcome},
        topology::Topology,
        types::RoomCategory,
    };
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    // -----------------------------------------------------------------------
    // Scripted backend
    // -----------------------------------------------------------------------

    enum PlanReply {
        Ready(Result<HazardSnapshot>),
        Deferred(oneshot::Receiver<HazardSnapshot>),
    }

    enum RoomReply {
        Ready(Option<RoomStateMap>),
        Deferred(oneshot::Receiver<Option<RoomStateMap>>),
    }

    #[derive(Default)]
    struct StubBackend {
        plans: Mutex<VecDeque<PlanReply>>,
        rooms: Mutex<VecDeque<RoomReply>>,
        overrides: Mutex<Vec<Vec<String>>>,
        plan_calls: AtomicUsize,
        room_calls: AtomicUsize,
    }

    impl StubBackend {
        fn push_plan(&self, reply: PlanReply) {
            self.plans.lock().push_back(reply);
        }

        fn push_rooms(&self, states: Option<RoomStateMap>) {
            self.rooms.lock().push_back(RoomReply::Ready(states));
        }

        fn defer_rooms(&self) -> oneshot::Sender<Option<RoomStateMap>> {
            let (tx, rx) = oneshot::channel();
            self.rooms.lock().push_back(RoomReply::Deferred(rx));
            tx
        }
    }

    impl Backend for StubBackend {
        async fn fetch_plan(&self, override_hazards: Option<&[String]>) -> Result<HazardSnapshot> {
            if let Some(hazards) = override_hazards {
                self.overrides.lock().push(hazards.to_vec());
                return Ok(HazardSnapshot {
                    hazards: hazards.to_vec(),
                    plan: Plan::default(),
                });
            }

            self.plan_calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.plans.lock().pop_front();
            match reply {
                Some(PlanReply::Ready(result)) => result,
                Some(PlanReply::Deferred(rx)) => rx
                    .await
                    .map_err(|_| DashboardError::Transport("reply dropped".into())),
                None => Err(DashboardError::Transport("connection refused".into())),
            }
        }

        async fn fetch_room_states(&self) -> Option<RoomStateMap> {
            self.room_calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.rooms.lock().pop_front();
            match reply {
                Some(RoomReply::Ready(states)) => states,
                Some(RoomReply::Deferred(rx)) => rx.await.ok().flatten(),
                None => None,
            }
        }
    }

    fn snapshot(hazards: &[&str]) -> HazardSnapshot {
        let mut plan = Plan::default();
        plan.rooms.insert("R1".into(), RoomPlan::evac("X1"));
        HazardSnapshot {
            hazards: hazards.iter().map(|h| h.to_string()).collect(),
            plan,
        }
    }

    fn make_service() -> Arc<DashboardService<StubBackend>> {
        Arc::new(DashboardService::new(
            StubBackend::default(),
            Topology::building(),
        ))
    }

    fn plan_text(svc: &DashboardService<StubBackend>) -> String {
        svc.plan_view().lock().summary.text()
    }

    fn room_states(pairs: &[(&str, &str)]) -> RoomStateMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn wait_for_room_calls(svc: &DashboardService<StubBackend>, n: usize) {
        while svc.backend().room_calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_for_plan_calls(svc: &DashboardService<StubBackend>, n: usize) {
        while svc.backend().plan_calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    // -----------------------------------------------------------------------
    // Plan stream
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn successful_poll_renders() {
        let svc = make_service();
        svc.backend().push_plan(PlanReply::Ready(Ok(snapshot(&["H1"]))));

        assert_eq!(svc.poll_plan().await, PlanOutcome::Rendered);
        assert!(plan_text(&svc).starts_with("Hazards: H1\nRooms:\nR1: EVAC to X1"));
        assert_eq!(svc.stats().plan_renders, 1);
    }

    #[tokio::test]
    async fn failed_poll_keeps_last_good_render() {
        let svc = make_service();
        svc.backend().push_plan(PlanReply::Ready(Ok(snapshot(&["R3"]))));
        svc.backend()
            .push_plan(PlanReply::Ready(Err(DashboardError::Transport("timeout".into()))));

        svc.poll_plan().await;
        let before = plan_text(&svc);
        let digest = svc.plan_view().lock().canvas.digest();

        assert_eq!(svc.poll_plan().await, PlanOutcome::Skipped);
        assert_eq!(plan_text(&svc), before);
        assert_eq!(svc.plan_view().lock().canvas.digest(), digest);

        let stats = svc.stats();
        assert_eq!(stats.plan_renders, 1);
        assert_eq!(stats.plan_fetch_failures, 1);
    }

    #[tokio::test]
    async fn late_response_does_not_overwrite_newer_one() {
        let svc = make_service();
        let (tx_old, rx_old) = oneshot::channel();
        let (tx_new, rx_new) = oneshot::channel();
        svc.backend().push_plan(PlanReply::Deferred(rx_old));
        svc.backend().push_plan(PlanReply::Deferred(rx_new));

        let first = tokio::spawn({
            let svc = svc.clone();
            async move { svc.poll_plan().await }
        });
        let second = tokio::spawn({
            let svc = svc.clone();
            async move { svc.poll_plan().await }
        });
        wait_for_plan_calls(&svc, 2).await;

        // Newer request answers first, older one straggles in afterwards.
        tx_new.send(snapshot(&["H2"])).unwrap();
        while svc.stats().plan_renders < 1 {
            tokio::task::yield_now().await;
        }
        tx_old.send(snapshot(&["R1"])).unwrap();

        let mut outcomes = vec![first.await.unwrap(), second.await.unwrap()];
        outcomes.sort_by_key(|o| format!("{o:?}"));
        assert_eq!(outcomes, vec![PlanOutcome::Discarded, PlanOutcome::Rendered]);
        assert!(plan_text(&svc).starts_with("Hazards: H2"));
        assert_eq!(svc.stats().stale_discarded, 1);
    }

    // -----------------------------------------------------------------------
    // Override
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn override_renders_immediately_with_parsed_list() {
        let svc = make_service();
        let controller = OverrideController::new(svc.clone());

        let receipt = controller.submit(" X1 , , H2").await.unwrap();
        assert_eq!(receipt.hazards, vec!["X1", "H2"]);
        assert_eq!(receipt.outcome, PlanOutcome::Rendered);
        assert_eq!(*svc.backend().overrides.lock(), vec![vec!["X1", "H2"]]);
        assert!(plan_text(&svc).starts_with("Hazards: X1, H2"));

        let topo = Topology::building();
        let x1 = topo.position("X1").unwrap();
        assert_eq!(
            svc.plan_view().lock().canvas.circle_color_at(x1),
            Some(safepath_dashboard::canvas::palette::HAZARD)
        );
    }

    #[tokio::test]
    async fn empty_override_is_still_submitted() {
        let svc = make_service();
        let receipt = OverrideController::new(svc.clone()).submit("").await.unwrap();
        assert!(receipt.hazards.is_empty());
        assert_eq!(svc.backend().overrides.lock().len(), 1);
        assert!(plan_text(&svc).starts_with("Hazards: None"));
    }

    #[tokio::test]
    async fn in_flight_poll_cannot_undo_override() {
        let svc = make_service();
        let (tx, rx) = oneshot::channel();
        svc.backend().push_plan(PlanReply::Deferred(rx));

        let poll = tokio::spawn({
            let svc = svc.clone();
            async move { svc.poll_plan().await }
        });
        wait_for_plan_calls(&svc, 1).await;

        OverrideController::new(svc.clone())
            .submit("H1")
            .await
            .unwrap();
        tx.send(snapshot(&[])).unwrap();

        assert_eq!(poll.await.unwrap(), PlanOutcome::Discarded);
        assert!(plan_text(&svc).starts_with("Hazards: H1"));
    }

    // -----------------------------------------------------------------------
    // Room stream
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn room_poll_applies_then_reports_no_data() {
        let svc = make_service();
        let states: RoomStateMap = [("R1".to_string(), "fire".to_string())].into();
        svc.backend().push_rooms(Some(states));
        svc.backend().push_rooms(None);

        assert_eq!(svc.poll_rooms().await, RoomOutcome::Applied { changed: 6 });
        assert_eq!(svc.poll_rooms().await, RoomOutcome::NoData);

        let view = svc.room_view();
        let view = view.lock();
        assert_eq!(view.summary.lines(), [NO_DATA_MESSAGE]);
        assert_eq!(view.zones.get("R1").unwrap().category(), Some(RoomCategory::Fire));

        let stats = svc.stats();
        assert_eq!(stats.room_applies, 1);
        assert_eq!(stats.room_no_data, 1);
    }

    #[tokio::test]
    async fn late_room_states_do_not_overwrite_newer_ones() {
        let svc = make_service();
        let older = svc.backend().defer_rooms();
        svc.backend().push_rooms(Some(room_states(&[("R1", "gun")])));

        let stale = tokio::spawn({
            let svc = svc.clone();
            async move { svc.poll_rooms().await }
        });
        wait_for_room_calls(&svc, 1).await;

        assert_eq!(svc.poll_rooms().await, RoomOutcome::Applied { changed: 6 });
        older.send(Some(room_states(&[("R1", "fire")]))).unwrap();

        assert_eq!(stale.await.unwrap(), RoomOutcome::Discarded);
        let view = svc.room_view();
        let view = view.lock();
        assert_eq!(view.zones.get("R1").unwrap().category(), Some(RoomCategory::Gun));
        assert_eq!(view.summary.lines()[0], "R1: gun");
        assert_eq!(svc.stats().stale_discarded, 1);
    }

    #[tokio::test]
    async fn late_room_states_do_not_overwrite_newer_no_data() {
        let svc = make_service();
        svc.backend().push_rooms(Some(room_states(&[("R4", "gun")])));
        assert_eq!(svc.poll_rooms().await, RoomOutcome::Applied { changed: 6 });

        let older = svc.backend().defer_rooms();
        svc.backend().push_rooms(None);

        let stale = tokio::spawn({
            let svc = svc.clone();
            async move { svc.poll_rooms().await }
        });
        wait_for_room_calls(&svc, 2).await;

        assert_eq!(svc.poll_rooms().await, RoomOutcome::NoData);
        older.send(Some(room_states(&[("R4", "fire")]))).unwrap();

        assert_eq!(stale.await.unwrap(), RoomOutcome::Discarded);
        let view = svc.room_view();
        let view = view.lock();
        assert_eq!(view.summary.lines(), [NO_DATA_MESSAGE]);
        assert_eq!(view.zones.get("R4").unwrap().category(), Some(RoomCategory::Gun));
    }

    // -----------------------------------------------------------------------
    // Scheduler
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn scheduler_ticks_both_loops_until_stopped() {
        let svc = make_service();
        svc.backend().push_plan(PlanReply::Ready(Ok(snapshot(&["H1"]))));

        let handle = PollScheduler::new(Duration::from_secs(1)).start(svc.clone());
        assert!(handle.is_running());

        // Ticks at 0s, 1s and 2s.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(svc.backend().plan_calls.load(Ordering::SeqCst), 3);
        assert_eq!(svc.backend().room_calls.load(Ordering::SeqCst), 3);

        // One good snapshot, then the backend goes quiet: render stays.
        let stats = svc.stats();
        assert_eq!(stats.plan_renders, 1);
        assert_eq!(stats.plan_fetch_failures, 2);
        assert_eq!(stats.room_no_data, 3);
        assert!(plan_text(&svc).starts_with("Hazards: H1"));

        handle.stop().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(svc.backend().plan_calls.load(Ordering::SeqCst), 3);
        assert_eq!(svc.backend().room_calls.load(Ordering::SeqCst), 3);
    }
}
