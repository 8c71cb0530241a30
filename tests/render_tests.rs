//! Plan, map and room-state rendering tests

#[cfg(test)]
mod tests {
    use safepath_dashboard::{
        canvas::palette,
        protocol::{HazardSnapshot, Plan, RoomPlan, RoomStateMap},
        reconcile::{apply_room_states, NO_DATA_MESSAGE},
        render::render_plan,
        surface::{PlanView, RoomView},
        topology::Topology,
        types::RoomCategory,
    };

    fn snapshot(hazards: &[&str], plan: Plan) -> HazardSnapshot {
        HazardSnapshot {
            hazards: hazards.iter().map(|h| h.to_string()).collect(),
            plan,
        }
    }

    fn rendered(snap: &HazardSnapshot) -> PlanView {
        let topo = Topology::building();
        let mut view = PlanView::new(&topo);
        render_plan(snap, &mut view, &topo);
        view
    }

    fn states(pairs: &[(&str, &str)]) -> RoomStateMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Plan summary
    // -----------------------------------------------------------------------

    #[test]
    fn full_snapshot_summary() {
        let mut plan = Plan::default();
        plan.rooms.insert("R1".into(), RoomPlan::evac("X1"));
        plan.rooms.insert("R2".into(), RoomPlan::lockdown());
        plan.doors.insert("D1".into(), "UNLOCK".into());
        plan.doors.insert("D2".into(), "LOCK_BLOCK_THREAT".into());

        let view = rendered(&snapshot(&["H1", "R3"], plan));
        assert_eq!(
            view.summary.lines(),
            [
                "Hazards: H1, R3",
                "Rooms:",
                "R1: EVAC to X1",
                "R2: LOCKDOWN",
                "Doors:",
                "D1: UNLOCK",
                "D2: LOCK_BLOCK_THREAT",
            ]
        );
    }

    #[test]
    fn empty_snapshot_summary_and_all_nodes_safe() {
        let view = rendered(&snapshot(&[], Plan::default()));
        assert_eq!(view.summary.lines(), ["Hazards: None", "Rooms:", "Doors:"]);

        let topo = Topology::building();
        for node in topo.nodes() {
            assert_eq!(
                view.canvas.circle_color_at(node.position),
                Some(palette::NODE),
                "{} should be drawn safe",
                node.id
            );
        }
    }

    #[test]
    fn snapshot_decoded_from_backend_json() {
        let snap: HazardSnapshot = serde_json::from_str(
            r#"{"hazards":["H2"],"plan":{"rooms":{"R5":{"mode":"EVAC","exit":"X1","path_edges":["R5-H2","H2-X1"]}},"doors":{}}}"#,
        )
        .unwrap();
        let view = rendered(&snap);
        assert_eq!(view.summary.lines()[0], "Hazards: H2");
        assert_eq!(view.summary.lines()[2], "R5: EVAC to X1");
    }

    // -----------------------------------------------------------------------
    // Map
    // -----------------------------------------------------------------------

    #[test]
    fn hazard_membership_colours_nodes() {
        let topo = Topology::building();
        let view = rendered(&snapshot(&["H2"], Plan::default()));

        let h2 = topo.position("H2").unwrap();
        assert_eq!(view.canvas.circle_color_at(h2), Some(palette::HAZARD));
        for id in ["R1", "H1", "X1"] {
            let p = topo.position(id).unwrap();
            assert_eq!(view.canvas.circle_color_at(p), Some(palette::NODE));
        }
    }

    #[test]
    fn unknown_hazard_ids_are_ignored() {
        let view = rendered(&snapshot(&["Z9"], Plan::default()));
        let safe = rendered(&snapshot(&[], Plan::default()));
        assert_eq!(view.canvas.digest(), safe.canvas.digest());
    }

    #[test]
    fn hazard_order_does_not_change_the_map() {
        let a = rendered(&snapshot(&["H1", "R3", "X1"], Plan::default()));
        let b = rendered(&snapshot(&["X1", "H1", "R3"], Plan::default()));
        assert_eq!(a.canvas.digest(), b.canvas.digest());
    }

    #[test]
    fn repeated_render_is_idempotent() {
        let topo = Topology::building();
        let mut plan = Plan::default();
        plan.rooms.insert("R4".into(), RoomPlan::evac("X1"));
        let snap = snapshot(&["R1"], plan);

        let mut view = PlanView::new(&topo);
        render_plan(&snap, &mut view, &topo);
        let first_digest = view.canvas.digest();
        let first_text = view.summary.text();

        render_plan(&snap, &mut view, &topo);
        assert_eq!(view.canvas.digest(), first_digest);
        assert_eq!(view.summary.text(), first_text);
        assert_eq!(view.canvas.frame_count(), 2);
    }

    #[test]
    fn new_snapshot_fully_replaces_previous_frame() {
        let topo = Topology::building();
        let mut view = PlanView::new(&topo);
        render_plan(&snapshot(&["H1"], Plan::default()), &mut view, &topo);
        render_plan(&snapshot(&[], Plan::default()), &mut view, &topo);

        let h1 = topo.position("H1").unwrap();
        assert_eq!(view.canvas.circle_color_at(h1), Some(palette::NODE));
        assert_eq!(view.summary.lines()[0], "Hazards: None");
    }

    #[test]
    fn svg_export_contains_every_label() {
        let view = rendered(&snapshot(&["X1"], Plan::default()));
        let svg = view.canvas.to_svg();
        assert!(svg.starts_with("<svg"));
        for node in Topology::building().nodes() {
            assert!(svg.contains(&format!(">{}</text>", node.id)), "{}", node.id);
        }
    }

    // -----------------------------------------------------------------------
    // Room states
    // -----------------------------------------------------------------------

    #[test]
    fn room_states_scenario() {
        let mut view = RoomView::new();
        let map = states(&[("R1", "fire"), ("R2", "gun"), ("R3", "fire_gun")]);
        let changed = apply_room_states(Some(&map), &mut view);

        assert_eq!(changed, 6);
        assert_eq!(view.zones.get("R1").unwrap().category(), Some(RoomCategory::Fire));
        assert_eq!(view.zones.get("R2").unwrap().category(), Some(RoomCategory::Gun));
        assert_eq!(view.zones.get("R3").unwrap().category(), Some(RoomCategory::Fire));
        for id in ["R4", "R5", "R6"] {
            assert_eq!(view.zones.get(id).unwrap().category(), Some(RoomCategory::Safe));
        }
        assert_eq!(
            view.summary.lines(),
            [
                "R1: fire",
                "R2: gun",
                "R3: fire_gun",
                "R4: clear",
                "R5: clear",
                "R6: clear",
            ]
        );
    }

    #[test]
    fn exactly_one_marker_after_any_sequence() {
        let mut view = RoomView::new();
        for label in ["fire", "gun", "clear", "fire_gun", "smoke", "gun"] {
            apply_room_states(Some(&states(&[("R2", label)])), &mut view);
            let zone = view.zones.get("R2").unwrap();
            assert_eq!(zone.active_categories().len(), 1, "after {label}");
        }
        assert_eq!(view.zones.get("R2").unwrap().category(), Some(RoomCategory::Gun));
    }

    #[test]
    fn no_data_keeps_previous_markers() {
        let mut view = RoomView::new();
        apply_room_states(Some(&states(&[("R5", "fire")])), &mut view);
        let changed = apply_room_states(None, &mut view);

        assert_eq!(changed, 0);
        assert_eq!(view.summary.lines(), [NO_DATA_MESSAGE]);
        assert_eq!(view.zones.get("R5").unwrap().category(), Some(RoomCategory::Fire));
    }

    #[test]
    fn unchanged_states_report_no_changes() {
        let mut view = RoomView::new();
        let map = states(&[("R6", "gun")]);
        apply_room_states(Some(&map), &mut view);
        assert_eq!(apply_room_states(Some(&map), &mut view), 0);
    }
}
