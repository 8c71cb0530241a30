//! Room State Reconciler: detector labels → zone category markers.

use crate::protocol::RoomStateMap;
use crate::surface::RoomView;
use crate::types::{RoomCategory, DEFAULT_ROOM_STATUS, KNOWN_ROOMS};
use log::debug;

/// Shown in the room summary when the last fetch produced nothing usable.
pub const NO_DATA_MESSAGE: &str = "No room state data available";

/// Reflect `states` onto the room view.
///
/// `None` is the no-data sentinel: the summary says so and every zone keeps
/// whatever category it last had. Stale colouring beats a blank board.
///
/// Returns the number of zones whose category changed.
pub fn apply_room_states(states: Option<&RoomStateMap>, view: &mut RoomView) -> usize {
    let Some(states) = states else {
        view.summary.replace(vec![NO_DATA_MESSAGE.to_string()]);
        return 0;
    };

    let mut lines = Vec::with_capacity(KNOWN_ROOMS.len());
    let mut changed = 0;

    for room_id in KNOWN_ROOMS {
        let raw = states
            .get(room_id)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ROOM_STATUS);
        let category = RoomCategory::classify(raw);
        lines.push(format!("{room_id}: {raw}"));

        // A known room without a zone element is unrenderable, not an error.
        let Some(zone) = view.zones.get_mut(room_id) else {
            continue;
        };

        let previous = zone.category();
        // Clear all three, then set one: never two markers at once.
        for c in RoomCategory::ALL {
            zone.remove_class(c.class_name());
        }
        zone.add_class(category.class_name());

        if previous != Some(category) {
            debug!("Room {} → {} (raw '{}')", room_id, category, raw);
            changed += 1;
        }
    }

    view.summary.replace(lines);
    changed
}
