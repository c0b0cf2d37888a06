use crate::colony::*;
use crate::error::EngineError;
use crate::features::Settings;
use crate::memorysystem::*;
use crate::world::*;
use log::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub sites: usize,
    pub production_assigned: usize,
    pub records_written: usize,
}

/// Runs every owned site for the host's current tick. Records are only
/// committed to `store` once every site finished, so any error leaves the
/// previous tick's records in place.
pub fn tick(host: &mut dyn WorldHost, store: &mut dyn RecordStore, planner: &dyn LayoutPlanner) -> Result<TickSummary, EngineError> {
    let settings = Settings::load(&*store);
    let time = host.time();

    let mut staged = StagedStore::new(store);

    if settings.reset_memory {
        reset_memory(&mut staged);
    }

    let mut summary = TickSummary::default();

    for room in host.owned_rooms() {
        let mut colony = Colony::reload(&staged, &*host, room, &settings)?;

        colony.transition_objectives();

        summary.production_assigned += colony.execute(time, host, planner, &settings).len();
        summary.sites += 1;

        colony.save(&mut staged)?;
    }

    summary.records_written = staged.commit();

    trace!("Tick {} complete: {:?}", time, summary);

    Ok(summary)
}

/// Same as `tick`, backed by raw memory segments.
pub fn tick_with_segments(
    host: &mut dyn WorldHost,
    access: &mut dyn SegmentAccess,
    segments: &[u8],
    planner: &dyn LayoutPlanner,
) -> Result<TickSummary, EngineError> {
    let mut store = SegmentStore::load(&*access, segments);

    let summary = tick(host, &mut store, planner)?;

    store.flush(access)?;

    Ok(summary)
}

fn reset_memory(store: &mut dyn RecordStore) {
    warn!("Resetting engine memory");

    for path in store.paths() {
        if path.category() != CONFIG_CATEGORY {
            store.remove(&path);
        }
    }

    Settings::clear_reset(store);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use screeps::{Part, RoomName};
    use serde_json::json;

    fn site_path(room: &str) -> RecordPath {
        RecordPath::new(SITE_CATEGORY, room, "state")
    }

    #[test]
    fn records_are_written_after_a_clean_tick() {
        let mut world = MockWorld::new();
        world.set_controller("controller", pos(25, 25), 1);
        world.add_unit("worker-1", pos(10, 10), &[Part::Work, Part::Carry, Part::Move]);
        let planner = MockPlanner::default();
        let mut store = MemoryStore::new();

        let summary = tick(&mut world, &mut store, &planner).unwrap();

        assert_eq!(summary.sites, 1);
        assert_eq!(store.get(&site_path("W1N1")), Some(json!({ "level": 1 })));
        assert!(store.get(&RecordPath::new(AGENT_CATEGORY, "W1N1", "worker-1")).is_some());
    }

    #[test]
    fn failed_tick_leaves_store_untouched() {
        let mut world = MockWorld::new();
        world.set_controller("controller", pos(25, 25), 1);
        // The second room has no controller, so its reload fails after the first site saved.
        world.rooms.push(RoomName::new("W2N1").unwrap());
        let planner = MockPlanner::default();
        let mut store = MemoryStore::new();
        store.put(&site_path("W1N1"), json!({ "level": 0 }));

        let result = tick(&mut world, &mut store, &planner);

        assert!(matches!(result, Err(EngineError::MissingController { .. })));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&site_path("W1N1")), Some(json!({ "level": 0 })));
    }

    #[test]
    fn reset_wipes_everything_but_configuration() {
        let mut world = MockWorld::new();
        world.rooms.clear();
        let planner = MockPlanner::default();
        let mut store = MemoryStore::new();
        store.put(&Settings::path(), json!({ "reset_memory": true, "defense_quorum": 4 }));
        store.put(&RecordPath::new(AGENT_CATEGORY, "W1N1", "worker-1"), json!({}));
        store.put(&site_path("W1N1"), json!({ "level": 3 }));

        tick(&mut world, &mut store, &planner).unwrap();

        assert_eq!(store.len(), 1);

        let settings = Settings::load(&store);
        assert!(!settings.reset_memory);
        assert_eq!(settings.defense_quorum, 4);
    }

    #[test]
    fn segments_carry_state_between_ticks() {
        let mut world = MockWorld::new();
        world.set_controller("controller", pos(25, 25), 2);
        let planner = MockPlanner::default();
        let mut raw = MockSegments::default();

        tick_with_segments(&mut world, &mut raw, &[50, 51], &planner).unwrap();

        let store = SegmentStore::load(&raw, &[50, 51]);
        assert_eq!(store.get(&site_path("W1N1")), Some(json!({ "level": 2 })));
        assert_eq!(store.names(BATTALION_CATEGORY, "W1N1").len(), 4);
    }
}
