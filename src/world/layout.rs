use super::data::PlannedSite;
use screeps::{Position, RoomName};

/// Read-only view of the building layout plan for a room. Objectives use it
/// for tactical positioning only.
pub trait LayoutPlanner {
    fn planned_container_positions(&self, room: RoomName) -> Vec<Position>;

    fn planned_production_anchor(&self, room: RoomName) -> Option<Position>;

    fn planned_defense_point(&self, room: RoomName) -> Option<Position>;

    /// Structures the plan calls for at the given structural level.
    fn planned_construction(&self, room: RoomName, level: u8) -> Vec<PlannedSite>;
}
