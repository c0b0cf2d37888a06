use super::data::*;
use crate::Tick;
use screeps::{Part, Position, RoomName};
use serde::{Deserialize, Serialize};

/// Closed set of codes a host action request can return.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionResult {
    Ok,
    NotOwner,
    NoPath,
    NameExists,
    Busy,
    NotFound,
    NotEnough,
    InvalidTarget,
    Full,
    NotInRange,
    InvalidArgs,
    Tired,
    NoBodypart,
    RclNotEnough,
}

impl ActionResult {
    pub fn is_ok(self) -> bool {
        self == ActionResult::Ok
    }
}

/// The world-simulation host. Queries observe this tick's snapshot; action
/// methods request an intent that the host resolves after the tick.
pub trait WorldHost {
    fn time(&self) -> Tick;

    fn owned_rooms(&self) -> Vec<RoomName>;

    fn lookup(&self, name: &str) -> EntityLookup;

    /// Controlled mobile units currently in the room, spawning ones included.
    fn units(&self, room: RoomName) -> Vec<EntitySnapshot>;

    /// Controlled fixed entities (production facilities, towers) in the room.
    fn facilities(&self, room: RoomName) -> Vec<EntitySnapshot>;

    fn controller(&self, room: RoomName) -> Option<ControllerSnapshot>;

    fn sources(&self, room: RoomName) -> Vec<SourceSnapshot>;

    fn structures(&self, room: RoomName) -> Vec<StructureSnapshot>;

    fn construction_sites(&self, room: RoomName) -> Vec<ConstructionSiteSnapshot>;

    fn hostiles(&self, room: RoomName) -> Vec<HostileSnapshot>;

    fn is_walkable(&self, pos: Position) -> bool;

    fn energy_available(&self, room: RoomName) -> u32;

    fn energy_capacity(&self, room: RoomName) -> u32;

    fn move_to(&mut self, actor: &str, target: Position, range: u32) -> ActionResult;

    fn harvest(&mut self, actor: &str, source: &ObjectKey) -> ActionResult;

    fn transfer(&mut self, actor: &str, target: &ObjectKey) -> ActionResult;

    fn withdraw(&mut self, actor: &str, target: &ObjectKey) -> ActionResult;

    fn build(&mut self, actor: &str, site: &ObjectKey) -> ActionResult;

    fn repair(&mut self, actor: &str, target: &ObjectKey) -> ActionResult;

    fn upgrade(&mut self, actor: &str, controller: &ObjectKey) -> ActionResult;

    fn attack(&mut self, actor: &str, target: &ObjectKey) -> ActionResult;

    fn heal(&mut self, actor: &str, target: &str) -> ActionResult;

    fn create_construction_site(&mut self, pos: Position, kind: StructureKind) -> ActionResult;

    fn produce(&mut self, facility: &str, body: &[Part], name: &str) -> ActionResult;

    fn say(&mut self, actor: &str, message: &str);
}
