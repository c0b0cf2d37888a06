//! In-memory host and planner doubles for unit tests.

use crate::memorysystem::SegmentAccess;
use crate::world::*;
use crate::Tick;
use screeps::{Part, Position, RoomCoordinate, RoomName};
use std::collections::{HashMap, HashSet};

pub fn room() -> RoomName {
    RoomName::new("W1N1").unwrap()
}

pub fn pos(x: u8, y: u8) -> Position {
    Position::new(RoomCoordinate::new(x).unwrap(), RoomCoordinate::new(y).unwrap(), room())
}

pub struct MockWorld {
    pub time: Tick,
    pub rooms: Vec<RoomName>,
    entities: Vec<EntitySnapshot>,
    pending: HashSet<String>,
    gone: HashSet<String>,
    controller: Option<ControllerSnapshot>,
    sources: Vec<SourceSnapshot>,
    structures: Vec<StructureSnapshot>,
    sites: Vec<ConstructionSiteSnapshot>,
    hostiles: Vec<HostileSnapshot>,
    blocked: HashSet<Position>,
    pub energy_available: u32,
    pub energy_capacity: u32,
    scripted: HashMap<String, ActionResult>,
    scripted_targets: HashMap<(String, String), ActionResult>,
    reserved_names: HashSet<String>,
    actions: Vec<String>,
    said: Vec<(String, String)>,
}

impl MockWorld {
    pub fn new() -> MockWorld {
        MockWorld {
            time: 1,
            rooms: vec![room()],
            entities: Vec::new(),
            pending: HashSet::new(),
            gone: HashSet::new(),
            controller: None,
            sources: Vec::new(),
            structures: Vec::new(),
            sites: Vec::new(),
            hostiles: Vec::new(),
            blocked: HashSet::new(),
            energy_available: 300,
            energy_capacity: 300,
            scripted: HashMap::new(),
            scripted_targets: HashMap::new(),
            reserved_names: HashSet::new(),
            actions: Vec::new(),
            said: Vec::new(),
        }
    }

    pub fn add_unit(&mut self, name: &str, pos: Position, body: &[Part]) -> EntitySnapshot {
        let carry = body.iter().filter(|p| **p == Part::Carry).count() as u32;

        let entity = EntitySnapshot {
            name: name.to_owned(),
            kind: EntityKind::Unit,
            pos,
            body: body.to_vec(),
            hits: 100 * body.len() as u32,
            hits_max: 100 * body.len() as u32,
            energy: 0,
            energy_capacity: carry * 50,
            spawning: false,
        };

        self.entities.push(entity.clone());

        entity
    }

    pub fn add_tower(&mut self, name: &str, pos: Position, energy: u32) -> EntitySnapshot {
        self.add_facility(name, EntityKind::Tower, pos, energy, 1000)
    }

    pub fn add_spawn(&mut self, name: &str, pos: Position) -> EntitySnapshot {
        self.add_facility(name, EntityKind::Spawn, pos, 300, 300)
    }

    fn add_facility(&mut self, name: &str, kind: EntityKind, pos: Position, energy: u32, energy_capacity: u32) -> EntitySnapshot {
        let entity = EntitySnapshot {
            name: name.to_owned(),
            kind,
            pos,
            body: Vec::new(),
            hits: 3000,
            hits_max: 3000,
            energy,
            energy_capacity,
            spawning: false,
        };

        self.entities.push(entity.clone());

        entity
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut EntitySnapshot> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    pub fn damage_unit(&mut self, name: &str, amount: u32) {
        if let Some(entity) = self.entity_mut(name) {
            entity.hits = entity.hits.saturating_sub(amount);
        }
    }

    pub fn set_spawning(&mut self, name: &str, spawning: bool) {
        if let Some(entity) = self.entity_mut(name) {
            entity.spawning = spawning;
        }
    }

    /// The entity is not observable this tick but may come back.
    pub fn hide(&mut self, name: &str) {
        self.entities.retain(|e| e.name != name);
        self.pending.insert(name.to_owned());
    }

    /// The entity is confirmed destroyed.
    pub fn destroy(&mut self, name: &str) {
        self.entities.retain(|e| e.name != name);
        self.gone.insert(name.to_owned());
    }

    pub fn set_controller(&mut self, id: &str, pos: Position, level: u8) {
        self.controller = Some(ControllerSnapshot {
            id: ObjectKey::from(id),
            pos,
            level,
            progress: 0,
            progress_total: 1000,
        });
    }

    pub fn add_source(&mut self, id: &str, pos: Position, energy: u32) {
        self.sources.push(SourceSnapshot {
            id: ObjectKey::from(id),
            pos,
            energy,
            energy_capacity: 3000,
        });
    }

    pub fn add_structure(&mut self, id: &str, kind: StructureKind, pos: Position, energy: u32, energy_capacity: u32) {
        self.structures.push(StructureSnapshot {
            id: ObjectKey::from(id),
            kind,
            pos,
            hits: 1000,
            hits_max: 1000,
            energy,
            energy_capacity,
            owned: true,
        });
    }

    pub fn add_damaged_structure(&mut self, id: &str, kind: StructureKind, pos: Position, hits: u32, hits_max: u32) {
        self.structures.push(StructureSnapshot {
            id: ObjectKey::from(id),
            kind,
            pos,
            hits,
            hits_max,
            energy: 0,
            energy_capacity: 0,
            owned: true,
        });
    }

    pub fn add_construction_site(&mut self, id: &str, kind: StructureKind, pos: Position) {
        self.sites.push(ConstructionSiteSnapshot {
            id: ObjectKey::from(id),
            pos,
            kind,
            progress: 0,
            progress_total: 3000,
        });
    }

    pub fn add_hostile(&mut self, id: &str, pos: Position) {
        self.hostiles.push(HostileSnapshot {
            id: ObjectKey::from(id),
            pos,
            hits: 1000,
            hits_max: 1000,
        });
    }

    pub fn clear_hostiles(&mut self) {
        self.hostiles.clear();
    }

    pub fn block(&mut self, pos: Position) {
        self.blocked.insert(pos);
    }

    /// Every request of the given verb returns `result`.
    pub fn script(&mut self, verb: &str, result: ActionResult) {
        self.scripted.insert(verb.to_owned(), result);
    }

    /// Requests of the given verb against `target` return `result`.
    pub fn script_target(&mut self, verb: &str, target: &str, result: ActionResult) {
        self.scripted_targets.insert((verb.to_owned(), target.to_owned()), result);
    }

    pub fn reserve_name(&mut self, name: &str) {
        self.reserved_names.insert(name.to_owned());
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.clone()
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
        self.said.clear();
    }

    pub fn said(&self) -> Vec<(String, String)> {
        self.said.clone()
    }

    fn record(&mut self, verb: &str, actor: &str, target: &str) -> ActionResult {
        self.actions.push(format!("{} {} {}", verb, actor, target));

        self.scripted_targets
            .get(&(verb.to_owned(), target.to_owned()))
            .or_else(|| self.scripted.get(verb))
            .copied()
            .unwrap_or(ActionResult::Ok)
    }
}

impl WorldHost for MockWorld {
    fn time(&self) -> Tick {
        self.time
    }

    fn owned_rooms(&self) -> Vec<RoomName> {
        self.rooms.clone()
    }

    fn lookup(&self, name: &str) -> EntityLookup {
        if let Some(entity) = self.entities.iter().find(|e| e.name == name) {
            EntityLookup::Live(entity.clone())
        } else if self.pending.contains(name) {
            EntityLookup::Pending
        } else {
            EntityLookup::Gone
        }
    }

    fn units(&self, room: RoomName) -> Vec<EntitySnapshot> {
        self.entities
            .iter()
            .filter(|e| e.is_unit() && e.pos.room_name() == room)
            .cloned()
            .collect()
    }

    fn facilities(&self, room: RoomName) -> Vec<EntitySnapshot> {
        self.entities
            .iter()
            .filter(|e| !e.is_unit() && e.pos.room_name() == room)
            .cloned()
            .collect()
    }

    fn controller(&self, room: RoomName) -> Option<ControllerSnapshot> {
        self.controller.clone().filter(|c| c.pos.room_name() == room)
    }

    fn sources(&self, room: RoomName) -> Vec<SourceSnapshot> {
        self.sources.iter().filter(|s| s.pos.room_name() == room).cloned().collect()
    }

    fn structures(&self, room: RoomName) -> Vec<StructureSnapshot> {
        self.structures.iter().filter(|s| s.pos.room_name() == room).cloned().collect()
    }

    fn construction_sites(&self, room: RoomName) -> Vec<ConstructionSiteSnapshot> {
        self.sites.iter().filter(|s| s.pos.room_name() == room).cloned().collect()
    }

    fn hostiles(&self, room: RoomName) -> Vec<HostileSnapshot> {
        self.hostiles.iter().filter(|h| h.pos.room_name() == room).cloned().collect()
    }

    fn is_walkable(&self, pos: Position) -> bool {
        !self.blocked.contains(&pos)
    }

    fn energy_available(&self, _room: RoomName) -> u32 {
        self.energy_available
    }

    fn energy_capacity(&self, _room: RoomName) -> u32 {
        self.energy_capacity
    }

    fn move_to(&mut self, actor: &str, target: Position, range: u32) -> ActionResult {
        let target = format!("{},{} {}", target.x().u8(), target.y().u8(), range);

        self.record("move", actor, &target)
    }

    fn harvest(&mut self, actor: &str, source: &ObjectKey) -> ActionResult {
        self.record("harvest", actor, source)
    }

    fn transfer(&mut self, actor: &str, target: &ObjectKey) -> ActionResult {
        self.record("transfer", actor, target)
    }

    fn withdraw(&mut self, actor: &str, target: &ObjectKey) -> ActionResult {
        self.record("withdraw", actor, target)
    }

    fn build(&mut self, actor: &str, site: &ObjectKey) -> ActionResult {
        self.record("build", actor, site)
    }

    fn repair(&mut self, actor: &str, target: &ObjectKey) -> ActionResult {
        self.record("repair", actor, target)
    }

    fn upgrade(&mut self, actor: &str, controller: &ObjectKey) -> ActionResult {
        self.record("upgrade", actor, controller)
    }

    fn attack(&mut self, actor: &str, target: &ObjectKey) -> ActionResult {
        self.record("attack", actor, target)
    }

    fn heal(&mut self, actor: &str, target: &str) -> ActionResult {
        self.record("heal", actor, target)
    }

    fn create_construction_site(&mut self, pos: Position, kind: StructureKind) -> ActionResult {
        let target = format!("{},{}", pos.x().u8(), pos.y().u8());

        self.record("site", &format!("{:?}", kind), &target)
    }

    fn produce(&mut self, facility: &str, body: &[Part], name: &str) -> ActionResult {
        if self.reserved_names.contains(name) {
            return ActionResult::NameExists;
        }

        let result = self.record("produce", facility, name);

        if result.is_ok() {
            self.reserved_names.insert(name.to_owned());
            self.energy_available = self.energy_available.saturating_sub(body.iter().map(|p| p.cost()).sum());
        }

        result
    }

    fn say(&mut self, actor: &str, message: &str) {
        self.said.push((actor.to_owned(), message.to_owned()));
    }
}

#[derive(Default)]
pub struct MockPlanner {
    pub containers: Vec<Position>,
    pub anchor: Option<Position>,
    pub defense_point: Option<Position>,
    pub construction: Vec<PlannedSite>,
}

impl LayoutPlanner for MockPlanner {
    fn planned_container_positions(&self, _room: RoomName) -> Vec<Position> {
        self.containers.clone()
    }

    fn planned_production_anchor(&self, _room: RoomName) -> Option<Position> {
        self.anchor
    }

    fn planned_defense_point(&self, _room: RoomName) -> Option<Position> {
        self.defense_point
    }

    fn planned_construction(&self, _room: RoomName, _level: u8) -> Vec<PlannedSite> {
        self.construction.clone()
    }
}

/// Raw segment storage keyed by segment number.
#[derive(Default)]
pub struct MockSegments(pub HashMap<u8, String>);

impl SegmentAccess for MockSegments {
    fn get(&self, segment: u8) -> Option<String> {
        self.0.get(&segment).cloned()
    }

    fn set(&mut self, segment: u8, data: String) {
        self.0.insert(segment, data);
    }
}
