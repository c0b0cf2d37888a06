use bitflags::bitflags;
use screeps::{Part, Position};
use serde::{Deserialize, Serialize};
use shrinkwraprs::Shrinkwrap;
use std::fmt;

/// Stable host identifier of a non-controlled object (source, structure,
/// construction site, hostile).
#[derive(Shrinkwrap, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new<S: Into<String>>(id: S) -> ObjectKey {
        ObjectKey(id.into())
    }
}

impl From<&str> for ObjectKey {
    fn from(id: &str) -> ObjectKey {
        ObjectKey(id.to_owned())
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const MOVE          = 1;
        const WORK          = 1 << 1;
        const CARRY         = 1 << 2;
        const ATTACK        = 1 << 3;
        const RANGED_ATTACK = 1 << 4;
        const HEAL          = 1 << 5;
        const CLAIM         = 1 << 6;

        const COMBAT = Self::ATTACK.bits() | Self::RANGED_ATTACK.bits();
    }
}

impl Capabilities {
    pub fn from_body(body: &[Part]) -> Capabilities {
        body.iter().fold(Capabilities::empty(), |caps, part| {
            caps | match part {
                Part::Move => Capabilities::MOVE,
                Part::Work => Capabilities::WORK,
                Part::Carry => Capabilities::CARRY,
                Part::Attack => Capabilities::ATTACK,
                Part::RangedAttack => Capabilities::RANGED_ATTACK,
                Part::Heal => Capabilities::HEAL,
                Part::Claim => Capabilities::CLAIM,
                _ => Capabilities::empty(),
            }
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Unit,
    Tower,
    Spawn,
}

/// Per-tick view of a controlled entity. Never persisted: it is looked up
/// fresh from the host every tick.
#[derive(Clone, Debug)]
pub struct EntitySnapshot {
    pub name: String,
    pub kind: EntityKind,
    pub pos: Position,
    pub body: Vec<Part>,
    pub hits: u32,
    pub hits_max: u32,
    pub energy: u32,
    pub energy_capacity: u32,
    pub spawning: bool,
}

impl EntitySnapshot {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::from_body(&self.body)
    }

    pub fn count_parts(&self, part: Part) -> u32 {
        self.body.iter().filter(|p| **p == part).count() as u32
    }

    pub fn free_capacity(&self) -> u32 {
        self.energy_capacity.saturating_sub(self.energy)
    }

    pub fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }

    pub fn is_unit(&self) -> bool {
        self.kind == EntityKind::Unit
    }

    pub fn is_tower(&self) -> bool {
        self.kind == EntityKind::Tower
    }

    pub fn is_production_facility(&self) -> bool {
        self.kind == EntityKind::Spawn
    }
}

/// Result of resolving a persisted name against the host.
#[derive(Clone, Debug)]
pub enum EntityLookup {
    Live(EntitySnapshot),
    /// Not observable this tick; the record is kept for a later tick.
    Pending,
    /// The host confirms the entity no longer exists.
    Gone,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureKind {
    Spawn,
    Extension,
    Tower,
    Container,
    Storage,
    Link,
    Road,
    Wall,
    Rampart,
}

#[derive(Clone, Debug)]
pub struct StructureSnapshot {
    pub id: ObjectKey,
    pub kind: StructureKind,
    pub pos: Position,
    pub hits: u32,
    pub hits_max: u32,
    pub energy: u32,
    pub energy_capacity: u32,
    pub owned: bool,
}

impl StructureSnapshot {
    pub fn free_capacity(&self) -> u32 {
        self.energy_capacity.saturating_sub(self.energy)
    }

    pub fn hits_ratio(&self) -> f32 {
        if self.hits_max == 0 {
            1.0
        } else {
            self.hits as f32 / self.hits_max as f32
        }
    }

    pub fn needs_repair(&self, threshold: f32) -> bool {
        self.hits_max > 0 && self.hits_ratio() < threshold
    }
}

#[derive(Clone, Debug)]
pub struct ControllerSnapshot {
    pub id: ObjectKey,
    pub pos: Position,
    pub level: u8,
    pub progress: u32,
    pub progress_total: u32,
}

#[derive(Clone, Debug)]
pub struct SourceSnapshot {
    pub id: ObjectKey,
    pub pos: Position,
    pub energy: u32,
    pub energy_capacity: u32,
}

#[derive(Clone, Debug)]
pub struct ConstructionSiteSnapshot {
    pub id: ObjectKey,
    pub pos: Position,
    pub kind: StructureKind,
    pub progress: u32,
    pub progress_total: u32,
}

#[derive(Clone, Debug)]
pub struct HostileSnapshot {
    pub id: ObjectKey,
    pub pos: Position,
    pub hits: u32,
    pub hits_max: u32,
}

/// A structure the layout planner wants placed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSite {
    pub pos: Position,
    pub kind: StructureKind,
}
