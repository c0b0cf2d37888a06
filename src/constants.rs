//! Simulation constants the engine reasons about. These mirror the host's
//! own values; the host remains authoritative for anything it enforces.

pub const MAX_CONTROLLER_LEVEL: u8 = 8;

pub const MAX_CREEP_SIZE: usize = 50;

pub const HARVEST_POWER: u32 = 2;

pub const TOWER_ENERGY_COST: u32 = 10;

/// Tiles a worker must be within to build, repair or upgrade.
pub const WORK_RANGE: u32 = 3;

pub const RANGED_ATTACK_RANGE: u32 = 3;

pub const MELEE_RANGE: u32 = 1;

/// Energy a container or storage must hold before it is worth fetching from.
pub const MINIMUM_FETCH_ENERGY: u32 = 50;

/// Upper bound on generated production names sharing one tick.
pub const MAX_NAME_ATTEMPTS: u32 = 10;

pub fn harvest_workers_per_source(level: u8) -> usize {
    match level {
        0..=1 => 3,
        2..=3 => 2,
        _ => 1,
    }
}
