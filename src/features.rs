use crate::memorysystem::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Structural level at which each lazily created battalion comes into being.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattalionLevels {
    pub harvest: u8,
    pub logistics: u8,
    pub supply: u8,
    pub maintenance: u8,
    pub defense: u8,
}

impl Default for BattalionLevels {
    fn default() -> BattalionLevels {
        BattalionLevels {
            harvest: 2,
            logistics: 2,
            supply: 4,
            maintenance: 2,
            defense: 3,
        }
    }
}

/// Engine toggles and tuning, read from `config/global/settings` each tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub announce_tasks: bool,
    pub idle_warning_interval: u32,
    pub max_retargets: u32,
    pub retry_backoff: u32,
    pub max_path_failures: u32,
    pub construction_cadence: u32,
    pub max_sites_per_plan: usize,
    pub solo_harvest_level: u8,
    pub hostile_radius: u32,
    pub defense_quorum: usize,
    pub garrison_radius: u32,
    pub repair_threshold: f32,
    pub battalion_levels: BattalionLevels,
    pub reset_memory: bool,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            announce_tasks: true,
            idle_warning_interval: 100,
            max_retargets: 2,
            retry_backoff: 5,
            max_path_failures: 5,
            construction_cadence: 10,
            max_sites_per_plan: 5,
            solo_harvest_level: 4,
            hostile_radius: 3,
            defense_quorum: 3,
            garrison_radius: 4,
            repair_threshold: 0.75,
            battalion_levels: BattalionLevels::default(),
            reset_memory: false,
        }
    }
}

impl Settings {
    pub fn path() -> RecordPath {
        RecordPath::new(CONFIG_CATEGORY, "global", "settings")
    }

    pub fn load(store: &dyn RecordStore) -> Settings {
        match store.get(&Self::path()) {
            Some(record) => serde_json::from_value(record).unwrap_or_else(|err| {
                error!("Invalid settings record, using defaults. Error: {}", err);

                Settings::default()
            }),
            None => Settings::default(),
        }
    }

    /// Clears the one-shot reset flag, keeping every other field as stored.
    pub fn clear_reset(store: &mut dyn RecordStore) {
        if let Some(mut record) = store.get(&Self::path()) {
            if let Some(fields) = record.as_object_mut() {
                fields.insert("reset_memory".to_owned(), serde_json::Value::Bool(false));
            }

            store.put(&Self::path(), record);
        }
    }
}
