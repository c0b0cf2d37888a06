use super::tasksystem::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TaskKind {
    Harvest(super::harvest::HarvestTask),
    Haul(super::haul::HaulTask),
    Fetch(super::fetch::FetchTask),
    Build(super::build::BuildTask),
    Repair(super::repair::RepairTask),
    Attack(super::attack::AttackTask),
    Heal(super::heal::HealTask),
    Reach(super::reach::ReachTask),
    UpgradeStructure(super::upgrade::UpgradeTask),
    PlaceConstructionSites(super::construction::PlaceConstructionSitesTask),
    ProduceUnit(super::produce::ProduceUnitTask),
}

/// Discriminant of a `TaskKind`, used for queue queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Harvest,
    Haul,
    Fetch,
    Build,
    Repair,
    Attack,
    Heal,
    Reach,
    UpgradeStructure,
    PlaceConstructionSites,
    ProduceUnit,
}

impl TaskKind {
    pub fn task_type(&self) -> TaskType {
        match self {
            TaskKind::Harvest(_) => TaskType::Harvest,
            TaskKind::Haul(_) => TaskType::Haul,
            TaskKind::Fetch(_) => TaskType::Fetch,
            TaskKind::Build(_) => TaskType::Build,
            TaskKind::Repair(_) => TaskType::Repair,
            TaskKind::Attack(_) => TaskType::Attack,
            TaskKind::Heal(_) => TaskType::Heal,
            TaskKind::Reach(_) => TaskType::Reach,
            TaskKind::UpgradeStructure(_) => TaskType::UpgradeStructure,
            TaskKind::PlaceConstructionSites(_) => TaskType::PlaceConstructionSites,
            TaskKind::ProduceUnit(_) => TaskType::ProduceUnit,
        }
    }

    pub fn as_behavior(&self) -> &dyn TaskBehavior {
        match self {
            TaskKind::Harvest(ref data) => data,
            TaskKind::Haul(ref data) => data,
            TaskKind::Fetch(ref data) => data,
            TaskKind::Build(ref data) => data,
            TaskKind::Repair(ref data) => data,
            TaskKind::Attack(ref data) => data,
            TaskKind::Heal(ref data) => data,
            TaskKind::Reach(ref data) => data,
            TaskKind::UpgradeStructure(ref data) => data,
            TaskKind::PlaceConstructionSites(ref data) => data,
            TaskKind::ProduceUnit(ref data) => data,
        }
    }

    pub fn as_behavior_mut(&mut self) -> &mut dyn TaskBehavior {
        match self {
            TaskKind::Harvest(ref mut data) => data,
            TaskKind::Haul(ref mut data) => data,
            TaskKind::Fetch(ref mut data) => data,
            TaskKind::Build(ref mut data) => data,
            TaskKind::Repair(ref mut data) => data,
            TaskKind::Attack(ref mut data) => data,
            TaskKind::Heal(ref mut data) => data,
            TaskKind::Reach(ref mut data) => data,
            TaskKind::UpgradeStructure(ref mut data) => data,
            TaskKind::PlaceConstructionSites(ref mut data) => data,
            TaskKind::ProduceUnit(ref mut data) => data,
        }
    }
}
