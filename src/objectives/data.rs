use super::objectivesystem::*;
use crate::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectiveData {
    Idle(super::idle::IdleObjective),
    ReachLevel(super::reachlevel::ReachLevelObjective),
    ContinuousHarvest(super::harvest::ContinuousHarvestObjective),
    RefillContainers(super::refillcontainers::RefillContainersObjective),
    RefillProductionStorage(super::refillproduction::RefillProductionStorageObjective),
    MaintainStructures(super::maintain::MaintainStructuresObjective),
    DefendSite(super::defend::DefendSiteObjective),
}

impl ObjectiveData {
    /// Strategy for the reserve battalion at a structural level.
    pub fn for_level(level: u8) -> ObjectiveData {
        if level == 0 {
            ObjectiveData::Idle(super::idle::IdleObjective::new())
        } else {
            ObjectiveData::ReachLevel(super::reachlevel::ReachLevelObjective::new(level.saturating_add(1).min(MAX_CONTROLLER_LEVEL)))
        }
    }

    pub fn as_objective(&self) -> &dyn Objective {
        match self {
            ObjectiveData::Idle(ref data) => data,
            ObjectiveData::ReachLevel(ref data) => data,
            ObjectiveData::ContinuousHarvest(ref data) => data,
            ObjectiveData::RefillContainers(ref data) => data,
            ObjectiveData::RefillProductionStorage(ref data) => data,
            ObjectiveData::MaintainStructures(ref data) => data,
            ObjectiveData::DefendSite(ref data) => data,
        }
    }

    pub fn as_objective_mut(&mut self) -> &mut dyn Objective {
        match self {
            ObjectiveData::Idle(ref mut data) => data,
            ObjectiveData::ReachLevel(ref mut data) => data,
            ObjectiveData::ContinuousHarvest(ref mut data) => data,
            ObjectiveData::RefillContainers(ref mut data) => data,
            ObjectiveData::RefillProductionStorage(ref mut data) => data,
            ObjectiveData::MaintainStructures(ref mut data) => data,
            ObjectiveData::DefendSite(ref mut data) => data,
        }
    }
}
