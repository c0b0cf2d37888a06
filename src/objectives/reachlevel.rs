use super::objectivesystem::*;
use super::utility::*;
use crate::agents::Agent;
use crate::constants::*;
use crate::creep::RoleTag;
use crate::tasks::fetch::FetchTask;
use crate::tasks::haul::HaulTask;
use crate::tasks::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

const REFILL_TARGETS: &[StructureKind] = &[StructureKind::Spawn, StructureKind::Extension, StructureKind::Tower];

/// General purpose workers pushing the controller towards a structural level.
/// Production storage is kept topped up first so the site can keep producing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReachLevelObjective {
    target_level: u8,
}

impl ReachLevelObjective {
    pub fn new(target_level: u8) -> ReachLevelObjective {
        ReachLevelObjective {
            target_level: target_level.min(MAX_CONTROLLER_LEVEL),
        }
    }

    pub fn target_level(&self) -> u8 {
        self.target_level
    }
}

impl Objective for ReachLevelObjective {
    fn describe(&self) -> String {
        format!("Reach level {}", self.target_level)
    }

    fn execute(&mut self, ctx: &ObjectiveContext, agents: &mut [Agent], _facilities: &mut [Agent]) {
        for agent in agents.iter_mut().filter(|agent| agent.is_idle()) {
            let capabilities = agent.entity().capabilities();

            if capabilities.contains(Capabilities::WORK | Capabilities::CARRY) {
                schedule_energy_pickup(ctx, agent);
                schedule_spending(ctx, agent, &[SpendStep::Refill(REFILL_TARGETS), SpendStep::Build, SpendStep::Upgrade]);
            } else if capabilities.contains(Capabilities::CARRY) {
                if agent.entity().energy == 0 {
                    agent.schedule_task(TaskKind::Fetch(FetchTask::new(ENERGY_STORES.to_vec())));
                }

                agent.schedule_task(TaskKind::Haul(HaulTask::new(REFILL_TARGETS.to_vec())));
            }
        }
    }

    fn estimate_required_workforce(&self, ctx: &ObjectiveContext) -> Vec<WorkforceDemand> {
        if ctx.host.controller(ctx.room).is_none() {
            return Vec::new();
        }

        let sources = ctx.host.sources(ctx.room).len();

        vec![WorkforceDemand::new(sources * harvest_workers_per_source(ctx.level), RoleTag::Worker)]
    }
}
