use super::objectivesystem::*;
use super::utility::*;
use crate::agents::Agent;
use crate::creep::RoleTag;
use crate::world::*;
use serde::{Deserialize, Serialize};

const BUSY_CONSTRUCTION_SITES: usize = 5;

/// Repairs decaying structures and works through the construction backlog,
/// upgrading with whatever is left over.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintainStructuresObjective {}

impl MaintainStructuresObjective {
    pub fn new() -> MaintainStructuresObjective {
        MaintainStructuresObjective {}
    }
}

impl Objective for MaintainStructuresObjective {
    fn describe(&self) -> String {
        "Maintain structures".to_owned()
    }

    fn execute(&mut self, ctx: &ObjectiveContext, agents: &mut [Agent], _facilities: &mut [Agent]) {
        for agent in agents.iter_mut().filter(|agent| agent.is_idle()) {
            if !agent.entity().capabilities().contains(Capabilities::WORK | Capabilities::CARRY) {
                continue;
            }

            schedule_energy_pickup(ctx, agent);
            schedule_spending(ctx, agent, &[SpendStep::Repair, SpendStep::Build, SpendStep::Upgrade]);
        }
    }

    fn estimate_required_workforce(&self, ctx: &ObjectiveContext) -> Vec<WorkforceDemand> {
        let sites = ctx.host.construction_sites(ctx.room).len();

        let mut count = 0;

        if needs_repair(ctx) || sites > 0 {
            count += 1;
        }

        if sites >= BUSY_CONSTRUCTION_SITES {
            count += 1;
        }

        if count == 0 {
            return Vec::new();
        }

        vec![WorkforceDemand::new(count, RoleTag::Maintainer)]
    }
}
