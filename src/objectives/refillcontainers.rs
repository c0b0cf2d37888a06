use super::objectivesystem::*;
use super::utility::*;
use crate::agents::Agent;
use crate::creep::RoleTag;
use crate::tasks::fetch::FetchTask;
use crate::tasks::haul::HaulTask;
use crate::tasks::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// Moves energy from central storage out to containers near where it is spent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RefillContainersObjective {}

impl RefillContainersObjective {
    pub fn new() -> RefillContainersObjective {
        RefillContainersObjective {}
    }
}

impl Objective for RefillContainersObjective {
    fn describe(&self) -> String {
        "Refill containers".to_owned()
    }

    fn execute(&mut self, ctx: &ObjectiveContext, agents: &mut [Agent], _facilities: &mut [Agent]) {
        if !has_fetchable_energy(ctx, &[StructureKind::Storage]) || !has_free_capacity(ctx, &[StructureKind::Container]) {
            return;
        }

        for agent in agents.iter_mut().filter(|agent| agent.is_idle()) {
            if agent.entity().energy == 0 {
                agent.schedule_task(TaskKind::Fetch(FetchTask::new(vec![StructureKind::Storage])));
            }

            agent.schedule_task(TaskKind::Haul(HaulTask::new(vec![StructureKind::Container])));
        }
    }

    fn estimate_required_workforce(&self, ctx: &ObjectiveContext) -> Vec<WorkforceDemand> {
        let structures = ctx.host.structures(ctx.room);
        let has_storage = structures.iter().any(|structure| structure.kind == StructureKind::Storage);
        let has_container = structures.iter().any(|structure| structure.kind == StructureKind::Container);

        if has_storage && has_container {
            vec![WorkforceDemand::new(1, RoleTag::Hauler)]
        } else {
            Vec::new()
        }
    }
}
