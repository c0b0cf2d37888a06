use super::objectivesystem::*;
use crate::agents::Agent;
use crate::constants::*;
use crate::tasks::build::BuildTask;
use crate::tasks::fetch::FetchTask;
use crate::tasks::harvest::HarvestTask;
use crate::tasks::haul::HaulTask;
use crate::tasks::repair::RepairTask;
use crate::tasks::upgrade::UpgradeTask;
use crate::tasks::*;
use crate::world::*;

pub const PRODUCTION_STORAGE: &[StructureKind] = &[StructureKind::Spawn, StructureKind::Extension];
pub const ENERGY_STORES: &[StructureKind] = &[StructureKind::Container, StructureKind::Storage];

pub fn has_fetchable_energy(ctx: &ObjectiveContext, kinds: &[StructureKind]) -> bool {
    ctx.host
        .structures(ctx.room)
        .iter()
        .any(|structure| kinds.contains(&structure.kind) && structure.energy >= MINIMUM_FETCH_ENERGY)
}

pub fn has_free_capacity(ctx: &ObjectiveContext, kinds: &[StructureKind]) -> bool {
    ctx.host
        .structures(ctx.room)
        .iter()
        .any(|structure| kinds.contains(&structure.kind) && structure.free_capacity() > 0)
}

pub fn needs_repair(ctx: &ObjectiveContext) -> bool {
    ctx.host
        .structures(ctx.room)
        .iter()
        .any(|structure| structure.needs_repair(ctx.settings.repair_threshold))
}

pub fn has_construction(ctx: &ObjectiveContext) -> bool {
    !ctx.host.construction_sites(ctx.room).is_empty()
}

/// Schedules an energy pickup for an empty carrier: fetch from stores when any
/// hold energy, otherwise harvest if the body allows it.
pub fn schedule_energy_pickup(ctx: &ObjectiveContext, agent: &mut Agent) {
    let entity = agent.entity();

    if entity.energy > 0 || entity.energy_capacity == 0 {
        return;
    }

    if has_fetchable_energy(ctx, ENERGY_STORES) {
        agent.schedule_task(TaskKind::Fetch(FetchTask::new(ENERGY_STORES.to_vec())));
    } else if entity.capabilities().contains(Capabilities::WORK) {
        agent.schedule_task(TaskKind::Harvest(HarvestTask::new(None)));
    }
}

/// Worker spending steps in priority order. Steps with nothing to act on
/// right now are left out.
pub fn schedule_spending(ctx: &ObjectiveContext, agent: &mut Agent, steps: &[SpendStep]) {
    for step in steps {
        match step {
            SpendStep::Refill(kinds) => {
                if has_free_capacity(ctx, kinds) {
                    agent.schedule_task(TaskKind::Haul(HaulTask::new(kinds.to_vec())));
                }
            }
            SpendStep::Repair => {
                if needs_repair(ctx) {
                    agent.schedule_task(TaskKind::Repair(RepairTask::new(ctx.settings.repair_threshold)));
                }
            }
            SpendStep::Build => {
                if has_construction(ctx) {
                    agent.schedule_task(TaskKind::Build(BuildTask::new()));
                }
            }
            SpendStep::Upgrade => {
                if ctx.host.controller(ctx.room).is_some() {
                    agent.schedule_task(TaskKind::UpgradeStructure(UpgradeTask::new()));
                }
            }
        }
    }
}

pub enum SpendStep {
    Refill(&'static [StructureKind]),
    Repair,
    Build,
    Upgrade,
}
