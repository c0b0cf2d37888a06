use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::constants::*;
use crate::world::*;
use screeps::Part;
use serde::{Deserialize, Serialize};

/// Gathers energy from a source until the carrier is full.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HarvestTask {
    source: Option<ObjectKey>,
}

impl HarvestTask {
    pub fn new(source: Option<ObjectKey>) -> HarvestTask {
        HarvestTask { source }
    }

    pub fn source(&self) -> Option<&ObjectKey> {
        self.source.as_ref()
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        let sources = ctx
            .host
            .sources(ctx.room())
            .into_iter()
            .filter(|source| source.energy > 0)
            .map(|source| Candidate::new(source.id, source.pos));

        nearest_first(ctx.entity.pos, sources)
    }
}

impl TaskBehavior for HarvestTask {
    fn label(&self) -> &'static str {
        "harvest"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_unit() && entity.capabilities().contains(Capabilities::WORK | Capabilities::CARRY)
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        ctx.entity.free_capacity() == 0
    }

    fn execute(&mut self, ctx: &mut TaskContext, carried: Option<&CarriedState>) -> TaskStatus {
        if self.source.is_none() {
            if let Some(CarriedState::Source(source)) = carried {
                self.source = Some(source.clone());
            }
        }

        let candidates = self.candidates(ctx);
        let mut harvested = false;

        let status = run_with_retarget(ctx, &mut self.source, &candidates, |ctx, candidate| {
            let result = act_in_range(ctx, candidate.pos, 1, |host, actor| host.harvest(actor, &candidate.id));

            harvested = result.is_ok() && ctx.entity.pos.is_near_to(candidate.pos);

            result
        });

        // The snapshot only reflects the previous tick; finish as soon as this
        // harvest is known to fill the carrier.
        let yield_per_tick = ctx.entity.count_parts(Part::Work) * HARVEST_POWER;

        if harvested && yield_per_tick >= ctx.entity.free_capacity() {
            return TaskStatus::Finished;
        }

        status
    }

    fn target(&self) -> Option<ObjectKey> {
        self.source.clone()
    }

    fn persist_after_completion(&self) -> Option<CarriedState> {
        self.source.clone().map(CarriedState::Source)
    }
}
