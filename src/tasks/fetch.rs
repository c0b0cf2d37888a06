use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::constants::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// Withdraws energy from storage-like structures until full.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchTask {
    source: Option<ObjectKey>,
    kinds: Vec<StructureKind>,
}

impl FetchTask {
    pub fn new(kinds: Vec<StructureKind>) -> FetchTask {
        FetchTask { source: None, kinds }
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        let structures = ctx
            .host
            .structures(ctx.room())
            .into_iter()
            .filter(|structure| self.kinds.contains(&structure.kind) && structure.energy >= MINIMUM_FETCH_ENERGY)
            .map(|structure| Candidate::new(structure.id, structure.pos));

        nearest_first(ctx.entity.pos, structures)
    }
}

impl TaskBehavior for FetchTask {
    fn label(&self) -> &'static str {
        "fetch"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_unit() && entity.capabilities().contains(Capabilities::CARRY)
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        // A partial load is good enough once nothing is left to fetch.
        ctx.entity.free_capacity() == 0 || (ctx.entity.energy > 0 && self.candidates(ctx).is_empty())
    }

    fn execute(&mut self, ctx: &mut TaskContext, carried: Option<&CarriedState>) -> TaskStatus {
        if self.source.is_none() {
            if let Some(CarriedState::Withdraw(source)) = carried {
                self.source = Some(source.clone());
            }
        }

        let candidates = self.candidates(ctx);

        run_with_retarget(ctx, &mut self.source, &candidates, |ctx, candidate| {
            act_in_range(ctx, candidate.pos, 1, |host, actor| host.withdraw(actor, &candidate.id))
        })
    }

    fn target(&self) -> Option<ObjectKey> {
        self.source.clone()
    }

    fn persist_after_completion(&self) -> Option<CarriedState> {
        self.source.clone().map(CarriedState::Withdraw)
    }
}
