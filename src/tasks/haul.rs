use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// Delivers carried energy into structures of the given kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HaulTask {
    target: Option<ObjectKey>,
    kinds: Vec<StructureKind>,
}

impl HaulTask {
    pub fn new(kinds: Vec<StructureKind>) -> HaulTask {
        HaulTask { target: None, kinds }
    }

    pub fn kinds(&self) -> &[StructureKind] {
        &self.kinds
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        let structures = ctx
            .host
            .structures(ctx.room())
            .into_iter()
            .filter(|structure| self.kinds.contains(&structure.kind) && structure.free_capacity() > 0)
            .map(|structure| Candidate::new(structure.id, structure.pos));

        nearest_first(ctx.entity.pos, structures)
    }
}

impl TaskBehavior for HaulTask {
    fn label(&self) -> &'static str {
        "haul"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_unit() && entity.capabilities().contains(Capabilities::CARRY)
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        ctx.entity.energy == 0 || self.candidates(ctx).is_empty()
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let candidates = self.candidates(ctx);

        run_with_retarget(ctx, &mut self.target, &candidates, |ctx, candidate| {
            act_in_range(ctx, candidate.pos, 1, |host, actor| host.transfer(actor, &candidate.id))
        })
    }

    fn target(&self) -> Option<ObjectKey> {
        self.target.clone()
    }
}
