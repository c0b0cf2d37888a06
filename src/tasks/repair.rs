use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::constants::*;
use crate::world::*;
use itertools::*;
use serde::{Deserialize, Serialize};

/// Repairs structures whose hits ratio is under the threshold, most damaged
/// first. Runs on workers and towers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepairTask {
    target: Option<ObjectKey>,
    threshold: f32,
}

impl RepairTask {
    pub fn new(threshold: f32) -> RepairTask {
        RepairTask { target: None, threshold }
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        let origin = ctx.entity.pos;

        ctx.host
            .structures(ctx.room())
            .into_iter()
            .filter(|structure| structure.needs_repair(self.threshold))
            .sorted_by(|a, b| {
                a.hits_ratio()
                    .partial_cmp(&b.hits_ratio())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| origin.get_range_to(a.pos).cmp(&origin.get_range_to(b.pos)))
            })
            .map(|structure| Candidate::new(structure.id, structure.pos))
            .collect()
    }

    fn has_energy(entity: &EntitySnapshot) -> bool {
        if entity.is_tower() {
            entity.energy >= TOWER_ENERGY_COST
        } else {
            entity.energy > 0
        }
    }
}

impl TaskBehavior for RepairTask {
    fn label(&self) -> &'static str {
        "repair"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_tower() || (entity.is_unit() && entity.capabilities().contains(Capabilities::WORK | Capabilities::CARRY))
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        !Self::has_energy(ctx.entity) || self.candidates(ctx).is_empty()
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let candidates = self.candidates(ctx);

        run_with_retarget(ctx, &mut self.target, &candidates, |ctx, candidate| {
            act_in_range(ctx, candidate.pos, WORK_RANGE, |host, actor| host.repair(actor, &candidate.id))
        })
    }

    fn target(&self) -> Option<ObjectKey> {
        self.target.clone()
    }
}
