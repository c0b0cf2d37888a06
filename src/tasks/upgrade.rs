use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::constants::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// Spends carried energy on the site's controlling structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTask {
    controller: Option<ObjectKey>,
}

impl UpgradeTask {
    pub fn new() -> UpgradeTask {
        UpgradeTask { controller: None }
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        ctx.host
            .controller(ctx.room())
            .into_iter()
            .map(|controller| Candidate::new(controller.id, controller.pos))
            .collect()
    }
}

impl Default for UpgradeTask {
    fn default() -> UpgradeTask {
        UpgradeTask::new()
    }
}

impl TaskBehavior for UpgradeTask {
    fn label(&self) -> &'static str {
        "upgrade"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_unit() && entity.capabilities().contains(Capabilities::WORK | Capabilities::CARRY)
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        ctx.entity.energy == 0 || self.candidates(ctx).is_empty()
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let candidates = self.candidates(ctx);

        run_with_retarget(ctx, &mut self.controller, &candidates, |ctx, candidate| {
            act_in_range(ctx, candidate.pos, WORK_RANGE, |host, actor| host.upgrade(actor, &candidate.id))
        })
    }

    fn target(&self) -> Option<ObjectKey> {
        self.controller.clone()
    }
}
