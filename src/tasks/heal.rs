use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::constants::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// Heals damaged friendly units, otherwise shadows the leader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealTask {
    target: Option<ObjectKey>,
    leader: Option<String>,
}

impl HealTask {
    pub fn new(leader: Option<String>) -> HealTask {
        HealTask { target: None, leader }
    }

    pub fn leader(&self) -> Option<&str> {
        self.leader.as_deref()
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        let damaged = ctx
            .host
            .units(ctx.room())
            .into_iter()
            .filter(|unit| unit.is_damaged() && !unit.spawning)
            .map(|unit| Candidate::new(ObjectKey::new(unit.name), unit.pos));

        nearest_first(ctx.entity.pos, damaged)
    }

    fn live_leader(&self, ctx: &TaskContext) -> Option<EntitySnapshot> {
        match ctx.host.lookup(self.leader.as_deref()?) {
            EntityLookup::Live(leader) => Some(leader),
            _ => None,
        }
    }
}

impl TaskBehavior for HealTask {
    fn label(&self) -> &'static str {
        "heal"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_tower() || (entity.is_unit() && entity.capabilities().contains(Capabilities::HEAL))
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        self.candidates(ctx).is_empty() && self.live_leader(ctx).is_none()
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let candidates = self.candidates(ctx);

        if !candidates.is_empty() {
            return run_with_retarget(ctx, &mut self.target, &candidates, |ctx, candidate| {
                act_in_range(ctx, candidate.pos, MELEE_RANGE, |host, actor| host.heal(actor, &candidate.id))
            });
        }

        self.target = None;

        match self.live_leader(ctx) {
            Some(leader) => {
                move_into_range(ctx, leader.pos, MELEE_RANGE);

                TaskStatus::Continue
            }
            None => TaskStatus::Backoff(ctx.settings.retry_backoff),
        }
    }

    fn target(&self) -> Option<ObjectKey> {
        self.target.clone()
    }
}
