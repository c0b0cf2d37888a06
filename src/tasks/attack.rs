use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::constants::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// Engages hostiles in the room, keeping a focus target while it lives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackTask {
    target: Option<ObjectKey>,
}

impl AttackTask {
    pub fn new(target: Option<ObjectKey>) -> AttackTask {
        AttackTask { target }
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        let hostiles = ctx
            .host
            .hostiles(ctx.room())
            .into_iter()
            .map(|hostile| Candidate::new(hostile.id, hostile.pos));

        nearest_first(ctx.entity.pos, hostiles)
    }

    fn attack_range(entity: &EntitySnapshot) -> u32 {
        let capabilities = entity.capabilities();

        if capabilities.contains(Capabilities::RANGED_ATTACK) && !capabilities.contains(Capabilities::ATTACK) {
            RANGED_ATTACK_RANGE
        } else {
            MELEE_RANGE
        }
    }
}

impl TaskBehavior for AttackTask {
    fn label(&self) -> &'static str {
        "attack"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_tower() || (entity.is_unit() && entity.capabilities().intersects(Capabilities::COMBAT))
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        ctx.host.hostiles(ctx.room()).is_empty()
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let candidates = self.candidates(ctx);
        let range = Self::attack_range(ctx.entity);

        run_with_retarget(ctx, &mut self.target, &candidates, |ctx, candidate| {
            act_in_range(ctx, candidate.pos, range, |host, actor| host.attack(actor, &candidate.id))
        })
    }

    fn target(&self) -> Option<ObjectKey> {
        self.target.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Settings;
    use crate::testing::*;
    use screeps::Part;

    #[test]
    fn keeps_focus_target_over_nearer_hostile() {
        let mut world = MockWorld::new();
        world.add_hostile("hostile-near", pos(11, 10));
        world.add_hostile("hostile-focus", pos(10, 11));
        let entity = world.add_unit("defender-1", pos(10, 10), &[Part::Attack, Part::Move]);
        let settings = Settings::default();
        let mut events = Vec::new();

        let mut task = AttackTask::new(Some(ObjectKey::from("hostile-focus")));
        let mut ctx = TaskContext {
            tick: 1,
            host: &mut world,
            entity: &entity,
            settings: &settings,
            events: &mut events,
        };

        assert_eq!(task.execute(&mut ctx, None), TaskStatus::Continue);
        assert_eq!(world.actions(), vec!["attack defender-1 hostile-focus".to_owned()]);
    }

    #[test]
    fn ranged_attacker_holds_distance() {
        let mut world = MockWorld::new();
        world.add_hostile("hostile-1", pos(13, 10));
        let entity = world.add_unit("defender-1", pos(10, 10), &[Part::RangedAttack, Part::Move]);
        let settings = Settings::default();
        let mut events = Vec::new();

        let mut task = AttackTask::new(None);
        let mut ctx = TaskContext {
            tick: 1,
            host: &mut world,
            entity: &entity,
            settings: &settings,
            events: &mut events,
        };

        task.execute(&mut ctx, None);

        assert_eq!(world.actions(), vec!["attack defender-1 hostile-1".to_owned()]);
    }
}
