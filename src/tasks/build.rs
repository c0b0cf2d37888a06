use super::tasksystem::*;
use super::utility::movebehavior::*;
use super::utility::targetbehavior::*;
use crate::constants::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildTask {
    site: Option<ObjectKey>,
}

impl BuildTask {
    pub fn new() -> BuildTask {
        BuildTask { site: None }
    }

    fn candidates(&self, ctx: &TaskContext) -> Vec<Candidate> {
        let sites = ctx
            .host
            .construction_sites(ctx.room())
            .into_iter()
            .map(|site| Candidate::new(site.id, site.pos));

        nearest_first(ctx.entity.pos, sites)
    }
}

impl Default for BuildTask {
    fn default() -> BuildTask {
        BuildTask::new()
    }
}

impl TaskBehavior for BuildTask {
    fn label(&self) -> &'static str {
        "build"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_unit() && entity.capabilities().contains(Capabilities::WORK | Capabilities::CARRY)
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        ctx.entity.energy == 0 || self.candidates(ctx).is_empty()
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let candidates = self.candidates(ctx);

        run_with_retarget(ctx, &mut self.site, &candidates, |ctx, candidate| {
            act_in_range(ctx, candidate.pos, WORK_RANGE, |host, actor| host.build(actor, &candidate.id))
        })
    }

    fn target(&self) -> Option<ObjectKey> {
        self.site.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Settings;
    use crate::testing::*;
    use screeps::Part;

    #[test]
    fn builds_from_work_range() {
        let mut world = MockWorld::new();
        world.add_construction_site("site-1", StructureKind::Extension, pos(13, 10));
        let mut entity = world.add_unit("worker-1", pos(10, 10), &[Part::Work, Part::Carry, Part::Move]);
        entity.energy = 50;
        let settings = Settings::default();
        let mut events = Vec::new();

        let mut task = BuildTask::new();
        let mut ctx = TaskContext {
            tick: 1,
            host: &mut world,
            entity: &entity,
            settings: &settings,
            events: &mut events,
        };

        assert!(!task.completed(&ctx));
        assert_eq!(task.execute(&mut ctx, None), TaskStatus::Continue);
        assert_eq!(world.actions(), vec!["build worker-1 site-1".to_owned()]);
    }
}
