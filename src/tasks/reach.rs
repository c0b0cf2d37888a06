use super::tasksystem::*;
use crate::world::*;
use log::*;
use screeps::Position;
use serde::{Deserialize, Serialize};

/// Travels to within `range` of a position. Gives up after repeated path
/// failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReachTask {
    destination: Position,
    range: u32,
    #[serde(default)]
    failed_attempts: u32,
}

impl ReachTask {
    pub fn new(destination: Position, range: u32) -> ReachTask {
        ReachTask {
            destination,
            range,
            failed_attempts: 0,
        }
    }

    pub fn destination(&self) -> Position {
        self.destination
    }
}

impl TaskBehavior for ReachTask {
    fn label(&self) -> &'static str {
        "reach"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_unit() && entity.capabilities().contains(Capabilities::MOVE)
    }

    fn completed(&self, ctx: &TaskContext) -> bool {
        ctx.entity.pos.in_range_to(self.destination, self.range) || self.failed_attempts >= ctx.settings.max_path_failures
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        match ctx.host.move_to(&ctx.entity.name, self.destination, self.range) {
            ActionResult::Ok => self.failed_attempts = 0,
            ActionResult::NoPath => {
                self.failed_attempts += 1;

                if self.failed_attempts >= ctx.settings.max_path_failures {
                    info!("Abandoning travel for {} to {:?}: no path", ctx.entity.name, self.destination);
                }
            }
            ActionResult::Tired | ActionResult::Busy => {}
            other => warn!("Unexpected move result for {}: {:?}", ctx.entity.name, other),
        }

        TaskStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Settings;
    use crate::testing::*;
    use screeps::Part;

    #[test]
    fn abandons_after_repeated_path_failures() {
        let mut world = MockWorld::new();
        world.script("move", ActionResult::NoPath);
        let entity = world.add_unit("scout-1", pos(10, 10), &[Part::Move]);
        let settings = Settings::default();
        let mut events = Vec::new();

        let mut task = ReachTask::new(pos(40, 40), 1);
        let mut ctx = TaskContext {
            tick: 1,
            host: &mut world,
            entity: &entity,
            settings: &settings,
            events: &mut events,
        };

        for _ in 0..settings.max_path_failures - 1 {
            task.execute(&mut ctx, None);
            assert!(!task.completed(&ctx));
        }

        task.execute(&mut ctx, None);
        assert!(task.completed(&ctx));
    }

    #[test]
    fn arrival_completes() {
        let mut world = MockWorld::new();
        let entity = world.add_unit("scout-1", pos(39, 40), &[Part::Move]);
        let settings = Settings::default();
        let mut events = Vec::new();

        let task = ReachTask::new(pos(40, 40), 1);
        let ctx = TaskContext {
            tick: 1,
            host: &mut world,
            entity: &entity,
            settings: &settings,
            events: &mut events,
        };

        assert!(task.completed(&ctx));
    }
}
