use super::objectivesystem::*;
use super::utility::*;
use crate::agents::Agent;
use crate::creep::RoleTag;
use crate::world::*;
use serde::{Deserialize, Serialize};

const PRODUCTION_TARGETS: &[StructureKind] = &[StructureKind::Spawn, StructureKind::Extension, StructureKind::Tower];

/// Keeps production facilities, extensions and towers full from the site's
/// energy stores.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RefillProductionStorageObjective {}

impl RefillProductionStorageObjective {
    pub fn new() -> RefillProductionStorageObjective {
        RefillProductionStorageObjective {}
    }
}

impl Objective for RefillProductionStorageObjective {
    fn describe(&self) -> String {
        "Refill production storage".to_owned()
    }

    fn execute(&mut self, ctx: &ObjectiveContext, agents: &mut [Agent], _facilities: &mut [Agent]) {
        if !has_free_capacity(ctx, PRODUCTION_TARGETS) {
            return;
        }

        for agent in agents.iter_mut().filter(|agent| agent.is_idle()) {
            schedule_energy_pickup(ctx, agent);
            schedule_spending(ctx, agent, &[SpendStep::Refill(PRODUCTION_TARGETS)]);
        }
    }

    fn estimate_required_workforce(&self, ctx: &ObjectiveContext) -> Vec<WorkforceDemand> {
        let has_stores = ctx
            .host
            .structures(ctx.room)
            .iter()
            .any(|structure| ENERGY_STORES.contains(&structure.kind));

        if has_stores {
            vec![WorkforceDemand::new(2, RoleTag::Hauler)]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Settings;
    use crate::tasks::*;
    use crate::testing::*;
    use screeps::Part;

    #[test]
    fn haulers_fetch_then_refill() {
        let mut world = MockWorld::new();
        world.add_structure("container-1", StructureKind::Container, pos(12, 12), 800, 2000);
        world.add_structure("ext-1", StructureKind::Extension, pos(20, 20), 0, 50);
        let hauler = world.add_unit("hauler-1", pos(10, 10), &[Part::Carry, Part::Carry, Part::Move]);
        let settings = Settings::default();
        let planner = MockPlanner::default();
        let ctx = ObjectiveContext {
            tick: 1,
            room: room(),
            level: 3,
            host: &world,
            planner: &planner,
            settings: &settings,
            roster: &[],
        };

        let mut objective = RefillProductionStorageObjective::new();
        let mut agents = vec![Agent::new(hauler, Some(RoleTag::Hauler), Vec::new(), 0)];
        objective.execute(&ctx, &mut agents, &mut []);

        assert_eq!(agents[0].tasks().map(|t| t.task_type()).collect::<Vec<_>>(), vec![TaskType::Fetch, TaskType::Haul]);
        assert_eq!(objective.estimate_required_workforce(&ctx), vec![WorkforceDemand::new(2, RoleTag::Hauler)]);
    }

    #[test]
    fn no_haulers_without_stores() {
        let world = MockWorld::new();
        let settings = Settings::default();
        let planner = MockPlanner::default();
        let ctx = ObjectiveContext {
            tick: 1,
            room: room(),
            level: 2,
            host: &world,
            planner: &planner,
            settings: &settings,
            roster: &[],
        };

        assert!(RefillProductionStorageObjective::new().estimate_required_workforce(&ctx).is_empty());
    }
}
