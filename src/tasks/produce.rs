use super::tasksystem::*;
use crate::battalions::BattalionName;
use crate::constants::*;
use crate::creep::RoleTag;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Produces one unit for a battalion. Requests are only valid for the tick
/// they were issued on, so any outcome finishes the task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProduceUnitTask {
    role: RoleTag,
    battalion: BattalionName,
    energy_budget: u32,
}

impl ProduceUnitTask {
    pub fn new(role: RoleTag, battalion: BattalionName, energy_budget: u32) -> ProduceUnitTask {
        ProduceUnitTask {
            role,
            battalion,
            energy_budget,
        }
    }

    pub fn role(&self) -> RoleTag {
        self.role
    }

    pub fn battalion(&self) -> BattalionName {
        self.battalion
    }
}

impl TaskBehavior for ProduceUnitTask {
    fn label(&self) -> &'static str {
        "produce"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_production_facility() && !entity.spawning
    }

    fn completed(&self, _ctx: &TaskContext) -> bool {
        false
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let body = match self.role.create_body(self.energy_budget) {
            Some(body) => body,
            None => {
                warn!("No {} body fits an energy budget of {}", self.role, self.energy_budget);

                return TaskStatus::Finished;
            }
        };

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = format!("{}-{}-{}", self.role.label().to_lowercase(), ctx.tick, attempt);

            match ctx.host.produce(&ctx.entity.name, &body, &name) {
                ActionResult::Ok => {
                    info!("{} producing {} for {:?} battalion", ctx.entity.name, name, self.battalion);

                    ctx.events.push(TaskEvent::Produced {
                        name,
                        role: self.role,
                        battalion: self.battalion,
                    });

                    return TaskStatus::Finished;
                }
                ActionResult::NameExists => continue,
                ActionResult::Busy | ActionResult::NotEnough => {
                    debug!("{} could not produce {}: facility not ready", ctx.entity.name, self.role);

                    return TaskStatus::Finished;
                }
                other => {
                    warn!("Unexpected production result at {}: {:?}", ctx.entity.name, other);

                    return TaskStatus::Finished;
                }
            }
        }

        warn!("Gave up naming a new {} at {}", self.role, ctx.entity.name);

        TaskStatus::Finished
    }
}
