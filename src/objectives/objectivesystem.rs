use crate::agents::Agent;
use crate::creep::RoleTag;
use crate::features::Settings;
use crate::tasks::TaskEvent;
use crate::world::*;
use crate::Tick;
use screeps::RoomName;

/// Read-only view of the site an objective plans for.
pub struct ObjectiveContext<'a> {
    pub tick: Tick,
    pub room: RoomName,
    pub level: u8,
    pub host: &'a dyn WorldHost,
    pub planner: &'a dyn LayoutPlanner,
    pub settings: &'a Settings,
    /// Every agent recorded in the battalion, including those not observable
    /// this tick.
    pub roster: &'a [String],
}

/// One line of an ideal team composition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkforceDemand {
    pub count: usize,
    pub role: RoleTag,
}

impl WorkforceDemand {
    pub fn new(count: usize, role: RoleTag) -> WorkforceDemand {
        WorkforceDemand { count, role }
    }
}

pub trait Objective {
    fn describe(&self) -> String;

    /// Fills empty queues. Never touches a task that is already running.
    fn execute(&mut self, ctx: &ObjectiveContext, agents: &mut [Agent], facilities: &mut [Agent]);

    /// Ideal team composition for the current world state. Independent of the
    /// agents the battalion already has.
    fn estimate_required_workforce(&self, ctx: &ObjectiveContext) -> Vec<WorkforceDemand>;

    fn handle_event(&mut self, _event: &TaskEvent) {}
}
