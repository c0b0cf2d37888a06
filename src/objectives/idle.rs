use super::objectivesystem::*;
use crate::agents::Agent;
use serde::{Deserialize, Serialize};

/// Holds a battalion without work, e.g. a site that has not claimed its
/// controller yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdleObjective {}

impl IdleObjective {
    pub fn new() -> IdleObjective {
        IdleObjective {}
    }
}

impl Objective for IdleObjective {
    fn describe(&self) -> String {
        "Idle".to_owned()
    }

    fn execute(&mut self, _ctx: &ObjectiveContext, _agents: &mut [Agent], _facilities: &mut [Agent]) {}

    fn estimate_required_workforce(&self, _ctx: &ObjectiveContext) -> Vec<WorkforceDemand> {
        Vec::new()
    }
}
