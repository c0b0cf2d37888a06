use super::objectivesystem::*;
use super::utility::*;
use crate::agents::Agent;
use crate::creep::RoleTag;
use crate::findnearest::adjacent_positions;
use crate::tasks::harvest::HarvestTask;
use crate::tasks::reach::ReachTask;
use crate::tasks::*;
use crate::world::*;
use log::*;
use screeps::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const HARVEST_DROP_OFF: &[StructureKind] = &[
    StructureKind::Container,
    StructureKind::Storage,
    StructureKind::Spawn,
    StructureKind::Extension,
];

/// A resource node and the number of harvesters it can usefully take.
#[derive(Clone, Debug, PartialEq)]
pub struct HarvestNode {
    pub source: ObjectKey,
    pub pos: Position,
    pub slots: usize,
    pub desired: usize,
}

/// Keeps every resource node in the room worked by dedicated harvesters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinuousHarvestObjective {
    #[serde(default)]
    assignments: BTreeMap<String, ObjectKey>,
    #[serde(default)]
    cursor: usize,
}

impl ContinuousHarvestObjective {
    pub fn new() -> ContinuousHarvestObjective {
        ContinuousHarvestObjective::default()
    }

    pub fn assignment(&self, agent: &str) -> Option<&ObjectKey> {
        self.assignments.get(agent)
    }

    pub fn assigned_to(&self, source: &ObjectKey) -> usize {
        self.assignments.values().filter(|assigned| *assigned == source).count()
    }

    pub fn nodes(ctx: &ObjectiveContext) -> Vec<HarvestNode> {
        let hostiles = ctx.host.hostiles(ctx.room);
        let walkable_slot = |pos: &Position| {
            ctx.host.is_walkable(*pos) && !hostiles.iter().any(|hostile| hostile.pos.get_range_to(*pos) <= ctx.settings.hostile_radius)
        };

        ctx.host
            .sources(ctx.room)
            .into_iter()
            .map(|source| {
                let slots = adjacent_positions(source.pos).iter().filter(|pos| walkable_slot(pos)).count();

                // Below the solo level, leave one slot free so a node is never fully boxed in.
                let desired = if ctx.level < ctx.settings.solo_harvest_level {
                    slots.saturating_sub(1)
                } else {
                    slots.min(1)
                };

                HarvestNode {
                    source: source.id,
                    pos: source.pos,
                    slots,
                    desired,
                }
            })
            .collect()
    }

    fn prune(&mut self, ctx: &ObjectiveContext, nodes: &[HarvestNode]) {
        self.assignments.retain(|agent, source| {
            let keep = ctx.roster.iter().any(|name| name == agent) && nodes.iter().any(|node| node.source == *source);

            if !keep {
                debug!("Releasing harvest assignment of {} to {}", agent, source);
            }

            keep
        });
    }

    /// Least saturated node still short of its desired count, lowest index on ties.
    fn node_in_deficit(nodes: &[HarvestNode], counts: &[usize]) -> Option<usize> {
        nodes
            .iter()
            .enumerate()
            .filter(|(index, node)| counts[*index] < node.desired)
            .min_by(|(a, node_a), (b, node_b)| {
                (counts[*a] * node_b.desired)
                    .cmp(&(counts[*b] * node_a.desired))
                    .then_with(|| a.cmp(b))
            })
            .map(|(index, _)| index)
    }

    fn next_round_robin(&mut self, nodes: &[HarvestNode]) -> Option<usize> {
        if nodes.iter().all(|node| node.slots == 0) {
            return None;
        }

        loop {
            let index = self.cursor % nodes.len();

            self.cursor = (index + 1) % nodes.len();

            if nodes[index].slots > 0 {
                return Some(index);
            }
        }
    }

    /// The first harvester on a node stands on its planned container so the
    /// harvest drops straight into it.
    fn station(&self, ctx: &ObjectiveContext, agent: &str, node: &HarvestNode) -> Option<Position> {
        let first = self.assignments.iter().find(|(_, source)| **source == node.source).map(|(name, _)| name)?;

        if first != agent {
            return None;
        }

        ctx.planner
            .planned_container_positions(ctx.room)
            .into_iter()
            .find(|pos| pos.is_near_to(node.pos))
    }

    pub fn assign(&mut self, nodes: &[HarvestNode], agents: &[&str]) {
        if nodes.is_empty() {
            return;
        }

        let mut counts = nodes.iter().map(|node| self.assigned_to(&node.source)).collect::<Vec<_>>();

        for agent in agents.iter().filter(|agent| !self.assignments.contains_key(**agent)).copied().collect::<Vec<_>>() {
            let index = match Self::node_in_deficit(nodes, &counts).or_else(|| self.next_round_robin(nodes)) {
                Some(index) => index,
                None => return,
            };

            counts[index] += 1;

            self.assignments.insert(agent.to_owned(), nodes[index].source.clone());
        }
    }
}

impl Objective for ContinuousHarvestObjective {
    fn describe(&self) -> String {
        format!("Continuous harvest ({} assigned)", self.assignments.len())
    }

    fn execute(&mut self, ctx: &ObjectiveContext, agents: &mut [Agent], _facilities: &mut [Agent]) {
        let nodes = Self::nodes(ctx);

        self.prune(ctx, &nodes);

        let harvesters = agents
            .iter()
            .filter(|agent| agent.entity().capabilities().contains(Capabilities::WORK))
            .map(|agent| agent.name())
            .collect::<Vec<_>>();

        self.assign(&nodes, &harvesters);

        for agent in agents.iter_mut().filter(|agent| agent.is_idle()) {
            let node = match self.assignments.get(agent.name()).and_then(|source| nodes.iter().find(|node| node.source == *source)) {
                Some(node) => node,
                None => continue,
            };

            if let Some(station) = self.station(ctx, agent.name(), node) {
                if agent.entity().pos != station {
                    agent.schedule_task(TaskKind::Reach(ReachTask::new(station, 0)));
                }
            }

            agent.schedule_task(TaskKind::Harvest(HarvestTask::new(Some(node.source.clone()))));

            schedule_spending(ctx, agent, &[SpendStep::Refill(HARVEST_DROP_OFF), SpendStep::Build, SpendStep::Upgrade]);
        }
    }

    fn estimate_required_workforce(&self, ctx: &ObjectiveContext) -> Vec<WorkforceDemand> {
        let desired = Self::nodes(ctx).iter().map(|node| node.desired).sum::<usize>();

        vec![WorkforceDemand::new(desired, RoleTag::Harvester)]
    }

    fn handle_event(&mut self, event: &TaskEvent) {
        if let TaskEvent::Interrupted { agent, .. } = event {
            if let Some(source) = self.assignments.remove(agent) {
                info!("Harvester {} lost, freeing a slot at {}", agent, source);
            }
        }
    }
}
