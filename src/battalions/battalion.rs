use crate::agents::Agent;
use crate::creep::RoleTag;
use crate::features::{BattalionLevels, Settings};
use crate::objectives::defend::DefendSiteObjective;
use crate::objectives::harvest::ContinuousHarvestObjective;
use crate::objectives::maintain::MaintainStructuresObjective;
use crate::objectives::refillcontainers::RefillContainersObjective;
use crate::objectives::refillproduction::RefillProductionStorageObjective;
use crate::objectives::*;
use crate::spawnsystem::*;
use crate::tasks::TaskEvent;
use crate::world::*;
use crate::Tick;
use lerp::*;
use log::*;
use screeps::RoomName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The fixed catalogue of teams a site can field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BattalionName {
    Reserve,
    Harvest,
    Logistics,
    Supply,
    Maintenance,
    Defense,
}

impl BattalionName {
    pub const ALL: [BattalionName; 6] = [
        BattalionName::Reserve,
        BattalionName::Harvest,
        BattalionName::Logistics,
        BattalionName::Supply,
        BattalionName::Maintenance,
        BattalionName::Defense,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BattalionName::Reserve => "reserve",
            BattalionName::Harvest => "harvest",
            BattalionName::Logistics => "logistics",
            BattalionName::Supply => "supply",
            BattalionName::Maintenance => "maintenance",
            BattalionName::Defense => "defense",
        }
    }

    /// Structural level at which the battalion is created if it does not exist yet.
    pub fn creation_level(self, levels: &BattalionLevels) -> u8 {
        match self {
            BattalionName::Reserve => 0,
            BattalionName::Harvest => levels.harvest,
            BattalionName::Logistics => levels.logistics,
            BattalionName::Supply => levels.supply,
            BattalionName::Maintenance => levels.maintenance,
            BattalionName::Defense => levels.defense,
        }
    }

    pub fn default_objective(self, level: u8) -> ObjectiveData {
        match self {
            BattalionName::Reserve => ObjectiveData::for_level(level),
            BattalionName::Harvest => ObjectiveData::ContinuousHarvest(ContinuousHarvestObjective::new()),
            BattalionName::Logistics => ObjectiveData::RefillProductionStorage(RefillProductionStorageObjective::new()),
            BattalionName::Supply => ObjectiveData::RefillContainers(RefillContainersObjective::new()),
            BattalionName::Maintenance => ObjectiveData::MaintainStructures(MaintainStructuresObjective::new()),
            BattalionName::Defense => ObjectiveData::DefendSite(DefendSiteObjective::new()),
        }
    }

    /// Production priority for the first missing unit and for the last one.
    fn priority_range(self) -> (f32, f32) {
        match self {
            BattalionName::Defense => (SPAWN_PRIORITY_CRITICAL, SPAWN_PRIORITY_HIGH),
            BattalionName::Reserve | BattalionName::Harvest => (SPAWN_PRIORITY_HIGH, SPAWN_PRIORITY_LOW),
            BattalionName::Logistics => (SPAWN_PRIORITY_HIGH, SPAWN_PRIORITY_MEDIUM),
            BattalionName::Supply | BattalionName::Maintenance => (SPAWN_PRIORITY_MEDIUM, SPAWN_PRIORITY_LOW),
        }
    }
}

impl fmt::Display for BattalionName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattalionRecord {
    pub objective: ObjectiveData,
}

/// Units still missing once requests already queued this tick and the units
/// already alive are accounted for.
pub fn workforce_deficit(desired: usize, pending: usize, existing: usize) -> usize {
    desired.saturating_sub(pending + existing)
}

/// Per-tick inputs shared by every battalion of a site.
pub struct BattalionContext<'a> {
    pub tick: Tick,
    pub room: RoomName,
    pub level: u8,
    pub planner: &'a dyn LayoutPlanner,
    pub settings: &'a Settings,
}

pub struct Battalion {
    name: BattalionName,
    objective: ObjectiveData,
    agents: Vec<Agent>,
    facilities: Vec<Agent>,
    roster: Vec<String>,
}

impl Battalion {
    pub fn new(name: BattalionName, objective: ObjectiveData) -> Battalion {
        Battalion {
            name,
            objective,
            agents: Vec::new(),
            facilities: Vec::new(),
            roster: Vec::new(),
        }
    }

    pub fn name(&self) -> BattalionName {
        self.name
    }

    pub fn objective(&self) -> &ObjectiveData {
        &self.objective
    }

    pub fn set_objective(&mut self, objective: ObjectiveData) {
        self.objective = objective;
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn facilities(&self) -> &[Agent] {
        &self.facilities
    }

    pub fn facilities_mut(&mut self) -> &mut [Agent] {
        &mut self.facilities
    }

    /// Records a member by name, whether or not it is observable this tick.
    pub fn enroll(&mut self, name: &str) {
        if !self.roster.iter().any(|member| member == name) {
            self.roster.push(name.to_owned());
        }
    }

    pub fn add_agent(&mut self, agent: Agent) {
        self.enroll(agent.name());
        self.agents.push(agent);
    }

    pub fn add_facility(&mut self, facility: Agent) {
        self.facilities.push(facility);
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn handle_event(&mut self, event: &TaskEvent) {
        self.objective.as_objective_mut().handle_event(event);
    }

    pub fn record(&self) -> BattalionRecord {
        BattalionRecord {
            objective: self.objective.clone(),
        }
    }

    /// Objective, then members, then workforce reconciliation.
    pub fn execute(
        &mut self,
        ctx: &BattalionContext,
        host: &mut dyn WorldHost,
        queue: &mut ProductionQueue,
        events: &mut Vec<TaskEvent>,
    ) -> Vec<ProductionRequest> {
        {
            let objective_ctx = ObjectiveContext {
                tick: ctx.tick,
                room: ctx.room,
                level: ctx.level,
                host: &*host,
                planner: ctx.planner,
                settings: ctx.settings,
                roster: &self.roster,
            };

            self.objective
                .as_objective_mut()
                .execute(&objective_ctx, &mut self.agents, &mut self.facilities);
        }

        for agent in self.agents.iter_mut() {
            agent.execute(ctx.tick, host, ctx.settings, events);
        }

        let objective_ctx = ObjectiveContext {
            tick: ctx.tick,
            room: ctx.room,
            level: ctx.level,
            host: &*host,
            planner: ctx.planner,
            settings: ctx.settings,
            roster: &self.roster,
        };

        self.reconcile(&objective_ctx, queue)
    }

    /// Live members per role. Units still being produced count.
    pub fn existing_counts(&self) -> BTreeMap<RoleTag, usize> {
        let mut counts = BTreeMap::new();

        for role in self.agents.iter().filter_map(|agent| agent.role()) {
            *counts.entry(role).or_insert(0) += 1;
        }

        counts
    }

    /// Requests production of every unit the objective wants and nobody has
    /// asked for yet. Recomputed from scratch each call.
    pub fn reconcile(&self, ctx: &ObjectiveContext, queue: &mut ProductionQueue) -> Vec<ProductionRequest> {
        let mut desired: BTreeMap<RoleTag, usize> = BTreeMap::new();

        for demand in self.objective.as_objective().estimate_required_workforce(ctx) {
            *desired.entry(demand.role).or_insert(0) += demand.count;
        }

        let existing_counts = self.existing_counts();
        let energy_available = ctx.host.energy_available(ctx.room);
        let energy_capacity = ctx.host.energy_capacity(ctx.room);
        let (high, low) = self.name.priority_range();

        let mut issued = Vec::new();

        for (role, desired) in desired {
            let existing = existing_counts.get(&role).copied().unwrap_or(0);
            let pending = queue.pending_for(self.name, role);
            let deficit = workforce_deficit(desired, pending, existing);

            if deficit == 0 {
                continue;
            }

            // With none of the role alive, take whatever can be afforded now.
            let energy_budget = if existing == 0 { energy_available } else { energy_capacity };

            for index in 0..deficit {
                let filled = existing + pending + index;
                let interp = filled as f32 / desired as f32;
                let priority = high.lerp_bounded(low, interp);

                let request = ProductionRequest::new(self.name, role, priority, energy_budget);

                debug!(
                    "{} requests {} (desired {}, existing {}, pending {}) at priority {}",
                    self.name, role, desired, existing, pending, priority
                );

                queue.request(request.clone());
                issued.push(request);
            }
        }

        issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use screeps::Part;

    fn defense_with_hostiles(world: &mut MockWorld, hostiles: usize) {
        for i in 0..hostiles {
            world.add_hostile(&format!("invader-{}", i), pos(40, 10 + i as u8));
        }
    }

    fn objective_context<'a>(world: &'a MockWorld, planner: &'a MockPlanner, settings: &'a Settings) -> ObjectiveContext<'a> {
        ObjectiveContext {
            tick: 1,
            room: room(),
            level: 3,
            host: world,
            planner,
            settings,
            roster: &[],
        }
    }

    #[test]
    fn deficit_is_never_negative() {
        for desired in 0..5 {
            for pending in 0..5 {
                for existing in 0..5 {
                    let deficit = workforce_deficit(desired, pending, existing);

                    assert_eq!(deficit, desired.saturating_sub(pending + existing));

                    if pending + existing >= desired {
                        assert_eq!(deficit, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn reconciliation_is_idempotent_within_a_tick() {
        let mut world = MockWorld::new();
        defense_with_hostiles(&mut world, 2);
        let planner = MockPlanner::default();
        let settings = Settings::default();
        let ctx = objective_context(&world, &planner, &settings);

        let battalion = Battalion::new(BattalionName::Defense, ObjectiveData::DefendSite(DefendSiteObjective::new()));
        let mut queue = ProductionQueue::new();

        let first = battalion.reconcile(&ctx, &mut queue);
        let second = battalion.reconcile(&ctx, &mut queue);

        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn pending_and_existing_healers_satisfy_demand() {
        let mut world = MockWorld::new();
        // Three hostiles ask for two healers.
        defense_with_hostiles(&mut world, 3);
        let healer = world.add_unit("healer-1", pos(20, 20), &[Part::Heal, Part::Move]);
        let planner = MockPlanner::default();
        let settings = Settings::default();
        let ctx = objective_context(&world, &planner, &settings);

        let mut battalion = Battalion::new(BattalionName::Defense, ObjectiveData::DefendSite(DefendSiteObjective::new()));
        battalion.add_agent(Agent::new(healer, Some(RoleTag::Healer), Vec::new(), 0));

        let mut queue = ProductionQueue::new();
        queue.request(ProductionRequest::new(BattalionName::Defense, RoleTag::Healer, SPAWN_PRIORITY_HIGH, 300));

        let issued = battalion.reconcile(&ctx, &mut queue);

        assert!(issued.iter().all(|request| request.role() != RoleTag::Healer));
        assert_eq!(queue.pending_for(BattalionName::Defense, RoleTag::Healer), 1);
        assert_eq!(queue.pending_for(BattalionName::Defense, RoleTag::Defender), 3);
    }

    #[test]
    fn bootstrap_budget_uses_available_energy() {
        let mut world = MockWorld::new();
        world.energy_available = 200;
        world.energy_capacity = 550;
        defense_with_hostiles(&mut world, 1);
        let defender = world.add_unit("defender-1", pos(20, 20), &[Part::Attack, Part::Move]);
        let planner = MockPlanner::default();
        let settings = Settings::default();
        let ctx = objective_context(&world, &planner, &settings);

        let mut battalion = Battalion::new(BattalionName::Defense, ObjectiveData::DefendSite(DefendSiteObjective::new()));
        battalion.add_agent(Agent::new(defender, Some(RoleTag::Defender), Vec::new(), 0));

        let mut queue = ProductionQueue::new();
        let issued = battalion.reconcile(&ctx, &mut queue);

        let defender_budgets = issued.iter().filter(|r| r.role() == RoleTag::Defender).map(|r| r.energy_budget()).collect::<Vec<_>>();
        let healer_budgets = issued.iter().filter(|r| r.role() == RoleTag::Healer).map(|r| r.energy_budget()).collect::<Vec<_>>();

        assert_eq!(defender_budgets, vec![550]);
        assert_eq!(healer_budgets, vec![200]);
    }

    #[test]
    fn spawning_units_count_as_existing() {
        let mut world = MockWorld::new();
        defense_with_hostiles(&mut world, 1);
        let planner = MockPlanner::default();
        let settings = Settings::default();

        let mut battalion = Battalion::new(BattalionName::Defense, ObjectiveData::DefendSite(DefendSiteObjective::new()));

        for name in ["defender-1", "defender-2"] {
            world.add_unit(name, pos(20, 20), &[Part::Attack, Part::Move]);
            world.set_spawning(name, true);
        }

        for name in ["defender-1", "defender-2"] {
            if let EntityLookup::Live(entity) = world.lookup(name) {
                battalion.add_agent(Agent::new(entity, Some(RoleTag::Defender), Vec::new(), 0));
            }
        }

        let ctx = objective_context(&world, &planner, &settings);
        let mut queue = ProductionQueue::new();
        let issued = battalion.reconcile(&ctx, &mut queue);

        assert_eq!(battalion.agents().len(), 2);
        assert!(issued.iter().all(|request| request.role() != RoleTag::Defender));
    }

    #[test]
    fn priority_falls_as_role_fills() {
        let mut world = MockWorld::new();
        defense_with_hostiles(&mut world, 4);
        let planner = MockPlanner::default();
        let settings = Settings::default();
        let ctx = objective_context(&world, &planner, &settings);

        let battalion = Battalion::new(BattalionName::Defense, ObjectiveData::DefendSite(DefendSiteObjective::new()));
        let mut queue = ProductionQueue::new();

        let priorities = battalion
            .reconcile(&ctx, &mut queue)
            .iter()
            .filter(|request| request.role() == RoleTag::Defender)
            .map(|request| request.priority())
            .collect::<Vec<_>>();

        assert_eq!(priorities.len(), 4);
        assert_eq!(priorities[0], SPAWN_PRIORITY_CRITICAL);
        assert!(priorities.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn catalogue_objectives_and_levels() {
        let levels = BattalionLevels::default();

        assert_eq!(BattalionName::Reserve.creation_level(&levels), 0);
        assert_eq!(BattalionName::Supply.creation_level(&levels), levels.supply);
        assert_eq!(
            BattalionName::Harvest.default_objective(3),
            ObjectiveData::ContinuousHarvest(ContinuousHarvestObjective::new())
        );
        assert_eq!(BattalionName::Reserve.default_objective(2), ObjectiveData::for_level(2));
    }
}
