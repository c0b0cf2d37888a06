use super::objectivesystem::*;
use super::utility::*;
use crate::agents::Agent;
use crate::creep::RoleTag;
use crate::findnearest::*;
use crate::tasks::attack::AttackTask;
use crate::tasks::heal::HealTask;
use crate::tasks::reach::ReachTask;
use crate::tasks::repair::RepairTask;
use crate::tasks::*;
use crate::world::*;
use log::*;
use screeps::Position;
use serde::{Deserialize, Serialize};

const MAX_DEFENDERS: usize = 5;
const HOSTILES_PER_HEALER: usize = 3;

/// Holds a garrison near the defense point and engages hostiles once the team
/// is large enough.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DefendSiteObjective {
    #[serde(default)]
    attack_launched: bool,
    #[serde(default)]
    focus: Option<ObjectKey>,
}

fn is_attacker(agent: &Agent) -> bool {
    match agent.role() {
        Some(role) => role == RoleTag::Defender,
        None => agent.entity().capabilities().intersects(Capabilities::COMBAT),
    }
}

fn is_healer(agent: &Agent) -> bool {
    match agent.role() {
        Some(role) => role == RoleTag::Healer,
        None => agent.entity().capabilities().contains(Capabilities::HEAL),
    }
}

impl DefendSiteObjective {
    pub fn new() -> DefendSiteObjective {
        DefendSiteObjective::default()
    }

    pub fn attack_launched(&self) -> bool {
        self.attack_launched
    }

    pub fn focus(&self) -> Option<&ObjectKey> {
        self.focus.as_ref()
    }

    fn garrison_point(ctx: &ObjectiveContext) -> Option<Position> {
        ctx.planner
            .planned_defense_point(ctx.room)
            .or_else(|| ctx.planner.planned_production_anchor(ctx.room))
    }

    fn select_focus(&mut self, hostiles: &[HostileSnapshot], reference: Option<Position>) {
        let current_alive = self
            .focus
            .as_ref()
            .map(|focus| hostiles.iter().any(|hostile| hostile.id == *focus))
            .unwrap_or(false);

        if current_alive {
            return;
        }

        let nearest = match reference {
            Some(reference) => hostiles.iter().find_nearest_linear_by(reference, |hostile| hostile.pos),
            None => hostiles.first(),
        };

        self.focus = nearest.map(|hostile| hostile.id.clone());
    }

    fn engage(&mut self, agents: &mut [Agent]) {
        let leader = agents
            .iter()
            .find(|agent| is_attacker(agent) && !agent.entity().spawning)
            .map(|agent| agent.name().to_owned());

        for agent in agents.iter_mut().filter(|agent| !agent.entity().spawning) {
            if is_attacker(agent) {
                if !agent.has_task_scheduled(TaskType::Attack) {
                    agent.clear_tasks();
                    agent.schedule_task(TaskKind::Attack(AttackTask::new(self.focus.clone())));
                }
            } else if is_healer(agent) && !agent.has_task_scheduled(TaskType::Heal) {
                agent.clear_tasks();
                agent.schedule_task(TaskKind::Heal(HealTask::new(leader.clone())));
            }
        }
    }

    fn regroup(ctx: &ObjectiveContext, agents: &mut [Agent], point: Position) {
        for agent in agents.iter_mut() {
            let engaged = [TaskType::Attack, TaskType::Heal, TaskType::Reach]
                .iter()
                .any(|task_type| agent.has_task_scheduled(*task_type));

            if engaged || agent.entity().spawning {
                continue;
            }

            if agent.entity().pos.get_range_to(point) > ctx.settings.garrison_radius {
                agent.schedule_task(TaskKind::Reach(ReachTask::new(point, ctx.settings.garrison_radius)));
            }
        }
    }

    fn direct_towers(&self, ctx: &ObjectiveContext, facilities: &mut [Agent], hostiles_present: bool) {
        let damaged_friendlies = ctx.host.units(ctx.room).iter().any(|unit| unit.is_damaged() && !unit.spawning);
        let repairs = needs_repair(ctx);

        for tower in facilities.iter_mut().filter(|facility| facility.entity().is_tower()) {
            if hostiles_present {
                if !tower.has_task_scheduled(TaskType::Attack) {
                    tower.clear_tasks();
                    tower.schedule_task(TaskKind::Attack(AttackTask::new(self.focus.clone())));
                }
            } else if !tower.is_idle() {
                continue;
            } else if damaged_friendlies {
                tower.schedule_task(TaskKind::Heal(HealTask::new(None)));
            } else if repairs {
                tower.schedule_task(TaskKind::Repair(RepairTask::new(ctx.settings.repair_threshold)));
            }
        }
    }
}

impl Objective for DefendSiteObjective {
    fn describe(&self) -> String {
        if self.attack_launched {
            "Defend site (engaged)".to_owned()
        } else {
            "Defend site".to_owned()
        }
    }

    fn execute(&mut self, ctx: &ObjectiveContext, agents: &mut [Agent], facilities: &mut [Agent]) {
        let hostiles = ctx.host.hostiles(ctx.room);
        let garrison = Self::garrison_point(ctx);
        let attackers = agents.iter().filter(|agent| is_attacker(agent)).count();
        let healers = agents.iter().filter(|agent| is_healer(agent)).count();

        if hostiles.is_empty() {
            self.focus = None;

            if self.attack_launched && attackers == 0 {
                info!("Defense of {} stood down", ctx.room);

                self.attack_launched = false;
            }
        } else {
            let reference = garrison.or_else(|| agents.iter().find(|agent| is_attacker(agent)).map(|agent| agent.entity().pos));

            self.select_focus(&hostiles, reference);

            if attackers + healers >= ctx.settings.defense_quorum || self.attack_launched {
                if !self.attack_launched {
                    info!(
                        "Launching defense of {} with {} units against {} hostiles",
                        ctx.room,
                        attackers + healers,
                        hostiles.len()
                    );

                    self.attack_launched = true;
                }

                self.engage(agents);
            }
        }

        if let Some(point) = garrison {
            Self::regroup(ctx, agents, point);
        }

        self.direct_towers(ctx, facilities, !hostiles.is_empty());
    }

    fn estimate_required_workforce(&self, ctx: &ObjectiveContext) -> Vec<WorkforceDemand> {
        let hostiles = ctx.host.hostiles(ctx.room).len();

        if hostiles == 0 {
            return Vec::new();
        }

        let defenders = hostiles.max(ctx.settings.defense_quorum.saturating_sub(1)).min(MAX_DEFENDERS);
        let healers = 1 + hostiles / HOSTILES_PER_HEALER;

        vec![
            WorkforceDemand::new(defenders, RoleTag::Defender),
            WorkforceDemand::new(healers, RoleTag::Healer),
        ]
    }
}
