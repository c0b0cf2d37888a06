use crate::agents::Agent;
use crate::battalions::BattalionName;
use crate::creep::*;
use crate::tasks::produce::ProduceUnitTask;
use crate::tasks::*;
use log::*;

pub const SPAWN_PRIORITY_CRITICAL: f32 = 100.0;
pub const SPAWN_PRIORITY_HIGH: f32 = 75.0;
pub const SPAWN_PRIORITY_MEDIUM: f32 = 50.0;
pub const SPAWN_PRIORITY_LOW: f32 = 25.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ProductionRequest {
    battalion: BattalionName,
    role: RoleTag,
    priority: f32,
    energy_budget: u32,
}

impl ProductionRequest {
    pub fn new(battalion: BattalionName, role: RoleTag, priority: f32, energy_budget: u32) -> ProductionRequest {
        ProductionRequest {
            battalion,
            role,
            priority,
            energy_budget,
        }
    }

    pub fn battalion(&self) -> BattalionName {
        self.battalion
    }

    pub fn role(&self) -> RoleTag {
        self.role
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn energy_budget(&self) -> u32 {
        self.energy_budget
    }

    /// Cost of the largest body the budget allows, if any fits.
    pub fn cost(&self) -> Option<u32> {
        self.role.create_body(self.energy_budget).map(|body| body_cost(&body))
    }
}

/// Production requests issued during one tick, highest priority first.
/// Requests never outlive the tick they were issued on.
#[derive(Default)]
pub struct ProductionQueue {
    requests: Vec<ProductionRequest>,
}

impl ProductionQueue {
    pub fn new() -> ProductionQueue {
        ProductionQueue::default()
    }

    pub fn request(&mut self, request: ProductionRequest) {
        let pos = self
            .requests
            .binary_search_by(|probe| request.priority.partial_cmp(&probe.priority).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or_else(|e| e);

        self.requests.insert(pos, request);
    }

    pub fn pending_for(&self, battalion: BattalionName, role: RoleTag) -> usize {
        self.requests
            .iter()
            .filter(|request| request.battalion == battalion && request.role == role)
            .count()
    }

    pub fn requests(&self) -> &[ProductionRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Hands requests to free production facilities, first-fit by priority.
    /// A request that can never fit the room's capacity is skipped; one that
    /// does not fit the energy left this tick stops assignment.
    pub fn assign(&self, facilities: &mut [Agent], energy_available: u32, energy_capacity: u32) -> Vec<ProductionRequest> {
        let mut available_energy = energy_available;
        let mut assigned = Vec::new();

        let mut free_facilities = facilities
            .iter_mut()
            .filter(|facility| {
                let entity = facility.entity();

                entity.is_production_facility() && !entity.spawning && !facility.has_task_scheduled(TaskType::ProduceUnit)
            })
            .collect::<Vec<_>>();

        for request in self.requests.iter() {
            let cost = match request.cost() {
                Some(cost) => cost,
                None => {
                    debug!("Skipping {} request for {:?}: no body fits {}", request.role, request.battalion, request.energy_budget);

                    continue;
                }
            };

            if cost > energy_capacity {
                continue;
            }

            if cost > available_energy {
                break;
            }

            if free_facilities.is_empty() {
                break;
            }

            let facility = free_facilities.remove(0);

            facility.interject_task(TaskKind::ProduceUnit(ProduceUnitTask::new(request.role, request.battalion, request.energy_budget)));

            available_energy -= cost;

            assigned.push(request.clone());
        }

        assigned
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn requests_are_ordered_by_priority() {
        let mut queue = ProductionQueue::new();
        queue.request(ProductionRequest::new(BattalionName::Harvest, RoleTag::Harvester, SPAWN_PRIORITY_LOW, 300));
        queue.request(ProductionRequest::new(BattalionName::Defense, RoleTag::Defender, SPAWN_PRIORITY_CRITICAL, 300));
        queue.request(ProductionRequest::new(BattalionName::Logistics, RoleTag::Hauler, SPAWN_PRIORITY_MEDIUM, 300));

        let priorities = queue.requests().iter().map(|r| r.priority()).collect::<Vec<_>>();

        assert_eq!(priorities, vec![SPAWN_PRIORITY_CRITICAL, SPAWN_PRIORITY_MEDIUM, SPAWN_PRIORITY_LOW]);
        assert_eq!(queue.pending_for(BattalionName::Harvest, RoleTag::Harvester), 1);
        assert_eq!(queue.pending_for(BattalionName::Harvest, RoleTag::Hauler), 0);
    }

    #[test]
    fn assignment_skips_oversized_and_stops_when_drained() {
        let mut world = MockWorld::new();
        let spawn_a = world.add_spawn("spawn-a", pos(20, 20));
        let spawn_b = world.add_spawn("spawn-b", pos(22, 20));
        let spawn_c = world.add_spawn("spawn-c", pos(24, 20));
        let mut facilities = vec![
            Agent::new(spawn_a, None, Vec::new(), 0),
            Agent::new(spawn_b, None, Vec::new(), 0),
            Agent::new(spawn_c, None, Vec::new(), 0),
        ];

        let mut queue = ProductionQueue::new();
        // 1300 energy of defender cannot ever fit a 550 capacity room.
        queue.request(ProductionRequest::new(BattalionName::Defense, RoleTag::Defender, SPAWN_PRIORITY_CRITICAL, 1300));
        queue.request(ProductionRequest::new(BattalionName::Reserve, RoleTag::Worker, SPAWN_PRIORITY_HIGH, 400));
        queue.request(ProductionRequest::new(BattalionName::Logistics, RoleTag::Hauler, SPAWN_PRIORITY_MEDIUM, 300));
        queue.request(ProductionRequest::new(BattalionName::Harvest, RoleTag::Harvester, SPAWN_PRIORITY_LOW, 200));

        let assigned = queue.assign(&mut facilities, 500, 550);

        assert_eq!(assigned.iter().map(|r| r.role()).collect::<Vec<_>>(), vec![RoleTag::Worker]);
        assert!(facilities[0].has_task_scheduled(TaskType::ProduceUnit));
        assert!(!facilities[1].has_task_scheduled(TaskType::ProduceUnit));
    }

    #[test]
    fn busy_facilities_are_not_assigned() {
        let mut world = MockWorld::new();
        let mut spawn = world.add_spawn("spawn-a", pos(20, 20));
        spawn.spawning = true;
        let mut facilities = vec![Agent::new(spawn, None, Vec::new(), 0)];

        let mut queue = ProductionQueue::new();
        queue.request(ProductionRequest::new(BattalionName::Reserve, RoleTag::Worker, SPAWN_PRIORITY_HIGH, 300));

        assert!(queue.assign(&mut facilities, 300, 300).is_empty());
    }
}
