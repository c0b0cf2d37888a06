use crate::agents::*;
use crate::battalions::*;
use crate::creep::RoleTag;
use crate::error::EngineError;
use crate::features::Settings;
use crate::memorysystem::*;
use crate::objectives::ObjectiveData;
use crate::spawnsystem::*;
use crate::tasks::construction::PlaceConstructionSitesTask;
use crate::tasks::*;
use crate::world::*;
use crate::Tick;
use log::*;
use screeps::RoomName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const SITE_RECORD_NAME: &str = "state";

/// Structural level watermark used to detect transitions between ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub level: u8,
}

/// Everything the engine controls at one room, rebuilt from records every tick.
pub struct Colony {
    room: RoomName,
    level: u8,
    previous_level: Option<u8>,
    battalions: BTreeMap<BattalionName, Battalion>,
    production: Vec<Agent>,
    unassigned: Vec<Agent>,
    produced: Vec<(String, AgentRecord)>,
    removed: Vec<RecordPath>,
}

impl Colony {
    fn site(&self) -> String {
        self.room.to_string()
    }

    pub fn room(&self) -> RoomName {
        self.room
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn battalion(&self, name: BattalionName) -> Option<&Battalion> {
        self.battalions.get(&name)
    }

    pub fn battalions(&self) -> impl Iterator<Item = &Battalion> {
        self.battalions.values()
    }

    pub fn production_facilities(&self) -> &[Agent] {
        &self.production
    }

    pub fn unassigned_facilities(&self) -> &[Agent] {
        &self.unassigned
    }

    pub fn reload(store: &dyn RecordStore, host: &dyn WorldHost, room: RoomName, settings: &Settings) -> Result<Colony, EngineError> {
        let controller = host.controller(room).ok_or(EngineError::MissingController { room })?;
        let site = room.to_string();

        let previous_level = match load_record::<SiteRecord>(store, &RecordPath::new(SITE_CATEGORY, site.as_str(), SITE_RECORD_NAME)) {
            Ok(record) => record.map(|record| record.level),
            Err(err) => {
                error!("Discarding site record for {}: {}", room, err);

                None
            }
        };

        let mut colony = Colony {
            room,
            level: controller.level,
            previous_level,
            battalions: BTreeMap::new(),
            production: Vec::new(),
            unassigned: Vec::new(),
            produced: Vec::new(),
            removed: Vec::new(),
        };

        colony.load_battalions(store, settings);
        colony.load_agents(store, host);
        colony.load_facilities(store, host);

        Ok(colony)
    }

    fn load_battalions(&mut self, store: &dyn RecordStore, settings: &Settings) {
        let site = self.site();

        for name in BattalionName::ALL.iter().copied() {
            let path = RecordPath::new(BATTALION_CATEGORY, site.as_str(), name.label());

            let objective = match load_record::<BattalionRecord>(store, &path) {
                Ok(Some(record)) => record.objective,
                Ok(None) => {
                    if self.level < name.creation_level(&settings.battalion_levels) {
                        continue;
                    }

                    info!("Forming {} battalion at {}", name, self.room);

                    name.default_objective(self.level)
                }
                Err(err) => {
                    error!("Corrupt {} battalion record at {}, restarting its objective: {}", name, self.room, err);

                    name.default_objective(self.level)
                }
            };

            self.battalions.insert(name, Battalion::new(name, objective));
        }
    }

    fn load_agents(&mut self, store: &dyn RecordStore, host: &dyn WorldHost) {
        let site = self.site();
        let mut events = Vec::new();

        // Every unit recorded by any site, so a visitor is never adopted twice.
        let recorded: HashSet<String> = store
            .paths()
            .into_iter()
            .filter(|path| path.category() == AGENT_CATEGORY)
            .map(|path| path.name().to_owned())
            .collect();

        for name in store.names(AGENT_CATEGORY, &site) {
            let path = RecordPath::new(AGENT_CATEGORY, site.as_str(), name.as_str());

            let record = match load_record::<AgentRecord>(store, &path) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(err) => {
                    error!("Corrupt agent record: {}", err);

                    if let EntityLookup::Live(entity) = host.lookup(&name) {
                        self.adopt(entity);
                    }

                    continue;
                }
            };

            let battalion_name = if self.battalions.contains_key(&record.battalion) {
                record.battalion
            } else {
                warn!("{} belongs to missing {} battalion, moving to reserve", name, record.battalion);

                BattalionName::Reserve
            };

            match Agent::load(host, &name, Some(record.role), record.tasks.clone(), record.idle_ticks) {
                Ok(agent) => {
                    if let Some(battalion) = self.battalions.get_mut(&battalion_name) {
                        battalion.add_agent(agent);
                    }
                }
                Err(AgentError::EntityNotFound { destroyed: false, .. }) => {
                    info!("{} not observable this tick, keeping its record", name);

                    if let Some(battalion) = self.battalions.get_mut(&battalion_name) {
                        battalion.enroll(&name);
                    }
                }
                Err(AgentError::EntityNotFound { destroyed: true, .. }) => {
                    info!("{} destroyed, removing its record", name);

                    Agent::interrupt(&name, &record.tasks, &mut events);

                    if let Some(battalion) = self.battalions.get_mut(&battalion_name) {
                        for event in events.drain(..) {
                            battalion.handle_event(&event);
                        }
                    }

                    self.removed.push(path);
                }
                Err(err) => {
                    error!("Failed to load agent {}: {}", name, err);
                }
            }
        }

        for unit in host.units(self.room) {
            if !recorded.contains(&unit.name) {
                self.adopt(unit);
            }
        }
    }

    fn adopt(&mut self, entity: EntitySnapshot) {
        let role = RoleTag::infer(entity.capabilities());

        info!("Adopting {} into the reserve as {}", entity.name, role);

        if let Some(reserve) = self.battalions.get_mut(&BattalionName::Reserve) {
            reserve.add_agent(Agent::new(entity, Some(role), Vec::new(), 0));
        }
    }

    fn load_facilities(&mut self, store: &dyn RecordStore, host: &dyn WorldHost) {
        let site = self.site();
        let mut events = Vec::new();
        let mut seen = HashSet::new();

        for entity in host.facilities(self.room) {
            let path = RecordPath::new(FACILITY_CATEGORY, site.as_str(), entity.name.as_str());

            let record = load_record::<FacilityRecord>(store, &path)
                .unwrap_or_else(|err| {
                    error!("Corrupt facility record: {}", err);

                    None
                })
                .unwrap_or_default();

            seen.insert(entity.name.clone());

            let facility = Agent::new(entity, None, record.tasks, record.idle_ticks);

            if facility.entity().is_production_facility() {
                self.production.push(facility);

                continue;
            }

            let assigned = record
                .battalion
                .filter(|name| self.battalions.contains_key(name))
                .or_else(|| Some(BattalionName::Defense).filter(|name| self.battalions.contains_key(name)));

            match assigned.and_then(|name| self.battalions.get_mut(&name)) {
                Some(battalion) => battalion.add_facility(facility),
                None => {
                    warn!("No battalion for facility {}, leaving it unassigned", facility.name());

                    self.unassigned.push(facility);
                }
            }
        }

        for name in store.names(FACILITY_CATEGORY, &site) {
            if seen.contains(&name) {
                continue;
            }

            if let EntityLookup::Gone = host.lookup(&name) {
                let path = RecordPath::new(FACILITY_CATEGORY, site.as_str(), name.as_str());

                match load_record::<FacilityRecord>(store, &path) {
                    Ok(Some(record)) => Agent::interrupt(&name, &record.tasks, &mut events),
                    Ok(None) => {}
                    Err(err) => error!("Corrupt record for destroyed facility {}: {}", name, err),
                }

                info!("Facility {} destroyed, removing its record", name);

                self.removed.push(path);
            }
        }

        for event in events.iter() {
            self.dispatch_event(event);
        }
    }

    /// Swaps the reserve strategy wholesale when the structural level moved.
    pub fn transition_objectives(&mut self) {
        let previous = match self.previous_level {
            Some(previous) if previous != self.level => previous,
            _ => return,
        };

        if let Some(reserve) = self.battalions.get_mut(&BattalionName::Reserve) {
            let objective = ObjectiveData::for_level(self.level);

            info!(
                "{} moved from level {} to {}: reserve now {}",
                self.room,
                previous,
                self.level,
                objective.as_objective().describe()
            );

            reserve.set_objective(objective);
        }

        self.previous_level = Some(self.level);
    }

    fn dispatch_event(&mut self, event: &TaskEvent) {
        match event {
            TaskEvent::Interrupted { agent, .. } => {
                if let Some(battalion) = self.battalions.values_mut().find(|battalion| battalion.roster().iter().any(|name| name == agent)) {
                    battalion.handle_event(event);
                }
            }
            TaskEvent::Produced { name, role, battalion } => {
                info!("{} produced for the {} battalion as {}", name, battalion, role);

                self.produced.push((name.clone(), AgentRecord::new(*role, *battalion)));
            }
        }
    }

    /// Hands newly planned construction to the first production facility.
    fn plan_construction(&mut self, host: &dyn WorldHost, planner: &dyn LayoutPlanner, settings: &Settings) {
        let facility = match self.production.first_mut() {
            Some(facility) => facility,
            None => return,
        };

        if facility.has_task_scheduled(TaskType::PlaceConstructionSites) {
            return;
        }

        let structures = host.structures(self.room);
        let sites = host.construction_sites(self.room);

        let missing = planner
            .planned_construction(self.room, self.level)
            .into_iter()
            .filter(|planned| {
                !structures.iter().any(|s| s.pos == planned.pos && s.kind == planned.kind) && !sites.iter().any(|s| s.pos == planned.pos)
            })
            .take(settings.max_sites_per_plan)
            .collect::<Vec<_>>();

        if missing.is_empty() {
            return;
        }

        debug!("Planning {} construction sites at {}", missing.len(), self.room);

        facility.schedule_task(TaskKind::PlaceConstructionSites(PlaceConstructionSitesTask::new(missing)));
    }

    /// Runs one tick: planning, battalions, shared facilities, then production.
    pub fn execute(&mut self, tick: Tick, host: &mut dyn WorldHost, planner: &dyn LayoutPlanner, settings: &Settings) -> Vec<ProductionRequest> {
        if settings.construction_cadence > 0 && tick % settings.construction_cadence == 0 {
            self.plan_construction(&*host, planner, settings);
        }

        let ctx = BattalionContext {
            tick,
            room: self.room,
            level: self.level,
            planner,
            settings,
        };

        let mut queue = ProductionQueue::new();
        let mut events = Vec::new();

        for battalion in self.battalions.values_mut() {
            battalion.execute(&ctx, host, &mut queue, &mut events);
        }

        for facility in self
            .battalions
            .values_mut()
            .flat_map(|battalion| battalion.facilities_mut().iter_mut())
            .chain(self.unassigned.iter_mut())
        {
            facility.execute(tick, host, settings, &mut events);
        }

        let assigned = queue.assign(&mut self.production, host.energy_available(self.room), host.energy_capacity(self.room));

        if !queue.is_empty() {
            debug!("{} of {} production requests assigned at {}", assigned.len(), queue.len(), self.room);
        }

        for facility in self.production.iter_mut() {
            facility.execute(tick, host, settings, &mut events);
        }

        for event in events.iter() {
            self.dispatch_event(event);
        }

        assigned
    }

    pub fn save(&self, store: &mut dyn RecordStore) -> Result<(), EngineError> {
        let site = self.site();

        store.put(
            &RecordPath::new(SITE_CATEGORY, site.as_str(), SITE_RECORD_NAME),
            serde_json::to_value(SiteRecord { level: self.level })?,
        );

        for battalion in self.battalions.values() {
            store.put(
                &RecordPath::new(BATTALION_CATEGORY, site.as_str(), battalion.name().label()),
                serde_json::to_value(battalion.record())?,
            );

            for agent in battalion.agents() {
                let record = AgentRecord {
                    role: agent.role().unwrap_or_else(|| RoleTag::infer(agent.entity().capabilities())),
                    battalion: battalion.name(),
                    tasks: agent.save(),
                    idle_ticks: agent.idle_ticks(),
                };

                store.put(&RecordPath::new(AGENT_CATEGORY, site.as_str(), agent.name()), serde_json::to_value(record)?);
            }

            for facility in battalion.facilities() {
                save_facility(store, &site, facility, Some(battalion.name()))?;
            }
        }

        for facility in self.production.iter().chain(self.unassigned.iter()) {
            save_facility(store, &site, facility, None)?;
        }

        for (name, record) in self.produced.iter() {
            let path = RecordPath::new(AGENT_CATEGORY, site.as_str(), name.as_str());

            if store.get(&path).is_none() {
                store.put(&path, serde_json::to_value(record)?);
            }
        }

        for path in self.removed.iter() {
            store.remove(path);
        }

        Ok(())
    }
}

fn save_facility(store: &mut dyn RecordStore, site: &str, facility: &Agent, battalion: Option<BattalionName>) -> Result<(), EngineError> {
    let record = FacilityRecord {
        battalion,
        tasks: facility.save(),
        idle_ticks: facility.idle_ticks(),
    };

    store.put(&RecordPath::new(FACILITY_CATEGORY, site, facility.name()), serde_json::to_value(record)?);

    Ok(())
}
