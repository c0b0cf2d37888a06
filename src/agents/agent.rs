use crate::battalions::BattalionName;
use crate::creep::RoleTag;
use crate::features::Settings;
use crate::memorysystem::*;
use crate::tasks::*;
use crate::world::*;
use crate::Tick;
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    /// The live entity is absent. `destroyed` is set when the host confirms
    /// it will never come back.
    #[error("entity {name} not found")]
    EntityNotFound { name: String, destroyed: bool },

    #[error("invalid record for {name}: {reason}")]
    InvalidRecord { name: String, reason: String },
}

/// Persisted state of a mobile unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub role: RoleTag,
    pub battalion: BattalionName,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub idle_ticks: u32,
}

impl AgentRecord {
    pub fn new(role: RoleTag, battalion: BattalionName) -> AgentRecord {
        AgentRecord {
            role,
            battalion,
            tasks: Vec::new(),
            idle_ticks: 0,
        }
    }
}

/// Persisted state of a fixed facility (production facility or tower).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(default)]
    pub battalion: Option<BattalionName>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub idle_ticks: u32,
}

pub fn load_record<T>(store: &dyn RecordStore, path: &RecordPath) -> Result<Option<T>, AgentError>
where
    for<'de> T: Deserialize<'de>,
{
    match store.get(path) {
        Some(record) => serde_json::from_value(record).map(Some).map_err(|err| AgentError::InvalidRecord {
            name: path.name().to_owned(),
            reason: err.to_string(),
        }),
        None => Ok(None),
    }
}

/// What happened during one `Agent::execute` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentTick {
    pub executed: Option<TaskType>,
    pub completed: usize,
    pub discarded: usize,
    pub paused: bool,
    pub idle_warning: bool,
}

/// Owns one live entity's task queue for the duration of a tick.
pub struct Agent {
    name: String,
    role: Option<RoleTag>,
    entity: EntitySnapshot,
    queue: VecDeque<Task>,
    idle_ticks: u32,
}

impl Agent {
    pub fn new(entity: EntitySnapshot, role: Option<RoleTag>, tasks: Vec<Task>, idle_ticks: u32) -> Agent {
        Agent {
            name: entity.name.clone(),
            role,
            entity,
            queue: tasks.into(),
            idle_ticks,
        }
    }

    /// Resolves the live entity behind a persisted name.
    pub fn load(host: &dyn WorldHost, name: &str, role: Option<RoleTag>, tasks: Vec<Task>, idle_ticks: u32) -> Result<Agent, AgentError> {
        match host.lookup(name) {
            EntityLookup::Live(entity) => Ok(Agent::new(entity, role, tasks, idle_ticks)),
            EntityLookup::Pending => Err(AgentError::EntityNotFound {
                name: name.to_owned(),
                destroyed: false,
            }),
            EntityLookup::Gone => Err(AgentError::EntityNotFound {
                name: name.to_owned(),
                destroyed: true,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Option<RoleTag> {
        self.role
    }

    pub fn entity(&self) -> &EntitySnapshot {
        &self.entity
    }

    pub fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.queue.front()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.queue.iter()
    }

    pub fn schedule_task<T: Into<Task>>(&mut self, task: T) {
        self.queue.push_back(task.into());
    }

    /// Puts a task in front of the active one without discarding anything.
    pub fn interject_task<T: Into<Task>>(&mut self, task: T) {
        self.queue.push_front(task.into());
    }

    /// Replaces the active task, or appends when the queue is empty.
    pub fn replace_task<T: Into<Task>>(&mut self, task: T) {
        match self.queue.front_mut() {
            Some(active) => *active = task.into(),
            None => self.queue.push_back(task.into()),
        }
    }

    pub fn clear_tasks(&mut self) {
        self.queue.clear();
    }

    pub fn has_task_scheduled(&self, task_type: TaskType) -> bool {
        self.queue.iter().any(|task| task.task_type() == task_type)
    }

    pub fn scheduled_tasks(&self, task_type: TaskType) -> Vec<&Task> {
        self.queue.iter().filter(|task| task.task_type() == task_type).collect()
    }

    pub fn save(&self) -> Vec<Task> {
        self.queue.iter().cloned().collect()
    }

    /// Fires the active task's interrupt hook for an entity that vanished.
    pub fn interrupt(name: &str, tasks: &[Task], events: &mut Vec<TaskEvent>) {
        if let Some(active) = tasks.first() {
            active.on_interrupt(name, events);
        }
    }

    /// Advances the queue by at most one executed task.
    pub fn execute(&mut self, tick: Tick, host: &mut dyn WorldHost, settings: &Settings, events: &mut Vec<TaskEvent>) -> AgentTick {
        let mut report = AgentTick::default();

        if self.entity.spawning {
            return report;
        }

        let mut ctx = TaskContext {
            tick,
            host,
            entity: &self.entity,
            settings,
            events,
        };

        loop {
            if self.queue.is_empty() {
                self.idle_ticks += 1;

                if settings.idle_warning_interval > 0 && self.idle_ticks % settings.idle_warning_interval == 0 {
                    warn!("{} has been idle for {} ticks", self.name, self.idle_ticks);

                    report.idle_warning = true;
                }

                return report;
            }

            self.idle_ticks = 0;

            while let Some(task) = self.queue.front() {
                if task.can_execute(ctx.entity) {
                    break;
                }

                debug!("Discarding {:?} for {}: cannot execute", task.task_type(), self.name);

                self.queue.pop_front();
                report.discarded += 1;
            }

            let task = match self.queue.front_mut() {
                Some(task) => task,
                None => return report,
            };

            let paused = task.is_paused(tick, settings);

            if task.execution_started() && !paused && task.completed(&ctx) {
                pop_completed(&mut self.queue);
                report.completed += 1;

                if self.queue.is_empty() {
                    return report;
                }

                continue;
            }

            if paused {
                report.paused = true;

                return report;
            }

            if !task.execution_started() {
                task.on_start(&mut ctx);
            }

            task.execute(&mut ctx);
            report.executed = Some(task.task_type());

            if task.completed(&ctx) {
                pop_completed(&mut self.queue);
                report.completed += 1;
            }

            return report;
        }
    }
}

/// Pops the finished front task, handing its continuity state to the next.
fn pop_completed(queue: &mut VecDeque<Task>) {
    if let Some(done) = queue.pop_front() {
        let carried = done.persist_after_completion();

        if let Some(next) = queue.front_mut() {
            next.carry_forward(carried);
        }
    }
}
