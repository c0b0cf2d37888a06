use super::data::*;
use crate::battalions::BattalionName;
use crate::creep::RoleTag;
use crate::features::Settings;
use crate::world::*;
use crate::Tick;
use log::*;
use serde::{Deserialize, Serialize};

/// Everything a task may touch while it runs for one entity on one tick.
pub struct TaskContext<'a> {
    pub tick: Tick,
    pub host: &'a mut dyn WorldHost,
    pub entity: &'a EntitySnapshot,
    pub settings: &'a Settings,
    pub events: &'a mut Vec<TaskEvent>,
}

impl<'a> TaskContext<'a> {
    pub fn room(&self) -> screeps::RoomName {
        self.entity.pos.room_name()
    }
}

/// Notifications raised while tasks run, consumed by the site after the
/// owning battalion finishes.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskEvent {
    Interrupted {
        agent: String,
        task: TaskType,
        target: Option<ObjectKey>,
    },
    Produced {
        name: String,
        role: RoleTag,
        battalion: BattalionName,
    },
}

/// Continuity payload a finished task hands to the next task in its queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarriedState {
    Source(ObjectKey),
    Withdraw(ObjectKey),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    /// Nothing useful to do; sleep for the given number of ticks.
    Backoff(u32),
    Finished,
}

pub trait TaskBehavior {
    /// Short text announced by the entity when the task starts.
    fn label(&self) -> &'static str;

    fn can_execute(&self, entity: &EntitySnapshot) -> bool;

    /// The task only runs on ticks divisible by its cadence.
    fn cadence(&self, _settings: &Settings) -> u32 {
        1
    }

    /// Must not mutate anything; may be evaluated several times per tick.
    fn completed(&self, ctx: &TaskContext) -> bool;

    fn execute(&mut self, ctx: &mut TaskContext, carried: Option<&CarriedState>) -> TaskStatus;

    fn target(&self) -> Option<ObjectKey> {
        None
    }

    fn persist_after_completion(&self) -> Option<CarriedState> {
        None
    }
}

/// A queued unit of work plus its resumable progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    kind: TaskKind,
    #[serde(default)]
    execution_started: bool,
    #[serde(default)]
    paused_until: Option<Tick>,
    #[serde(default)]
    carried_forward: Option<CarriedState>,
    #[serde(default)]
    finished: bool,
}

impl Task {
    pub fn new(kind: TaskKind) -> Task {
        Task {
            kind,
            execution_started: false,
            paused_until: None,
            carried_forward: None,
            finished: false,
        }
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn task_type(&self) -> TaskType {
        self.kind.task_type()
    }

    pub fn execution_started(&self) -> bool {
        self.execution_started
    }

    pub fn paused_until(&self) -> Option<Tick> {
        self.paused_until
    }

    pub fn carried_forward(&self) -> Option<&CarriedState> {
        self.carried_forward.as_ref()
    }

    pub fn carry_forward(&mut self, state: Option<CarriedState>) {
        if state.is_some() {
            self.carried_forward = state;
        }
    }

    pub fn is_paused(&self, tick: Tick, settings: &Settings) -> bool {
        let backing_off = self.paused_until.map(|resume_at| tick < resume_at).unwrap_or(false);
        let cadence = self.kind.as_behavior().cadence(settings).max(1);

        backing_off || tick % cadence != 0
    }

    pub fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        self.kind.as_behavior().can_execute(entity)
    }

    pub fn completed(&self, ctx: &TaskContext) -> bool {
        self.finished || self.kind.as_behavior().completed(ctx)
    }

    /// One-time hook fired before the first execution.
    pub fn on_start(&self, ctx: &mut TaskContext) {
        if ctx.settings.announce_tasks && ctx.entity.is_unit() {
            ctx.host.say(&ctx.entity.name, self.kind.as_behavior().label());
        }
    }

    pub fn execute(&mut self, ctx: &mut TaskContext) {
        self.execution_started = true;

        // Work queued behind other tasks may already be done by the time it fronts the queue.
        if self.kind.as_behavior().completed(ctx) {
            self.finished = true;

            return;
        }

        let status = self.kind.as_behavior_mut().execute(ctx, self.carried_forward.as_ref());

        match status {
            TaskStatus::Continue => {}
            TaskStatus::Backoff(ticks) => {
                self.paused_until = Some(ctx.tick + ticks.max(1));
            }
            TaskStatus::Finished => {
                self.finished = true;
            }
        }
    }

    /// Notifies dependents that the owner vanished while this task was active.
    pub fn on_interrupt(&self, agent: &str, events: &mut Vec<TaskEvent>) {
        if !self.execution_started {
            return;
        }

        debug!("Task {:?} interrupted for {}", self.task_type(), agent);

        events.push(TaskEvent::Interrupted {
            agent: agent.to_owned(),
            task: self.task_type(),
            target: self.kind.as_behavior().target(),
        });
    }

    pub fn persist_after_completion(&self) -> Option<CarriedState> {
        self.kind.as_behavior().persist_after_completion()
    }
}

impl From<TaskKind> for Task {
    fn from(kind: TaskKind) -> Task {
        Task::new(kind)
    }
}
