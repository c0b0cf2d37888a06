use crate::tasks::actions::*;
use crate::tasks::tasksystem::*;
use crate::world::*;
use itertools::*;
use log::*;
use screeps::Position;

/// Something a task can act on this tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub id: ObjectKey,
    pub pos: Position,
}

impl Candidate {
    pub fn new(id: ObjectKey, pos: Position) -> Candidate {
        Candidate { id, pos }
    }
}

/// Orders candidates nearest-first from `origin`, ties by id.
pub fn nearest_first(origin: Position, candidates: impl IntoIterator<Item = Candidate>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .sorted_by(|a, b| {
            origin
                .get_range_to(a.pos)
                .cmp(&origin.get_range_to(b.pos))
                .then_with(|| a.id.cmp(&b.id))
        })
        .collect()
}

/// Acts on the current target, or the first preferred candidate when the
/// current one is gone. A target the host reports invalid is replaced by the
/// next untried candidate, at most `max_retargets` times per tick.
pub fn run_with_retarget<'a, A>(ctx: &mut TaskContext<'a>, target: &mut Option<ObjectKey>, candidates: &[Candidate], mut act: A) -> TaskStatus
where
    A: FnMut(&mut TaskContext<'a>, &Candidate) -> ActionResult,
{
    let mut tried: Vec<&ObjectKey> = Vec::new();

    for _ in 0..=ctx.settings.max_retargets {
        let current = target
            .as_ref()
            .and_then(|id| candidates.iter().find(|c| c.id == *id))
            .filter(|c| !tried.contains(&&c.id))
            .or_else(|| candidates.iter().find(|c| !tried.contains(&&c.id)));

        let current = match current {
            Some(current) => current,
            None => break,
        };

        *target = Some(current.id.clone());

        let result = act(ctx, current);

        match classify(result) {
            ActionOutcome::Done | ActionOutcome::Corrective => return TaskStatus::Continue,
            ActionOutcome::TargetInvalid => {
                debug!("Retargeting {} away from {}: {:?}", ctx.entity.name, current.id, result);

                tried.push(&current.id);
            }
            ActionOutcome::Unexpected => {
                warn!("Unexpected action result for {} on {}: {:?}", ctx.entity.name, current.id, result);

                return TaskStatus::Continue;
            }
        }
    }

    *target = None;

    TaskStatus::Backoff(ctx.settings.retry_backoff)
}
