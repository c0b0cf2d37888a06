use crate::world::ActionResult;

/// How a task reacts to the code returned by a host action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// Expected transient failure. A corrective move was (or will be) issued.
    Corrective,
    /// The target can no longer be acted on; pick another this tick.
    TargetInvalid,
    Unexpected,
}

pub fn classify(result: ActionResult) -> ActionOutcome {
    match result {
        ActionResult::Ok => ActionOutcome::Done,
        ActionResult::Busy | ActionResult::Tired | ActionResult::NotInRange | ActionResult::NoPath => ActionOutcome::Corrective,
        ActionResult::InvalidTarget | ActionResult::NotFound | ActionResult::Full | ActionResult::NotEnough => ActionOutcome::TargetInvalid,
        ActionResult::NotOwner
        | ActionResult::NameExists
        | ActionResult::InvalidArgs
        | ActionResult::NoBodypart
        | ActionResult::RclNotEnough => ActionOutcome::Unexpected,
    }
}
