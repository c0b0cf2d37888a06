use crate::tasks::tasksystem::*;
use crate::world::*;
use screeps::Position;

/// Requests a move that brings the entity within `range` of `target`. Fixed
/// entities cannot move and report the target as out of range.
pub fn move_into_range(ctx: &mut TaskContext, target: Position, range: u32) -> ActionResult {
    if ctx.entity.pos.in_range_to(target, range) {
        return ActionResult::Ok;
    }

    if !ctx.entity.is_unit() {
        return ActionResult::NotInRange;
    }

    ctx.host.move_to(&ctx.entity.name, target, range)
}

/// Performs `action` when in range, otherwise moves towards the target.
/// Towers act from anywhere in their room.
pub fn act_in_range<F>(ctx: &mut TaskContext, target: Position, range: u32, action: F) -> ActionResult
where
    F: FnOnce(&mut dyn WorldHost, &str) -> ActionResult,
{
    let entity = ctx.entity;

    if entity.is_unit() && !entity.pos.in_range_to(target, range) {
        return move_into_range(ctx, target, range);
    }

    let result = action(&mut *ctx.host, &entity.name);

    if result == ActionResult::NotInRange {
        move_into_range(ctx, target, range);
    }

    result
}
