use super::*;

pub(super) fn apply(world: &mut dyn SongWorld, ctx: &EffectContext<'_>, rolls: &mut dyn RollSource) {
    let performer = world.performer().clone();
    let radius = ctx.radius(&performer);
    let per_turn = performer.skill.index().max(1);

    for actor_id in world.actor_ids() {
        let Some(actor) = world.actor(&actor_id) else {
            continue;
        };
        if !actor.is_alive()
            || !within(&performer, actor, radius)
            || !affected_by_peace_song(actor, performer.skill)
        {
            continue;
        }
        let Some(roll) = roll_against(world, &performer, &actor_id, ctx, rolls) else {
            continue;
        };
        if !roll.affected() {
            continue;
        }

        let visible = world.performer_can_see(&actor_id) && ctx.config.verbose;
        let Some(actor) = world.actor_mut(&actor_id) else {
            continue;
        };
        // allies doze off for less time
        let gain = per_turn * if actor.is_tame() { 2 } else { 3 };
        let frozen = (i32::from(actor.frozen) + gain).min(ctx.config.sleep_cap);
        actor.frozen = frozen.clamp(0, i32::from(u8::MAX)) as u8;

        let name = capitalized(&actor.name);
        if actor.can_move {
            actor.can_move = false;
            if visible {
                narrate_about(world, &actor_id, format!("{name} sleeps."));
            }
        } else if visible && rolls.one_in(ctx.config.sleep_talk_odds) {
            narrate_about(world, &actor_id, format!("{name} moves while sleeping."));
        }
    }
}
