use super::*;

pub(super) fn apply(world: &mut dyn SongWorld, ctx: &EffectContext<'_>, rolls: &mut dyn RollSource) {
    let performer = world.performer().clone();
    let radius = ctx.radius(&performer);

    for actor_id in world.actor_ids() {
        let Some(actor) = world.actor(&actor_id) else {
            continue;
        };
        if !actor.is_alive() || actor.is_tame() || actor.confused || !within(&performer, actor, radius)
        {
            continue;
        }
        let affected = roll_against(world, &performer, &actor_id, ctx, rolls)
            .map_or(false, |roll| roll.affected());
        if !affected {
            continue;
        }

        let visible = world.performer_can_see(&actor_id);
        let Some(actor) = world.actor_mut(&actor_id) else {
            continue;
        };
        actor.confused = true;
        let name = capitalized(&actor.name);
        if visible {
            narrate_about(world, &actor_id, format!("{name} seems confused."));
        }
    }
}
