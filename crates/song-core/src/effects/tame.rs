use super::*;

pub(super) fn apply(world: &mut dyn SongWorld, ctx: &EffectContext<'_>, rolls: &mut dyn RollSource) {
    let performer = world.performer().clone();
    let growth = performer.skill.index().max(1) * 2;

    // From inside a swallower only the swallower can hear the song.
    if let Some(swallower) = performer.swallowed_by.as_deref() {
        let affected = roll_against(world, &performer, swallower, ctx, rolls)
            .map_or(false, |roll| roll.affected());
        if affected {
            charm_swallower(world, swallower);
        }
        return;
    }

    let radius = ctx.radius(&performer);
    for actor_id in world.actor_ids() {
        let Some(actor) = world.actor(&actor_id) else {
            continue;
        };
        if !actor.is_alive() || performer.position.dist2(actor.position) > radius {
            continue;
        }
        let affected = roll_against(world, &performer, &actor_id, ctx, rolls)
            .map_or(false, |roll| roll.affected());
        if !affected {
            continue;
        }
        if let Some(actor) = world.actor_mut(&actor_id) {
            actor.fleeing = false;
            actor.flee_timer = 0;
        }
        befriend(world, &actor_id, growth, ctx);
    }
}

/// Tame the engulfing actor outright, at base tameness and without a greeting.
fn charm_swallower(world: &mut dyn SongWorld, actor_id: &str) {
    let Some(actor) = world.actor_mut(actor_id) else {
        return;
    };
    if !actor.is_tame() && !tame_actor(actor) {
        return;
    }
    actor.song_friend = true;
}

/// Make the target a song friend, or deepen an existing song friendship.
/// Allies tamed by other means are left alone.
fn befriend(world: &mut dyn SongWorld, actor_id: &str, growth: i32, ctx: &EffectContext<'_>) {
    let visible = world.performer_can_see(actor_id) && ctx.config.verbose;
    let Some(actor) = world.actor_mut(actor_id) else {
        return;
    };
    if actor.is_tame() && !actor.song_friend {
        return;
    }

    let mut greeted = None;
    if !actor.is_tame() {
        let was_peaceful = actor.peaceful;
        if !tame_actor(actor) {
            return;
        }
        actor.was_peaceful = was_peaceful;
        if visible && !actor.sleeping {
            greeted = Some(format!("{} seems to like your song.", capitalized(&actor.name)));
        }
    }

    actor.song_friend = true;
    let tameness = (i32::from(actor.tameness) + growth).min(ctx.config.friendship_cap);
    actor.tameness = tameness.clamp(0, i32::from(u8::MAX)) as u8;

    if let Some(line) = greeted {
        narrate_about(world, actor_id, line);
    }
}
