use super::*;

fn shorten_flight(actor: &mut Actor, skill: SkillRank) {
    actor.flee_timer = match skill {
        SkillRank::Unskilled | SkillRank::Basic => actor.flee_timer / 2,
        SkillRank::Skilled => actor.flee_timer / 4,
        SkillRank::Expert => 0,
    };
}

fn mood(morale: i32, cap: i32, hallucinating: bool) -> &'static str {
    match (morale >= cap, morale > cap / 2, hallucinating) {
        (true, _, false) => "berserk",
        (true, _, true) => "way cool",
        (false, true, false) => "wilder",
        (false, true, true) => "cooler",
        (false, false, false) => "wild",
        (false, false, true) => "cool",
    }
}

pub(super) fn apply(world: &mut dyn SongWorld, ctx: &EffectContext<'_>, rolls: &mut dyn RollSource) {
    let performer = world.performer().clone();
    let radius = ctx.radius(&performer);
    let cap = ctx.config.morale_cap;
    let boost = (performer.skill.index() + 1) * 6;

    for actor_id in world.actor_ids() {
        let Some(actor) = world.actor(&actor_id) else {
            continue;
        };
        if !actor.is_alive() || !actor.is_tame() || !within(&performer, actor, radius) {
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
        if actor.morale < cap {
            actor.morale = (actor.morale + boost).min(cap);
        }
        if actor.fleeing {
            shorten_flight(actor, performer.skill);
        }
        if visible {
            let line = format!(
                "{} looks {}!",
                capitalized(&actor.name),
                mood(actor.morale, cap, performer.status.hallucinating)
            );
            narrate_about(world, &actor_id, line);
        }
    }
}
