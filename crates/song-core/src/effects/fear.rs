use super::*;
use contracts::SpeciesClass;

const DEMON_LORD_TAUNT: &str = "Thou playest thy own funeral march, weakling!";

pub(super) fn apply(world: &mut dyn SongWorld, ctx: &EffectContext<'_>, rolls: &mut dyn RollSource) {
    let performer = world.performer().clone();
    let radius = ctx.radius(&performer);
    let hallucinating = performer.status.hallucinating;
    let flee_timer = (performer.skill.index().min(1) * 3) as u16;

    for actor_id in world.actor_ids() {
        let Some(actor) = world.actor(&actor_id) else {
            continue;
        };
        if !actor.is_alive()
            || !within(&performer, actor, radius)
            || !affected_by_song(actor, performer.skill)
        {
            continue;
        }
        let traits = actor.traits.clone();
        let lich = actor.species == SpeciesClass::Lich;
        let name = capitalized(&actor.name);
        let Some(roll) = roll_against(world, &performer, &actor_id, ctx, rolls) else {
            continue;
        };

        if traits.demon_lord {
            defy(world, &actor_id, &name);
            continue;
        }
        if !roll.affected() {
            continue;
        }

        let visible = world.performer_can_see(&actor_id);
        if traits.undead || traits.demon {
            // a small chance to win them over, scaled down by song length
            let chance = roll.margin / ctx.song.turns.max(1) as i32;
            if rolls.percent(chance) {
                let line = if traits.undead && hallucinating {
                    format!("{name} starts to choreograph a dance!")
                } else if traits.undead && !lich {
                    format!("{name} groans in the rhythm of your music.")
                } else {
                    format!("{name} makes a sinister grin in approval of your music.")
                };
                pacify(world, &actor_id, visible.then_some(line));
            } else {
                let sense = if hallucinating { "smell" } else { "hear" };
                let line = format!("{name} stops to {sense} your music for a moment.");
                startle(world, &actor_id, (visible && ctx.first_turn()).then_some(line));
            }
            continue;
        }

        let Some(actor) = world.actor_mut(&actor_id) else {
            continue;
        };
        let newly = flee(actor, flee_timer);
        let was_peaceful = actor.peaceful;
        if newly && actor.frozen == 0 && visible {
            narrate_about(world, &actor_id, format!("{name} turns to flee!"));
        }
        if was_peaceful && !rolls.one_in(ctx.config.fear_keeps_peace_odds) {
            if let Some(actor) = world.actor_mut(&actor_id) {
                actor.peaceful = false;
            }
        }
    }
}

/// Demon lords are never won over; the song only makes them angry.
fn defy(world: &mut dyn SongWorld, actor_id: &str, name: &str) {
    let Some(actor) = world.actor_mut(actor_id) else {
        return;
    };
    let taunts = actor.peaceful || !actor.vengeful;
    actor.peaceful = false;
    actor.vengeful = true;
    if taunts {
        narrate_about(world, actor_id, format!("{name} laughs fiendishly!"));
        world.narrate(
            NarrationKind::Speech,
            Some(actor_id),
            DEMON_LORD_TAUNT.to_string(),
        );
    }
}

fn pacify(world: &mut dyn SongWorld, actor_id: &str, line: Option<String>) {
    let Some(actor) = world.actor_mut(actor_id) else {
        return;
    };
    actor.peaceful = true;
    actor.vengeful = false;
    if let Some(line) = line {
        narrate_about(world, actor_id, line);
    }
}

/// The target loses its turn listening.
fn startle(world: &mut dyn SongWorld, actor_id: &str, line: Option<String>) {
    let Some(actor) = world.actor_mut(actor_id) else {
        return;
    };
    actor.movement = 0;
    if let Some(line) = line {
        narrate_about(world, actor_id, line);
    }
}
