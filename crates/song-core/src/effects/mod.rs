//! One applier per song. Each walks the actor registry, rolls resistance for
//! the targets it may touch, and applies its own state change.

mod confusion;
mod courage;
mod fear;
mod slow;
mod sleep;
mod tame;

use contracts::{
    Actor, EngineConfig, Instrument, NarrationKind, Performer, SkillRank, SongDefinition, SongId,
};

use crate::resistance::{resolve, ResistanceRoll, TargetView};
use crate::rng::RollSource;
use crate::world::SongWorld;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The active song as seen by one turn of its applier.
#[derive(Debug, Clone, Copy)]
pub struct EffectContext<'a> {
    pub song: &'a SongDefinition,
    pub instrument: &'a Instrument,
    /// Played on something other than the song's primary instrument.
    pub penalty: bool,
    /// Turns left, counting the current one.
    pub remaining: u32,
    pub chorus_bonus: i32,
    pub config: &'a EngineConfig,
}

impl EffectContext<'_> {
    pub fn first_turn(&self) -> bool {
        self.remaining == self.song.turns
    }

    /// Squared-distance reach of the song.
    pub fn radius(&self, performer: &Performer) -> i32 {
        (performer.skill.index() + 1) * 9 + performer.level / 2
    }
}

pub type Applier = fn(&mut dyn SongWorld, &EffectContext<'_>, &mut dyn RollSource);

pub fn applier_for(song: SongId) -> Applier {
    match song {
        SongId::Sleep => sleep::apply,
        SongId::Confusion => confusion::apply,
        SongId::Slow => slow::apply,
        SongId::Fear => fear::apply,
        SongId::Tame => tame::apply,
        SongId::Courage => courage::apply,
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Upper-case the first letter, for names at the start of a sentence.
pub fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A skilled musician keeps allies out of the song; a novice doesn't.
fn affected_by_song(actor: &Actor, skill: SkillRank) -> bool {
    !actor.is_tame() || skill < SkillRank::Skilled
}

/// As `affected_by_song`, but harp singers are always spared.
fn affected_by_peace_song(actor: &Actor, skill: SkillRank) -> bool {
    !actor.is_tame() || (skill < SkillRank::Skilled && !actor.is_harp_singer())
}

fn within(performer: &Performer, actor: &Actor, radius: i32) -> bool {
    performer.position.dist2(actor.position) < radius
}

/// Roll resistance for one target and narrate its flavor line if it is
/// affected. `None` when the actor has vanished from the registry.
fn roll_against(
    world: &mut dyn SongWorld,
    performer: &Performer,
    actor_id: &str,
    ctx: &EffectContext<'_>,
    rolls: &mut dyn RollSource,
) -> Option<ResistanceRoll> {
    let target = TargetView::capture(world, actor_id)?;
    let roll = resolve(performer, &target, ctx, rolls);
    if roll.affected() {
        if let Some(flavor) = roll.flavor {
            world.narrate(NarrationKind::Sight, Some(actor_id), flavor.line(&target.name));
        }
    }
    Some(roll)
}

fn narrate_about(world: &mut dyn SongWorld, actor_id: &str, text: String) {
    world.narrate(NarrationKind::Sight, Some(actor_id), text);
}

/// Make an actor flee. A zero timer means "until further notice"; an actor
/// already fleeing indefinitely keeps doing so.
fn flee(actor: &mut Actor, timer: u16) -> bool {
    let newly = !actor.fleeing;
    if timer == 0 {
        actor.flee_timer = 0;
    } else if !actor.fleeing || actor.flee_timer > 0 {
        let mut total = u32::from(timer) + u32::from(actor.flee_timer);
        if total == 1 {
            total = 2;
        }
        actor.flee_timer = total.min(127) as u16;
    }
    actor.fleeing = true;
    newly
}

/// Turn a wild actor into an ally. Returns false for untameable actors.
fn tame_actor(actor: &mut Actor) -> bool {
    if actor.traits.untameable {
        return false;
    }
    actor.tameness = if actor.traits.domestic { 10 } else { 5 };
    actor.peaceful = true;
    actor.vengeful = false;
    true
}

#[cfg(test)]
mod tests;
