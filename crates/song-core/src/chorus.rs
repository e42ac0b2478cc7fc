//! Allies singing along with the performer.
//!
//! Certain species join in when they hear the right instrument: nymphs and
//! elves with harps, undead and demons with the tooled horn, orcs and ogres
//! with drums and bugles. Their contributions add to the song's attack level.

use contracts::{Actor, EngineConfig, Instrument, InstrumentKind, NarrationKind, SpeciesClass};

use crate::effects::capitalized;
use crate::world::SongWorld;

/// Bonus an ally adds to the current song, or 0 if it doesn't join in.
pub fn ally_contribution(ally: &Actor, instrument: &Instrument) -> i32 {
    use SpeciesClass::*;

    match (instrument.kind, ally.species) {
        (InstrumentKind::WoodenHarp | InstrumentKind::MagicHarp, Nymph | Elf)
            if i64::from(ally.hp) * 2 > i64::from(ally.hp_max) =>
        {
            let multiplier = if ally.species == Nymph { 2 } else { 1 };
            (ally.level * multiplier).max(10)
        }
        (InstrumentKind::TooledHorn, Lich | Mummy | Vampire | Wraith | Demon | Ghost) => {
            let multiplier = if matches!(ally.species, Lich | Demon) { 2 } else { 1 };
            (ally.level * multiplier).max(10)
        }
        (InstrumentKind::LeatherDrum | InstrumentKind::Bugle, Orc | Ogre) => ally.level.max(10),
        _ => 0,
    }
}

/// Whether an ally is in a state to join in at all.
fn can_join(world: &dyn SongWorld, ally: &Actor, config: &EngineConfig) -> bool {
    ally.is_alive()
        && ally.is_tame()
        && ally.can_move
        && !ally.sleeping
        && !ally.confused
        && !ally.fleeing
        && !ally.cancelled
        && !world.conflict_active()
        && world.performer().position.dist2(ally.position) <= config.chorus_radius_sq
}

/// Line narrated when an ally joins in.
pub fn chorus_line(ally: &Actor, visible: bool) -> String {
    use SpeciesClass::*;

    let name = capitalized(&ally.name);
    match (ally.species, visible) {
        (Lich | Demon | Vampire, true) => format!("{name}'s dreadful voice chants your song!"),
        (Mummy | Ghost | Wraith, true) => format!("{name} mourns while you play!"),
        (Nymph, true) => format!("{name}'s charming voice sings along!"),
        (Orc | Ogre, true) => format!("{name} shouts!"),
        (_, true) => format!("{name} sings while you play!"),
        (Lich | Demon | Vampire, false) => "You hear a horrible voice chanting your song!".into(),
        (Mummy | Ghost | Wraith, false) => "You hear someone mourning while you play!".into(),
        (Nymph, false) => "You hear a charming voice singing along!".into(),
        (Orc | Ogre, false) => "You hear a shout!".into(),
        (_, false) => "You hear someone singing while you play!".into(),
    }
}

/// Sum the contributions of every ally joining in this turn, narrating each.
pub fn scan_chorus(
    world: &mut dyn SongWorld,
    instrument: &Instrument,
    config: &EngineConfig,
) -> i32 {
    let mut total = 0;
    for actor_id in world.actor_ids() {
        let Some(ally) = world.actor(&actor_id) else {
            continue;
        };
        if !can_join(world, ally, config) {
            continue;
        }
        let bonus = ally_contribution(ally, instrument);
        if bonus == 0 {
            continue;
        }
        let visible = world.performer_can_see(&actor_id);
        let line = chorus_line(ally, visible);
        let kind = if visible {
            NarrationKind::Sight
        } else {
            NarrationKind::Sound
        };
        world.narrate(kind, Some(&actor_id), line);
        total += bonus;
    }
    total
}

// ---------------------------------------------------------------------------
// Per-turn memo
// ---------------------------------------------------------------------------

/// Chorus total, computed at most once per turn number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChorusCache {
    computed_for: Option<u64>,
    bonus: i32,
}

impl ChorusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached total for `turn`, running `scan` only when the turn
    /// has not been computed yet.
    pub fn bonus_for_turn(&mut self, turn: u64, scan: impl FnOnce() -> i32) -> i32 {
        if self.computed_for != Some(turn) {
            self.bonus = scan();
            self.computed_for = Some(turn);
        }
        self.bonus
    }

    pub fn computed_for(&self) -> Option<u64> {
        self.computed_for
    }

    pub fn invalidate(&mut self) {
        self.computed_for = None;
        self.bonus = 0;
    }
}
