//! Chance that an attempted song starts at all.
//!
//! Dexterity drives this roll; charisma only matters later, when a started
//! song meets a target.

use contracts::{Blessing, Instrument, Performer, SongDefinition, SongId};

/// Percent chance (0..=100) that the performer manages to start `song`.
///
/// Modifiers apply in a fixed order: base, artifact/bonus ×3/2, low health
/// ÷2, shield ÷2, blind +level, peace artifact off-song ÷2, clamp.
pub fn compute_success_chance(
    song: &SongDefinition,
    instrument: &Instrument,
    performer: &Performer,
    knows_song: bool,
) -> u8 {
    if !knows_song {
        return 0;
    }

    let rank = performer.skill.index() + 1;
    let per_level = if instrument.blessing == Blessing::Blessed { 15 } else { 20 };
    let mut chance = performer.dexterity * 2 * rank + performer.level - song.level * per_level;

    if instrument.is_artifact() || instrument.kind == song.bonus {
        chance = chance * 3 / 2;
    }

    // Hard to keep a tune while badly hurt.
    if performer.health_below_percent(30) {
        chance /= 2;
    }

    if performer.status.wearing_shield && instrument.kind.shield_encumbered() {
        chance /= 2;
    }

    if performer.status.blind {
        chance += performer.level;
    }

    if instrument.is_peace_artifact() && !matches!(song.id, SongId::Sleep | SongId::Tame) {
        chance /= 2;
    }

    chance.clamp(0, 100) as u8
}
