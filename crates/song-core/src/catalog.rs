//! Static song table and the menu rows derived from it.

use contracts::{
    Instrument, InstrumentKind, Performer, SongClass, SongDefinition, SongId, SongKnowledge,
    SongMenuEntry, SpellId,
};

use crate::success::compute_success_chance;

/// Every performable song. Turns are always `level + 3`.
pub const SONGS: [SongDefinition; 6] = [
    SongDefinition {
        id: SongId::Sleep,
        name: "Lullaby",
        spell: SpellId::Sleep,
        enchantment: true,
        level: 1,
        turns: 4,
        primary: InstrumentKind::WoodenHarp,
        bonus: InstrumentKind::WoodenFlute,
        class: SongClass::Peaceful,
    },
    SongDefinition {
        id: SongId::Confusion,
        name: "Cacophony",
        spell: SpellId::ConfuseMonster,
        enchantment: true,
        level: 2,
        turns: 5,
        primary: InstrumentKind::TooledHorn,
        bonus: InstrumentKind::LeatherDrum,
        class: SongClass::Unsettling,
    },
    SongDefinition {
        id: SongId::Slow,
        name: "Drowsiness",
        spell: SpellId::SlowMonster,
        enchantment: true,
        level: 2,
        turns: 5,
        primary: InstrumentKind::WoodenFlute,
        bonus: InstrumentKind::WoodenHarp,
        class: SongClass::Plain,
    },
    SongDefinition {
        id: SongId::Fear,
        name: "Despair",
        spell: SpellId::CauseFear,
        enchantment: true,
        level: 3,
        turns: 6,
        primary: InstrumentKind::LeatherDrum,
        bonus: InstrumentKind::TooledHorn,
        class: SongClass::Unsettling,
    },
    SongDefinition {
        id: SongId::Tame,
        name: "Friendship",
        spell: SpellId::CharmMonster,
        enchantment: true,
        level: 3,
        turns: 6,
        primary: InstrumentKind::WoodenFlute,
        bonus: InstrumentKind::WoodenHarp,
        class: SongClass::Peaceful,
    },
    SongDefinition {
        id: SongId::Courage,
        name: "Inspire Courage",
        spell: SpellId::CauseFear,
        enchantment: true,
        level: 3,
        turns: 6,
        primary: InstrumentKind::LeatherDrum,
        bonus: InstrumentKind::Bugle,
        class: SongClass::Rousing,
    },
];

pub struct SongCatalog;

impl SongCatalog {
    pub fn song(id: SongId) -> &'static SongDefinition {
        match id {
            SongId::Sleep => &SONGS[0],
            SongId::Confusion => &SONGS[1],
            SongId::Slow => &SONGS[2],
            SongId::Fear => &SONGS[3],
            SongId::Tame => &SONGS[4],
            SongId::Courage => &SONGS[5],
        }
    }

    pub fn songs() -> &'static [SongDefinition] {
        &SONGS
    }

    /// The peace artifact plays anything; other instruments need to be the
    /// song's primary or bonus kind.
    pub fn can_play(instrument: &Instrument, id: SongId) -> bool {
        let song = Self::song(id);
        instrument.is_peace_artifact()
            || instrument.kind == song.primary
            || instrument.kind == song.bonus
    }

    /// Whether the instrument gets the bonus-instrument treatment for a song.
    pub fn is_bonus_pairing(instrument: &Instrument, id: SongId) -> bool {
        if instrument.is_peace_artifact() {
            return matches!(id, SongId::Sleep | SongId::Tame);
        }
        instrument.kind == Self::song(id).bonus
    }

    /// Rows for a song-selection menu: every song the performer knows and
    /// the instrument can play, with its failure percentage.
    pub fn menu(
        instrument: &Instrument,
        knowledge: &SongKnowledge,
        performer: &Performer,
    ) -> Vec<SongMenuEntry> {
        SONGS
            .iter()
            .filter(|song| knowledge.knows(song) && Self::can_play(instrument, song.id))
            .map(|song| {
                let chance = compute_success_chance(song, instrument, performer, true);
                SongMenuEntry {
                    song: song.id,
                    name: song.name.to_string(),
                    level: song.level,
                    turns: song.turns,
                    bonus: Self::is_bonus_pairing(instrument, song.id),
                    fail_percent: 100 - chance,
                }
            })
            .collect()
    }
}
