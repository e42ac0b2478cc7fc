//! Songs, instruments, and what a performer knows about them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Songs
// ---------------------------------------------------------------------------

/// The performable songs. "No song" is modelled as `Option<SongId>::None`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SongId {
    Sleep,
    Confusion,
    Slow,
    Fear,
    Tame,
    Courage,
}

impl SongId {
    pub const ALL: [SongId; 6] = [
        SongId::Sleep,
        SongId::Confusion,
        SongId::Slow,
        SongId::Fear,
        SongId::Tame,
        SongId::Courage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SongId::Sleep => "sleep",
            SongId::Confusion => "confusion",
            SongId::Slow => "slow",
            SongId::Fear => "fear",
            SongId::Tame => "tame",
            SongId::Courage => "courage",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|song| song.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The enchantment spell a song is derived from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SpellId {
    Sleep,
    ConfuseMonster,
    SlowMonster,
    CauseFear,
    CharmMonster,
}

/// Which family of resistance modifiers applies to a song.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SongClass {
    /// Calming music (sleep, tame).
    Peaceful,
    /// Music meant to unnerve (fear, confusion).
    Unsettling,
    /// Music that rallies allies (courage).
    Rousing,
    /// No class-specific adjustments.
    Plain,
}

/// Fixed catalog row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SongDefinition {
    pub id: SongId,
    pub name: &'static str,
    pub spell: SpellId,
    /// Enchantment-based songs are known to every bard.
    pub enchantment: bool,
    pub level: i32,
    pub turns: u32,
    pub primary: InstrumentKind,
    pub bonus: InstrumentKind,
    pub class: SongClass,
}

/// One playable row offered to a menu layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongMenuEntry {
    pub song: SongId,
    pub name: String,
    pub level: i32,
    pub turns: u32,
    /// The instrument plays this song better than usual.
    pub bonus: bool,
    pub fail_percent: u8,
}

/// What a performer knows about songs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongKnowledge {
    #[serde(default)]
    pub is_bard: bool,
    #[serde(default)]
    pub known_spells: BTreeSet<SpellId>,
}

impl SongKnowledge {
    pub fn bard() -> Self {
        Self {
            is_bard: true,
            known_spells: BTreeSet::new(),
        }
    }

    pub fn knows(&self, song: &SongDefinition) -> bool {
        (self.is_bard && song.enchantment) || self.known_spells.contains(&song.spell)
    }
}

// ---------------------------------------------------------------------------
// Instruments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    WoodenFlute,
    MagicFlute,
    TooledHorn,
    FrostHorn,
    FireHorn,
    Bugle,
    WoodenHarp,
    MagicHarp,
    LeatherDrum,
    DrumOfEarthquake,
}

impl InstrumentKind {
    pub fn name(self) -> &'static str {
        match self {
            InstrumentKind::WoodenFlute => "wooden flute",
            InstrumentKind::MagicFlute => "magic flute",
            InstrumentKind::TooledHorn => "tooled horn",
            InstrumentKind::FrostHorn => "frost horn",
            InstrumentKind::FireHorn => "fire horn",
            InstrumentKind::Bugle => "bugle",
            InstrumentKind::WoodenHarp => "wooden harp",
            InstrumentKind::MagicHarp => "magic harp",
            InstrumentKind::LeatherDrum => "leather drum",
            InstrumentKind::DrumOfEarthquake => "drum of earthquake",
        }
    }

    /// Instruments played by blowing into them.
    pub fn is_wind(self) -> bool {
        matches!(
            self,
            InstrumentKind::WoodenFlute
                | InstrumentKind::MagicFlute
                | InstrumentKind::TooledHorn
                | InstrumentKind::FrostHorn
                | InstrumentKind::FireHorn
                | InstrumentKind::Bugle
        )
    }

    /// Needs both hands, so a worn shield gets in the way.
    pub fn shield_encumbered(self) -> bool {
        matches!(self, InstrumentKind::WoodenHarp | InstrumentKind::LeatherDrum)
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Blessing {
    Cursed,
    #[default]
    Uncursed,
    Blessed,
}

impl Blessing {
    pub fn sign(self) -> i32 {
        match self {
            Blessing::Cursed => -1,
            Blessing::Uncursed => 0,
            Blessing::Blessed => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactId {
    /// The peace artifact: plays any song, excels at calming ones.
    LyreOfOrpheus,
    Other(String),
}

/// An instrument object. Owned by whoever holds it; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instrument {
    pub object_id: String,
    pub kind: InstrumentKind,
    #[serde(default)]
    pub blessing: Blessing,
    #[serde(default)]
    pub artifact: Option<ArtifactId>,
    #[serde(default)]
    pub charges: i32,
}

impl Instrument {
    pub fn new(object_id: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            object_id: object_id.into(),
            kind,
            blessing: Blessing::Uncursed,
            artifact: None,
            charges: 0,
        }
    }

    pub fn is_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn is_peace_artifact(&self) -> bool {
        matches!(self.artifact, Some(ArtifactId::LyreOfOrpheus))
    }

    pub fn display_name(&self) -> String {
        match &self.artifact {
            Some(ArtifactId::LyreOfOrpheus) => "the Lyre of Orpheus".to_string(),
            Some(ArtifactId::Other(name)) => name.clone(),
            None => format!("your {}", self.kind.name()),
        }
    }
}
