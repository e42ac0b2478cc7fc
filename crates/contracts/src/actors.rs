//! Performer and target actor state as the song engine sees it.

use serde::{Deserialize, Serialize};

use crate::{ActorId, Position};

// ---------------------------------------------------------------------------
// Performer
// ---------------------------------------------------------------------------

/// Rank in the music discipline, lowest first.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum SkillRank {
    #[default]
    Unskilled,
    Basic,
    Skilled,
    Expert,
}

impl SkillRank {
    pub const ALL: [SkillRank; 4] = [
        SkillRank::Unskilled,
        SkillRank::Basic,
        SkillRank::Skilled,
        SkillRank::Expert,
    ];

    /// Rank counted from the lowest rank as 0.
    pub fn index(self) -> i32 {
        match self {
            SkillRank::Unskilled => 0,
            SkillRank::Basic => 1,
            SkillRank::Skilled => 2,
            SkillRank::Expert => 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PerformerStatus {
    pub blind: bool,
    /// Current form has no voice.
    pub cannot_vocalize: bool,
    /// Current form cannot blow into a wind instrument.
    pub breathless: bool,
    pub underwater: bool,
    pub stunned: bool,
    pub confused: bool,
    pub hallucinating: bool,
    pub wearing_shield: bool,
}

/// Practice credited to the performer by finished songs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Practice {
    pub skill_uses: u32,
    pub dexterity_exercise: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Performer {
    pub actor_id: ActorId,
    #[serde(default)]
    pub position: Position,
    pub level: i32,
    pub hp: i32,
    pub hp_max: i32,
    pub dexterity: i32,
    pub charisma: i32,
    #[serde(default)]
    pub skill: SkillRank,
    #[serde(default)]
    pub status: PerformerStatus,
    /// The engulfing actor, when the performer has been swallowed.
    #[serde(default)]
    pub swallowed_by: Option<ActorId>,
    #[serde(default)]
    pub practice: Practice,
}

impl Performer {
    pub fn new(actor_id: impl Into<ActorId>, level: i32, skill: SkillRank) -> Self {
        Self {
            actor_id: actor_id.into(),
            position: Position::default(),
            level,
            hp: 20,
            hp_max: 20,
            dexterity: 14,
            charisma: 14,
            skill,
            status: PerformerStatus::default(),
            swallowed_by: None,
            practice: Practice::default(),
        }
    }

    pub fn health_below_percent(&self, percent: i32) -> bool {
        below_percent(self.hp, self.hp_max, percent)
    }
}

/// Widened so hit points read from scenario files cannot overflow.
fn below_percent(hp: i32, hp_max: i32, percent: i32) -> bool {
    i64::from(hp) * 100 < i64::from(hp_max) * i64::from(percent)
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Species family, used where a song cares about the kind of creature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesClass {
    Nymph,
    Elf,
    Lich,
    Mummy,
    Vampire,
    Wraith,
    Ghost,
    Demon,
    Orc,
    Ogre,
    Rodent,
    Snake,
    Naga,
    Angel,
    #[default]
    Other,
}

/// Species-derived capability set, computed once per target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TraitSet {
    pub undead: bool,
    pub demon: bool,
    /// Named demon lords and princes.
    pub demon_lord: bool,
    pub animal: bool,
    pub domestic: bool,
    pub mindless: bool,
    pub golem: bool,
    pub likes_magic: bool,
    /// Same race as the performer.
    pub same_race: bool,
    pub always_hostile: bool,
    pub race_peaceful: bool,
    pub race_hostile: bool,
    pub mercenary: bool,
    /// Vortex-like bodies that can be disrupted from inside.
    pub whirly: bool,
    /// Imitations of adventurers; their defense floor is the performer's level.
    pub mimic: bool,
    pub silent: bool,
    pub untameable: bool,
}

/// Who can see whom, as reported by the world layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Sightline {
    pub performer_sees: bool,
    pub sees_performer: bool,
}

impl Default for Sightline {
    fn default() -> Self {
        Self {
            performer_sees: true,
            sees_performer: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Actor {
    pub actor_id: ActorId,
    pub name: String,
    pub position: Position,
    pub level: i32,
    pub hp: i32,
    pub hp_max: i32,
    pub species: SpeciesClass,
    pub traits: TraitSet,
    /// Shares the performer's alignment.
    pub coaligned: bool,
    /// 0 = not tame; otherwise a tameness score.
    pub tameness: u8,
    pub peaceful: bool,
    pub vengeful: bool,
    /// Tameness was granted by a song and decays.
    pub song_friend: bool,
    /// Peacefulness to restore when a song friendship runs out.
    pub was_peaceful: bool,
    pub fleeing: bool,
    /// 0 while fleeing means "no timeout".
    pub flee_timer: u16,
    pub can_move: bool,
    pub sleeping: bool,
    /// Turns left paralysed or asleep.
    pub frozen: u8,
    pub confused: bool,
    /// Magic cancelled; refuses to cooperate.
    pub cancelled: bool,
    pub movement: i32,
    /// Courage counter raised by rousing songs.
    pub morale: i32,
    pub sight: Sightline,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            actor_id: String::new(),
            name: String::new(),
            position: Position::default(),
            level: 1,
            hp: 10,
            hp_max: 10,
            species: SpeciesClass::Other,
            traits: TraitSet::default(),
            coaligned: false,
            tameness: 0,
            peaceful: false,
            vengeful: false,
            song_friend: false,
            was_peaceful: false,
            fleeing: false,
            flee_timer: 0,
            can_move: true,
            sleeping: false,
            frozen: 0,
            confused: false,
            cancelled: false,
            movement: 12,
            morale: 0,
            sight: Sightline::default(),
        }
    }
}

impl Actor {
    pub fn new(actor_id: impl Into<ActorId>, name: impl Into<String>, level: i32) -> Self {
        Self {
            actor_id: actor_id.into(),
            name: name.into(),
            level,
            ..Self::default()
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_tame(&self) -> bool {
        self.tameness > 0
    }

    pub fn health_below_percent(&self, percent: i32) -> bool {
        below_percent(self.hp, self.hp_max, percent)
    }

    /// Elves and nymphs sing along with harps, so skilled musicians spare them.
    pub fn is_harp_singer(&self) -> bool {
        matches!(self.species, SpeciesClass::Nymph | SpeciesClass::Elf)
    }
}
