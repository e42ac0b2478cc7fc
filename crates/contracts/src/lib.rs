//! v1 contracts shared by the song engine, its turn scheduler, and the command-line front end.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod actors;
pub mod music;
pub mod scheduler;
pub mod serde_u64_string;

pub use actors::{
    Actor, Performer, PerformerStatus, Practice, Sightline, SkillRank, SpeciesClass, TraitSet,
};
pub use music::{
    ArtifactId, Blessing, Instrument, InstrumentKind, SongClass, SongDefinition, SongId,
    SongKnowledge, SongMenuEntry, SpellId,
};
pub use scheduler::{OccupationKind, OccupationRecord, OccupationToken};

pub const SCHEMA_VERSION_V1: &str = "1.0";

pub type ActorId = String;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A square on the level map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance, the unit every song radius is expressed in.
    pub fn dist2(self, other: Position) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Narration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NarrationKind {
    /// Second-person line about the performer ("You start playing ...").
    Performer,
    /// Something the performer watches happen to a visible actor.
    Sight,
    /// Something the performer only hears.
    Sound,
    /// An actor speaking aloud.
    Speech,
}

/// One line of fire-and-forget output emitted while a song resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Narration {
    pub turn: u64,
    pub sequence_in_turn: u64,
    pub kind: NarrationKind,
    #[serde(default)]
    pub subject: Option<ActorId>,
    pub text: String,
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NarrationKind::Speech => write!(f, "\"{}\"", self.text),
            _ => f.write_str(&self.text),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

/// Tunables for the song engine. All fields have documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(with = "serde_u64_string", default = "default_seed")]
    pub seed: u64,
    /// Squared distance inside which allies can sing along.
    #[serde(default = "default_chorus_radius_sq")]
    pub chorus_radius_sq: i32,
    /// Upper bound for the sleep (frozen) counter.
    #[serde(default = "default_sleep_cap")]
    pub sleep_cap: i32,
    /// Upper bound for song-granted tameness.
    #[serde(default = "default_friendship_cap")]
    pub friendship_cap: i32,
    /// Upper bound for the courage morale counter.
    #[serde(default = "default_morale_cap")]
    pub morale_cap: i32,
    /// Movement points an ordinary actor gains per turn.
    #[serde(default = "default_normal_speed")]
    pub normal_speed: i32,
    /// 1-in-N odds of the "too hurt to listen" line.
    #[serde(default = "default_hurt_flavor_odds")]
    pub hurt_flavor_odds: u32,
    /// 1-in-N odds of the "cares more about surviving" line.
    #[serde(default = "default_dying_flavor_odds")]
    pub dying_flavor_odds: u32,
    /// 1-in-N odds of the "moves while sleeping" line.
    #[serde(default = "default_sleep_talk_odds")]
    pub sleep_talk_odds: u32,
    /// A frightened peaceful actor stays peaceful with 1-in-N odds.
    #[serde(default = "default_fear_keeps_peace_odds")]
    pub fear_keeps_peace_odds: u32,
    /// Emit the optional descriptive lines ("X sleeps.").
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

fn default_schema_version() -> String { SCHEMA_VERSION_V1.to_string() }
fn default_seed() -> u64 { 1337 }
fn default_chorus_radius_sq() -> i32 { 25 }
fn default_sleep_cap() -> i32 { 127 }
fn default_friendship_cap() -> i32 { 255 }
fn default_morale_cap() -> i32 { 24 }
fn default_normal_speed() -> i32 { 12 }
fn default_hurt_flavor_odds() -> u32 { 10 }
fn default_dying_flavor_odds() -> u32 { 20 }
fn default_sleep_talk_odds() -> u32 { 10 }
fn default_fear_keeps_peace_odds() -> u32 { 10 }
fn default_verbose() -> bool { true }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: default_seed(),
            chorus_radius_sq: default_chorus_radius_sq(),
            sleep_cap: default_sleep_cap(),
            friendship_cap: default_friendship_cap(),
            morale_cap: default_morale_cap(),
            normal_speed: default_normal_speed(),
            hurt_flavor_odds: default_hurt_flavor_odds(),
            dying_flavor_odds: default_dying_flavor_odds(),
            sleep_talk_odds: default_sleep_talk_odds(),
            fear_keeps_peace_odds: default_fear_keeps_peace_odds(),
            verbose: default_verbose(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario documents
// ---------------------------------------------------------------------------

/// Everything needed to stage a performance outside a full simulation: the
/// performer, the instrument in hand, what the performer knows, and the
/// actors currently on the level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default)]
    pub config: EngineConfig,
    pub performer: Performer,
    pub instrument: Instrument,
    #[serde(default)]
    pub knowledge: SongKnowledge,
    #[serde(default)]
    pub actors: Vec<Actor>,
    /// A level-wide effect that stops allies from cooperating.
    #[serde(default)]
    pub conflict_active: bool,
}
