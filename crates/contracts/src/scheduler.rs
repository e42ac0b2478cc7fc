//! Occupation contracts between the turn scheduler and multi-turn actions.

use serde::{Deserialize, Serialize};

/// Identifies one registration of a multi-turn occupation. A fresh token is
/// issued every time an occupation is registered, so a stale holder can tell
/// that its occupation was replaced or interrupted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupationToken(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OccupationKind {
    /// A song being performed, stepped once per turn.
    PlaySong,
    /// Anything else that keeps an actor busy across turns.
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccupationRecord {
    pub token: OccupationToken,
    pub kind: OccupationKind,
    pub started_turn: u64,
}
