//! Turn clock and occupation registry.
//!
//! The `TurnScheduler` owns the world turn counter and records, per actor,
//! which multi-turn occupation (if any) is currently in charge of that actor.
//! Anything that interrupts an actor simply clears its occupation; the
//! occupation's owner finds out by comparing tokens on its next query.

use std::collections::BTreeMap;

use contracts::{OccupationKind, OccupationRecord, OccupationToken};
use tracing::debug;

// ---------------------------------------------------------------------------
// OccupationHost
// ---------------------------------------------------------------------------

/// Registration and query of repeating per-turn occupations.
pub trait OccupationHost {
    /// Register a new occupation for an actor, replacing whatever it was doing.
    fn register_occupation(
        &mut self,
        actor_id: &str,
        kind: OccupationKind,
    ) -> OccupationToken;

    /// The occupation currently in charge of the actor.
    fn current_occupation(&self, actor_id: &str) -> Option<OccupationRecord>;

    /// End an occupation. A token that is no longer current is ignored.
    fn end_occupation(&mut self, actor_id: &str, token: OccupationToken);

    /// Whether `token` is still the actor's active occupation.
    fn is_current(&self, actor_id: &str, token: OccupationToken) -> bool {
        self.current_occupation(actor_id)
            .map_or(false, |record| record.token == token)
    }
}

// ---------------------------------------------------------------------------
// TurnScheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TurnScheduler {
    current_turn: u64,
    next_token: u64,
    /// Actor id → occupation in progress.
    occupations: BTreeMap<String, OccupationRecord>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current world turn.
    pub fn current_turn(&self) -> u64 {
        self.current_turn
    }

    /// Move to the next turn and return it.
    pub fn advance_turn(&mut self) -> u64 {
        self.current_turn = self.current_turn.saturating_add(1);
        self.current_turn
    }

    /// Advance the clock to the given turn (if it's in the future).
    pub fn advance_clock(&mut self, turn: u64) {
        if turn > self.current_turn {
            self.current_turn = turn;
        }
    }

    /// Drop the actor's occupation, whatever it is. Returns what was cleared.
    pub fn interrupt(&mut self, actor_id: &str) -> Option<OccupationRecord> {
        let cleared = self.occupations.remove(actor_id);
        if let Some(record) = &cleared {
            debug!(actor_id, token = record.token.0, turn = self.current_turn, "occupation interrupted");
        }
        cleared
    }

    /// Check if an actor is currently busy with a multi-turn occupation.
    pub fn is_occupied(&self, actor_id: &str) -> bool {
        self.occupations.contains_key(actor_id)
    }

    /// Number of actors with an occupation in progress.
    pub fn occupied_count(&self) -> usize {
        self.occupations.len()
    }
}

impl OccupationHost for TurnScheduler {
    fn register_occupation(
        &mut self,
        actor_id: &str,
        kind: OccupationKind,
    ) -> OccupationToken {
        self.next_token = self.next_token.saturating_add(1);
        let token = OccupationToken(self.next_token);
        debug!(actor_id, token = token.0, ?kind, turn = self.current_turn, "occupation registered");
        self.occupations.insert(
            actor_id.to_string(),
            OccupationRecord {
                token,
                kind,
                started_turn: self.current_turn,
            },
        );
        token
    }

    fn current_occupation(&self, actor_id: &str) -> Option<OccupationRecord> {
        self.occupations.get(actor_id).copied()
    }

    fn end_occupation(&mut self, actor_id: &str, token: OccupationToken) {
        if self.is_current(actor_id, token) {
            self.occupations.remove(actor_id);
        }
    }
}
