//! The song-in-progress state machine.
//!
//! `Idle → Active → Idle`. A session leaves `Active` either by running out
//! of turns or because the scheduler no longer lists its occupation as the
//! performer's current one; the latter is discovered lazily by `reconcile`.

use contracts::{Instrument, OccupationToken, SongDefinition, SongId};

use crate::scheduler::OccupationHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSong {
    pub song: SongId,
    /// Turns left, counting the one about to be played.
    pub remaining: u32,
    pub instrument: Instrument,
    pub penalty: bool,
    pub token: OccupationToken,
    pub started_turn: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Active(ActiveSong),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue { remaining: u32 },
    Finished,
}

/// Whether playing `song` on `instrument` carries the mismatch penalty.
/// The peace artifact plays the calming songs without one.
pub fn mismatch_penalty(song: &SongDefinition, instrument: &Instrument) -> bool {
    if instrument.is_peace_artifact() && matches!(song.id, SongId::Sleep | SongId::Tame) {
        return false;
    }
    instrument.kind != song.primary
}

#[derive(Debug, Clone, Default)]
pub struct SongSession {
    state: SessionState,
}

impl SongSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActiveSong> {
        match &self.state {
            SessionState::Active(active) => Some(active),
            SessionState::Idle => None,
        }
    }

    /// Enter `Active`. Any session still running is dropped first and
    /// returned to the caller.
    pub fn start(
        &mut self,
        song: &SongDefinition,
        instrument: Instrument,
        token: OccupationToken,
        turn: u64,
    ) -> Option<ActiveSong> {
        let previous = self.reset();
        self.state = SessionState::Active(ActiveSong {
            song: song.id,
            remaining: song.turns.max(1),
            penalty: mismatch_penalty(song, &instrument),
            instrument,
            token,
            started_turn: turn,
        });
        previous
    }

    /// Drop back to `Idle` if the scheduler has moved on from our occupation.
    /// Returns the song still in progress, if any.
    pub fn reconcile(&mut self, host: &dyn OccupationHost, performer_id: &str) -> Option<SongId> {
        let token = self.active()?.token;
        if host.is_current(performer_id, token) {
            return self.active().map(|active| active.song);
        }
        self.reset();
        None
    }

    /// Count one played turn.
    pub fn tick(&mut self) -> Tick {
        let SessionState::Active(active) = &mut self.state else {
            return Tick::Finished;
        };
        active.remaining = active.remaining.saturating_sub(1);
        if active.remaining == 0 {
            self.state = SessionState::Idle;
            Tick::Finished
        } else {
            Tick::Continue {
                remaining: active.remaining,
            }
        }
    }

    pub fn reset(&mut self) -> Option<ActiveSong> {
        match std::mem::take(&mut self.state) {
            SessionState::Active(active) => Some(active),
            SessionState::Idle => None,
        }
    }
}
