//! Song engine: gates performances, drives the active song once per turn,
//! and tears it down on completion, interruption or cancellation.

use contracts::{EngineConfig, Instrument, NarrationKind, OccupationKind, SongId, SongKnowledge};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::catalog::SongCatalog;
use crate::chorus::{scan_chorus, ChorusCache};
use crate::effects::{applier_for, capitalized, EffectContext};
use crate::error::BeginError;
use crate::rng::{RollSource, SongRng};
use crate::session::{SongSession, Tick};
use crate::success::compute_success_chance;
use crate::world::SongWorld;

/// Result of a `begin_song` call that passed the preconditions.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SongStart {
    pub song: SongId,
    pub started: bool,
    /// Success chance the attempt was rolled against.
    pub chance: u8,
    pub penalty: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The song plays on next turn.
    Continue,
    /// The last turn was played and practice credited.
    Finished,
    /// No song is in progress.
    Idle,
}

pub struct SongEngine<R: RollSource = SongRng> {
    config: EngineConfig,
    session: SongSession,
    chorus: ChorusCache,
    rolls: R,
}

impl SongEngine<SongRng> {
    pub fn new(config: EngineConfig) -> Self {
        let rolls = SongRng::new(config.seed);
        Self::with_rolls(config, rolls)
    }
}

impl<R: RollSource> SongEngine<R> {
    pub fn with_rolls(config: EngineConfig, rolls: R) -> Self {
        Self {
            config,
            session: SongSession::new(),
            chorus: ChorusCache::new(),
            rolls,
        }
    }

    pub fn session(&self) -> &SongSession {
        &self.session
    }

    /// Try to start `song`. Refusals are errors; a failed skill roll is not.
    pub fn begin_song(
        &mut self,
        world: &mut dyn SongWorld,
        song: SongId,
        instrument: &Instrument,
        knowledge: &SongKnowledge,
    ) -> Result<SongStart, BeginError> {
        if let Err(err) = check_preconditions(world, song, instrument) {
            warn!(%song, instrument = %instrument.kind, error = %err, "performance refused");
            return Err(err);
        }

        // Picking up an instrument ends whatever was playing before.
        self.cancel(world);

        let definition = SongCatalog::song(song);
        let chance = compute_success_chance(
            definition,
            instrument,
            world.performer(),
            knowledge.knows(definition),
        );
        if !self.rolls.percent(i32::from(chance)) {
            info!(%song, chance, "song attempt failed");
            world.narrate(
                NarrationKind::Performer,
                None,
                "What you produce is quite far from music...".into(),
            );
            return Ok(SongStart {
                song,
                started: false,
                chance,
                penalty: false,
            });
        }

        let performer_id = world.performer().actor_id.clone();
        let token = world
            .occupations_mut()
            .register_occupation(&performer_id, OccupationKind::PlaySong);
        let turn = world.turn();
        self.session.start(definition, instrument.clone(), token, turn);
        self.chorus.invalidate();
        let penalty = self.session.active().map_or(false, |active| active.penalty);

        let line = if instrument.is_peace_artifact() {
            format!(
                "{} sings the \"{}\" song!",
                capitalized(&instrument.display_name()),
                definition.name
            )
        } else {
            format!("You play the \"{}\" song...", definition.name)
        };
        world.narrate(NarrationKind::Performer, None, line);
        info!(%song, chance, penalty, turn, "song started");

        Ok(SongStart {
            song,
            started: true,
            chance,
            penalty,
        })
    }

    /// The song in progress, re-checked against the scheduler so that an
    /// interrupted performance reads as idle.
    pub fn active_song(&mut self, world: &dyn SongWorld) -> Option<SongId> {
        let playing = self.session.active().map(|active| active.song);
        let current = self
            .session
            .reconcile(world.occupations(), &world.performer().actor_id);
        if let (Some(song), None) = (playing, current) {
            self.chorus.invalidate();
            info!(%song, "song interrupted");
        }
        current
    }

    /// Chorus bonus for the current turn; 0 while idle.
    pub fn chorus_bonus(&mut self, world: &mut dyn SongWorld) -> i32 {
        let Some(active) = self.session.active() else {
            return 0;
        };
        let instrument = active.instrument.clone();
        let config = &self.config;
        let turn = world.turn();
        self.chorus
            .bonus_for_turn(turn, || scan_chorus(world, &instrument, config))
    }

    /// Play one turn of the active song.
    pub fn step(&mut self, world: &mut dyn SongWorld) -> StepOutcome {
        let Some(song) = self.active_song(world) else {
            return StepOutcome::Idle;
        };
        let Some(active) = self.session.active().cloned() else {
            return StepOutcome::Idle;
        };

        if !SongCatalog::can_play(&active.instrument, song) {
            error!(
                %song,
                instrument = %active.instrument.kind,
                "active song does not match its instrument; dropping it"
            );
            self.cancel(world);
            return StepOutcome::Idle;
        }

        let chorus_bonus = self.chorus_bonus(world);
        let ctx = EffectContext {
            song: SongCatalog::song(song),
            instrument: &active.instrument,
            penalty: active.penalty,
            remaining: active.remaining,
            chorus_bonus,
            config: &self.config,
        };
        applier_for(song)(world, &ctx, &mut self.rolls);

        match self.session.tick() {
            Tick::Continue { .. } => StepOutcome::Continue,
            Tick::Finished => {
                world.credit_practice();
                world.exercise_dexterity();
                world.narrate(NarrationKind::Performer, None, "You finish the song.".into());
                let performer_id = world.performer().actor_id.clone();
                world.occupations_mut().end_occupation(&performer_id, active.token);
                self.chorus.invalidate();
                info!(%song, "song finished");
                StepOutcome::Finished
            }
        }
    }

    /// Stop the song without crediting practice.
    pub fn cancel(&mut self, world: &mut dyn SongWorld) -> Option<SongId> {
        let active = self.session.reset()?;
        let performer_id = world.performer().actor_id.clone();
        world.occupations_mut().end_occupation(&performer_id, active.token);
        self.chorus.invalidate();
        info!(song = %active.song, remaining = active.remaining, "song cancelled");
        Some(active.song)
    }
}

fn check_preconditions(
    world: &dyn SongWorld,
    song: SongId,
    instrument: &Instrument,
) -> Result<(), BeginError> {
    let status = &world.performer().status;
    if status.underwater {
        return Err(BeginError::Underwater);
    }
    if instrument.kind.is_wind() && status.breathless {
        return Err(BeginError::CannotBlow {
            kind: instrument.kind,
        });
    }
    if status.stunned || status.confused || status.hallucinating {
        return Err(BeginError::Impaired);
    }
    if !SongCatalog::can_play(instrument, song) {
        return Err(BeginError::IncompatibleInstrument {
            song,
            kind: instrument.kind,
        });
    }
    Ok(())
}
