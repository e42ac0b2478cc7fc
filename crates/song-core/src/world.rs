//! World-layer services the song engine calls, and `Stage`, an in-memory
//! implementation used by the CLI and the tests.

use std::collections::BTreeMap;

use contracts::{Actor, ActorId, Narration, NarrationKind, Performer, Scenario};

use crate::engine::{SongEngine, StepOutcome};
use crate::rng::RollSource;
use crate::scheduler::{OccupationHost, TurnScheduler};

// ---------------------------------------------------------------------------
// SongWorld
// ---------------------------------------------------------------------------

/// Everything the engine needs from the surrounding simulation.
///
/// Actor ids must come back in the same order every time within a turn so a
/// seeded run replays identically.
pub trait SongWorld {
    fn turn(&self) -> u64;

    fn performer(&self) -> &Performer;
    fn performer_mut(&mut self) -> &mut Performer;

    /// Ids of every actor on the level, in stable registry order.
    fn actor_ids(&self) -> Vec<ActorId>;
    fn actor(&self, actor_id: &str) -> Option<&Actor>;
    fn actor_mut(&mut self, actor_id: &str) -> Option<&mut Actor>;

    fn performer_can_see(&self, actor_id: &str) -> bool;
    fn actor_can_see_performer(&self, actor_id: &str) -> bool;

    /// A level-wide effect that keeps allies from cooperating.
    fn conflict_active(&self) -> bool;

    fn narrate(&mut self, kind: NarrationKind, subject: Option<&str>, text: String);

    /// One unit of practice in the music skill.
    fn credit_practice(&mut self);
    fn exercise_dexterity(&mut self);

    /// Release a swallowed performer.
    fn expel_performer(&mut self);

    fn occupations(&self) -> &dyn OccupationHost;
    fn occupations_mut(&mut self) -> &mut dyn OccupationHost;
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Stage {
    performer: Performer,
    actors: BTreeMap<ActorId, Actor>,
    scheduler: TurnScheduler,
    narration: Vec<Narration>,
    conflict_active: bool,
    next_sequence_in_turn: u64,
}

impl Stage {
    pub fn new(performer: Performer) -> Self {
        Self {
            performer,
            actors: BTreeMap::new(),
            scheduler: TurnScheduler::new(),
            narration: Vec::new(),
            conflict_active: false,
            next_sequence_in_turn: 0,
        }
    }

    pub fn from_scenario(scenario: &Scenario) -> Self {
        let mut stage = Self::new(scenario.performer.clone());
        for actor in &scenario.actors {
            stage.add_actor(actor.clone());
        }
        stage.conflict_active = scenario.conflict_active;
        stage
    }

    /// Add or replace an actor.
    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.insert(actor.actor_id.clone(), actor);
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn set_conflict(&mut self, active: bool) {
        self.conflict_active = active;
    }

    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    /// The performer does something else (or is knocked out): whatever
    /// occupation was running is dropped without telling its owner.
    pub fn interrupt_performer(&mut self) -> bool {
        let actor_id = self.performer.actor_id.clone();
        self.scheduler.interrupt(&actor_id).is_some()
    }

    pub fn narration(&self) -> &[Narration] {
        &self.narration
    }

    pub fn drain_narration(&mut self) -> Vec<Narration> {
        std::mem::take(&mut self.narration)
    }

    /// Close the current turn: tick down paralysis, flee timers and song
    /// friendships, then advance the clock.
    pub fn end_turn(&mut self) -> u64 {
        for actor in self.actors.values_mut() {
            if actor.frozen > 0 {
                actor.frozen -= 1;
                if actor.frozen == 0 {
                    actor.can_move = true;
                }
            }

            if actor.fleeing && actor.flee_timer > 0 {
                actor.flee_timer -= 1;
                if actor.flee_timer == 0 {
                    actor.fleeing = false;
                }
            }

            if actor.song_friend && actor.tameness > 0 {
                actor.tameness -= 1;
                if actor.tameness == 0 {
                    actor.song_friend = false;
                    actor.peaceful = actor.was_peaceful;
                }
            }
        }
        self.next_sequence_in_turn = 0;
        self.scheduler.advance_turn()
    }

    /// Step the engine once and close the turn.
    pub fn play_turn<R: RollSource>(&mut self, engine: &mut SongEngine<R>) -> StepOutcome {
        let outcome = engine.step(self);
        self.end_turn();
        outcome
    }
}

impl SongWorld for Stage {
    fn turn(&self) -> u64 {
        self.scheduler.current_turn()
    }

    fn performer(&self) -> &Performer {
        &self.performer
    }

    fn performer_mut(&mut self) -> &mut Performer {
        &mut self.performer
    }

    fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().cloned().collect()
    }

    fn actor(&self, actor_id: &str) -> Option<&Actor> {
        self.actors.get(actor_id)
    }

    fn actor_mut(&mut self, actor_id: &str) -> Option<&mut Actor> {
        self.actors.get_mut(actor_id)
    }

    fn performer_can_see(&self, actor_id: &str) -> bool {
        !self.performer.status.blind
            && self
                .actors
                .get(actor_id)
                .map_or(false, |actor| actor.sight.performer_sees)
    }

    fn actor_can_see_performer(&self, actor_id: &str) -> bool {
        self.actors
            .get(actor_id)
            .map_or(false, |actor| actor.sight.sees_performer)
    }

    fn conflict_active(&self) -> bool {
        self.conflict_active
    }

    fn narrate(&mut self, kind: NarrationKind, subject: Option<&str>, text: String) {
        let sequence_in_turn = self.next_sequence_in_turn;
        self.next_sequence_in_turn += 1;
        self.narration.push(Narration {
            turn: self.scheduler.current_turn(),
            sequence_in_turn,
            kind,
            subject: subject.map(str::to_string),
            text,
        });
    }

    fn credit_practice(&mut self) {
        self.performer.practice.skill_uses += 1;
    }

    fn exercise_dexterity(&mut self) {
        self.performer.practice.dexterity_exercise += 1;
    }

    fn expel_performer(&mut self) {
        self.performer.swallowed_by = None;
    }

    fn occupations(&self) -> &dyn OccupationHost {
        &self.scheduler
    }

    fn occupations_mut(&mut self) -> &mut dyn OccupationHost {
        &mut self.scheduler
    }
}
