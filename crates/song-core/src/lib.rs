//! Song resolution engine: success gating, per-target resistance, the six
//! song effects, and the multi-turn session that drives them.

pub mod catalog;
pub mod chorus;
pub mod effects;
pub mod engine;
pub mod error;
pub mod resistance;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod success;
pub mod world;

pub use catalog::SongCatalog;
pub use chorus::{ally_contribution, scan_chorus, ChorusCache};
pub use effects::EffectContext;
pub use engine::{SongEngine, SongStart, StepOutcome};
pub use error::BeginError;
pub use resistance::{resolve, ResistanceRoll, TargetView};
pub use rng::{RollSource, SongRng};
pub use scheduler::{OccupationHost, TurnScheduler};
pub use session::{mismatch_penalty, ActiveSong, SessionState, SongSession, Tick};
pub use success::compute_success_chance;
pub use world::{SongWorld, Stage};
