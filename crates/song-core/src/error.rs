use std::fmt;

use contracts::{InstrumentKind, SongId};

/// Why a performance was refused before any roll was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginError {
    Underwater,
    /// Wind instrument, but the performer's current form cannot blow.
    CannotBlow { kind: InstrumentKind },
    /// Stunned, confused or hallucinating performers can only improvise.
    Impaired,
    IncompatibleInstrument { song: SongId, kind: InstrumentKind },
}

impl fmt::Display for BeginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeginError::Underwater => write!(f, "cannot play music underwater"),
            BeginError::CannotBlow { kind } => write!(f, "incapable of playing the {kind}"),
            BeginError::Impaired => write!(f, "too impaired to play a song, only to improvise"),
            BeginError::IncompatibleInstrument { song, kind } => {
                write!(f, "the {kind} cannot play the {song} song")
            }
        }
    }
}

impl std::error::Error for BeginError {}
