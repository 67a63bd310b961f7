//! Error kinds raised by the boosted-boss subsystem.
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the persistence gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("boosted boss store {} could not be accessed", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("boosted boss store {} holds an unreadable record", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("boosted boss store unavailable: {0}")]
    Unavailable(String),
}

/// Reasons a refresh could not publish a new boosted boss.
///
/// None of these are fatal; the previously published boss stays in place.
#[derive(Debug, Error)]
pub enum BoostError {
    #[error("boosted boss store unavailable")]
    StoreUnavailable(#[from] StoreError),
    #[error("at least two registered bosses are required to rotate (registered {registered})")]
    InsufficientCandidates { registered: usize },
    #[error("boss {name} (race {race_id}) is registered but has no entity definition")]
    StaleRegistryEntry { race_id: u16, name: String },
    #[error("day of month must be between 1 and 31 (got {0})")]
    InvalidDay(u8),
}

impl BoostError {
    /// Race id the failure concerns, when there is one.
    #[must_use]
    pub const fn race_id(&self) -> Option<u16> {
        match self {
            Self::StaleRegistryEntry { race_id, .. } => Some(*race_id),
            _ => None,
        }
    }
}
