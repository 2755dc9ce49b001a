//! Error types for the tracker core

use thiserror::Error;

use crate::persistence::StorageError;

/// Errors returned by tracker actions
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Rule application without both a player and a rule chosen
    #[error("choose a player and a rule first")]
    MissingSelection,

    /// Season archive requested with no players registered
    #[error("add players before archiving a season")]
    NoPlayers,

    #[error("unknown rule: {0}")]
    UnknownRule(String),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    /// A season with this label is already archived; snapshots are never overwritten
    #[error("season already archived: {0}")]
    SeasonExists(String),

    /// Durable storage rejected a write
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TrackerError>;
