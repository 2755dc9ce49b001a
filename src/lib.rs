//! Commander Tracker - score keeping for Commander game nights
//!
//! Core modules:
//! - `tracker`: Application context and the complete action surface
//! - `players`, `rules`, `history`, `seasons`: The four stored collections
//! - `persistence`: JSON storage backends with default fallback and staged commits
//! - `scoreboard`: Ranked rows for display
//! - `settings`: User preferences
//! - `platform`: Browser/native platform abstraction

pub mod error;
pub mod history;
pub mod ordered;
pub mod persistence;
pub mod platform;
pub mod players;
pub mod rules;
pub mod scoreboard;
pub mod seasons;
pub mod settings;
pub mod tracker;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Result, TrackerError};
pub use history::{GameLog, HistoryEntry};
pub use persistence::{Collection, MemoryBackend, StorageBackend, StorageError, Store};
#[cfg(not(target_arch = "wasm32"))]
pub use persistence::FileBackend;
pub use players::{PlayerRegistry, Registration};
pub use rules::RuleTable;
pub use seasons::{SeasonArchive, SeasonSnapshot};
pub use settings::{LogLevel, Settings};
pub use tracker::{Notice, Tracker};

/// Tracker constants
pub mod consts {
    /// Rules seeded on first run, in display order
    pub const DEFAULT_RULES: [(&str, i64); 8] = [
        ("Win a game", 1),
        ("Sol-Ring Turn One", -1),
        ("Turn longer than 5 min", -1),
        ("Last place", -1),
        ("Monarch for more than 3 Turns", 1),
        ("Killing everyone in the same Turn", -1),
        ("First Blood with combat Dmg", 1),
        ("One shot a player with one creature", -1),
    ];

    /// Date part of season labels (ISO date)
    pub const LABEL_DATE_FORMAT: &str = "%Y-%m-%d";
}
