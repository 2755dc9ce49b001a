//! Game log: rendered rule applications, newest first

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::persistence::{Collection, Stored};

/// One log line, `"<player> -> <rule> (<points> Pts)"`.
///
/// Only the rendered text is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry(String);

impl HistoryEntry {
    pub fn new(player: &str, rule: &str, points: i64) -> Self {
        Self(format!("{} -> {} ({} Pts)", player, rule, points))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append/clear log, most recent entry first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameLog {
    entries: Vec<HistoryEntry>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry for a rule application
    pub fn record(&mut self, player: &str, rule: &str, points: i64) -> &HistoryEntry {
        self.entries.insert(0, HistoryEntry::new(player, rule, points));
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Stored for GameLog {
    const COLLECTION: Collection = Collection::History;
}
