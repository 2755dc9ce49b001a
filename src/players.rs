//! Player registry: unique player names and their running scores

use serde::{Deserialize, Serialize};

use crate::ordered::OrderedMap;
use crate::persistence::{Collection, Stored};

/// Player name → score, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRegistry {
    scores: OrderedMap<i64>,
}

/// Result of trying to register a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Registered under the trimmed name
    Added(String),
    /// Name was empty after trimming
    Blank,
    /// A player with this name already exists
    Duplicate(String),
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player with score 0
    pub fn add(&mut self, name: &str) -> Registration {
        let name = name.trim();
        if name.is_empty() {
            return Registration::Blank;
        }
        if self.scores.contains_key(name) {
            return Registration::Duplicate(name.to_string());
        }
        self.scores.insert(name, 0);
        Registration::Added(name.to_string())
    }

    /// Remove a player. Returns false if there was no such player.
    pub fn remove(&mut self, name: &str) -> bool {
        self.scores.remove(name).is_some()
    }

    /// Add `delta` to a player's score, returning the new score.
    /// `None` if the player is unknown.
    pub fn adjust(&mut self, name: &str, delta: i64) -> Option<i64> {
        let score = self.scores.get_mut(name)?;
        *score = score.saturating_add(delta);
        Some(*score)
    }

    /// Set every score to 0
    pub fn reset(&mut self) {
        for score in self.scores.values_mut() {
            *score = 0;
        }
    }

    pub fn score(&self, name: &str) -> Option<i64> {
        self.scores.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scores.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Players in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(name, score)| (name, *score))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scores.keys()
    }

    /// Scoreboard order: highest score first, ties in registration order
    pub fn sorted_by_score(&self) -> Vec<(&str, i64)> {
        let mut players: Vec<_> = self.iter().collect();
        players.sort_by(|a, b| b.1.cmp(&a.1));
        players
    }

    /// Current scores, in registration order
    pub fn scores(&self) -> &OrderedMap<i64> {
        &self.scores
    }
}

impl<'a> FromIterator<(&'a str, i64)> for PlayerRegistry {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

impl Stored for PlayerRegistry {
    const COLLECTION: Collection = Collection::Players;

    fn validate(&self) -> Result<(), String> {
        match self.scores.keys().find(|name| name.is_empty() || name.trim() != *name) {
            Some(name) => Err(format!("invalid player name {:?}", name)),
            None => Ok(()),
        }
    }
}
