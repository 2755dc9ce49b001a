//! Season archive
//!
//! Each archived season is a frozen copy of the scoreboard, stored under a
//! label like `"Season 3 (2024-05-01)"`. Seasons are only ever appended.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::consts::LABEL_DATE_FORMAT;
use crate::error::{Result, TrackerError};
use crate::ordered::OrderedMap;
use crate::persistence::{Collection, Stored};
use crate::players::PlayerRegistry;

/// Label for the `number`th season archived on `date`
pub fn season_label(number: usize, date: NaiveDate) -> String {
    format!("Season {} ({})", number, date.format(LABEL_DATE_FORMAT))
}

/// Player scores at the moment a season was archived
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonSnapshot {
    scores: OrderedMap<i64>,
}

impl SeasonSnapshot {
    pub fn of(players: &PlayerRegistry) -> Self {
        Self {
            scores: players.scores().clone(),
        }
    }

    pub fn score(&self, name: &str) -> Option<i64> {
        self.scores.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(name, score)| (name, *score))
    }

    /// Highest score first, ties in registration order
    pub fn sorted_by_score(&self) -> Vec<(&str, i64)> {
        let mut players: Vec<_> = self.iter().collect();
        players.sort_by(|a, b| b.1.cmp(&a.1));
        players
    }
}

/// Season label → snapshot, in archive order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonArchive {
    seasons: OrderedMap<SeasonSnapshot>,
}

impl SeasonArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label the next archived season would get on `date`
    pub fn next_label(&self, date: NaiveDate) -> String {
        season_label(self.seasons.len() + 1, date)
    }

    /// Append a snapshot. An existing label is never overwritten.
    pub fn archive(&mut self, label: String, snapshot: SeasonSnapshot) -> Result<()> {
        if self.seasons.contains_key(&label) {
            return Err(TrackerError::SeasonExists(label));
        }
        self.seasons.insert(label, snapshot);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&SeasonSnapshot> {
        self.seasons.get(label)
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Seasons in archive order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SeasonSnapshot)> {
        self.seasons.iter()
    }

    /// Seasons by label, descending.
    ///
    /// Plain string comparison: "Season 10 (..)" sorts below "Season 2 (..)".
    pub fn sorted_by_label(&self) -> Vec<(&str, &SeasonSnapshot)> {
        let mut seasons: Vec<_> = self.seasons.iter().collect();
        seasons.sort_by(|a, b| b.0.cmp(a.0));
        seasons
    }
}

impl Stored for SeasonArchive {
    const COLLECTION: Collection = Collection::Seasons;

    fn validate(&self) -> std::result::Result<(), String> {
        match self.seasons.keys().find(|label| label.trim().is_empty()) {
            Some(_) => Err("blank season label".into()),
            None => Ok(()),
        }
    }
}
