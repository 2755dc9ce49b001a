//! The tracker: application context owning the store and all collections
//!
//! Every action computes the new value of the collections it touches,
//! persists it, and only then replaces the in-memory copy. A failed write
//! therefore leaves the tracker exactly as it was.

use std::fmt;

use chrono::{Local, NaiveDate};

use crate::error::{Result, TrackerError};
use crate::history::{GameLog, HistoryEntry};
use crate::persistence::{StorageBackend, StorageError, Store};
use crate::players::{PlayerRegistry, Registration};
use crate::rules::RuleTable;
use crate::seasons::{SeasonArchive, SeasonSnapshot};

/// User-facing confirmation of a completed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PlayerAdded(String),
    ScoresReset,
    SeasonArchived(String),
    RuleApplied { player: String, rule: String, points: i64 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PlayerAdded(name) => write!(f, "{} added!", name),
            Notice::ScoresReset => f.write_str("Scores reset."),
            Notice::SeasonArchived(label) => write!(f, "{} archived & scores reset!", label),
            Notice::RuleApplied { points, .. } => write!(f, "Rule applied: {} pts", points),
        }
    }
}

#[derive(Debug)]
pub struct Tracker<B> {
    store: Store<B>,
    players: PlayerRegistry,
    history: GameLog,
    rules: RuleTable,
    seasons: SeasonArchive,
}

impl<B: StorageBackend> Tracker<B> {
    /// Load all collections from `backend`.
    ///
    /// Missing or corrupt collections start from their defaults. The rule
    /// table is written back right away, so this fails only if that write does.
    pub fn open(backend: B) -> std::result::Result<Self, StorageError> {
        let mut store = Store::new(backend);
        let players = store.load(PlayerRegistry::new());
        let history = store.load(GameLog::new());
        let seasons = store.load(SeasonArchive::new());
        let rules = RuleTable::initialize(&mut store)?;
        log::info!(
            "Tracker ready: {} players, {} log entries, {} seasons",
            players.len(),
            history.len(),
            seasons.len()
        );
        Ok(Self {
            store,
            players,
            history,
            rules,
            seasons,
        })
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn seasons(&self) -> &SeasonArchive {
        &self.seasons
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<B> {
        &mut self.store
    }

    /// Scoreboard order: highest first, ties in registration order
    pub fn players_by_score(&self) -> Vec<(&str, i64)> {
        self.players.sorted_by_score()
    }

    /// Archive view order (label descending)
    pub fn seasons_by_label(&self) -> Vec<(&str, &SeasonSnapshot)> {
        self.seasons.sorted_by_label()
    }

    /// Register a player with score 0. Blank and duplicate names change nothing.
    pub fn add_player(&mut self, name: &str) -> Result<Registration> {
        let mut players = self.players.clone();
        let registration = players.add(name);
        if let Registration::Added(name) = &registration {
            self.store.save(&players)?;
            self.players = players;
            log::info!("Player {} added", name);
        }
        Ok(registration)
    }

    /// Remove a player. Returns false (and writes nothing) if absent.
    pub fn delete_player(&mut self, name: &str) -> Result<bool> {
        let mut players = self.players.clone();
        if !players.remove(name) {
            return Ok(false);
        }
        self.store.save(&players)?;
        self.players = players;
        log::info!("Player {} removed", name);
        Ok(true)
    }

    /// Add `delta` to a player's score and return the new score.
    /// `None` (and nothing written) if the player is unknown.
    pub fn adjust_score(&mut self, name: &str, delta: i64) -> Result<Option<i64>> {
        let mut players = self.players.clone();
        let Some(score) = players.adjust(name, delta) else {
            return Ok(None);
        };
        self.store.save(&players)?;
        self.players = players;
        Ok(Some(score))
    }

    /// Set every score to 0 with a single write
    pub fn reset_all_scores(&mut self) -> Result<Notice> {
        let mut players = self.players.clone();
        players.reset();
        self.store.save(&players)?;
        self.players = players;
        log::info!("All scores reset");
        Ok(Notice::ScoresReset)
    }

    /// Apply a rule to a player: adjust the score, then log it.
    ///
    /// Returns the applied point delta. The score and the log are written
    /// separately, in that order.
    pub fn apply_rule_to_player(&mut self, player: &str, rule: &str) -> Result<i64> {
        if player.trim().is_empty() || rule.trim().is_empty() {
            return Err(TrackerError::MissingSelection);
        }
        let points = self.rules.points(rule)?;
        if !self.players.contains(player) {
            return Err(TrackerError::UnknownPlayer(player.to_string()));
        }

        let mut players = self.players.clone();
        players.adjust(player, points);
        self.store.save(&players)?;
        self.players = players;

        let mut history = self.history.clone();
        history.record(player, rule, points);
        self.store.save(&history)?;
        self.history = history;

        log::info!("{} -> {} ({})", player, rule, points);
        Ok(points)
    }

    /// Like [`apply_rule_to_player`](Self::apply_rule_to_player), returning a notice
    pub fn apply_rule(&mut self, player: &str, rule: &str) -> Result<Notice> {
        let points = self.apply_rule_to_player(player, rule)?;
        Ok(Notice::RuleApplied {
            player: player.to_string(),
            rule: rule.to_string(),
            points,
        })
    }

    /// Label the next archived season would get today
    pub fn next_season_label(&self) -> String {
        self.next_season_label_on(today())
    }

    /// Label [`archive_current_season_on`](Self::archive_current_season_on)
    /// would store for `date`
    pub fn next_season_label_on(&self, date: NaiveDate) -> String {
        self.seasons.next_label(date)
    }

    /// Archive today's scores as a new season, then reset scores and clear the log
    pub fn archive_current_season(&mut self) -> Result<Notice> {
        self.archive_current_season_on(today())
    }

    /// Archive the current scores under a label dated `date`.
    ///
    /// Seasons, players and history are committed together. On failure the
    /// tracker keeps its previous state. A `FileBackend` that fails after
    /// publishing its commit journal still reports the error, but the commit
    /// is completed the next time the directory is opened.
    pub fn archive_current_season_on(&mut self, date: NaiveDate) -> Result<Notice> {
        if self.players.is_empty() {
            return Err(TrackerError::NoPlayers);
        }

        let label = self.next_season_label_on(date);
        let mut seasons = self.seasons.clone();
        seasons.archive(label.clone(), SeasonSnapshot::of(&self.players))?;
        let mut players = self.players.clone();
        players.reset();
        let history = GameLog::new();

        let batch = vec![
            self.store.stage(&seasons)?,
            self.store.stage(&players)?,
            self.store.stage(&history)?,
        ];
        self.store.commit(batch)?;

        self.seasons = seasons;
        self.players = players;
        self.history = history;
        log::info!("{} archived", label);
        Ok(Notice::SeasonArchived(label))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
