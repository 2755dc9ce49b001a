//! End-to-end scenarios against the tracker, in memory and on disk

use chrono::NaiveDate;
use tempfile::TempDir;

use commander_tracker::{
    Collection, FileBackend, MemoryBackend, Registration, Tracker, TrackerError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn alice_and_bob() -> Tracker<MemoryBackend> {
    let mut tracker = Tracker::open(MemoryBackend::new()).unwrap();
    tracker.add_player("Alice").unwrap();
    tracker.add_player("Bob").unwrap();
    tracker
}

fn history_lines<B: commander_tracker::StorageBackend>(tracker: &Tracker<B>) -> Vec<&str> {
    tracker.history().iter().map(|e| e.as_str()).collect()
}

#[test]
fn test_win_then_sol_ring() {
    let mut tracker = alice_and_bob();

    let points = tracker.apply_rule_to_player("Alice", "Win a game").unwrap();
    assert_eq!(points, 1);
    assert_eq!(tracker.players().score("Alice"), Some(1));
    assert_eq!(tracker.players().score("Bob"), Some(0));
    assert_eq!(history_lines(&tracker), ["Alice -> Win a game (1 Pts)"]);

    let points = tracker.apply_rule_to_player("Bob", "Sol-Ring Turn One").unwrap();
    assert_eq!(points, -1);
    assert_eq!(tracker.players().score("Alice"), Some(1));
    assert_eq!(tracker.players().score("Bob"), Some(-1));
    assert_eq!(
        history_lines(&tracker),
        [
            "Bob -> Sol-Ring Turn One (-1 Pts)",
            "Alice -> Win a game (1 Pts)"
        ]
    );
}

#[test]
fn test_archive_snapshots_and_resets() {
    let mut tracker = alice_and_bob();
    tracker.apply_rule_to_player("Alice", "Win a game").unwrap();
    tracker.apply_rule_to_player("Bob", "Sol-Ring Turn One").unwrap();
    tracker.adjust_score("Alice", 2).unwrap();
    let before: Vec<(String, i64)> = tracker
        .players()
        .iter()
        .map(|(n, s)| (n.to_string(), s))
        .collect();
    let seasons_before = tracker.seasons().len();

    tracker.archive_current_season_on(date(2025, 2, 14)).unwrap();

    let snapshot = tracker.seasons().get("Season 1 (2025-02-14)").unwrap();
    let archived: Vec<(String, i64)> = snapshot.iter().map(|(n, s)| (n.to_string(), s)).collect();
    assert_eq!(archived, before);
    assert!(tracker.players().iter().all(|(_, score)| score == 0));
    assert_eq!(tracker.players().len(), 2);
    assert!(tracker.history().is_empty());
    assert_eq!(tracker.seasons().len(), seasons_before + 1);
}

#[test]
fn test_archive_without_players_changes_nothing() {
    let mut tracker = Tracker::open(MemoryBackend::new()).unwrap();
    let backend_before = tracker.store().backend().clone();

    let result = tracker.archive_current_season_on(date(2025, 2, 14));
    assert!(matches!(result, Err(TrackerError::NoPlayers)));
    assert!(tracker.players().is_empty());
    assert!(tracker.history().is_empty());
    assert!(tracker.seasons().is_empty());
    for collection in Collection::ALL {
        assert_eq!(
            tracker.store().backend().contents(collection),
            backend_before.contents(collection)
        );
    }
}

#[test]
fn test_archived_snapshot_is_not_touched_by_later_play() {
    let mut tracker = alice_and_bob();
    tracker.adjust_score("Alice", 5).unwrap();
    tracker.archive_current_season_on(date(2025, 1, 1)).unwrap();

    tracker.adjust_score("Alice", 3).unwrap();
    tracker.delete_player("Bob").unwrap();
    tracker.reset_all_scores().unwrap();

    let snapshot = tracker.seasons().get("Season 1 (2025-01-01)").unwrap();
    assert_eq!(snapshot.score("Alice"), Some(5));
    assert_eq!(snapshot.score("Bob"), Some(0));
}

#[test]
fn test_scoreboard_and_archive_views() {
    let mut tracker = Tracker::open(MemoryBackend::new()).unwrap();
    for name in ["Cid", "Alice", "Bob"] {
        assert!(matches!(
            tracker.add_player(name).unwrap(),
            Registration::Added(_)
        ));
    }
    tracker.adjust_score("Bob", 2).unwrap();
    assert_eq!(
        tracker.players_by_score(),
        vec![("Bob", 2), ("Cid", 0), ("Alice", 0)]
    );

    tracker.archive_current_season_on(date(2025, 1, 1)).unwrap();
    tracker.adjust_score("Cid", 1).unwrap();
    tracker.archive_current_season_on(date(2025, 3, 1)).unwrap();
    let labels: Vec<_> = tracker
        .seasons_by_label()
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, ["Season 2 (2025-03-01)", "Season 1 (2025-01-01)"]);
}

#[test]
fn test_files_on_disk() {
    let dir = TempDir::new().unwrap();
    {
        let mut tracker = Tracker::open(FileBackend::open(dir.path()).unwrap()).unwrap();
        tracker.add_player("Alice").unwrap();
        tracker.apply_rule_to_player("Alice", "Win a game").unwrap();
    }

    let players = std::fs::read_to_string(dir.path().join("players.json")).unwrap();
    assert_eq!(players, "{\n    \"Alice\": 1\n}");
    let history = std::fs::read_to_string(dir.path().join("history.json")).unwrap();
    assert_eq!(history, "[\n    \"Alice -> Win a game (1 Pts)\"\n]");
    let rules = std::fs::read_to_string(dir.path().join("rules.json")).unwrap();
    assert!(rules.starts_with("{\n    \"Win a game\": 1,\n    \"Sol-Ring Turn One\": -1,"));
    assert!(!dir.path().join("seasons.json").exists());

    let mut tracker = Tracker::open(FileBackend::open(dir.path()).unwrap()).unwrap();
    assert_eq!(tracker.players().score("Alice"), Some(1));
    tracker.archive_current_season_on(date(2025, 5, 4)).unwrap();

    let seasons = std::fs::read_to_string(dir.path().join("seasons.json")).unwrap();
    assert_eq!(
        seasons,
        "{\n    \"Season 1 (2025-05-04)\": {\n        \"Alice\": 1\n    }\n}"
    );
    let history = std::fs::read_to_string(dir.path().join("history.json")).unwrap();
    assert_eq!(history, "[]");
}

#[test]
fn test_corrupt_files_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("players.json"), "{\"Alice\": ").unwrap();
    std::fs::write(dir.path().join("history.json"), "{\"not\": \"a list\"}").unwrap();
    std::fs::write(dir.path().join("seasons.json"), "[]").unwrap();
    std::fs::write(dir.path().join("rules.json"), "null").unwrap();

    let tracker = Tracker::open(FileBackend::open(dir.path()).unwrap()).unwrap();
    assert!(tracker.players().is_empty());
    assert!(tracker.history().is_empty());
    assert!(tracker.seasons().is_empty());
    assert_eq!(tracker.rules().len(), 8);

    // Rules are rewritten on open
    let rules = std::fs::read_to_string(dir.path().join("rules.json")).unwrap();
    assert!(rules.contains("\"Last place\": -1"));
}
