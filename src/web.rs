//! Browser bindings (WASM only)
//!
//! A JavaScript front-end owns the rendering; it calls into `WebTracker` for
//! every user action and reads the collections back as JSON.

use std::fmt::Display;

use chrono::{Local, NaiveDate};
use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageBackend;
use crate::players::Registration;
use crate::settings::Settings;
use crate::tracker::{Notice, Tracker};

fn to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = Settings::load()
        .log_level
        .filter()
        .to_level()
        .unwrap_or(log::Level::Warn);
    let _ = console_log::init_with_level(level);
    log::info!("Commander Tracker starting...");
}

#[wasm_bindgen]
pub struct WebTracker {
    tracker: Tracker<LocalStorageBackend>,
    /// Date of the label last shown by `prepare_archive`
    archive_date: Option<NaiveDate>,
}

#[wasm_bindgen]
impl WebTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebTracker, JsValue> {
        let backend = LocalStorageBackend::open().map_err(to_js)?;
        let tracker = Tracker::open(backend).map_err(to_js)?;
        Ok(Self {
            tracker,
            archive_date: None,
        })
    }

    /// Notice text on success, empty string when nothing changed
    pub fn add_player(&mut self, name: &str) -> Result<String, JsValue> {
        match self.tracker.add_player(name).map_err(to_js)? {
            Registration::Added(name) => Ok(Notice::PlayerAdded(name).to_string()),
            Registration::Blank | Registration::Duplicate(_) => Ok(String::new()),
        }
    }

    pub fn delete_player(&mut self, name: &str) -> Result<bool, JsValue> {
        self.tracker.delete_player(name).map_err(to_js)
    }

    /// New score, or `undefined` for an unknown player
    pub fn adjust_score(&mut self, name: &str, delta: i32) -> Result<Option<f64>, JsValue> {
        let score = self
            .tracker
            .adjust_score(name, i64::from(delta))
            .map_err(to_js)?;
        Ok(score.map(|s| s as f64))
    }

    pub fn reset_scores(&mut self) -> Result<String, JsValue> {
        self.tracker.reset_all_scores().map(|n| n.to_string()).map_err(to_js)
    }

    pub fn apply_rule(&mut self, player: &str, rule: &str) -> Result<String, JsValue> {
        self.tracker.apply_rule(player, rule).map(|n| n.to_string()).map_err(to_js)
    }

    /// Label for the archive confirmation dialog. `archive_season` stores
    /// exactly this label, even if the dialog is answered on a later day.
    pub fn prepare_archive(&mut self) -> String {
        let date = Local::now().date_naive();
        self.archive_date = Some(date);
        self.tracker.next_season_label_on(date)
    }

    pub fn archive_season(&mut self) -> Result<String, JsValue> {
        let date = self
            .archive_date
            .take()
            .unwrap_or_else(|| Local::now().date_naive());
        self.tracker
            .archive_current_season_on(date)
            .map(|n| n.to_string())
            .map_err(to_js)
    }

    /// `[{"name", "score"}]`, scoreboard order
    pub fn players_json(&self) -> String {
        let rows: Vec<_> = self
            .tracker
            .players_by_score()
            .into_iter()
            .map(|(name, score)| json!({ "name": name, "score": score }))
            .collect();
        serde_json::Value::Array(rows).to_string()
    }

    /// Log lines, most recent first
    pub fn history_json(&self) -> String {
        let lines: Vec<_> = self.tracker.history().iter().map(|e| e.as_str()).collect();
        json!(lines).to_string()
    }

    /// `[{"name", "points"}]`, configured order
    pub fn rules_json(&self) -> String {
        let rows: Vec<_> = self
            .tracker
            .rules()
            .iter()
            .map(|(name, points)| json!({ "name": name, "points": points }))
            .collect();
        serde_json::Value::Array(rows).to_string()
    }

    /// `[{"label", "players": [{"name", "score"}]}]`, archive view order
    pub fn seasons_json(&self) -> String {
        let rows: Vec<_> = self
            .tracker
            .seasons_by_label()
            .into_iter()
            .map(|(label, snapshot)| {
                let players: Vec<_> = snapshot
                    .sorted_by_score()
                    .into_iter()
                    .map(|(name, score)| json!({ "name": name, "score": score }))
                    .collect();
                json!({ "label": label, "players": players })
            })
            .collect();
        serde_json::Value::Array(rows).to_string()
    }
}
