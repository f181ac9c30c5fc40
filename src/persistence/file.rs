//! JSON file backed score store
//!
//! One object with `high_score`, `scoreboard` and `player_name` keys.
//! Each key is read independently, so one bad value only resets itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Record, ScoreStore, StoreError, sanitize_name};
use crate::highscores::Scoreboard;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    record: Record,
}

impl JsonFileStore {
    /// Open the store at `path`, falling back to defaults if it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut record = load_record(&path);
        let changed = record.reconcile();
        let store = Self { path, record };
        if changed {
            log::info!("Reconciled stored scores (high score {})", store.record.high_score);
            if let Err(err) = store.save() {
                log::warn!("Could not write back reconciled scores: {err}");
            }
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Write the record through a temp file and rename it into place
    fn save(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Saved scores to {}", self.path.display());
        Ok(())
    }
}

fn load_record(path: &Path) -> Record {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("No score file at {}, starting fresh", path.display());
            return Record::default();
        }
        Err(err) => {
            log::warn!("Could not read {}: {err}; using defaults", path.display());
            return Record::default();
        }
    };
    let record = parse_record(&text);
    log::info!(
        "Loaded {} scoreboard entries (high score {})",
        record.scoreboard.len(),
        record.high_score
    );
    record
}

/// Parse a stored record, resetting any key that is missing or malformed
pub fn parse_record(text: &str) -> Record {
    let mut record = Record::default();
    let object = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            log::warn!("Score file is not a JSON object; using defaults");
            return record;
        }
        Err(err) => {
            log::warn!("Score file is corrupt ({err}); using defaults");
            return record;
        }
    };

    if let Some(high) = field::<u32>(&object, "high_score") {
        record.high_score = high;
    }
    if let Some(board) = field::<Scoreboard>(&object, "scoreboard") {
        record.scoreboard = board;
    }
    if let Some(name) = field::<String>(&object, "player_name") {
        record.player_name = name;
    }
    record
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    let value = object.get(key)?;
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::warn!("Ignoring stored {key}: {err}");
            None
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load_high_score(&self) -> u32 {
        self.record.high_score
    }

    fn load_scoreboard(&self) -> Scoreboard {
        self.record.scoreboard.clone()
    }

    fn load_player_name(&self) -> String {
        self.record.player_name.clone()
    }

    fn record_finished_run(&mut self, name: &str, score: u32, timestamp: f64) -> Result<(), StoreError> {
        if score == 0 {
            return Ok(());
        }
        self.record.record_run(name, score, timestamp);
        self.save()
    }

    fn store_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        if score <= self.record.high_score {
            return Ok(());
        }
        self.record.high_score = score;
        self.save()
    }

    fn store_player_name(&mut self, name: &str) -> Result<(), StoreError> {
        self.record.player_name = sanitize_name(name);
        self.save()
    }
}
