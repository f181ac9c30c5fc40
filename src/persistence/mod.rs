//! Score persistence
//!
//! The simulation never touches storage directly. The game driver hands
//! finished runs and new high scores to a [`ScoreStore`]. Loads never fail
//! outward: missing or corrupt data falls back to defaults.

pub mod file;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::Scoreboard;

pub use file::JsonFileStore;

/// Name used until the player picks one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 24;

/// Errors from writing persisted data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything that is persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub high_score: u32,
    pub scoreboard: Scoreboard,
    pub player_name: String,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            high_score: 0,
            scoreboard: Scoreboard::new(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl Record {
    /// Fix up loaded data: ordered and capped scoreboard, usable name, and a
    /// high score no lower than the best entry. Returns true if anything changed.
    pub fn reconcile(&mut self) -> bool {
        let before = self.clone();
        self.scoreboard.normalize();
        self.player_name = sanitize_name(&self.player_name);
        if let Some(best) = self.scoreboard.top_score() {
            self.high_score = self.high_score.max(best);
        }
        *self != before
    }

    /// Add a finished run. Zero-score runs are ignored.
    pub fn record_run(&mut self, name: &str, score: u32, timestamp: f64) {
        if score == 0 {
            return;
        }
        self.scoreboard.add_score(name, score, timestamp);
        self.high_score = self.high_score.max(score);
    }
}

/// Trim whitespace, cap length, and fall back to the default name
pub fn sanitize_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Storage for high score, scoreboard and player name
pub trait ScoreStore {
    fn load_high_score(&self) -> u32;

    fn load_scoreboard(&self) -> Scoreboard;

    fn load_player_name(&self) -> String;

    /// Store a finished run; raises the high score if needed
    fn record_finished_run(&mut self, name: &str, score: u32, timestamp: f64) -> Result<(), StoreError>;

    /// Store a raised high score; lower values are ignored
    fn store_high_score(&mut self, score: u32) -> Result<(), StoreError>;

    fn store_player_name(&mut self, name: &str) -> Result<(), StoreError>;
}

/// In-process store, used for tests and when no file is configured
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Record,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut record: Record) -> Self {
        record.reconcile();
        Self { record }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl ScoreStore for MemoryStore {
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
        self.record.record_run(name, score, timestamp);
        Ok(())
    }

    fn store_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.record.high_score = self.record.high_score.max(score);
        Ok(())
    }

    fn store_player_name(&mut self, name: &str) -> Result<(), StoreError> {
        self.record.player_name = sanitize_name(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::ScoreEntry;

    #[test]
    fn test_reconcile_raises_high_score() {
        let mut record = Record {
            high_score: 3,
            scoreboard: Scoreboard {
                entries: vec![ScoreEntry {
                    name: "a".into(),
                    score: 8,
                    timestamp: 1.0,
                }],
            },
            player_name: "  Ada  ".into(),
        };
        assert!(record.reconcile());
        assert_eq!(record.high_score, 8);
        assert_eq!(record.player_name, "Ada");
        assert!(!record.reconcile());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("   "), DEFAULT_PLAYER_NAME);
        assert_eq!(sanitize_name(" Bo "), "Bo");
        assert_eq!(sanitize_name(&"x".repeat(40)).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_memory_store_records_runs() {
        let mut store = MemoryStore::new();
        store.record_finished_run("Ada", 0, 1.0).unwrap();
        assert!(store.load_scoreboard().is_empty());

        store.record_finished_run("Ada", 4, 2.0).unwrap();
        store.record_finished_run("Bo", 6, 3.0).unwrap();
        assert_eq!(store.load_high_score(), 6);
        assert_eq!(store.load_scoreboard().top_score(), Some(6));

        store.store_high_score(2).unwrap();
        assert_eq!(store.load_high_score(), 6);
    }

    #[test]
    fn test_default_name() {
        let store = MemoryStore::new();
        assert_eq!(store.load_player_name(), DEFAULT_PLAYER_NAME);
    }
}
