//! High score leaderboard system
//!
//! Tracks the top 10 finished runs. Ordered by score (highest first), ties
//! broken by the earlier date.

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player name at the time of the run
    pub name: String,
    /// Platforms climbed
    pub score: u32,
    /// Unix timestamp (seconds) when the run ended
    pub timestamp: f64,
}

impl ScoreEntry {
    /// Leaderboard order: higher score first, then earlier date
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.timestamp.total_cmp(&other.timestamp))
    }
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Scoreboard {
    pub entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from stored entries in any order
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    /// Restore ordering and capacity after loading untrusted data
    pub fn normalize(&mut self) {
        self.entries.sort_by(ScoreEntry::rank_cmp);
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // A tie with the lowest entry loses on date
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, name: &str, score: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreEntry {
            name: name.to_string(),
            score,
            timestamp,
        };
        let pos = self
            .entries
            .iter()
            .position(|e| entry.rank_cmp(e) == Ordering::Less)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Current wall-clock time as a Unix timestamp in seconds
pub fn now_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Format a timestamp relative to `now` (both Unix seconds)
pub fn format_date(now: f64, timestamp: f64) -> String {
    let diff_secs = (now - timestamp).max(0.0);
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            let (year, month, day) = civil_from_days((timestamp / 86_400.0).floor() as i64);
            format!("{}/{}/{:02}", month, day, year % 100)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day)
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
