//! Game settings and preferences
//!
//! Persisted separately from scores as a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PLAYFIELD_HEIGHT, DEFAULT_PLAYFIELD_WIDTH};
use crate::input::KeyBindings;
use crate::persistence::StoreError;
use crate::playfield::{ConfigError, Playfield};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Visible width in world units
    pub width: f32,
    /// Visible height in world units
    pub height: f32,

    // === Run ===
    /// Fixed seed for reproducible runs (random when unset)
    pub seed: Option<u64>,
    /// Start with the autopilot playing
    pub idle_mode: bool,

    // === Storage ===
    /// Where scores and the player name are kept
    pub score_path: PathBuf,

    // === Input ===
    pub bindings: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAYFIELD_WIDTH,
            height: DEFAULT_PLAYFIELD_HEIGHT,
            seed: None,
            idle_mode: false,
            score_path: PathBuf::from("skyhop-scores.json"),
            bindings: KeyBindings::default(),
        }
    }
}

impl Settings {
    /// Validated playfield for these dimensions
    pub fn playfield(&self) -> Result<Playfield, ConfigError> {
        Playfield::new(self.width, self.height)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("Using default settings");
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring malformed settings in {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_playfield_is_valid() {
        let settings = Settings::default();
        assert!(settings.playfield().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"width": 640.0, "seed": 42}"#).unwrap();
        assert_eq!(settings.width, 640.0);
        assert_eq!(settings.height, DEFAULT_PLAYFIELD_HEIGHT);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.bindings, KeyBindings::default());
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let settings = Settings {
            width: 0.0,
            ..Default::default()
        };
        assert!(settings.playfield().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("skyhop-settings-{}.json", std::process::id()));
        let settings = Settings {
            seed: Some(7),
            idle_mode: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_or_malformed_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("skyhop-settings-bad-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load(&path), Settings::default());
        fs::write(&path, "{ nope").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }
}
