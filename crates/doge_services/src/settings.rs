//! Settings management
//!
//! Settings are read from a JSON file. Every field has a default, so a
//! partial file (or none at all) is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Environment variable naming an alternative settings file.
pub const SETTINGS_ENV: &str = "DOGE_SETTINGS";
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub game: GameSettings,
    pub debug: DebugSettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Board rounds before the game ends.
    pub rounds: u32,
    pub max_players: usize,
    /// Fixed seed for every scene's generator; wall clock when absent.
    pub rng_seed: Option<u64>,
    pub save_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub start_in_debug_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Upper bound on one step's delta, in milliseconds.
    pub max_frame_ms: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Doge Party".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rounds: 10,
            max_players: 4,
            rng_seed: None,
            save_path: PathBuf::from("save.txt"),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self { max_frame_ms: 100.0 }
    }
}

impl Settings {
    /// Parse settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `$DOGE_SETTINGS`, falling back to `settings.json`.
    pub fn load_default_location() -> Result<Self, SettingsError> {
        let path = std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
        Self::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "game": { "rounds": 3 }, "debug": { "start_in_debug_mode": true } }"#)
            .unwrap();

        assert_eq!(settings.game.rounds, 3);
        assert_eq!(settings.game.max_players, 4);
        assert!(settings.debug.start_in_debug_mode);
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
