//! Runtime settings
//!
//! Stored as JSON. Missing fields take their defaults, so an empty object
//! (or a partial file) is a valid settings file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Session seed; a random one is drawn when absent
    pub seed: Option<u64>,
    /// Callsign entered on the name screen by the headless driver
    pub player_name: String,
    /// Where the top-3 table lives
    pub highscore_path: PathBuf,

    // === Frame loop ===
    pub target_fps: u32,
    /// Frames closer together than this (seconds) are skipped
    pub min_frame_interval: f32,
    /// Stop after this many simulation ticks (headless runs)
    pub max_ticks: Option<u64>,

    /// Let the demo pilot play
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            player_name: "PILOT".to_string(),
            highscore_path: PathBuf::from("highscores.txt"),

            target_fps: 60,
            min_frame_interval: 0.016,
            max_ticks: None,

            autopilot: true,
        }
    }
}

impl Settings {
    /// Seconds per frame at the target rate
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 7, "player_name": "ACE" }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.player_name, "ACE");
        assert_eq!(settings.target_fps, 60);
        assert_eq!(settings.min_frame_interval, 0.016);
        assert_eq!(settings.resolve_seed(), 7);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            seed: Some(99),
            max_ticks: Some(600),
            autopilot: false,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_errors() {
        let missing = Path::new("/definitely/not/here/settings.json");
        assert!(matches!(Settings::load(missing), Err(SettingsError::Io { .. })));
        assert_eq!(Settings::load_or_default(missing), Settings::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse { .. })));
    }
}
