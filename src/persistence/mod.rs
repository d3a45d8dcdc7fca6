//! File-backed high score store
//!
//! Features:
//! - Plain text, one `name score badge` line per entry
//! - Missing file is created empty on open
//! - Malformed lines are skipped on load
//! - Save failures are logged, never surfaced through `ScoreStore`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::highscores::{HighScores, ScoreEntry, ScoreStore};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("high score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// `ScoreStore` that mirrors its ranking to a text file after every submit
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl FileScoreStore {
    /// Load the score file, creating an empty one if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
                }
                fs::write(&path, "").map_err(|e| PersistenceError::io(&path, e))?;
                log::info!("Created high score file {}", path.display());
                String::new()
            }
            Err(err) => return Err(PersistenceError::io(&path, err)),
        };

        let scores = HighScores::from_text(&text);
        log::info!("Loaded {} high scores from {}", scores.entries().len(), path.display());
        Ok(Self { path, scores })
    }

    /// Write the current ranking, replacing the file contents
    pub fn save(&self) -> Result<(), PersistenceError> {
        fs::write(&self.path, self.scores.to_text()).map_err(|e| PersistenceError::io(&self.path, e))
    }
}

impl ScoreStore for FileScoreStore {
    fn submit(&mut self, name: &str, score: u64) -> Vec<ScoreEntry> {
        let ranking = self.scores.submit(name, score);
        match self.save() {
            Ok(()) => log::info!("High scores saved ({} entries)", ranking.len()),
            Err(err) => log::warn!("Failed to save high scores: {}", err),
        }
        ranking
    }

    fn scores(&self) -> &[ScoreEntry] {
        self.scores.entries()
    }
}
