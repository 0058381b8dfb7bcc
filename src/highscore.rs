//! Persistence for the single best score
//!
//! The record is an ASCII decimal integer and nothing else. Reading never
//! fails: a missing or unreadable record counts as a high score of zero.
//! Writing can fail, and the caller decides what to do about it; the game
//! keeps the in-memory value either way.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from writing the high-score record
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to create directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write high score to {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable storage for the best score
pub trait HighScoreStore {
    /// Read the persisted best score; 0 when there is none
    fn load(&self) -> u32;

    /// Overwrite the persisted best score
    fn save(&mut self, score: u32) -> Result<(), PersistenceError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> u32 {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), PersistenceError> {
        (**self).save(score)
    }
}

/// High score kept in a plain-text file
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(
                    path = ?self.path,
                    error = %err,
                    "No high score record, starting at 0"
                );
                return 0;
            }
        };

        match text.trim().parse::<u32>() {
            Ok(score) => {
                tracing::debug!(path = ?self.path, score, "Loaded high score");
                score
            }
            Err(err) => {
                tracing::warn!(
                    path = ?self.path,
                    error = %err,
                    "Ignoring malformed high score record"
                );
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.path, score.to_string()).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = ?self.path, score, "Saved high score");
        Ok(())
    }
}

/// High score that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    score: Option<u32>,
    saves: Vec<u32>,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self {
            score: Some(score),
            saves: Vec::new(),
        }
    }

    /// Every value passed to `save`, oldest first
    pub fn saves(&self) -> &[u32] {
        &self.saves
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.score.unwrap_or(0)
    }

    fn save(&mut self, score: u32) -> Result<(), PersistenceError> {
        self.score = Some(score);
        self.saves.push(score);
        Ok(())
    }
}
