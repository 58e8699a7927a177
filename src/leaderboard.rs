//! Top-five high-score table and where it is kept.
//!
//! The core only decides ordering and membership. Getting a name out of the
//! player and putting the table somewhere durable belong to the host, which
//! plugs in through [`ScoreStore`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LeaderboardError;

pub const MAX_ENTRIES: usize = 5;
pub const NAME_LEN: usize = 3;

/// Three upper-case ASCII letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, LeaderboardError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() != NAME_LEN || !trimmed.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(LeaderboardError::InvalidName(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(name: &PlayerName, score: u32) -> Self {
        Self {
            name: name.as_str().to_string(),
            score,
        }
    }
}

/// Sorted by score, highest first; equal scores keep arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise arbitrary entries (e.g. a hand-edited file) into a valid
    /// table.
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Whether `score` would survive an insert. A tie with the last place
    /// ranks below it and falls off a full table.
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < MAX_ENTRIES
            || self.entries.last().is_some_and(|last| score > last.score)
    }

    /// Insert behind every entry with an equal or higher score, then cut
    /// back to five. Returns the zero-based rank if the entry made it.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        (rank < MAX_ENTRIES).then_some(rank)
    }
}

// ── Persistence ──────────────────────────────────────────────────────────────

pub trait ScoreStore {
    fn load(&self) -> Result<Leaderboard, LeaderboardError>;
    fn save(&mut self, board: &Leaderboard) -> Result<(), LeaderboardError>;
}

/// Table stored as a JSON array of `{name, score}`. A missing file reads as
/// an empty table.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Leaderboard, LeaderboardError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Leaderboard::new()),
            Err(source) => {
                return Err(LeaderboardError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let entries: Vec<LeaderboardEntry> =
            serde_json::from_slice(&bytes).map_err(|source| LeaderboardError::Format {
                path: self.path.clone(),
                source,
            })?;
        Ok(Leaderboard::from_entries(entries))
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), LeaderboardError> {
        let json = serde_json::to_vec_pretty(board).map_err(|source| LeaderboardError::Format {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| LeaderboardError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = board.entries().len(), "leaderboard saved");
        Ok(())
    }
}

/// In-process table, for hosts without durable storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    board: Leaderboard,
}

impl MemoryStore {
    pub fn new(board: Leaderboard) -> Self {
        Self { board }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Leaderboard, LeaderboardError> {
        Ok(self.board.clone())
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), LeaderboardError> {
        self.board = board.clone();
        Ok(())
    }
}

/// Load the table, slot in `{name, score}` and write the result back.
pub fn submit_score(
    store: &mut impl ScoreStore,
    name: &PlayerName,
    score: u32,
) -> Result<Leaderboard, LeaderboardError> {
    let mut board = store.load()?;
    board.insert(LeaderboardEntry::new(name, score));
    store.save(&board)?;
    Ok(board)
}
