/// Local high-score ranking.
///
/// ## Storage
///   A small JSON object file used as a key-value store. The ranking lives
///   under one fixed key as an array of `{ "name", "score" }` records:
///
///   ```json
///   { "word_search_ranking": [ { "name": "ANA", "score": 120 } ] }
///   ```
///
///   The list is append-only on disk; sorting happens when it is shown.
///   Keys other than the ranking key are left untouched on save.

use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config;

pub const RANKING_KEY: &str = "word_search_ranking";
pub const RANKING_FILE: &str = "ranking.json";
pub const MAX_NAME_LEN: usize = 15;
pub const TOP_N: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("please enter your name to save your score")]
    EmptyName,
    #[error("name is longer than 15 characters")]
    NameTooLong,
    #[error("only positive scores are ranked")]
    NoScore,
    #[error("ranking file: {0}")]
    Io(#[from] io::Error),
    #[error("ranking data: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct RankingStore {
    path: PathBuf,
}

impl RankingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RankingStore { path: path.into() }
    }

    /// `ranking.json` in the writable data directory.
    pub fn open_default() -> Self {
        Self::new(config::data_dir().join(RANKING_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored entries in insertion order. Missing or unreadable data is an
    /// empty ranking.
    pub fn load_ranking(&self) -> Vec<RankingEntry> {
        let store = self.read_store();
        match store.get(RANKING_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match serde_json::from_value::<RankingEntry>(item.clone()) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("skipping bad ranking record {item} in {}: {e}", self.path.display());
                        None
                    }
                })
                .collect(),
            Some(_) => {
                warn!("ignoring malformed ranking in {}", self.path.display());
                vec![]
            }
            None => vec![],
        }
    }

    /// Replace the stored list.
    pub fn save_ranking(&self, entries: &[RankingEntry]) -> Result<(), RankingError> {
        let mut store = self.read_store();
        store.insert(RANKING_KEY.to_string(), serde_json::to_value(entries)?);
        let text = serde_json::to_string_pretty(&Value::Object(store))?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        // Write beside the target, then swap it in.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Validate and append one result. Returns the stored entry.
    pub fn submit(&self, name: &str, score: u32) -> Result<RankingEntry, RankingError> {
        let name = validate_name(name)?;
        if score == 0 {
            return Err(RankingError::NoScore);
        }
        let entry = RankingEntry { name, score };
        let mut entries = self.load_ranking();
        entries.push(entry.clone());
        self.save_ranking(&entries)?;
        info!("ranking: saved {} with {}", entry.name, entry.score);
        Ok(entry)
    }

    fn read_store(&self) -> Map<String, Value> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!("could not read {}: {e}", self.path.display());
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("{} is not a JSON object; starting a fresh ranking", self.path.display());
                Map::new()
            }
        }
    }
}

/// Trimmed player name, 1..=15 characters.
pub fn validate_name(raw: &str) -> Result<String, RankingError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RankingError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(RankingError::NameTooLong);
    }
    Ok(name.to_string())
}

/// Best `n` entries, highest score first. Ties keep insertion order.
pub fn top(entries: &[RankingEntry], n: usize) -> Vec<RankingEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted.truncate(n);
    sorted
}
