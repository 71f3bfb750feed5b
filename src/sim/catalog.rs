/// Level catalog: per-difficulty grid size, word list and time budget.
///
/// ## Sources (priority order):
///   1. `[[levels]]` tables from `config.toml` (replace the built-ins)
///   2. Built-in embedded levels
///
/// Catalog order is play order: clearing a level advances to the next entry.

use std::collections::HashSet;

use thiserror::Error;

/// Largest grid side a custom level may ask for.
pub const MAX_GRID_SIZE: usize = 40;

/// One playable level. Immutable once in a catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    pub key: String,
    pub size: usize,
    /// Uppercase, no duplicates, in configured order.
    pub words: Vec<String>,
    pub time_budget_secs: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no levels")]
    Empty,
    #[error("level {0:?} has grid size 0")]
    ZeroSize(String),
    #[error("level {0:?} has no words")]
    NoWords(String),
    #[error("level {0:?} has no time budget")]
    NoTime(String),
    #[error("level key {0:?} appears more than once")]
    DuplicateKey(String),
    #[error("level {0:?} has grid size {1}, the limit is 40")]
    TooLarge(String, usize),
    #[error("level {0:?} word {1:?} has characters other than letters")]
    InvalidWord(String, String),
}

#[derive(Clone, Debug)]
pub struct Catalog {
    levels: Vec<LevelConfig>,
}

impl Catalog {
    /// The three built-in difficulties.
    pub fn builtin() -> Self {
        Catalog { levels: embedded_levels() }
    }

    /// Validate and normalize custom levels: words are upper-cased and
    /// de-duplicated (first occurrence kept), blanks dropped. Words must be
    /// letters only and grids at most `MAX_GRID_SIZE` wide.
    pub fn from_levels(levels: Vec<LevelConfig>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut keys = HashSet::new();
        let mut out = Vec::with_capacity(levels.len());
        for mut level in levels {
            if !keys.insert(level.key.clone()) {
                return Err(CatalogError::DuplicateKey(level.key));
            }
            if level.size == 0 {
                return Err(CatalogError::ZeroSize(level.key));
            }
            if level.size > MAX_GRID_SIZE {
                return Err(CatalogError::TooLarge(level.key, level.size));
            }
            if level.time_budget_secs == 0 {
                return Err(CatalogError::NoTime(level.key));
            }
            level.words = normalize_words(&level.words);
            if level.words.is_empty() {
                return Err(CatalogError::NoWords(level.key));
            }
            if let Some(bad) = level.words.iter().find(|w| !w.chars().all(char::is_alphabetic)) {
                let bad = bad.clone();
                return Err(CatalogError::InvalidWord(level.key, bad));
            }
            out.push(level);
        }
        Ok(Catalog { levels: out })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }

    /// Index of `key` in play order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.key == key)
    }

    pub fn get(&self, idx: usize) -> Option<&LevelConfig> {
        self.levels.get(idx)
    }

    pub fn has_next(&self, idx: usize) -> bool {
        idx + 1 < self.levels.len()
    }
}

fn normalize_words(words: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .map(|w| w.trim().to_uppercase())
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Embedded levels
// ══════════════════════════════════════════════════════════════

fn embedded_levels() -> Vec<LevelConfig> {
    vec![
        make_embedded("easy", 10, 240, &["GATO", "SOL", "CASA", "LUA", "CARRO", "AMOR"]),
        make_embedded("medium", 14, 300, &[
            "COMPUTADOR", "ESCOLA", "TECLADO", "JOGOS", "CELULAR",
            "MUSICA", "LIVRO", "CANETA", "ABACAXI", "FLORESTA",
        ]),
        make_embedded("hard", 18, 420, &[
            "DESENVOLVIMENTO", "PROGRAMACAO", "ALGORITMO", "COMPUTACAO",
            "TECNOLOGIA", "SISTEMAS", "INTELIGENCIA", "DADOS",
            "SEGURANCA", "FRAMEWORK", "APLICACAO", "JAVASCRIPT",
        ]),
    ]
}

fn make_embedded(key: &str, size: usize, time: u32, words: &[&str]) -> LevelConfig {
    LevelConfig {
        key: key.to_string(),
        size,
        words: words.iter().map(|s| s.to_string()).collect(),
        time_budget_secs: time,
    }
}
