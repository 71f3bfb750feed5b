/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::{info, warn};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::generator::PlacementPolicy;
use crate::sim::catalog::{Catalog, LevelConfig};
use crate::sim::game::GameSettings;
use crate::sim::selection::SelectionMode;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub general: GeneralConfig,
    pub timer: TimerConfig,
    pub catalog: Catalog,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub selection_mode: SelectionMode,
    pub default_level: String,
    pub unplaceable_words: PlacementPolicy,
    pub muted: bool,
}

#[derive(Clone, Debug)]
pub struct TimerConfig {
    pub tick_ms: u64,    // countdown period (one "second" of level time)
    pub frame_ms: u64,   // input poll / redraw interval
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    timer: TomlTimer,
    #[serde(default)]
    levels: Vec<TomlLevel>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    selection_mode: SelectionMode,
    #[serde(default = "default_level")]
    default_level: String,
    #[serde(default)]
    unplaceable_words: PlacementPolicy,
    #[serde(default)]
    muted: bool,
}

#[derive(Deserialize, Debug)]
struct TomlTimer {
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLevel {
    key: String,
    size: usize,
    words: Vec<String>,
    time: u32,
}

// ── Defaults ──

fn default_level() -> String { "easy".into() }
fn default_tick_ms() -> u64 { 1000 }
fn default_frame_ms() -> u64 { 16 }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            selection_mode: SelectionMode::default(),
            default_level: default_level(),
            unplaceable_words: PlacementPolicy::default(),
            muted: false,
        }
    }
}

impl Default for TomlTimer {
    fn default() -> Self {
        TomlTimer {
            tick_ms: default_tick_ms(),
            frame_ms: default_frame_ms(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        Self::from_toml(load_toml(&search_dirs))
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let catalog = if cfg.levels.is_empty() {
            Catalog::builtin()
        } else {
            let custom = cfg.levels.into_iter().map(|l| LevelConfig {
                key: l.key,
                size: l.size,
                words: l.words,
                time_budget_secs: l.time,
            }).collect();
            match Catalog::from_levels(custom) {
                Ok(c) => {
                    info!("using {} custom levels from config.toml", c.len());
                    c
                }
                Err(e) => {
                    warn!("config.toml levels rejected ({e}); using built-in levels");
                    Catalog::builtin()
                }
            }
        };

        let mut default_level = cfg.general.default_level;
        if catalog.index_of(&default_level).is_none() {
            let first = catalog.levels().first().map(|l| l.key.clone()).unwrap_or_default();
            warn!("default_level {default_level:?} is not in the catalog; menu starts at {first:?}");
            default_level = first;
        }

        GameConfig {
            general: GeneralConfig {
                selection_mode: cfg.general.selection_mode,
                default_level,
                unplaceable_words: cfg.general.unplaceable_words,
                muted: cfg.general.muted,
            },
            timer: TimerConfig {
                tick_ms: cfg.timer.tick_ms.max(1),
                frame_ms: cfg.timer.frame_ms.max(1),
            },
            catalog,
        }
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            policy: self.general.unplaceable_words,
            mode: self.general.selection_mode,
            tick_period: Duration::from_millis(self.timer.tick_ms),
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/wordhunt)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/wordhunt");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/wordhunt)
    let sys = PathBuf::from("/usr/share/wordhunt");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

/// Writable directory for the ranking file and the log.
pub fn data_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_wordhunt");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/wordhunt) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/wordhunt");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> GameConfig {
        GameConfig::from_toml(toml::from_str(text).unwrap())
    }

    #[test]
    fn empty_file_gives_defaults() {
        let c = parse("");
        assert_eq!(c.general.selection_mode, SelectionMode::Drag);
        assert_eq!(c.general.default_level, "easy");
        assert_eq!(c.general.unplaceable_words, PlacementPolicy::Skip);
        assert!(!c.general.muted);
        assert_eq!(c.timer.tick_ms, 1000);
        assert_eq!(c.catalog.len(), 3);
    }

    #[test]
    fn general_section_is_read() {
        let c = parse(r#"
            [general]
            selection_mode = "click"
            default_level = "hard"
            unplaceable_words = "fail"
            muted = true

            [timer]
            tick_ms = 250
        "#);
        assert_eq!(c.general.selection_mode, SelectionMode::Click);
        assert_eq!(c.general.default_level, "hard");
        assert_eq!(c.general.unplaceable_words, PlacementPolicy::Fail);
        assert!(c.general.muted);
        let s = c.game_settings();
        assert_eq!(s.tick_period, Duration::from_millis(250));
        assert_eq!(s.policy, PlacementPolicy::Fail);
    }

    #[test]
    fn custom_levels_replace_builtins() {
        let c = parse(r#"
            [general]
            default_level = "pets"

            [[levels]]
            key = "pets"
            size = 6
            words = ["cat", "dog"]
            time = 90

            [[levels]]
            key = "birds"
            size = 8
            words = ["OWL", "HAWK"]
            time = 120
        "#);
        assert_eq!(c.catalog.len(), 2);
        assert_eq!(c.catalog.levels()[0].words, vec!["CAT".to_string(), "DOG".to_string()]);
        assert_eq!(c.general.default_level, "pets");
    }

    #[test]
    fn invalid_custom_levels_fall_back() {
        let c = parse(r#"
            [[levels]]
            key = "broken"
            size = 0
            words = ["A"]
            time = 10
        "#);
        assert_eq!(c.catalog.index_of("easy"), Some(0));
    }

    #[test]
    fn custom_words_with_spaces_fall_back() {
        let c = parse(r#"
            [[levels]]
            key = "food"
            size = 10
            words = ["ice cream", "r2d2"]
            time = 60
        "#);
        assert_eq!(c.catalog.index_of("food"), None);
        assert_eq!(c.catalog.index_of("easy"), Some(0));
    }

    #[test]
    fn unknown_default_level_points_at_first() {
        let c = parse(r#"
            [general]
            default_level = "nightmare"
        "#);
        assert_eq!(c.general.default_level, "easy");
    }

    #[test]
    fn clickclick_alias_is_accepted() {
        let c = parse("[general]\nselection_mode = \"clickclick\"\n");
        assert_eq!(c.general.selection_mode, SelectionMode::Click);
    }
}
