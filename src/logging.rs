/// Logger setup.
///
/// The game owns the terminal (raw mode, alternate screen), so log lines go
/// to `wordhunt.log` in the data directory instead of stderr.
/// Filter comes from `RUST_LOG`, default `info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

pub const LOG_FILE: &str = "wordhunt.log";

/// Install the global logger. Returns the log path on success; if the file
/// cannot be opened the game runs without logging.
pub fn init(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(LOG_FILE);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open {}: {e}", path.display());
            return None;
        }
    };

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .ok()
        .map(|_| path)
}
