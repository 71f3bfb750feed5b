/// Events emitted by the game controller.
/// The presentation layer consumes these for messages and sound.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { key: String, index: usize },
    WordFound { word: String, score_delta: u32 },
    AlreadyFound { word: String },
    NoMatch,
    LevelCleared { key: String },
    AllCleared { score: u32 },
    TimedOut { score: u32 },
}
