use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read trivia file {}: {source}", path.display())]
    TriviaFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no playable questions found in {}", path.display())]
    NoPlayableQuestions { path: PathBuf },

    #[error("scoreboard I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("scoreboard write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to start window: {0}")]
    Ui(String),
}
