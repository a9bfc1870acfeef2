use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::GameError;

pub const CONFIG_FILE: &str = "triviaconfig.cfg";
pub const DEFAULT_TRIVIA_FILE: &str = "movies";
pub const DEFAULT_SCOREBOARD_FILE: &str = "scoreboard.txt";
pub const DEFAULT_ROUND_SECONDS: u64 = 60;

const RECENT_FILES_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub trivia_path: PathBuf,
    pub scoreboard_path: PathBuf,
    pub round_seconds: u64,
    pub recent_trivia_files: Vec<(String, i64)>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            trivia_path: PathBuf::from(DEFAULT_TRIVIA_FILE),
            scoreboard_path: PathBuf::from(DEFAULT_SCOREBOARD_FILE),
            round_seconds: DEFAULT_ROUND_SECONDS,
            recent_trivia_files: Vec::new(),
        }
    }
}

impl UserConfig {
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => {
                debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), GameError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GameError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Makes `path` the active trivia file and moves it to the front of the
    /// history.
    pub fn use_trivia_file(&mut self, path: PathBuf) {
        let timestamp = chrono::Utc::now().timestamp();
        let filename = path.to_string_lossy().into_owned();
        self.recent_trivia_files.retain(|(f, _)| f != &filename);
        self.recent_trivia_files.insert(0, (filename, timestamp));
        self.recent_trivia_files.truncate(RECENT_FILES_LIMIT);
        self.trivia_path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_or_invalid_file_gives_defaults() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(UserConfig::load_from(&path), UserConfig::default());

        fs::write(&path, "{ not json").expect("write failed");
        assert_eq!(UserConfig::load_from(&path), UserConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "round_seconds": 30 }"#).expect("write failed");

        let config = UserConfig::load_from(&path);
        assert_eq!(config.round_seconds, 30);
        assert_eq!(config.trivia_path, PathBuf::from(DEFAULT_TRIVIA_FILE));
        assert_eq!(config.scoreboard_path, PathBuf::from(DEFAULT_SCOREBOARD_FILE));
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        let mut config = UserConfig::default();
        config.use_trivia_file(PathBuf::from("classics"));

        config.save_to(&path).expect("save failed");
        assert_eq!(UserConfig::load_from(&path), config);
    }

    #[test]
    fn history_is_deduplicated_and_capped() {
        let mut config = UserConfig::default();
        for i in 0..12 {
            config.use_trivia_file(PathBuf::from(format!("pack{}", i)));
        }
        config.use_trivia_file(PathBuf::from("pack5"));

        assert_eq!(config.recent_trivia_files.len(), RECENT_FILES_LIMIT);
        assert_eq!(config.recent_trivia_files[0].0, "pack5");
        assert_eq!(
            config
                .recent_trivia_files
                .iter()
                .filter(|(f, _)| f == "pack5")
                .count(),
            1
        );
        assert_eq!(config.trivia_path, PathBuf::from("pack5"));
    }
}
