use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ErrorKind, QuoteStyle, ReaderBuilder, WriterBuilder};
use log::{info, warn};

use crate::error::GameError;

/// Number of entries kept on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Top-N leaderboard persisted as `name,score` lines. The file is the only
/// source of truth, every call reads or rewrites it in full.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    path: PathBuf,
}

impl Scoreboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all well-formed entries in file order. A missing file is an
    /// empty leaderboard; malformed lines are skipped. Leading whitespace of
    /// a line is dropped, the rest of the name is kept as written.
    pub fn load(&self) -> Result<Vec<ScoreEntry>, GameError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        let mut entries = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable scoreboard row {}: {}", i + 1, e);
                    continue;
                }
            };

            if record.len() != 2 {
                warn!("Skipping scoreboard row {}: expected name,score, got {:?}", i + 1, record);
                continue;
            }

            let (name, score) = (record[0].trim_start(), record[1].trim());
            match score.parse::<i64>() {
                Ok(score) => entries.push(ScoreEntry::new(name, score)),
                Err(_) => warn!("Skipping scoreboard row {}: invalid score {:?}", i + 1, score),
            }
        }

        Ok(entries)
    }

    /// Replaces the file with `entries`, in the given order.
    pub fn save(&self, entries: &[ScoreEntry]) -> Result<(), GameError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_path(&self.path)?;

        for entry in entries {
            writer.write_record([entry.name.as_str(), entry.score.to_string().as_str()])?;
        }
        writer.flush()?;

        info!("Saved {} scoreboard entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    /// Adds a result, keeps the best `LEADERBOARD_SIZE` and persists them.
    ///
    /// The sort is stable, so on equal scores existing entries stay ahead of
    /// the one just added.
    pub fn update(&self, name: &str, score: i64) -> Result<Vec<ScoreEntry>, GameError> {
        let mut entries = self.load()?;
        entries.push(ScoreEntry::new(name, score));

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_SIZE);

        self.save(&entries)?;
        Ok(entries)
    }
}

/// Case-insensitive lookup used while the player types a name.
pub fn name_taken(entries: &[ScoreEntry], name: &str) -> bool {
    let name = name.to_lowercase();
    entries.iter().any(|entry| entry.name.to_lowercase() == name)
}
