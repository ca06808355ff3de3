//! High score tracking
//!
//! The simulation only knows the [`ScoreSink`] contract: it reports the final
//! floor of every run and never looks at the result. [`HighScoreFile`] is the
//! on-disk implementation, keeping the all-time best and the best of the day
//! in a small JSON file shared by every player on the machine.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Receives final scores. Best effort: failures stay inside the sink.
pub trait ScoreSink {
    fn report_score(&mut self, score: i64);

    /// Current standings, for the highscore screen
    fn standings(&self) -> Option<HighScores> {
        None
    }
}

/// Errors from reading or writing the highscore file
#[derive(Debug, thiserror::Error)]
pub enum HighScoreError {
    #[error("could not find highscore directory, $HOME is not set")]
    NoDataDir,
    #[error("highscore file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("highscore file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Best scores ever and today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub best_ever: i64,
    pub best_today: i64,
    /// Unix timestamp (s) of the midnight that ends "today"
    pub today_expires: i64,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a finished run. Returns true for a new all-time best.
    pub fn record<Tz: TimeZone>(&mut self, score: i64, now: &DateTime<Tz>) -> bool {
        let new_best = score > self.best_ever;
        if new_best {
            self.best_ever = score;
        }

        if score > self.best_today || self.today_expires < now.timestamp() {
            self.best_today = score;
            self.today_expires = end_of_day(now);
        }

        new_best
    }

    /// The daily line is only worth showing when it differs from the all-time one
    pub fn show_today(&self) -> bool {
        self.best_today != self.best_ever
    }

    /// Text lines for the highscore screen
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{:<10} {:>6}", "High Score", self.best_ever)];
        if self.show_today() {
            lines.push(format!("{:<10} {:>6}", "Today", self.best_today));
        }
        lines
    }
}

impl ScoreSink for HighScores {
    fn report_score(&mut self, score: i64) {
        self.record(score, &Local::now());
    }

    fn standings(&self) -> Option<HighScores> {
        Some(*self)
    }
}

/// Unix timestamp of the next midnight in `now`'s time zone
pub fn end_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    now.date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(now.timezone()).earliest())
        .map(|midnight| midnight.timestamp())
        .unwrap_or_else(|| now.timestamp() + 24 * 60 * 60)
}

/// Highscores persisted to a shared file
///
/// The file is opened once at startup so permission problems show up before
/// a long game rather than after it. Every report takes an exclusive lock,
/// merges with what other players may have written, and writes back.
#[derive(Debug)]
pub struct HighScoreFile {
    file: Option<File>,
    scores: HighScores,
}

impl HighScoreFile {
    pub const FILE_NAME: &'static str = "falling-tower-highscores";

    /// `$XDG_DATA_HOME/<name>`, falling back to `$HOME/.local/share/<name>`
    pub fn default_path() -> Result<PathBuf, HighScoreError> {
        let non_empty = |var: &str| std::env::var_os(var).filter(|v| !v.is_empty());
        if let Some(data) = non_empty("XDG_DATA_HOME") {
            Ok(PathBuf::from(data).join(Self::FILE_NAME))
        } else if let Some(home) = non_empty("HOME") {
            Ok(PathBuf::from(home)
                .join(".local")
                .join("share")
                .join(Self::FILE_NAME))
        } else {
            Err(HighScoreError::NoDataDir)
        }
    }

    /// Open (creating if needed) the highscore file at `path`
    pub fn open(path: &Path) -> Result<Self, HighScoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let scores = match read_scores(&mut file) {
            Ok(scores) => scores,
            Err(HighScoreError::Parse(e)) => {
                log::warn!("Ignoring corrupt highscore file {}: {}", path.display(), e);
                HighScores::new()
            }
            Err(e) => return Err(e),
        };
        log::info!(
            "Loaded highscores from {} (best {})",
            path.display(),
            scores.best_ever
        );

        Ok(Self {
            file: Some(file),
            scores,
        })
    }

    /// Open the file at `path` (or the default location), or keep scores in
    /// memory only if that fails
    pub fn open_or_memory(path: Option<&Path>) -> Self {
        let opened = match path {
            Some(path) => Self::open(path),
            None => Self::default_path().and_then(|path| Self::open(&path)),
        };
        opened.unwrap_or_else(|e| {
            log::warn!("{e}. Highscores will not be recorded");
            Self::in_memory()
        })
    }

    /// A sink that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            file: None,
            scores: HighScores::new(),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    fn update(&mut self, score: i64) -> Result<(), HighScoreError> {
        let now = Local::now();
        let Some(file) = self.file.as_mut() else {
            self.scores.record(score, &now);
            return Ok(());
        };

        file.lock()?;
        let merged = merge_into_file(file, &mut self.scores, score, &now);
        let unlocked = file.unlock();
        merged?;
        unlocked?;
        Ok(())
    }
}

impl ScoreSink for HighScoreFile {
    fn report_score(&mut self, score: i64) {
        match self.update(score) {
            Ok(()) => log::info!("Highscores saved (best {})", self.scores.best_ever),
            Err(e) => log::warn!("Could not save score {score}: {e}"),
        }
    }

    fn standings(&self) -> Option<HighScores> {
        Some(self.scores)
    }
}

fn read_scores(file: &mut File) -> Result<HighScores, HighScoreError> {
    file.seek(SeekFrom::Start(0))?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    if text.trim().is_empty() {
        return Ok(HighScores::new());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Re-read, merge and rewrite. The caller holds the lock.
fn merge_into_file(
    file: &mut File,
    scores: &mut HighScores,
    score: i64,
    now: &DateTime<Local>,
) -> Result<(), HighScoreError> {
    match read_scores(file) {
        Ok(on_disk) => *scores = on_disk,
        Err(HighScoreError::Parse(e)) => log::warn!("Overwriting corrupt highscore file: {e}"),
        Err(e) => return Err(e),
    }
    scores.record(score, now);

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    serde_json::to_writer_pretty(&mut *file, &*scores)?;
    file.write_all(b"\n")?;
    file.flush()?;
    Ok(())
}
