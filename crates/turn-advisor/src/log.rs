//! Advisory log in JSON Lines format.
//!
//! One [`Advisory`] per line, so a log can be tailed while an encounter runs
//! and replayed afterwards.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::advisory::Advisory;
use crate::host::MessageSink;

/// Errors that can occur while writing or reading the advisory log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Appends advisories to a `.jsonl` file.
#[derive(Debug)]
pub struct AdvisoryLogWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl AdvisoryLogWriter {
    /// Opens the log for appending, creating parent directories and the file if needed.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Writes one advisory as a single JSON line.
    pub fn write(&mut self, advisory: &Advisory) -> Result<(), LogError> {
        let json = serde_json::to_string(advisory)?;
        writeln!(self.writer, "{}", json)?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of advisories written through this writer.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MessageSink for AdvisoryLogWriter {
    fn deliver(&mut self, advisory: &Advisory) {
        if let Err(e) = self.write(advisory) {
            tracing::warn!("Failed to log advisory {}: {}", advisory.advisory_id, e);
        }
    }
}

/// Reads advisories back from a `.jsonl` log.
#[derive(Debug)]
pub struct AdvisoryLogReader {
    path: PathBuf,
}

impl AdvisoryLogReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Reads every advisory, skipping blank lines.
    pub fn read_all(&self) -> Result<Vec<Advisory>, LogError> {
        let content = fs::read_to_string(&self.path)?;
        let mut advisories = Vec::new();

        for line in content.lines() {
            if !line.trim().is_empty() {
                advisories.push(serde_json::from_str(line)?);
            }
        }

        Ok(advisories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_events::EncounterId;
    use tempfile::tempdir;

    fn advisory(seq: u64) -> Advisory {
        Advisory::new(
            crate::advisory::generate_advisory_id(1, seq),
            EncounterId::generate(),
            "tok_wolf",
            "Move: Move up to 10 spaces toward Aria\nReaction: Dire Wolf attacks closest target",
        )
        .with_round(1)
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("advisories.jsonl");

        let mut writer = AdvisoryLogWriter::open(&path).unwrap();
        writer.write(&advisory(0)).unwrap();
        writer.deliver(&advisory(1));
        writer.flush().unwrap();
        assert_eq!(writer.written(), 2);
        assert_eq!(writer.path(), path.as_path());

        let read = AdvisoryLogReader::new(&path).read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].advisory_id, "adv_1_0000");
        assert!(read[1].content.contains('\n'));
    }

    #[test]
    fn test_open_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("advisories.jsonl");

        for seq in 0..2 {
            let mut writer = AdvisoryLogWriter::open(&path).unwrap();
            writer.write(&advisory(seq)).unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(AdvisoryLogReader::new(&path).read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_reader_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("advisories.jsonl");
        fs::write(&path, "not json\n").unwrap();

        let err = AdvisoryLogReader::new(&path).read_all().unwrap_err();
        assert!(matches!(err, LogError::Json(_)));
    }

    #[test]
    fn test_reader_missing_file() {
        let err = AdvisoryLogReader::new(Path::new("/nonexistent/log.jsonl"))
            .read_all()
            .unwrap_err();
        assert!(matches!(err, LogError::Io(_)));
    }
}
