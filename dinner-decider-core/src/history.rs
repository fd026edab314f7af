//! Rolling log of recently suggested meals
//!
//! Stored as plain UTF-8 text, one meal name per line, most recent last.
//! Only one process is expected to write the file at a time.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Canonical number of meals remembered
pub const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to persist meal history to {path}: {source}")]
    PersistenceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HistoryError {
    fn persistence(path: &Path, source: std::io::Error) -> Self {
        Self::PersistenceFailed { path: path.to_path_buf(), source }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every remembered meal, oldest first.
    ///
    /// A missing or unreadable file counts as an empty history.
    pub async fn read_all(&self) -> Vec<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Ignoring unreadable meal history {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Append `entry` and keep only the newest `capacity` entries.
    ///
    /// The file is rewritten through a sibling temp file and a rename. Returns
    /// the history as persisted.
    pub async fn append_and_trim(
        &self,
        entry: &str,
        capacity: usize,
    ) -> Result<Vec<String>, HistoryError> {
        let mut entries = self.read_all().await;

        // One entry per line, so newlines inside a name cannot survive
        let entry = regex_utils::whitespace::collapse(entry);
        if !entry.is_empty() {
            entries.push(entry);
        }

        let overflow = entries.len().saturating_sub(capacity);
        entries.drain(..overflow);

        self.write_all(&entries).await?;
        debug!("Meal history now holds {} entries", entries.len());

        Ok(entries)
    }

    /// Forget every remembered meal
    pub async fn clear(&self) -> Result<(), HistoryError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HistoryError::persistence(&self.path, e)),
        }
    }

    async fn write_all(&self, entries: &[String]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HistoryError::persistence(&self.path, e))?;
        }

        let mut content = String::new();
        for entry in entries {
            content.push_str(entry);
            content.push('\n');
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| HistoryError::persistence(&self.path, e))?;

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(HistoryError::persistence(&self.path, e));
        }

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
