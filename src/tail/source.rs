//! This module provides an interface and implementation for reading the
//! tailed log file.
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a log source.
#[derive(Debug, Error)]
pub enum TailError {
    /// The source exists but could not be read.
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A trait for line-oriented log sources.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// A human-readable name for the source, shown in the status bar.
    fn describe(&self) -> String;

    /// Reads every complete line currently in the source.
    ///
    /// # Returns
    ///
    /// `None` if the source does not exist yet.
    ///
    /// # Errors
    ///
    /// This function will return an error if the source exists but cannot
    /// be read.
    async fn read_lines(&self) -> Result<Option<Vec<String>>, TailError>;
}

/// A `LogSource` backed by a plain-text file on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LogSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_lines(&self) -> Result<Option<Vec<String>>, TailError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(complete_lines(&String::from_utf8_lossy(&bytes)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TailError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Splits `content` into newline-terminated lines.
///
/// A trailing segment without a newline is still being written and is left
/// out; it shows up on a later read once its newline lands.
pub fn complete_lines(content: &str) -> Vec<String> {
    let mut segments: Vec<&str> = content.split('\n').collect();
    // The last segment is either empty or an unterminated line.
    segments.pop();
    segments
        .into_iter()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
