//! Virtual file and working-directory capability
//!
//! A [`VFile`] carries the document through the pipeline: the source text on
//! the way in, the rendered HTML on the way out, plus any diagnostics the
//! stages record. Its working directory comes from a [`WorkingDirectory`]
//! capability handed to the pipeline when it is built, so nothing here reads
//! process-wide state.

use std::fmt;
use std::path::{Path, PathBuf};

/// Supplies the working directory stamped on every virtual file.
pub trait WorkingDirectory: Send + Sync {
    fn cwd(&self) -> PathBuf;
}

/// Working directory that is always the filesystem root.
///
/// Rendering never touches the filesystem, so the directory only serves as
/// the base for resolving file paths in diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootDirectory;

impl WorkingDirectory for RootDirectory {
    fn cwd(&self) -> PathBuf {
        PathBuf::from("/")
    }
}

/// A non-fatal diagnostic recorded by a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMessage {
    pub stage: &'static str,
    pub reason: String,
}

/// Document plus metadata flowing through a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct VFile {
    /// Source text before the run, compiled output after it
    pub value: String,
    pub path: Option<PathBuf>,
    pub cwd: PathBuf,
    pub messages: Vec<VMessage>,
}

impl VFile {
    pub fn new(value: impl Into<String>, directory: &dyn WorkingDirectory) -> Self {
        Self {
            value: value.into(),
            path: None,
            cwd: directory.cwd(),
            messages: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Record a diagnostic against this file.
    pub fn message(&mut self, stage: &'static str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::debug!(stage, %reason, "file message");
        self.messages.push(VMessage { stage, reason });
    }

    /// The file path joined onto the working directory.
    ///
    /// Absolute paths are returned as-is.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(|path| self.cwd.join(path))
    }

    /// Human-readable label for diagnostics.
    pub fn label(&self) -> String {
        match self.resolved_path() {
            Some(path) => path.display().to_string(),
            None => "<input>".to_string(),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl fmt::Display for VFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for VMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.reason)
    }
}
