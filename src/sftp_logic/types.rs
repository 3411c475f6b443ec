use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::BrowseError;

/// Represents a file or directory item in the local file browser
#[derive(Debug, Clone)]
pub enum FileItem {
    Directory { name: String },
    File { name: String, size: u64 },
}

impl FileItem {
    pub fn name(&self) -> &str {
        match self {
            FileItem::Directory { name } => name,
            FileItem::File { name, .. } => name,
        }
    }
}

/// Represents which panel (local or remote) is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSide {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Permission and type bits as reported by the server, if any.
    pub raw_mode: Option<u32>,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            raw_mode: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// A row of the remote panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingItem {
    GoUp,
    Entry(DirectoryEntry),
}

impl ListingItem {
    pub fn entry(&self) -> Option<&DirectoryEntry> {
        match self {
            ListingItem::GoUp => None,
            ListingItem::Entry(entry) => Some(entry),
        }
    }
}

/// Forward-slash delimited remote location.
///
/// Never ends with a slash unless it is the filesystem root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim_end_matches('/');
        if trimmed.is_empty() {
            Self::root()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the child `name` inside this directory.
    pub fn join(&self, name: &str) -> RemotePath {
        let name = name.trim_matches('/');
        if self.is_root() {
            Self(format!("/{}", name))
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    /// Drop the last segment; shallow paths fall back to the root.
    pub fn parent(&self) -> RemotePath {
        match self.0.rfind('/') {
            Some(0) | None => Self::root(),
            Some(idx) => Self(self.0[..idx].to_string()),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote filesystem operations the browser needs.
///
/// The SFTP session implements this; every call is a single round of
/// blocking-style work from the caller's point of view.
#[async_trait]
pub trait RemoteFs: Send + Sync {
    async fn read_dir(&self, path: &RemotePath) -> Result<Vec<DirectoryEntry>, BrowseError>;

    async fn upload(&self, local: &Path, remote: &RemotePath) -> Result<u64, BrowseError>;

    async fn download(&self, remote: &RemotePath, local: &Path) -> Result<u64, BrowseError>;

    async fn rename(&self, from: &RemotePath, to: &RemotePath) -> Result<(), BrowseError>;

    async fn remove_file(&self, path: &RemotePath) -> Result<(), BrowseError>;

    /// Removes an empty directory; fails with `NotEmpty` otherwise.
    async fn remove_dir(&self, path: &RemotePath) -> Result<(), BrowseError>;

    /// Fails with `AlreadyExists` when the name is taken.
    async fn create_dir(&self, path: &RemotePath) -> Result<(), BrowseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Upload,
    Download,
    Delete,
}

impl BatchKind {
    pub fn verb(&self) -> &'static str {
        match self {
            BatchKind::Upload => "Uploading",
            BatchKind::Download => "Downloading",
            BatchKind::Delete => "Deleting",
        }
    }
}

/// Reported before each item of a batch is processed.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    pub kind: BatchKind,
    pub index: usize,
    pub total: usize,
    pub name: String,
}

impl fmt::Display for TransferProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}: {}",
            self.kind.verb(),
            self.index,
            self.total,
            self.name
        )
    }
}

#[derive(Debug)]
pub struct ItemFailure {
    pub name: String,
    pub error: BrowseError,
}

/// Result of a batch operation over several items.
#[derive(Debug)]
pub struct BatchOutcome {
    pub kind: BatchKind,
    pub total: usize,
    pub completed: Vec<String>,
    pub failed: Vec<ItemFailure>,
    pub destination: Option<PathBuf>,
}

impl BatchOutcome {
    pub fn new(kind: BatchKind, total: usize) -> Self {
        Self {
            kind,
            total,
            completed: Vec::new(),
            failed: Vec::new(),
            destination: None,
        }
    }

    /// Items never attempted because the batch stopped early.
    pub fn skipped(&self) -> usize {
        self.total - self.completed.len() - self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.total > 0 && self.failed.is_empty()
    }

    /// Whether anything on the remote side may have changed.
    pub fn touched_remote(&self) -> bool {
        self.kind != BatchKind::Download && !self.completed.is_empty()
    }

    /// Status bar text for this outcome.
    pub fn message(&self) -> String {
        if self.total == 0 {
            return match self.kind {
                BatchKind::Upload => "No files selected for upload.".to_string(),
                BatchKind::Download => "No items selected for download.".to_string(),
                BatchKind::Delete => "Please select files or folders to delete.".to_string(),
            };
        }

        match self.kind {
            BatchKind::Upload => match self.failed.first() {
                Some(failure) => format!(
                    "Failed to upload {}: {} ({} uploaded, {} skipped)",
                    failure.name,
                    failure.error,
                    self.completed.len(),
                    self.skipped()
                ),
                None => format!("Uploaded {} file(s) successfully.", self.completed.len()),
            },
            BatchKind::Download => {
                let dest = self
                    .destination
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                if self.failed.is_empty() {
                    format!("Downloaded {} item(s) to {}", self.completed.len(), dest)
                } else {
                    format!(
                        "Downloaded {}/{} item(s) to {}; failed: {}",
                        self.completed.len(),
                        self.total,
                        dest,
                        self.failure_summary()
                    )
                }
            }
            BatchKind::Delete => {
                if self.failed.is_empty() {
                    format!("Deleted {} item(s).", self.completed.len())
                } else {
                    format!(
                        "Deleted {}/{} item(s); failed: {}",
                        self.completed.len(),
                        self.total,
                        self.failure_summary()
                    )
                }
            }
        }
    }

    fn failure_summary(&self) -> String {
        self.failed
            .iter()
            .map(|f| format!("{} ({})", f.name, f.error))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of a single-target operation such as rename or mkdir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus {
    Done(String),
    /// Missing input; nothing was sent to the server.
    Skipped(String),
}

impl OpStatus {
    pub fn message(&self) -> &str {
        match self {
            OpStatus::Done(msg) | OpStatus::Skipped(msg) => msg,
        }
    }

    pub fn changed_remote(&self) -> bool {
        matches!(self, OpStatus::Done(_))
    }
}
