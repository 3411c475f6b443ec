use std::path::{Path, PathBuf};

use super::types::{
    BatchKind, BatchOutcome, DirectoryEntry, ItemFailure, OpStatus, RemoteFs, RemotePath,
    TransferProgress,
};
use crate::error::BrowseError;

/// Runs file operations against the remote directory `cwd`.
pub struct FileOps<'a, F: RemoteFs + ?Sized> {
    fs: &'a F,
    cwd: &'a RemotePath,
}

impl<'a, F: RemoteFs + ?Sized> FileOps<'a, F> {
    pub fn new(fs: &'a F, cwd: &'a RemotePath) -> Self {
        Self { fs, cwd }
    }

    /// Upload local files into the current directory.
    ///
    /// Stops at the first failing file; files uploaded before it stay.
    pub async fn upload(
        &self,
        local_paths: &[PathBuf],
        mut progress: impl FnMut(&TransferProgress),
    ) -> BatchOutcome {
        let total = local_paths.len();
        let mut outcome = BatchOutcome::new(BatchKind::Upload, total);

        for (i, local) in local_paths.iter().enumerate() {
            let name = match local.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => {
                    let error = BrowseError::local_io(
                        local,
                        std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file"),
                    );
                    outcome.failed.push(ItemFailure {
                        name: local.display().to_string(),
                        error,
                    });
                    break;
                }
            };

            progress(&TransferProgress {
                kind: BatchKind::Upload,
                index: i + 1,
                total,
                name: name.clone(),
            });

            let remote = self.cwd.join(&name);
            match self.fs.upload(local, &remote).await {
                Ok(bytes) => {
                    tracing::info!("Uploaded {} ({} bytes) to {}", local.display(), bytes, remote);
                    outcome.completed.push(name);
                }
                Err(error) => {
                    tracing::error!("Upload of {} failed: {}", local.display(), error);
                    outcome.failed.push(ItemFailure { name, error });
                    break;
                }
            }
        }

        outcome
    }

    /// Download the selected entries into `dest`, mirroring directories.
    ///
    /// A failing item does not stop the rest of the batch.
    pub async fn download(
        &self,
        selected: &[DirectoryEntry],
        dest: &Path,
        mut progress: impl FnMut(&TransferProgress),
    ) -> BatchOutcome {
        let total = selected.len();
        let mut outcome = BatchOutcome::new(BatchKind::Download, total);
        outcome.destination = Some(dest.to_path_buf());

        for (i, entry) in selected.iter().enumerate() {
            progress(&TransferProgress {
                kind: BatchKind::Download,
                index: i + 1,
                total,
                name: entry.name.clone(),
            });

            let remote = self.cwd.join(&entry.name);
            let local = dest.join(&entry.name);
            let result = if entry.is_dir() {
                self.mirror_dir(&remote, &local).await
            } else {
                self.fs.download(&remote, &local).await.map(|_| ())
            };

            match result {
                Ok(()) => {
                    tracing::info!("Downloaded {} to {}", remote, local.display());
                    outcome.completed.push(entry.name.clone());
                }
                Err(error) => {
                    tracing::error!("Download of {} failed: {}", remote, error);
                    outcome.failed.push(ItemFailure {
                        name: entry.name.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Copy the tree under `remote` into `local`, depth-first.
    async fn mirror_dir(&self, remote: &RemotePath, local: &Path) -> Result<(), BrowseError> {
        let mut stack = vec![(remote.clone(), local.to_path_buf())];

        while let Some((remote_dir, local_dir)) = stack.pop() {
            tokio::fs::create_dir_all(&local_dir)
                .await
                .map_err(|e| BrowseError::local_io(&local_dir, e))?;

            for child in self.fs.read_dir(&remote_dir).await? {
                if child.name == "." || child.name == ".." {
                    continue;
                }
                let remote_child = remote_dir.join(&child.name);
                let local_child = local_dir.join(&child.name);
                if child.is_dir() {
                    stack.push((remote_child, local_child));
                } else {
                    let bytes = self.fs.download(&remote_child, &local_child).await?;
                    tracing::debug!("Fetched {} ({} bytes)", remote_child, bytes);
                }
            }
        }

        Ok(())
    }

    /// Rename `old` to the trimmed `new_name` inside the current directory.
    pub async fn rename(&self, old: &str, new_name: &str) -> Result<OpStatus, BrowseError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(OpStatus::Skipped("Please enter a new name.".to_string()));
        }
        if new_name == old {
            return Ok(OpStatus::Skipped("Name unchanged.".to_string()));
        }

        let from = self.cwd.join(old);
        let to = self.cwd.join(new_name);
        self.fs.rename(&from, &to).await?;
        tracing::info!("Renamed {} to {}", from, to);
        Ok(OpStatus::Done(format!("Renamed {} to {}.", old, new_name)))
    }

    /// Delete the selected entries. Directories must be empty.
    pub async fn delete(
        &self,
        selected: &[DirectoryEntry],
        mut progress: impl FnMut(&TransferProgress),
    ) -> BatchOutcome {
        let total = selected.len();
        let mut outcome = BatchOutcome::new(BatchKind::Delete, total);

        for (i, entry) in selected.iter().enumerate() {
            progress(&TransferProgress {
                kind: BatchKind::Delete,
                index: i + 1,
                total,
                name: entry.name.clone(),
            });

            let path = self.cwd.join(&entry.name);
            let result = if entry.is_dir() {
                self.fs.remove_dir(&path).await
            } else {
                self.fs.remove_file(&path).await
            };

            match result {
                Ok(()) => {
                    tracing::info!("Deleted {}", path);
                    outcome.completed.push(entry.name.clone());
                }
                Err(error) => {
                    tracing::warn!("Could not delete {}: {}", path, error);
                    outcome.failed.push(ItemFailure {
                        name: entry.name.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Create a directory named `name` in the current directory.
    pub async fn mkdir(&self, name: &str) -> Result<OpStatus, BrowseError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(OpStatus::Skipped("Please enter a folder name.".to_string()));
        }

        let path = self.cwd.join(name);
        self.fs.create_dir(&path).await?;
        tracing::info!("Created directory {}", path);
        Ok(OpStatus::Done(format!("Created folder {}.", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sftp_logic::memfs::MemFs;
    use crate::sftp_logic::types::EntryKind;
    use std::fs;
    use tempfile::tempdir;

    const HOME: &str = "/storage/brno2/home/alice";

    fn file(name: &str) -> DirectoryEntry {
        DirectoryEntry::new(name, EntryKind::File)
    }

    fn dir(name: &str) -> DirectoryEntry {
        DirectoryEntry::new(name, EntryKind::Directory)
    }

    #[tokio::test]
    async fn upload_stops_at_first_failure() {
        let local = tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a.txt", "b.txt", "c.txt", "d.txt"]
            .iter()
            .map(|name| {
                let path = local.path().join(name);
                fs::write(&path, *name).unwrap();
                path
            })
            .collect();

        let remote = MemFs::new()
            .with_dir(HOME)
            .failing_on(&format!("{}/c.txt", HOME));
        let cwd = RemotePath::new(HOME);
        let mut seen = Vec::new();
        let outcome = FileOps::new(&remote, &cwd)
            .upload(&paths, |p| seen.push(p.to_string()))
            .await;

        assert_eq!(outcome.completed, vec!["a.txt", "b.txt"]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].name, "c.txt");
        assert_eq!(outcome.skipped(), 1);
        assert!(remote.exists(&format!("{}/a.txt", HOME)));
        assert!(remote.exists(&format!("{}/b.txt", HOME)));
        assert!(!remote.exists(&format!("{}/c.txt", HOME)));
        assert!(!remote.exists(&format!("{}/d.txt", HOME)));
        assert_eq!(seen.last().map(String::as_str), Some("Uploading 3/4: c.txt"));
    }

    #[tokio::test]
    async fn upload_writes_contents_under_basename() {
        let local = tempdir().unwrap();
        let path = local.path().join("results.csv");
        fs::write(&path, "1,2,3").unwrap();

        let remote = MemFs::new().with_dir(HOME);
        let cwd = RemotePath::new(HOME);
        let outcome = FileOps::new(&remote, &cwd).upload(&[path], |_| {}).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "Uploaded 1 file(s) successfully.");
        assert_eq!(
            remote.contents(&format!("{}/results.csv", HOME)).as_deref(),
            Some("1,2,3")
        );
    }

    #[tokio::test]
    async fn download_continues_past_a_failure() {
        let remote = MemFs::new()
            .with_file(&format!("{}/one.txt", HOME), "1")
            .with_file(&format!("{}/two.txt", HOME), "2")
            .with_file(&format!("{}/three.txt", HOME), "3")
            .failing_on(&format!("{}/two.txt", HOME));
        let cwd = RemotePath::new(HOME);
        let dest = tempdir().unwrap();

        let selected = vec![file("one.txt"), file("two.txt"), file("three.txt")];
        let outcome = FileOps::new(&remote, &cwd)
            .download(&selected, dest.path(), |_| {})
            .await;

        assert_eq!(outcome.completed, vec!["one.txt", "three.txt"]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].name, "two.txt");
        assert!(dest.path().join("one.txt").exists());
        assert!(!dest.path().join("two.txt").exists());
        assert!(dest.path().join("three.txt").exists());
    }

    #[tokio::test]
    async fn download_mirrors_directories_including_hidden_files() {
        let remote = MemFs::new()
            .with_file(&format!("{}/run/out.log", HOME), "log")
            .with_file(&format!("{}/run/.env", HOME), "secret")
            .with_file(&format!("{}/run/nested/deep.dat", HOME), "deep")
            .with_dir(&format!("{}/run/empty", HOME));
        let cwd = RemotePath::new(HOME);
        let dest = tempdir().unwrap();

        let outcome = FileOps::new(&remote, &cwd)
            .download(&[dir("run")], dest.path(), |_| {})
            .await;

        assert!(outcome.is_success());
        let root = dest.path().join("run");
        assert_eq!(fs::read_to_string(root.join("out.log")).unwrap(), "log");
        assert_eq!(fs::read_to_string(root.join(".env")).unwrap(), "secret");
        assert_eq!(
            fs::read_to_string(root.join("nested").join("deep.dat")).unwrap(),
            "deep"
        );
        assert!(root.join("empty").is_dir());
    }

    #[tokio::test]
    async fn delete_leaves_non_empty_directory() {
        let remote = MemFs::new()
            .with_file(&format!("{}/full/keep.txt", HOME), "k")
            .with_dir(&format!("{}/empty", HOME))
            .with_file(&format!("{}/old.txt", HOME), "o");
        let cwd = RemotePath::new(HOME);

        let selected = vec![dir("full"), dir("empty"), file("old.txt")];
        let outcome = FileOps::new(&remote, &cwd).delete(&selected, |_| {}).await;

        assert_eq!(outcome.completed, vec!["empty", "old.txt"]);
        assert_eq!(outcome.failed.len(), 1);
        assert!(matches!(outcome.failed[0].error, BrowseError::NotEmpty(_)));
        assert!(remote.is_dir(&format!("{}/full", HOME)));
        assert!(remote.exists(&format!("{}/full/keep.txt", HOME)));
        assert!(!remote.exists(&format!("{}/empty", HOME)));
        assert!(!remote.exists(&format!("{}/old.txt", HOME)));
    }

    #[tokio::test]
    async fn mkdir_reports_existing_name() {
        let remote = MemFs::new().with_dir(&format!("{}/data", HOME));
        let cwd = RemotePath::new(HOME);
        let ops = FileOps::new(&remote, &cwd);

        let err = ops.mkdir("data").await.unwrap_err();
        assert!(matches!(err, BrowseError::AlreadyExists(_)));

        let status = ops.mkdir("  fresh ").await.unwrap();
        assert!(status.changed_remote());
        assert!(remote.is_dir(&format!("{}/fresh", HOME)));
    }

    #[tokio::test]
    async fn rename_trims_and_reports_collisions() {
        let remote = MemFs::new()
            .with_file(&format!("{}/draft.txt", HOME), "d")
            .with_file(&format!("{}/final.txt", HOME), "f");
        let cwd = RemotePath::new(HOME);
        let ops = FileOps::new(&remote, &cwd);

        let err = ops.rename("draft.txt", "final.txt").await.unwrap_err();
        assert!(matches!(err, BrowseError::AlreadyExists(_)));

        let status = ops.rename("draft.txt", " report.txt ").await.unwrap();
        assert_eq!(status.message(), "Renamed draft.txt to report.txt.");
        assert_eq!(remote.calls(), 2);
        assert!(remote.exists(&format!("{}/report.txt", HOME)));
        assert!(!remote.exists(&format!("{}/draft.txt", HOME)));
    }

    #[tokio::test]
    async fn missing_input_makes_no_remote_call() {
        let remote = MemFs::new().with_dir(HOME).failing_on(HOME);
        let cwd = RemotePath::new(HOME);
        let ops = FileOps::new(&remote, &cwd);
        let mut calls = 0;

        let upload = ops.upload(&[], |_| calls += 1).await;
        assert_eq!(upload.message(), "No files selected for upload.");
        let delete = ops.delete(&[], |_| calls += 1).await;
        assert_eq!(delete.message(), "Please select files or folders to delete.");
        assert_eq!(calls, 0);

        let status = ops.mkdir("   ").await.unwrap();
        assert_eq!(status, OpStatus::Skipped("Please enter a folder name.".to_string()));
        let status = ops.rename("a.txt", "").await.unwrap();
        assert!(!status.changed_remote());
        let status = ops.rename("a.txt", " a.txt ").await.unwrap();
        assert!(!status.changed_remote());

        let dest = tempdir().unwrap();
        let download = ops.download(&[], dest.path(), |_| calls += 1).await;
        assert_eq!(download.completed.len(), 0);
        assert_eq!(calls, 0);
        assert_eq!(remote.calls(), 0);
    }
}
