use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::state::AppSftpState;
use super::types::FileItem;

impl AppSftpState {
    /// Refresh the local file list
    pub fn refresh_local(&mut self) -> Result<()> {
        self.local_files = Self::read_local_directory(&self.local_current_path)?;
        let files = &self.local_files;
        self.local_marked
            .retain(|name| files.iter().any(|item| item.name() == name));
        if self.local_selected >= self.local_files.len() {
            self.local_selected = self.local_files.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Navigate up in the local file list
    pub fn navigate_local_up(&mut self) {
        if self.local_selected > 0 {
            self.local_selected -= 1;
        } else if !self.local_files.is_empty() {
            self.local_selected = self.local_files.len() - 1;
        }
    }

    /// Navigate down in the local file list
    pub fn navigate_local_down(&mut self) {
        if self.local_selected < self.local_files.len().saturating_sub(1) {
            self.local_selected += 1;
        } else {
            self.local_selected = 0;
        }
    }

    /// Open the selected item in the local file list
    pub fn open_local_selected(&mut self) -> Result<()> {
        let target = match self.local_files.get(self.local_selected) {
            Some(FileItem::Directory { name }) if name == ".." => {
                match self.local_current_path.parent() {
                    Some(parent) => parent.to_path_buf(),
                    None => return Ok(()),
                }
            }
            Some(FileItem::Directory { name }) => self.local_current_path.join(name),
            _ => return Ok(()),
        };
        self.change_local_dir(target)
    }

    /// Go up one directory in the local file system
    pub fn go_local_back(&mut self) -> Result<()> {
        match self.local_current_path.parent() {
            Some(parent) => self.change_local_dir(parent.to_path_buf()),
            None => Ok(()),
        }
    }

    /// Moves the panel only once the target has been listed.
    fn change_local_dir(&mut self, target: PathBuf) -> Result<()> {
        let files = Self::read_local_directory(&target)?;
        self.local_current_path = target;
        self.local_files = files;
        self.local_selected = 0;
        self.local_marked.clear();
        Ok(())
    }

    pub fn toggle_local_mark(&mut self) {
        if let Some(FileItem::File { name, .. }) = self.local_files.get(self.local_selected) {
            if !self.local_marked.remove(name) {
                self.local_marked.insert(name.clone());
            }
        }
    }

    /// Marked local files, or the file under the cursor.
    pub fn selected_local_files(&self) -> Vec<PathBuf> {
        self.local_files
            .iter()
            .enumerate()
            .filter(|(i, item)| {
                matches!(item, FileItem::File { .. })
                    && if self.local_marked.is_empty() {
                        *i == self.local_selected
                    } else {
                        self.local_marked.contains(item.name())
                    }
            })
            .map(|(_, item)| self.local_current_path.join(item.name()))
            .collect()
    }

    /// Read the contents of a local directory
    fn read_local_directory(path: &Path) -> Result<Vec<FileItem>> {
        let mut items = Vec::new();

        // Add parent directory entry if not at root
        if path.parent().is_some() {
            items.push(FileItem::Directory {
                name: "..".to_string(),
            });
        }

        let entries = fs::read_dir(path)
            .with_context(|| format!("Failed to read local directory {}", path.display()))?;

        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", file_name, e);
                    continue;
                }
            };

            if metadata.is_dir() {
                items.push(FileItem::Directory { name: file_name });
            } else {
                items.push(FileItem::File {
                    name: file_name,
                    size: metadata.len(),
                });
            }
        }

        // Sort: directories first, then files, both alphabetically
        items.sort_by(|a, b| {
            use std::cmp::Ordering;
            match (a, b) {
                (FileItem::Directory { name: name_a }, FileItem::Directory { name: name_b }) => {
                    if name_a == ".." {
                        Ordering::Less
                    } else if name_b == ".." {
                        Ordering::Greater
                    } else {
                        name_a.to_lowercase().cmp(&name_b.to_lowercase())
                    }
                }
                (FileItem::Directory { .. }, FileItem::File { .. }) => Ordering::Less,
                (FileItem::File { .. }, FileItem::Directory { .. }) => Ordering::Greater,
                (FileItem::File { name: name_a, .. }, FileItem::File { name: name_b, .. }) => {
                    name_a.to_lowercase().cmp(&name_b.to_lowercase())
                }
            }
        });

        Ok(items)
    }
}
