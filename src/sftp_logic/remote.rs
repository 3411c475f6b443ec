use std::cmp::Ordering;

use super::state::AppSftpState;
use super::types::{DirectoryEntry, ListingItem, RemoteFs, RemotePath};
use crate::error::BrowseError;

/// Tracks the current remote directory below a fixed root.
#[derive(Debug, Clone)]
pub struct Navigator {
    root: RemotePath,
    current: RemotePath,
}

impl Navigator {
    pub fn new(root: RemotePath) -> Self {
        Self {
            current: root.clone(),
            root,
        }
    }

    pub fn current(&self) -> &RemotePath {
        &self.current
    }

    pub fn shows_go_up(&self) -> bool {
        offers_go_up(&self.current, &self.root)
    }

    pub fn descend(&mut self, name: &str) {
        self.current = self.current.join(name);
    }

    /// Moves to the parent directory. Refuses at the configured root.
    pub fn ascend(&mut self) -> bool {
        if !self.shows_go_up() {
            return false;
        }
        self.current = self.current.parent();
        true
    }

    /// Follows a listing row. Returns whether the current path changed.
    pub fn enter(&mut self, item: &ListingItem) -> bool {
        match item {
            ListingItem::GoUp => self.ascend(),
            ListingItem::Entry(entry) if entry.is_dir() => {
                self.descend(&entry.name);
                true
            }
            ListingItem::Entry(_) => false,
        }
    }

    pub async fn list<F: RemoteFs + ?Sized>(
        &self,
        fs: &F,
    ) -> Result<Vec<ListingItem>, BrowseError> {
        let entries = fs.read_dir(&self.current).await?;
        tracing::debug!("Listed {} entries in {}", entries.len(), self.current);
        Ok(arrange_listing(entries, self.shows_go_up()))
    }
}

/// The "go up" row is hidden at the configured root and at `/`.
pub fn offers_go_up(path: &RemotePath, root: &RemotePath) -> bool {
    !path.is_root() && path != root
}

/// Drops hidden entries, sorts case-insensitively and prepends the
/// "go up" row when requested.
pub fn arrange_listing(entries: Vec<DirectoryEntry>, go_up: bool) -> Vec<ListingItem> {
    let mut visible: Vec<DirectoryEntry> = entries
        .into_iter()
        .filter(|entry| !entry.is_hidden())
        .collect();
    visible.sort_by(compare_names);

    let mut items = Vec::with_capacity(visible.len() + 1);
    if go_up {
        items.push(ListingItem::GoUp);
    }
    items.extend(visible.into_iter().map(ListingItem::Entry));
    items
}

fn compare_names(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

impl AppSftpState {
    /// Refresh the remote file list
    pub async fn refresh_remote<F: RemoteFs + ?Sized>(&mut self, fs: &F) -> Result<(), BrowseError> {
        self.remote_items = self.navigator.list(fs).await?;
        self.remote_marked.retain(|name| {
            self.remote_items
                .iter()
                .any(|item| item.entry().map(|e| &e.name) == Some(name))
        });
        if self.remote_selected >= self.remote_items.len() {
            self.remote_selected = self.remote_items.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Navigate up in the remote file list
    pub fn navigate_remote_up(&mut self) {
        if self.remote_selected > 0 {
            self.remote_selected -= 1;
        } else if !self.remote_items.is_empty() {
            self.remote_selected = self.remote_items.len() - 1;
        }
    }

    /// Navigate down in the remote file list
    pub fn navigate_remote_down(&mut self) {
        if self.remote_selected < self.remote_items.len().saturating_sub(1) {
            self.remote_selected += 1;
        } else {
            self.remote_selected = 0;
        }
    }

    /// Open the selected row: enter a directory or go up
    pub async fn open_remote_selected<F: RemoteFs + ?Sized>(
        &mut self,
        fs: &F,
    ) -> Result<(), BrowseError> {
        let previous = self.navigator.clone();
        let moved = match self.remote_items.get(self.remote_selected) {
            Some(item) => self.navigator.enter(item),
            None => false,
        };
        if moved {
            self.relist_after_move(fs, previous).await?;
        }
        Ok(())
    }

    /// Go up one directory on the remote side
    pub async fn go_remote_back<F: RemoteFs + ?Sized>(&mut self, fs: &F) -> Result<(), BrowseError> {
        let previous = self.navigator.clone();
        if self.navigator.ascend() {
            self.relist_after_move(fs, previous).await?;
        }
        Ok(())
    }

    async fn relist_after_move<F: RemoteFs + ?Sized>(
        &mut self,
        fs: &F,
        previous: Navigator,
    ) -> Result<(), BrowseError> {
        match self.navigator.list(fs).await {
            Ok(items) => {
                self.remote_items = items;
                self.remote_selected = 0;
                self.remote_marked.clear();
                Ok(())
            }
            Err(e) => {
                // Stay where the last good listing was taken.
                tracing::warn!("Failed to open {}: {}", self.navigator.current(), e);
                self.navigator = previous;
                Err(e)
            }
        }
    }

    pub fn toggle_remote_mark(&mut self) {
        if let Some(ListingItem::Entry(entry)) = self.remote_items.get(self.remote_selected) {
            if !self.remote_marked.remove(&entry.name) {
                self.remote_marked.insert(entry.name.clone());
            }
        }
    }

    /// Marked entries in listing order, or the entry under the cursor.
    pub fn selected_remote_entries(&self) -> Vec<DirectoryEntry> {
        if self.remote_marked.is_empty() {
            return self
                .remote_items
                .get(self.remote_selected)
                .and_then(|item| item.entry())
                .cloned()
                .into_iter()
                .collect();
        }
        self.remote_items
            .iter()
            .filter_map(|item| item.entry())
            .filter(|entry| self.remote_marked.contains(&entry.name))
            .cloned()
            .collect()
    }
}
