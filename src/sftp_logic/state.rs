use std::collections::BTreeSet;
use std::path::PathBuf;

use super::remote::Navigator;
use super::types::{FileItem, ListingItem, PanelSide, RemotePath};

/// Browsing state of an open session: the local panel and the remote panel
#[derive(Debug, Clone)]
pub struct AppSftpState {
    /// Currently active panel (local or remote)
    pub active_panel: PanelSide,

    // Local panel state
    pub local_current_path: PathBuf,
    pub local_files: Vec<FileItem>,
    pub local_selected: usize,
    pub local_marked: BTreeSet<String>,

    // Remote panel state
    pub navigator: Navigator,
    pub remote_items: Vec<ListingItem>,
    pub remote_selected: usize,
    pub remote_marked: BTreeSet<String>,
}

impl AppSftpState {
    /// Create browsing state rooted at `remote_root`; nothing is listed yet
    pub fn new(remote_root: RemotePath, local_dir: PathBuf) -> Self {
        Self {
            active_panel: PanelSide::Remote,
            // LOCAL
            local_current_path: local_dir,
            local_files: Vec::new(),
            local_selected: 0,
            local_marked: BTreeSet::new(),

            // REMOTE
            navigator: Navigator::new(remote_root),
            remote_items: Vec::new(),
            remote_selected: 0,
            remote_marked: BTreeSet::new(),
        }
    }

    /// Switch the active panel between local and remote
    pub fn switch_panel(&mut self) {
        self.active_panel = match self.active_panel {
            PanelSide::Local => PanelSide::Remote,
            PanelSide::Remote => PanelSide::Local,
        };
    }

    pub fn navigate_up(&mut self) {
        match self.active_panel {
            PanelSide::Local => self.navigate_local_up(),
            PanelSide::Remote => self.navigate_remote_up(),
        }
    }

    pub fn navigate_down(&mut self) {
        match self.active_panel {
            PanelSide::Local => self.navigate_local_down(),
            PanelSide::Remote => self.navigate_remote_down(),
        }
    }

    pub fn toggle_mark(&mut self) {
        match self.active_panel {
            PanelSide::Local => self.toggle_local_mark(),
            PanelSide::Remote => self.toggle_remote_mark(),
        }
    }

    pub fn current_remote_path(&self) -> &RemotePath {
        self.navigator.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_remote_panel_at_root() {
        let state = AppSftpState::new(RemotePath::new("/storage/brno2/home/alice/"), PathBuf::from("/tmp"));
        assert_eq!(state.active_panel, PanelSide::Remote);
        assert_eq!(state.current_remote_path().as_str(), "/storage/brno2/home/alice");
        assert!(state.remote_items.is_empty());
    }

    #[test]
    fn switch_panel_toggles() {
        let mut state = AppSftpState::new(RemotePath::root(), PathBuf::from("/tmp"));
        state.switch_panel();
        assert_eq!(state.active_panel, PanelSide::Local);
        state.switch_panel();
        assert_eq!(state.active_panel, PanelSide::Remote);
    }
}
