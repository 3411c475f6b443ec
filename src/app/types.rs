use std::time::Instant;

use crate::config::AppConfig;
use crate::models::StorageLocation;
use crate::sftp_logic::{AppSftpState, DirectoryEntry};
use crate::ssh::RemoteSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Login,
    Browse,
    Prompt,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Location,
    Username,
    Password,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::Location => LoginField::Username,
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Location,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            LoginField::Location => LoginField::Password,
            LoginField::Username => LoginField::Location,
            LoginField::Password => LoginField::Username,
        }
    }
}

/// Credentials being typed on the login screen.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub location_index: usize,
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Rename { original: String },
    Mkdir,
}

/// A single-line text input shown over the browser.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn title(&self) -> String {
        match &self.kind {
            PromptKind::Rename { original } => format!("Rename {}", original),
            PromptKind::Mkdir => "New folder name".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub config: AppConfig,
    pub locations: Vec<StorageLocation>,
    pub input_mode: InputMode,

    pub status_message: Option<(String, Instant)>,

    // Login
    pub login: LoginForm,
    pub is_connecting: bool,

    // Connected
    pub session: Option<RemoteSession>,
    pub sftp_state: Option<AppSftpState>,
    pub quota_line: Option<String>,

    // Dialogs
    pub prompt: Option<Prompt>,
    pub pending_delete: Vec<DirectoryEntry>,
    pub show_help: bool,
    pub help_scroll_position: u16,
}
