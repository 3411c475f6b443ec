use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::{backend::Backend, Terminal};
use secrecy::SecretString;

use crate::app::types::{App, InputMode, LoginField, LoginForm};
use crate::config::AppConfig;
use crate::models::{find_location, StorageLocation};
use crate::quota;
use crate::sftp_logic::AppSftpState;
use crate::ssh::{self, ConnectParams};
use crate::ui;

/// How long a status line stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(8);

impl App {
    pub fn new(config: AppConfig, username: Option<String>) -> Result<Self> {
        let locations = config.all_locations();
        let default_location = find_location(&locations, &config.default_location)?;
        let location_index = locations
            .iter()
            .position(|l| l.name == default_location.name)
            .unwrap_or_default();

        let focus = if username.is_some() {
            LoginField::Password
        } else {
            LoginField::Username
        };

        Ok(Self {
            should_quit: false,
            config,
            locations,
            input_mode: InputMode::Login,
            status_message: None,
            login: LoginForm {
                location_index,
                username: username.unwrap_or_default(),
                password: String::new(),
                focus,
            },
            is_connecting: false,
            session: None,
            sftp_state: None,
            quota_line: None,
            prompt: None,
            pending_delete: Vec::new(),
            show_help: false,
            help_scroll_position: 0,
        })
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Status: {}", message);
        self.status_message = Some((message, Instant::now()));
    }

    /// The status line, unless it has expired.
    pub fn current_status(&self) -> Option<&str> {
        match &self.status_message {
            Some((message, at)) if self.is_connecting || at.elapsed() < STATUS_TTL => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    pub fn selected_location(&self) -> Option<&StorageLocation> {
        self.locations.get(self.login.location_index)
    }

    pub fn cycle_location(&mut self, forward: bool) {
        let total = self.locations.len();
        if total == 0 {
            return;
        }
        self.login.location_index = if forward {
            (self.login.location_index + 1) % total
        } else {
            (self.login.location_index + total - 1) % total
        };
    }

    /// Connect with the login form's credentials and list the storage root.
    pub async fn connect<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let username = self.login.username.trim().to_string();
        if username.is_empty() || self.login.password.is_empty() {
            self.set_status("Please enter username and password.");
            return Ok(());
        }
        let Some(location) = self.selected_location().cloned() else {
            self.set_status("No storage location configured.");
            return Ok(());
        };
        let root_path = location.root_path(&username);

        self.is_connecting = true;
        self.set_status(format!("Connecting to {}...", self.config.host));
        terminal.draw(|f| ui::draw(f, self))?;

        let params = ConnectParams {
            host: self.config.host.clone(),
            port: self.config.port,
            username: username.clone(),
            password: SecretString::from(std::mem::take(&mut self.login.password)),
            root_path: root_path.clone(),
            timeout: self.config.connect_timeout(),
        };
        let session = match ssh::connect(&params).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Connection to {} failed: {}", self.config.host, e);
                self.is_connecting = false;
                self.set_status(format!("Connection failed: {}", e));
                return Ok(());
            }
        };

        self.quota_line = if self.config.fetch_quota {
            match session.read_banner(self.config.banner_wait()).await {
                Ok(banner) => Some(quota::describe(
                    quota::parse_quota(&banner, &location.name).as_ref(),
                )),
                Err(e) => {
                    tracing::warn!("Could not read login banner: {}", e);
                    Some(quota::describe(None))
                }
            }
        } else {
            None
        };

        let mut state = AppSftpState::new(root_path.clone(), start_dir());
        if let Err(e) = state.refresh_local() {
            tracing::warn!("Local listing failed: {:#}", e);
        }
        let listing = state.refresh_remote(&session).await;

        self.session = Some(session);
        self.sftp_state = Some(state);
        self.is_connecting = false;
        self.input_mode = InputMode::Browse;
        match listing {
            Ok(()) => self.set_status(format!(
                "Connected to {}, browsing {}",
                self.config.host, root_path
            )),
            Err(e) => self.set_status(format!("Connected, but listing failed: {}", e)),
        }
        Ok(())
    }

    /// Close the session and return to the login screen.
    pub async fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
        self.sftp_state = None;
        self.quota_line = None;
        self.prompt = None;
        self.pending_delete.clear();
        self.input_mode = InputMode::Login;
        self.login.focus = LoginField::Password;
    }

    /// Re-list the remote panel after something changed there.
    pub async fn reload_remote(&mut self) {
        let (Some(session), Some(state)) = (self.session.as_ref(), self.sftp_state.as_mut())
        else {
            return;
        };
        if let Err(e) = state.refresh_remote(session).await {
            tracing::error!("Remote refresh failed: {}", e);
            self.set_status(format!("Refresh failed: {}", e));
        }
    }

    pub fn reload_local(&mut self) {
        if let Some(state) = self.sftp_state.as_mut() {
            if let Err(e) = state.refresh_local() {
                tracing::error!("Local refresh failed: {:#}", e);
                self.set_status(format!("Local refresh error: {}", e));
            }
        }
    }
}

/// Local directory the left panel opens in.
fn start_dir() -> PathBuf {
    std::env::current_dir()
        .ok()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("/"))
}
