use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use crate::app::types::{App, InputMode, LoginField};
use crate::sftp_logic::PanelSide;

impl App {
    pub async fn handle_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }
        if self.show_help {
            self.handle_help_key(key);
            return Ok(());
        }

        match self.input_mode {
            InputMode::Login => self.handle_login_key(key, terminal).await,
            InputMode::Browse => self.handle_browse_key(key, terminal).await,
            InputMode::Prompt => self.handle_prompt_key(key).await,
            InputMode::ConfirmDelete => self.handle_confirm_key(key, terminal).await,
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::F(1) => {
                self.show_help = false;
                self.help_scroll_position = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.help_scroll_position = self.help_scroll_position.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.help_scroll_position = self.help_scroll_position.saturating_add(1);
            }
            _ => {}
        }
    }

    async fn handle_login_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Enter => self.connect(terminal).await?,
            KeyCode::Tab | KeyCode::Down => self.login.focus = self.login.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.login.focus = self.login.focus.previous(),
            KeyCode::Left if self.login.focus == LoginField::Location => {
                self.cycle_location(false)
            }
            KeyCode::Right if self.login.focus == LoginField::Location => {
                self.cycle_location(true)
            }
            KeyCode::Backspace => match self.login.focus {
                LoginField::Username => {
                    self.login.username.pop();
                }
                LoginField::Password => {
                    self.login.password.pop();
                }
                LoginField::Location => {}
            },
            KeyCode::Char(c) => match self.login.focus {
                LoginField::Username => self.login.username.push(c),
                LoginField::Password => self.login.password.push(c),
                LoginField::Location => match c {
                    'h' => self.cycle_location(false),
                    'l' => self.cycle_location(true),
                    _ => {}
                },
            },
            _ => {}
        }
        Ok(())
    }

    async fn handle_browse_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(state) = self.sftp_state.as_mut() {
                    state.navigate_up();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(state) = self.sftp_state.as_mut() {
                    state.navigate_down();
                }
            }
            KeyCode::Tab => {
                if let Some(state) = self.sftp_state.as_mut() {
                    state.switch_panel();
                }
            }
            KeyCode::Char(' ') => {
                if let Some(state) = self.sftp_state.as_mut() {
                    state.toggle_mark();
                    state.navigate_down();
                }
            }
            KeyCode::Enter => self.open_selected().await,
            KeyCode::Backspace => self.go_back().await,
            KeyCode::Char('u') => self.upload_selected(terminal).await?,
            KeyCode::Char('d') => self.download_selected(terminal).await?,
            KeyCode::Char('m') => self.request_mkdir(),
            KeyCode::Char('e') => self.request_rename(),
            KeyCode::Char('x') | KeyCode::Delete => self.request_delete(),
            KeyCode::Char('r') => {
                self.reload_local();
                self.reload_remote().await;
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.cancel_prompt(),
            KeyCode::Enter => self.submit_prompt().await?,
            KeyCode::Backspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_confirm_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_delete(terminal).await?
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.cancel_delete(),
            _ => {}
        }
        Ok(())
    }

    /// Enter the directory under the cursor in the active panel.
    async fn open_selected(&mut self) {
        let Some(state) = self.sftp_state.as_mut() else {
            return;
        };
        match state.active_panel {
            PanelSide::Local => {
                if let Err(e) = state.open_local_selected() {
                    self.set_status(format!("Error: {}", e));
                }
            }
            PanelSide::Remote => {
                let Some(session) = self.session.as_ref() else {
                    return;
                };
                if let Err(e) = state.open_remote_selected(session).await {
                    self.set_status(format!("Error: {}", e));
                }
            }
        }
    }

    async fn go_back(&mut self) {
        let Some(state) = self.sftp_state.as_mut() else {
            return;
        };
        match state.active_panel {
            PanelSide::Local => {
                if let Err(e) = state.go_local_back() {
                    self.set_status(format!("Error: {}", e));
                }
            }
            PanelSide::Remote => {
                let Some(session) = self.session.as_ref() else {
                    return;
                };
                if let Err(e) = state.go_remote_back(session).await {
                    self.set_status(format!("Error: {}", e));
                }
            }
        }
    }
}
