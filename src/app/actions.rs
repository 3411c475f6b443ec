use anyhow::Result;
use ratatui::{backend::Backend, Terminal};

use crate::app::types::{App, InputMode, Prompt, PromptKind};
use crate::sftp_logic::{BatchOutcome, FileOps, TransferProgress};
use crate::ui;

/// Redraw the whole screen with a progress box on top.
fn redraw_progress<B: Backend>(terminal: &mut Terminal<B>, app: &App, progress: &TransferProgress) {
    let text = progress.to_string();
    if let Err(e) = terminal.draw(|f| {
        ui::draw(f, app);
        ui::dialogs::draw_progress(f, &text);
    }) {
        tracing::warn!("Progress redraw failed: {}", e);
    }
}

impl App {
    /// Upload the marked local files, or the one under the cursor.
    pub async fn upload_selected<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let outcome = {
            let app: &App = self;
            let (Some(session), Some(state)) = (app.session.as_ref(), app.sftp_state.as_ref())
            else {
                return Ok(());
            };
            let files = state.selected_local_files();
            FileOps::new(session, state.current_remote_path())
                .upload(&files, |p| redraw_progress(terminal, app, p))
                .await
        };
        self.finish_batch(outcome).await;
        Ok(())
    }

    /// Download the selected remote entries into the local panel's directory.
    pub async fn download_selected<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        let outcome = {
            let app: &App = self;
            let (Some(session), Some(state)) = (app.session.as_ref(), app.sftp_state.as_ref())
            else {
                return Ok(());
            };
            let selected = state.selected_remote_entries();
            FileOps::new(session, state.current_remote_path())
                .download(&selected, &state.local_current_path, |p| {
                    redraw_progress(terminal, app, p)
                })
                .await
        };
        self.finish_batch(outcome).await;
        self.reload_local();
        Ok(())
    }

    /// Ask before deleting the selected remote entries.
    pub fn request_delete(&mut self) {
        let selected = match &self.sftp_state {
            Some(state) => state.selected_remote_entries(),
            None => return,
        };
        if selected.is_empty() {
            self.set_status("Please select files or folders to delete.");
            return;
        }
        self.pending_delete = selected;
        self.input_mode = InputMode::ConfirmDelete;
    }

    pub async fn confirm_delete<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let selected = std::mem::take(&mut self.pending_delete);
        self.input_mode = InputMode::Browse;

        let outcome = {
            let app: &App = self;
            let (Some(session), Some(state)) = (app.session.as_ref(), app.sftp_state.as_ref())
            else {
                return Ok(());
            };
            FileOps::new(session, state.current_remote_path())
                .delete(&selected, |p| redraw_progress(terminal, app, p))
                .await
        };
        self.finish_batch(outcome).await;
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete.clear();
        self.input_mode = InputMode::Browse;
        self.set_status("Delete cancelled.");
    }

    /// Open the rename prompt for exactly one selected entry.
    pub fn request_rename(&mut self) {
        let selected = match &self.sftp_state {
            Some(state) => state.selected_remote_entries(),
            None => return,
        };
        match selected.as_slice() {
            [entry] => {
                self.prompt = Some(Prompt {
                    kind: PromptKind::Rename {
                        original: entry.name.clone(),
                    },
                    input: entry.name.clone(),
                });
                self.input_mode = InputMode::Prompt;
            }
            [] => self.set_status("Please select a file or folder to rename."),
            _ => self.set_status("Please select exactly one item to rename."),
        }
    }

    pub fn request_mkdir(&mut self) {
        if self.sftp_state.is_none() {
            return;
        }
        self.prompt = Some(Prompt {
            kind: PromptKind::Mkdir,
            input: String::new(),
        });
        self.input_mode = InputMode::Prompt;
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.input_mode = InputMode::Browse;
    }

    /// Run the rename or mkdir the prompt was opened for.
    pub async fn submit_prompt(&mut self) -> Result<()> {
        let Some(prompt) = self.prompt.take() else {
            return Ok(());
        };
        self.input_mode = InputMode::Browse;

        let result = {
            let (Some(session), Some(state)) = (self.session.as_ref(), self.sftp_state.as_ref())
            else {
                return Ok(());
            };
            let ops = FileOps::new(session, state.current_remote_path());
            match &prompt.kind {
                PromptKind::Rename { original } => ops
                    .rename(original, &prompt.input)
                    .await
                    .map_err(|e| format!("Rename failed: {}", e)),
                PromptKind::Mkdir => ops
                    .mkdir(&prompt.input)
                    .await
                    .map_err(|e| format!("Could not create folder: {}", e)),
            }
        };

        match result {
            Ok(status) => {
                self.set_status(status.message());
                if status.changed_remote() {
                    self.reload_remote().await;
                }
            }
            Err(message) => {
                tracing::error!("{}", message);
                self.set_status(message);
            }
        }
        Ok(())
    }

    async fn finish_batch(&mut self, outcome: BatchOutcome) {
        let message = outcome.message();
        if outcome.failed.is_empty() {
            tracing::info!("{}", message);
        } else {
            tracing::warn!("{}", message);
        }
        self.set_status(message);
        if outcome.touched_remote() {
            self.reload_remote().await;
        }
    }
}

