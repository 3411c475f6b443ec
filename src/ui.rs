use crate::app::{App, InputMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub mod browser;
pub mod dialogs;
pub mod footer;
pub mod help_popup;
pub mod login_form;
pub mod status_bar;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(3),    // Main content
                Constraint::Length(1), // Status bar
                Constraint::Length(2), // Footer
            ]
            .as_ref(),
        )
        .split(f.size());

    match app.input_mode {
        InputMode::Login => login_form::draw_login_form(f, app, chunks[0]),
        _ => browser::draw_browser(f, app, chunks[0]),
    }
    status_bar::draw_status_bar(f, app, chunks[1]);
    footer::draw_footer(f, app, chunks[2]);

    if app.is_connecting {
        dialogs::draw_connecting(f, app);
    }
    match app.input_mode {
        InputMode::Prompt => {
            if let Some(prompt) = &app.prompt {
                dialogs::draw_prompt(f, prompt);
            }
        }
        InputMode::ConfirmDelete => dialogs::draw_confirm_delete(f, &app.pending_delete),
        _ => {}
    }

    if app.show_help {
        help_popup::render_help_popup(f, app);
    }
}

/// Helper function to center a rectangle with given width and height
pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height)) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
