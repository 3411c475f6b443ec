use crate::app::{App, InputMode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (nav_text, action_text) = key_hints(app);

    let nav_help = Paragraph::new(nav_text).style(Style::default().fg(if app.is_connecting {
        Color::Yellow
    } else {
        Color::Gray
    }));

    let action_help = Paragraph::new(action_text)
        .style(Style::default().fg(if app.is_connecting {
            Color::Red
        } else {
            Color::Gray
        }))
        .alignment(Alignment::Right);

    f.render_widget(nav_help, footer[0]);
    f.render_widget(action_help, footer[1]);
}

fn key_hints(app: &App) -> (&'static str, &'static str) {
    if app.is_connecting {
        return ("Connecting to SSH host...", "Please wait");
    }
    if app.show_help {
        return ("↑/k: Up  ↓/j: Down", "[?/Esc] Close help");
    }
    match app.input_mode {
        InputMode::Login => (
            "[Tab] Next field  ←/→: Location",
            "[Enter] Connect [F1] Help [Esc] Quit",
        ),
        InputMode::Browse => (
            "↑/k ↓/j  [Tab] Panel  [Enter] Open  [Bksp] Back  [Space] Mark",
            "[u] Up [d] Down [m] Mkdir [e] Rename [x] Delete [r] Reload [?] Help [q] Quit",
        ),
        InputMode::Prompt => ("Type a name", "[Enter] Confirm [Esc] Cancel"),
        InputMode::ConfirmDelete => ("Delete selected items?", "[y] Delete [n] Cancel"),
    }
}
