use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::app::App;

pub fn render_help_popup(f: &mut Frame, app: &App) {
    let block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::White));

    let area = centered_rect(80, 80, f.size());
    f.render_widget(Clear, area); // this clears the background
    f.render_widget(block, area);

    let text = get_help_text();
    let line_count = text.lines.len();

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .scroll((app.help_scroll_position, 0));

    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });

    f.render_widget(paragraph, inner_area);

    // Make scrollbar only appear if there is overflow
    if line_count > inner_area.height as usize {
        let mut scrollbar_state =
            ScrollbarState::new(line_count).position(app.help_scroll_position as usize);

        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓")),
            inner_area,
            &mut scrollbar_state,
        );
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
    ))
}

fn binding<'a>(keys: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", keys), Style::default().fg(Color::Green)),
        Span::raw(format!("- {}", description)),
    ])
}

fn get_help_text<'a>() -> Text<'a> {
    Text::from(vec![
        section("Login"),
        binding("Tab, ↓", "Next field"),
        binding("Shift+Tab, ↑", "Previous field"),
        binding("←, →, h, l", "Change storage location"),
        binding("Enter", "Connect"),
        binding("Esc", "Quit"),
        Line::from(""),
        section("Browser"),
        binding("j, ↓", "Move down"),
        binding("k, ↑", "Move up"),
        binding("Tab", "Switch between local and remote panel"),
        binding("Enter", "Open directory"),
        binding("Backspace", "Go to parent directory"),
        binding("Space", "Mark or unmark the item"),
        binding("u", "Upload marked local files"),
        binding("d", "Download marked remote items"),
        binding("m", "Create a remote folder"),
        binding("e", "Rename the remote item"),
        binding("x, Delete", "Delete marked remote items"),
        binding("r", "Reload both panels"),
        binding("q", "Disconnect and quit"),
        Line::from(""),
        section("Prompts"),
        binding("Enter", "Confirm"),
        binding("Esc", "Cancel"),
        binding("y, n", "Answer a delete confirmation"),
        Line::from(""),
        section("Help Popup"),
        binding("?, F1, Esc", "Close help"),
        binding("↑, k", "Scroll up"),
        binding("↓, j", "Scroll down"),
        binding("Ctrl+C", "Quit from anywhere"),
    ])
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
