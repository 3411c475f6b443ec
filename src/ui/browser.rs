use std::collections::BTreeSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::sftp_logic::{AppSftpState, FileItem, ListingItem, PanelSide};

pub fn draw_browser(f: &mut Frame, app: &App, area: Rect) {
    let Some(sftp_state) = &app.sftp_state else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Connection and quota
            Constraint::Min(3),    // Panels
        ])
        .split(area);

    draw_header(f, app, chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    draw_local_panel(f, panels[0], sftp_state);
    draw_remote_panel(f, panels[1], sftp_state);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let connection = match app.session.as_ref().map(|s| s.info()) {
        Some(info) => format!(
            "{}@{}:{}  root {}",
            info.username, info.host, info.port, info.root_path
        ),
        None => "Not connected".to_string(),
    };
    let quota = app
        .quota_line
        .clone()
        .unwrap_or_else(|| "Storage info disabled.".to_string());

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(connection, Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(quota, Style::default().fg(Color::Yellow))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" MetaBrowse ")
            .title_style(Style::default().add_modifier(Modifier::BOLD)),
    );
    f.render_widget(paragraph, area);
}

fn draw_local_panel(f: &mut Frame, area: Rect, sftp_state: &AppSftpState) {
    let rows = sftp_state
        .local_files
        .iter()
        .map(|file| match file {
            FileItem::Directory { name } if name == ".." => Row::go_up(),
            FileItem::Directory { name } => Row::dir(name),
            FileItem::File { name, size } => Row::file(name, Some(*size)),
        })
        .collect();

    draw_file_panel(
        f,
        area,
        rows,
        &sftp_state.local_marked,
        sftp_state.local_selected,
        &format!("Local: {}", sftp_state.local_current_path.display()),
        sftp_state.active_panel == PanelSide::Local,
    );
}

fn draw_remote_panel(f: &mut Frame, area: Rect, sftp_state: &AppSftpState) {
    let rows = sftp_state
        .remote_items
        .iter()
        .map(|item| match item {
            ListingItem::GoUp => Row::go_up(),
            ListingItem::Entry(entry) if entry.is_dir() => Row::dir(&entry.name),
            ListingItem::Entry(entry) => Row::file(&entry.name, None),
        })
        .collect();

    draw_file_panel(
        f,
        area,
        rows,
        &sftp_state.remote_marked,
        sftp_state.remote_selected,
        &format!("Remote: {}", sftp_state.current_remote_path()),
        sftp_state.active_panel == PanelSide::Remote,
    );
}

/// One rendered line of a file panel.
struct Row<'a> {
    icon: &'static str,
    name: &'a str,
    color: Color,
    size: Option<u64>,
}

impl<'a> Row<'a> {
    fn go_up() -> Self {
        Self {
            icon: "↰ ",
            name: "..",
            color: Color::Cyan,
            size: None,
        }
    }

    fn dir(name: &'a str) -> Self {
        Self {
            icon: "📁 ",
            name,
            color: Color::Blue,
            size: None,
        }
    }

    fn file(name: &'a str, size: Option<u64>) -> Self {
        Self {
            icon: "📄 ",
            name,
            color: Color::White,
            size,
        }
    }
}

fn draw_file_panel(
    f: &mut Frame,
    area: Rect,
    rows: Vec<Row<'_>>,
    marked: &BTreeSet<String>,
    selected: usize,
    title: &str,
    is_active: bool,
) {
    let border_style = if is_active {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Gray)
    };

    let title_style = if is_active {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string())
        .title_style(title_style);

    let list_items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let is_selected = i == selected && is_active;
            let is_marked = marked.contains(row.name);
            let mut spans = vec![];

            // Selection indicator
            spans.push(Span::styled(
                if is_selected { "> " } else { "  " },
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::styled(
                if is_marked { "* " } else { "  " },
                Style::default().fg(Color::Magenta),
            ));

            spans.push(Span::styled(row.icon, Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(
                row.name.to_string(),
                Style::default().fg(if is_selected { Color::Black } else { row.color }),
            ));

            if let Some(size) = row.size {
                spans.push(Span::styled(
                    format!(" ({})", format_file_size(size)),
                    Style::default().fg(if is_selected {
                        Color::Black
                    } else {
                        Color::Gray
                    }),
                ));
            }

            let style = if is_selected {
                Style::default()
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if is_marked {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    // Keeps the cursor row scrolled into view
    let mut list_state = ListState::default().with_selected(Some(selected));
    let list = List::new(list_items).block(block);
    f.render_stateful_widget(list, area, &mut list_state);
}

pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
