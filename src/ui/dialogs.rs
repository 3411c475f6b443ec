use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Prompt};
use crate::sftp_logic::DirectoryEntry;
use crate::ui::centered_rect;

fn dialog_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(color))
}

pub fn draw_connecting(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 8, f.size());

    let location = app
        .selected_location()
        .map(|l| l.name.as_str())
        .unwrap_or_default();
    let loading_text = format!(
        "🔗 Connecting to {} ({})...\n\n⏳ Please wait...",
        app.config.host, location
    );

    let paragraph = Paragraph::new(loading_text)
        .block(dialog_block(" SSH Connection ", Color::Yellow))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

pub fn draw_progress(f: &mut Frame, text: &str) {
    let area = centered_rect(60, 5, f.size());

    let paragraph = Paragraph::new(text)
        .block(dialog_block(" Working ", Color::Cyan))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

pub fn draw_prompt(f: &mut Frame, prompt: &Prompt) {
    let area = centered_rect(60, 5, f.size());
    let title = format!(" {} ", prompt.title());

    let line = Line::from(vec![
        Span::styled(prompt.input.as_str(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::Green)),
    ]);
    let paragraph = Paragraph::new(vec![
        line,
        Line::from(Span::styled(
            "[Enter] Confirm  [Esc] Cancel",
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(dialog_block(&title, Color::Green));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

pub fn draw_confirm_delete(f: &mut Frame, entries: &[DirectoryEntry]) {
    let height = (entries.len() as u16).min(8) + 5;
    let area = centered_rect(60, height, f.size());

    let mut lines = vec![Line::from(Span::styled(
        format!("Delete {} item(s)?", entries.len()),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(entries.iter().take(8).map(|entry| {
        let icon = if entry.is_dir() { "📁 " } else { "📄 " };
        Line::from(format!("  {}{}", icon, entry.name))
    }));
    if entries.len() > 8 {
        lines.push(Line::from(format!("  ... and {} more", entries.len() - 8)));
    }
    lines.push(Line::from(Span::styled(
        "[y] Delete  [n] Cancel",
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(dialog_block(" Confirm delete ", Color::Red))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
