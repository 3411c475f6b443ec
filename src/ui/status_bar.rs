use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.current_status() else {
        return;
    };

    let paragraph = Paragraph::new(message)
        .style(status_style(message))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn status_style(message: &str) -> Style {
    let lower = message.to_lowercase();
    if lower.contains("error")
        || lower.contains("failed")
        || lower.contains("could not")
        || lower.contains("please")
    {
        Style::default().fg(Color::Red)
    } else if lower.contains("connected")
        || lower.contains("uploaded")
        || lower.contains("downloaded")
        || lower.contains("deleted")
        || lower.contains("renamed")
        || lower.contains("created")
    {
        Style::default().fg(Color::Green)
    } else if lower.contains("connecting") || lower.contains("uploading") {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_red_and_successes_green() {
        assert_eq!(status_style("Rename failed: Path not found").fg, Some(Color::Red));
        assert_eq!(status_style("Please enter a folder name.").fg, Some(Color::Red));
        assert_eq!(status_style("Uploaded 3 file(s).").fg, Some(Color::Green));
        assert_eq!(status_style("Delete cancelled.").fg, Some(Color::Yellow));
    }
}
