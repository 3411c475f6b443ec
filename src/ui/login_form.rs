use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginField};
use crate::ui::centered_rect;

pub fn draw_login_form(f: &mut Frame, app: &App, area: Rect) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .title("MetaBrowse - remote storage over SFTP");
    f.render_widget(outer, area);

    let form_area = centered_rect(60, 11, area);
    let location = app
        .selected_location()
        .map(|l| l.name.as_str())
        .unwrap_or("-");
    let root_preview = match app.selected_location() {
        Some(l) if !app.login.username.trim().is_empty() => {
            l.root_path(&app.login.username).to_string()
        }
        Some(l) => l.root_template.clone(),
        None => String::new(),
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("Host: {}:{}", app.config.host, app.config.port),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        field_line(
            "Location",
            format!("< {} >", location),
            app.login.focus == LoginField::Location,
        ),
        field_line(
            "Username",
            app.login.username.clone(),
            app.login.focus == LoginField::Username,
        ),
        field_line(
            "Password",
            "*".repeat(app.login.password.chars().count()),
            app.login.focus == LoginField::Password,
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!("Root: {}", root_preview),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Connect ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(Clear, form_area);
    f.render_widget(paragraph, form_area);
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Green)),
        Span::styled(format!("{:<10}", label), Style::default().fg(Color::Cyan)),
        Span::styled(format!(" {} ", value), value_style),
    ])
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::config::AppConfig;
    use crate::ui::{self, test_support::screen_contains};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn password_is_masked_and_root_previewed() {
        let mut app = App::new(AppConfig::default(), Some("alice".into())).unwrap();
        app.login.password = "hunter2".into();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui::draw(f, &app)).unwrap();

        assert!(screen_contains(&terminal, "< brno2 >"));
        assert!(screen_contains(&terminal, "*******"));
        assert!(!screen_contains(&terminal, "hunter2"));
        assert!(screen_contains(&terminal, "Root: /storage/brno2/home/alice"));
    }
}
