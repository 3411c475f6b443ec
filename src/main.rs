use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::{io, time::Duration};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod config;
mod error;
mod models;
mod quota;
mod sftp_logic;
mod ssh;
mod ui;

use app::App;
use config::{AppConfig, ConfigManager, Overrides};

/// Browse MetaCentrum storage over SFTP.
#[derive(Debug, Parser)]
#[command(name = "metabrowse", version, about)]
struct Cli {
    /// SSH front-end host
    #[arg(long)]
    host: Option<String>,

    /// SSH port
    #[arg(long)]
    port: Option<u16>,

    /// Storage location selected on the login screen
    #[arg(short, long)]
    location: Option<String>,

    /// Pre-fill the username
    #[arg(short, long)]
    user: Option<String>,

    /// Read settings from this file instead of the default one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip reading the storage quota after login
    #[arg(long)]
    no_quota: bool,

    /// Print the known storage locations and exit
    #[arg(long)]
    list_locations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config()?;
    config.apply(&Overrides {
        host: cli.host.clone(),
        port: cli.port,
        location: cli.location.clone(),
        no_quota: cli.no_quota,
    });

    if cli.list_locations {
        for location in config.all_locations() {
            println!("{:<14} {}", location.name, location.root_template);
        }
        return Ok(());
    }

    init_logging(&config.log_dir)?;
    debug!("Config loaded from {}", manager.config_path().display());

    // Fails before the terminal is touched when the location is unknown
    let app = App::new(config, cli.user)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:#}", err);
    }

    Ok(())
}

fn init_logging(log_dir: &Path) -> Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    }

    let log_file = log_dir.join(format!(
        "metabrowse_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let file = File::create(&log_file)?;

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("metabrowse=debug".parse()?))
        .with_ansi(false)
        .with_writer(file)
        .init();

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    info!("Starting browser for {}:{}", app.config.host, app.config.port);
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, terminal).await?;
                }
            }
        }

        if app.should_quit {
            app.disconnect().await;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_reach_the_config() {
        let cli = Cli::parse_from([
            "metabrowse",
            "--host",
            "zenith.metacentrum.cz",
            "-l",
            "praha1",
            "--no-quota",
        ]);
        let mut config = AppConfig::default();
        config.apply(&Overrides {
            host: cli.host,
            port: cli.port,
            location: cli.location,
            no_quota: cli.no_quota,
        });

        assert_eq!(config.host, "zenith.metacentrum.cz");
        assert_eq!(config.default_location, "praha1");
        assert!(!config.fetch_quota);
    }
}
