//! ailab-tui - Terminal landing page for 地域おこし協力隊 × 生成AIラボ
//!
//! A Ratatui-based TUI with the community's home page and a contact form
//! that posts to a third-party form relay.

mod app;
mod config;
mod contact;
mod relay;
mod state;
mod ui;

use anyhow::Result;
use app::App;
use config::SiteConfig;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let (writer, to_file) = match open_log_file() {
        Some(file) => (BoxMakeWriter::new(Mutex::new(file)), true),
        None => (BoxMakeWriter::new(io::stderr), false),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ailab_tui=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(!to_file),
        )
        .init();

    // A broken config file should not keep the home page from opening
    let (site, config_error) = match SiteConfig::load() {
        Ok(site) => (site, None),
        Err(err) => (SiteConfig::default(), Some(err)),
    };

    let mut app = App::new(&site)?;
    if let Some(err) = config_error {
        app.push_error(format!("設定ファイルを読み込めませんでした: {err}"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log file in the platform data directory, if it can be created
fn open_log_file() -> Option<File> {
    let dirs = ProjectDirs::from("jp", "ailab", "ailab-tui")?;
    fs::create_dir_all(dirs.data_dir()).ok()?;
    File::options()
        .create(true)
        .append(true)
        .open(dirs.data_dir().join("ailab-tui.log"))
        .ok()
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.poll_submission();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll faster while a submission is outstanding so its result shows promptly
        let poll_duration = if app.is_submitting() {
            Duration::from_millis(30)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit() {
            return Ok(());
        }

        // Let the submission task make progress on the runtime
        tokio::task::yield_now().await;
    }
}
