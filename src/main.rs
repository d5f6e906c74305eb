mod app;
mod config;
mod downsample;
mod logging;
mod select;
mod state;
mod stats;
mod track;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use config::Args;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use state::{Phase, ViewState};
use std::io;
use std::time::Duration;

/// How often to refresh the UI.
const UI_TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Handle --list-snapshots
    if args.list_snapshots {
        return list_available_snapshots();
    }

    let log_path = if args.log {
        Some(logging::init_file_logging()?)
    } else {
        None
    };

    run_viewer(args, log_path).await
}

/// Lists saved selection snapshots.
fn list_available_snapshots() -> Result<()> {
    let snapshots = logging::list_snapshots()?;

    if snapshots.is_empty() {
        println!("No snapshots found.");
        println!("Press 's' in the viewer to save the current selection.");
        return Ok(());
    }

    println!("Saved selection snapshots:\n");
    for snapshot in snapshots {
        println!("  {}", snapshot.display());
        if let Ok(meta) = std::fs::metadata(&snapshot) {
            let size_kb = meta.len() / 1024;
            println!("    Size: {} KB", size_kb);
        }
    }

    Ok(())
}

/// Runs the interactive viewer.
async fn run_viewer(args: Args, log_path: Option<std::path::PathBuf>) -> Result<()> {
    let source = args.source();
    tracing::info!(source = %source, downsample = args.downsample, "Starting viewer");

    let mut app = App::new(ViewState::new(source, args.downsample), args.step_km());
    if args.autoload {
        app.load();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Some(path) = log_path {
        println!("Log saved to: {}", path.display());
    }

    if let Err(e) = res {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Main application loop.
async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.process_updates();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(UI_TICK_RATE)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match app.view.phase() {
                Phase::Empty => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Enter | KeyCode::Char('L') => app.load(),
                    _ => {}
                },
                Phase::Loaded => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                        app.toggle_focus()
                    }
                    KeyCode::Left | KeyCode::Char('h') => app.nudge(-1.0),
                    KeyCode::Right | KeyCode::Char('l') => app.nudge(1.0),
                    KeyCode::Home => app.jump_start(),
                    KeyCode::End => app.jump_end(),
                    KeyCode::Char('d') => app.toggle_downsample(),
                    KeyCode::Char('s') => app.save_snapshot(),
                    _ => {}
                },
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
