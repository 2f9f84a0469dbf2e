mod app;
mod config;
mod event;
mod games;
mod input;
mod timer;
mod ui;

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::{App, Tab};
use config::Config;
use event::{Event, EventHandler};

type Term = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "breakfall")]
#[command(about = "Block Breaker and Tetris in the terminal")]
struct Cli {
    /// JSON file overriding the default tunables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random choice; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Open straight into a game instead of the home screen.
    #[arg(long, value_enum)]
    game: Option<GameArg>,
    /// Write logs here. Nothing is logged without it.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log filter, used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GameArg {
    BlockBreaker,
    Tetris,
}

impl From<GameArg> for Tab {
    fn from(game: GameArg) -> Self {
        match game {
            GameArg::BlockBreaker => Tab::BlockBreaker,
            GameArg::Tetris => Tab::Tetris,
        }
    }
}

fn init_logging(path: Option<&Path>, level: &str) -> Result<()> {
    // stdout belongs to the TUI
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {level:?}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Enter raw mode and the alternate screen. Returns whether the terminal
/// will report key releases. A failed setup undoes what it already did.
fn setup_terminal() -> Result<(Term, bool)> {
    enable_raw_mode().context("enabling raw mode")?;
    let release_events = supports_keyboard_enhancement().unwrap_or(false);
    match open_terminal(release_events) {
        Ok(terminal) => Ok((terminal, release_events)),
        Err(err) => {
            let _ = leave_screen(&mut io::stdout(), release_events);
            let _ = disable_raw_mode();
            Err(err)
        }
    }
}

fn open_terminal(release_events: bool) -> Result<Term> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering alternate screen")?;
    if release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("enabling key release events")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;
    terminal.clear()?;
    Ok(terminal)
}

/// Undo the screen modes `open_terminal` sets, keyboard flags first.
fn leave_screen<W: Write>(out: &mut W, release_events: bool) -> io::Result<()> {
    if release_events {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)
}

fn restore_terminal(terminal: &mut Term, release_events: bool) -> Result<()> {
    leave_screen(terminal.backend_mut(), release_events)?;
    disable_raw_mode()?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(terminal: &mut Term, app: &mut App, frame_ms: u64) -> Result<()> {
    let event_handler = EventHandler::new(frame_ms);
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), &cli.log_level)?;

    let config = Config::load(cli.config.as_deref())?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, frame_ms = config.frame_ms, "starting");

    let (mut terminal, release_events) = setup_terminal()?;

    let mut app = App::new(&config, seed, release_events);
    if let Some(game) = cli.game {
        app.open(game.into());
    }
    let result = run(&mut terminal, &mut app, config.frame_ms);

    // restore even when the loop failed, then report the first error
    let restored = restore_terminal(&mut terminal, release_events).context("restoring terminal");
    if let Err(err) = &result {
        tracing::error!(error = %err, "main loop failed");
    }
    tracing::info!("exiting");
    result.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["breakfall"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.seed.is_none());
        assert!(cli.game.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn game_names_are_kebab_case() {
        let cli = Cli::try_parse_from(["breakfall", "--game", "block-breaker", "--seed", "7"]).unwrap();
        assert_eq!(cli.game, Some(GameArg::BlockBreaker));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(Tab::from(GameArg::Tetris), Tab::Tetris);
        assert!(Cli::try_parse_from(["breakfall", "--game", "snake"]).is_err());
    }

    #[test]
    fn leaving_the_screen_pops_keyboard_flags() {
        let mut out = Vec::new();
        leave_screen(&mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let pop = text.find("\x1b[<1u").unwrap();
        let leave = text.find("\x1b[?1049l").unwrap();
        assert!(pop < leave);

        let mut out = Vec::new();
        leave_screen(&mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("\x1b[<1u"));
        assert!(text.contains("\x1b[?1049l"));
    }
}
