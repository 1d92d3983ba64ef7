//! Interactive board in the terminal.
//!
//! Usage: `board-demo [CONFIG] [--tick-ms N] [--log-file PATH]`
//!
//! Keys: `p` toggles painting mode, `1`-`4` pick the paint color, `q` or
//! Esc quits. Click a cell to paint it (painting mode) or to flip it with
//! the rotate modifiers held (default mode). Logs go to `--log-file`, or to
//! `board-demo.log` when only `RUST_LOG` is set.

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::style::{Print, ResetColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing_subscriber::EnvFilter;

use spark_board::prelude::*;
use spark_board::renderer::{paint_cells, PointerRouter};

/// Board drawn one row below the status line.
const ORIGIN: (u16, u16) = (0, 1);

const PALETTE: [&str; 4] = ["#E53935", "#43A047", "#1E88E5", "#FDD835"];

#[derive(Debug, Parser)]
#[command(
    name = "board-demo",
    version,
    about = "Paint and flip cells of a grid board in the terminal"
)]
struct Args {
    /// JSON board configuration. Defaults apply to missing fields.
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Tick period in milliseconds (overrides the config).
    #[arg(long = "tick-ms", value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: Option<u64>,

    /// Write logs to this file. Filter with RUST_LOG (default: info).
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Board configuration with command-line overrides applied.
    fn board_config(&self) -> Result<BoardConfig> {
        let mut config = match &self.config {
            Some(path) => BoardConfig::from_json_file(path)?,
            None => BoardConfig::default(),
        };
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
        Ok(config)
    }

    fn log_path(&self) -> Option<PathBuf> {
        match &self.log_file {
            Some(path) => Some(path.clone()),
            None => std::env::var_os("RUST_LOG").map(|_| PathBuf::from("board-demo.log")),
        }
    }
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Raw mode, alternate screen and mouse capture for its lifetime.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide, Clear(ClearType::All))?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, ResetColor, Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn draw_status(out: &mut impl Write, board: &Board) -> io::Result<()> {
    let state = board.state();
    let mode = match state.cursor_mode() {
        CursorMode::Default => "default",
        CursorMode::Painting => "painting",
    };
    queue!(
        out,
        MoveTo(0, 0),
        Clear(ClearType::CurrentLine),
        Print(format!(
            "tick {}  mode {}  paint {}  timers {}  [p] mode [1-4] color [q] quit",
            state.tick(),
            mode,
            state.paint_color(),
            board.pending_timers()
        ))
    )
}

fn redraw(out: &mut impl Write, board: &Board) -> io::Result<()> {
    draw_status(out, board)?;
    paint_cells(out, &board.render_all(), ORIGIN)
}

/// Returns false when the demo should stop.
fn handle_key(board: &Board, key: KeyEvent) -> Result<bool> {
    if key.kind != KeyEventKind::Press {
        return Ok(true);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(false),
        KeyCode::Char('p') => {
            let mode = board.state().cursor_mode().toggled();
            board.dispatch(BoardAction::SetCursorMode(mode));
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            board.dispatch(BoardAction::SetPaintColor(Rgba::parse(PALETTE[index])?));
        }
        _ => {}
    }
    Ok(true)
}

fn run(board: &Board) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let out = &mut guard.stdout;

    let settings = *board.settings();
    let cells: Vec<_> = (0..settings.height)
        .flat_map(|y| (0..settings.width).map(move |x| Coord::new(x, y)))
        .filter_map(|coord| board.mount(coord))
        .collect();
    tracing::info!(cells = cells.len(), "cells mounted");

    let mut router = PointerRouter::new(ORIGIN);
    let mut next_tick = Instant::now() + settings.tick_interval;
    redraw(out, board)?;

    loop {
        let now = Instant::now();
        let until_tick = next_tick.saturating_duration_since(now);
        let timeout = board
            .time_until_next_timer()
            .map_or(until_tick, |t| t.min(until_tick));

        if poll(timeout)? {
            match read()? {
                Event::Key(key) => {
                    if !handle_key(board, key)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    router.route(board, mouse);
                }
                Event::Resize(_, _) => {
                    execute!(out, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        if Instant::now() >= next_tick {
            board.advance_tick();
            next_tick += settings.tick_interval;
            // Don't replay ticks missed while stalled
            if next_tick < Instant::now() {
                next_tick = Instant::now() + settings.tick_interval;
            }
        }
        let fired = board.run_due_timers();
        if fired > 0 {
            tracing::trace!(fired, "overlay timers fired");
        }
        redraw(out, board)?;
    }

    drop(cells);
    Ok(())
}

fn main() {
    let args = Args::parse();
    let result = args
        .board_config()
        .and_then(|config| {
            init_logging(args.log_path())?;
            Board::new(&config)
        })
        .and_then(|board| run(&board));

    if let Err(err) = result {
        eprintln!("board-demo: {err}");
        std::process::exit(1);
    }
}
