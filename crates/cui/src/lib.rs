mod actions;
mod app;
mod input;
mod text;
mod view;

pub use app::DEFAULT_SEED;
pub use text::{board_lines, format_event, is_noise, phase_label, GREETING, PROMPT};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

const TICK_MS: u64 = 120;

#[derive(Debug, Clone, Parser)]
#[command(name = "antfriend-cui", about = "Terminal front-end for the antfriend site")]
pub struct LaunchOptions {
    /// Seed for the banjo shuffle and the graph tour.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Directory holding banjo.json and vis/.
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            seed: None,
            assets: PathBuf::from("assets"),
        }
    }
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let seed = options.seed.unwrap_or(DEFAULT_SEED);
    let mut app = App::bootstrap(&options.assets, seed)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(TICK_MS);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key, app.focus);
                actions::dispatch(app, action);
            }
        }
        app.on_tick();
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "the terminal UI needs an interactive terminal on stdin and stdout; use the line console for pipes and scripts"
    );
}
