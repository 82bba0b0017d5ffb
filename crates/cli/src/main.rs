use antfriend_core::{Event, EventBus, Site};
use antfriend_cui::{board_lines, format_event, is_noise, phase_label, GREETING, PROMPT};
use antfriend_data::load_site;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "antfriend", about = "Line console for the antfriend site")]
struct Cli {
    /// Seed for the banjo shuffle and the graph tour.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory holding banjo.json and vis/.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Run console lines from a file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Launch the terminal UI.
    #[arg(long)]
    cui: bool,
    /// Verbose logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.cui {
        return antfriend_cui::run(antfriend_cui::LaunchOptions {
            seed: cli.seed,
            assets: cli.assets,
        });
    }

    let log_filter = if cli.debug {
        "debug"
    } else {
        "antfriend=info,antfriend_core=info,antfriend_data=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(cli.debug)
        .with_writer(io::stderr)
        .init();

    let seed = cli.seed.unwrap_or(antfriend_cui::DEFAULT_SEED);
    let site = load_site(&cli.assets, seed)
        .with_context(|| format!("load site from {}", cli.assets.display()))?;
    tracing::info!(seed, assets = %cli.assets.display(), "site loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new(site);
    writeln!(out, "{GREETING}")?;
    session.boot(&mut out)?;

    match cli.script {
        Some(path) => {
            let script =
                fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            for line in script.lines() {
                writeln!(out, "{PROMPT}{line}")?;
                if session.handle_line(line, &mut out)? == Flow::Quit {
                    break;
                }
            }
        }
        None => run_repl(&mut session, &mut out)?,
    }
    Ok(())
}

fn run_repl(session: &mut Session, out: &mut impl Write) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line.context("read stdin")?;
        session.catch_up();
        if session.handle_line(&line, out)? == Flow::Quit {
            return Ok(());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A site plus the wall clock that drives its timers between lines.
struct Session {
    site: Site,
    events: EventBus,
    last: Instant,
}

impl Session {
    fn new(site: Site) -> Self {
        Self {
            site,
            events: EventBus::default(),
            last: Instant::now(),
        }
    }

    fn boot(&mut self, out: &mut impl Write) -> Result<()> {
        self.site.boot(&mut self.events);
        self.flush(out)
    }

    /// Advances the site by the time spent waiting at the prompt. Any events
    /// it raises are printed with the next reply.
    fn catch_up(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.site.catch_up(elapsed_ms, &mut self.events);
    }

    fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        match (parts.next(), parts.next()) {
            (None, _) => {}
            (Some("quit" | "exit"), _) => return Ok(Flow::Quit),
            (Some("board"), _) => {
                let snapshot = self.site.snapshot();
                let columns = self.site.banjo().config().layout.columns;
                for row in board_lines(&snapshot, columns) {
                    writeln!(out, "{row}")?;
                }
                writeln!(out, "phase: {}", phase_label(snapshot.phase))?;
            }
            (Some("state"), _) => {
                let json = serde_json::to_string_pretty(&self.site.snapshot())?;
                writeln!(out, "{json}")?;
            }
            (Some("wait"), Some(ms)) => match ms.parse::<u64>() {
                Ok(ms) => self.site.advance(ms, &mut self.events),
                Err(_) => writeln!(out, "wait needs milliseconds, got {ms:?}")?,
            },
            _ => match self.site.interpret(line, &mut self.events) {
                Some(reply) => writeln!(out, "{reply}")?,
                None => writeln!(out, "command not found: {trimmed}")?,
            },
        }
        self.flush(out)?;
        Ok(Flow::Continue)
    }

    fn flush(&mut self, out: &mut impl Write) -> Result<()> {
        for event in self.events.drain() {
            match &event {
                Event::Echo { text } => writeln!(out, "{text}")?,
                _ if is_noise(&event) => tracing::debug!(?event, "skipped"),
                _ => writeln!(out, "  * {}", format_event(&event))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antfriend_core::{GameConfig, GraphData, GraphDoc, Node, StaticGraphSource};

    fn session() -> Session {
        let source = StaticGraphSource::default().with(
            GraphDoc::Main,
            GraphData {
                nodes: vec![Node::new("antfriend"), Node::new("banjo")],
                edges: vec![],
            },
        );
        let site = Site::new(GameConfig::default(), 11, Box::new(source)).expect("site");
        Session::new(site)
    }

    fn run(session: &mut Session, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = session.handle_line(line, &mut out).expect("line");
        (flow, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn boot_reports_the_main_graph() {
        let mut session = session();
        let mut out = Vec::new();
        session.boot(&mut out).expect("boot");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("graph vis/data.json loaded: 2 nodes, 0 edges"));
    }

    #[test]
    fn replies_and_unknown_commands() {
        let mut session = session();
        let (_, text) = run(&mut session, "head");
        assert!(text.contains("# Ouch! #"));
        let (_, text) = run(&mut session, "warble");
        assert_eq!(text, "command not found: warble\n");
    }

    #[test]
    fn navigation_is_printed_as_an_event() {
        let mut session = session();
        let (_, text) = run(&mut session, "banjo");
        assert!(text.contains("  * open "));
    }

    #[test]
    fn wait_drives_the_deal() {
        let mut session = session();
        let (_, text) = run(&mut session, "flip 0");
        assert!(text.starts_with("dealing 24 cards"));
        let (_, text) = run(&mut session, "board");
        assert!(text.contains("phase: dealt"));
        assert!(text.contains(" 0[   ]"));
        run(&mut session, "wait 2400");
        let (_, text) = run(&mut session, "board");
        assert!(text.contains(" 0[## ]"));
        let (_, text) = run(&mut session, "wait soon");
        assert_eq!(text, "wait needs milliseconds, got \"soon\"\n");
    }

    #[test]
    fn state_dumps_json_and_quit_stops() {
        let mut session = session();
        let (_, text) = run(&mut session, "state");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["pairs"], 12);
        assert_eq!(run(&mut session, "quit").0, Flow::Quit);
        assert_eq!(run(&mut session, "  ").0, Flow::Continue);
    }
}
