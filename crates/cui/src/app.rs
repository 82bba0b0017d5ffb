use crate::text::{format_event, is_noise, phase_label, GREETING, PROMPT};
use antfriend_core::{describe_selection, Event, EventBus, Site};
use antfriend_data::load_site;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_SEED: u64 = 0xBA_0A;
const MAX_EVENT_LOG: usize = 200;
const MAX_CONSOLE_LINES: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Board,
    Console,
    Events,
}

impl FocusPane {
    pub fn label(self) -> &'static str {
        match self {
            Self::Board => "Banjo",
            Self::Console => "Console",
            Self::Events => "Events",
        }
    }
}

pub struct App {
    pub seed: u64,
    pub site: Site,
    pub events: EventBus,
    pub focus: FocusPane,
    pub cursor: usize,
    pub columns: usize,
    pub console_input: String,
    pub console_log: VecDeque<String>,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
    history: Vec<String>,
    history_cursor: Option<usize>,
    last_tick: Instant,
}

impl App {
    pub fn bootstrap(assets: &Path, seed: u64) -> Result<Self> {
        let site = load_site(assets, seed)
            .with_context(|| format!("load site from {}", assets.display()))?;
        tracing::debug!(seed, assets = %assets.display(), "cui site loaded");
        Ok(Self::with_site(site, seed))
    }

    pub fn with_site(site: Site, seed: u64) -> Self {
        let columns = site.banjo().config().layout.columns.max(1);
        let mut app = Self {
            seed,
            site,
            events: EventBus::default(),
            focus: FocusPane::Console,
            cursor: 0,
            columns,
            console_input: String::new(),
            console_log: VecDeque::new(),
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            show_help: false,
            should_quit: false,
            history: Vec::new(),
            history_cursor: None,
            last_tick: Instant::now(),
        };
        for line in GREETING.lines() {
            app.push_console_line(line.to_string());
        }
        app.site.boot(&mut app.events);
        app.flush_events();
        app
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.catch_up(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
    }

    pub fn catch_up(&mut self, elapsed_ms: u64) {
        self.site.catch_up(elapsed_ms, &mut self.events);
        self.flush_events();
    }

    pub fn card_count(&self) -> usize {
        self.site.banjo().deck().len()
    }

    pub fn phase_text(&self) -> String {
        phase_label(self.site.banjo().phase())
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = match (self.focus, forward) {
            (FocusPane::Board, true) => FocusPane::Console,
            (FocusPane::Console, true) => FocusPane::Events,
            (FocusPane::Events, true) => FocusPane::Board,
            (FocusPane::Board, false) => FocusPane::Events,
            (FocusPane::Console, false) => FocusPane::Board,
            (FocusPane::Events, false) => FocusPane::Console,
        };
    }

    pub fn move_cursor(&mut self, rows: isize, cols: isize) {
        let len = self.card_count();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let step = rows * self.columns as isize + cols;
        let len = len as isize;
        self.cursor = (self.cursor as isize + step).rem_euclid(len) as usize;
    }

    pub fn flip_at_cursor(&mut self) {
        match self.site.click_card(self.cursor, &mut self.events) {
            Ok(selection) => self.status_line = describe_selection(selection),
            Err(err) => self.status_line = err.to_string(),
        }
        self.flush_events();
    }

    pub fn redraw_graph(&mut self) {
        self.run_line("draw");
    }

    pub fn type_char(&mut self, ch: char) {
        self.console_input.push(ch);
        self.history_cursor = None;
    }

    pub fn backspace(&mut self) {
        self.console_input.pop();
    }

    pub fn clear_input(&mut self) {
        self.console_input.clear();
        self.history_cursor = None;
    }

    pub fn submit_console(&mut self) {
        let line = std::mem::take(&mut self.console_input);
        self.history_cursor = None;
        if line.is_empty() {
            self.push_console_line(PROMPT.to_string());
            return;
        }
        if self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        self.run_line(&line);
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_cursor {
            Some(0) => 0,
            Some(index) => index - 1,
            None => self.history.len() - 1,
        };
        self.history_cursor = Some(index);
        self.console_input = self.history[index].clone();
    }

    pub fn history_next(&mut self) {
        let Some(index) = self.history_cursor else {
            return;
        };
        if index + 1 < self.history.len() {
            self.history_cursor = Some(index + 1);
            self.console_input = self.history[index + 1].clone();
        } else {
            self.clear_input();
        }
    }

    fn run_line(&mut self, line: &str) {
        self.push_console_line(format!("{PROMPT}{line}"));
        match self.site.interpret(line, &mut self.events) {
            Some(reply) => {
                for text in reply.lines() {
                    self.push_console_line(text.to_string());
                }
            }
            None => self.push_console_line(format!("command not found: {line}")),
        }
        self.flush_events();
    }

    fn flush_events(&mut self) {
        let drained: Vec<Event> = self.events.drain().collect();
        for event in drained {
            match &event {
                Event::Echo { text } => {
                    for line in text.lines() {
                        self.push_console_line(line.to_string());
                    }
                    continue;
                }
                Event::Status { text } => self.status_line = text.clone(),
                Event::Alert { message } => self.status_line = message.clone(),
                _ => {}
            }
            if !is_noise(&event) {
                self.push_event_line(format_event(&event));
            }
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }

    fn push_console_line(&mut self, line: String) {
        if self.console_log.len() >= MAX_CONSOLE_LINES {
            let _ = self.console_log.pop_front();
        }
        self.console_log.push_back(line);
    }
}
