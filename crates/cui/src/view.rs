use crate::app::{App, FocusPane};
use crate::text::{card_face, PROMPT};
use antfriend_core::SiteSnapshot;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let snapshot = app.site.snapshot();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(14),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app, &snapshot);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);
    draw_board(frame, middle[0], app, &snapshot);
    draw_graph(frame, middle[1], &snapshot);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(root[2]);
    draw_console(frame, bottom[0], app);
    draw_events(frame, bottom[1], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, snapshot: &SiteSnapshot) {
    let title = format!(
        "Antfriend | Focus: {} | Seed {}",
        app.focus.label(),
        app.seed
    );
    let banjo = format!(
        "banjo: {} | pairs {}/{} | {}",
        app.phase_text(),
        snapshot.matches,
        snapshot.pairs,
        if snapshot.two_player {
            snapshot.player.label()
        } else {
            "solo"
        }
    );
    let (eye_x, eye_y) = snapshot.attract.eye;
    let attract = format!(
        "\"{}\" ({:.1}em) eye ({eye_x}, {eye_y})",
        snapshot.attract.phrase, snapshot.attract.font_size_em
    );
    let lines = vec![
        Line::from(title.bold()),
        Line::from(banjo),
        Line::from(attract),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Overview");
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App, snapshot: &SiteSnapshot) {
    let lines: Vec<Line<'_>> = snapshot
        .cards
        .chunks(app.columns)
        .map(|row| {
            let spans: Vec<Span<'_>> = row
                .iter()
                .flat_map(|card| {
                    let mut style = Style::default();
                    if card.face_up {
                        style = style.fg(Color::Yellow);
                    }
                    if card.slot == app.cursor && app.focus == FocusPane::Board {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    [
                        Span::styled(format!("[{:<3}]", card_face(card)), style),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    let block = pane_block("Banjo", app.focus == FocusPane::Board);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_graph(frame: &mut Frame, area: Rect, snapshot: &SiteSnapshot) {
    let graph = &snapshot.graph;
    let mut mode = Vec::new();
    if graph.dancing {
        mode.push("dancing");
    }
    if graph.touring {
        mode.push("touring");
    }
    if graph.editable {
        mode.push("editable");
    }
    let mut lines = vec![
        Line::from(format!(
            "{} nodes, {} edges {}",
            graph.nodes.len(),
            graph.edges,
            mode.join(" ")
        )),
        Line::from(graph.status.clone()),
        Line::from(graph.selection.clone()),
        Line::from(graph.stabilization.clone()),
    ];
    lines.push(Line::from(Span::styled(
        graph.nodes.join(" "),
        Style::default().add_modifier(Modifier::DIM),
    )));
    let block = pane_block("Graphy", false);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_console(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(3) as usize;
    let start = app.console_log.len().saturating_sub(capacity);
    let mut lines: Vec<Line<'_>> = app
        .console_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    lines.push(Line::from(format!("{PROMPT}{}_", app.console_input)));
    let block = pane_block("Console", app.focus == FocusPane::Console);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = pane_block("Events", app.focus == FocusPane::Events);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("tab / shift+tab switch pane | ctrl+c quit"),
        Line::from("banjo: arrows/hjkl move | enter/space flip | d redraw graph | q quit"),
        Line::from("console: type a command, enter runs it, up/down history, esc clears"),
        Line::from("type \"help\" in the console for the command list"),
        Line::from("esc closes this help"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
