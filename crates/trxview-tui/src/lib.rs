// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;
use trxview_app::{
    BrowseMode, PageNav, Record, ViewController, ViewEvent, ViewProjection, ViewRows,
};

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const PAGE_PREV: &str = "‹";
const PAGE_NEXT: &str = "›";

/// Supplies record snapshots to the UI.
pub trait AppRuntime {
    fn load_snapshot(&mut self) -> Result<Vec<Record>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    projection: ViewProjection,
    cursor: usize,
    editing_search: bool,
    status: Option<String>,
    status_token: u64,
}

impl ViewData {
    fn new(controller: &ViewController, now: OffsetDateTime) -> Self {
        Self {
            projection: controller.current_view_at(now),
            cursor: 0,
            editing_search: false,
            status: None,
            status_token: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(controller: &mut ViewController, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(controller, OffsetDateTime::now_utc());
    let (internal_tx, internal_rx) = mpsc::channel();

    reload_snapshot(controller, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(controller, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Re-derives the projection. Elapsed-time text is fixed at this moment
/// until the next mutation.
fn refresh_projection(controller: &ViewController, view_data: &mut ViewData) {
    view_data.projection = controller.current_view_at(OffsetDateTime::now_utc());
    let rows = view_data.projection.rows.len();
    view_data.cursor = view_data.cursor.min(rows.saturating_sub(1));
}

fn reload_snapshot<R: AppRuntime>(
    controller: &mut ViewController,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let message = match runtime.load_snapshot() {
        Ok(records) if records.is_empty() => {
            controller.load(None);
            "no data available".to_owned()
        }
        Ok(records) => {
            let count = records.len();
            controller.load(Some(records));
            format!("data fetched: {count} records")
        }
        Err(error) => {
            controller.load(None);
            format!("error fetching data: {error:#}")
        }
    };
    view_data.cursor = 0;
    refresh_projection(controller, view_data);
    emit_status(view_data, internal_tx, message);
}

fn handle_key_event<R: AppRuntime>(
    controller: &mut ViewController,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.editing_search {
        handle_search_key(controller, view_data, key);
        return false;
    }

    let mode = controller.mode();
    let events = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            view_data.editing_search = true;
            return false;
        }
        KeyCode::Char('r') => {
            reload_snapshot(controller, runtime, view_data, internal_tx);
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            move_cursor(view_data, 1);
            return false;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_cursor(view_data, -1);
            return false;
        }
        KeyCode::Enter => match selected_group_key(view_data) {
            Some(group) => controller.select_group(group),
            None => Vec::new(),
        },
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => controller.clear_group(),
        KeyCode::Left | KeyCode::Char('[') => controller.previous_page(mode),
        KeyCode::Right | KeyCode::Char(']') => controller.next_page(mode),
        KeyCode::Char(digit @ '1'..='9') => {
            let slot = digit as usize - '1' as usize;
            match view_data.projection.nav.window.get(slot) {
                Some(&page) => controller.goto_page(mode, page),
                None => Vec::new(),
            }
        }
        _ => return false,
    };

    apply_view_events(controller, view_data, internal_tx, &events);
    false
}

fn handle_search_key(controller: &mut ViewController, view_data: &mut ViewData, key: KeyEvent) {
    let mut term = controller.query().search_term.clone();
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            view_data.editing_search = false;
            return;
        }
        KeyCode::Backspace => {
            term.pop();
        }
        KeyCode::Char(ch) => term.push(ch),
        _ => return,
    }

    if !controller.set_search_term(term).is_empty() {
        view_data.cursor = 0;
    }
    refresh_projection(controller, view_data);
}

fn apply_view_events(
    controller: &ViewController,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: &[ViewEvent],
) {
    for event in events {
        debug!(?event, "view event");
        match event {
            ViewEvent::ModeChanged(_) | ViewEvent::PageChanged { .. } => view_data.cursor = 0,
            ViewEvent::PageRejected { page, .. } => {
                emit_status(view_data, internal_tx, format!("page {page} is out of range"));
            }
            _ => {}
        }
    }
    if !events.is_empty() {
        refresh_projection(controller, view_data);
    }
}

fn move_cursor(view_data: &mut ViewData, delta: isize) {
    let rows = view_data.projection.rows.len();
    if rows == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = view_data.cursor as isize + delta;
    view_data.cursor = next.clamp(0, rows as isize - 1) as usize;
}

fn selected_group_key(view_data: &ViewData) -> Option<String> {
    match &view_data.projection.rows {
        ViewRows::Groups(rows) => rows.get(view_data.cursor).map(|row| row.key.clone()),
        ViewRows::Records(_) => None,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let search = Paragraph::new(render_query_text(view_data)).block(
        Block::default()
            .title("transaction list")
            .borders(Borders::ALL),
    );
    frame.render_widget(search, layout[0]);

    render_table(frame, layout[1], view_data);

    let pagination = Paragraph::new(Line::from(pagination_spans(&view_data.projection.nav)))
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(pagination, layout[2]);

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[3]);
}

type TableColumns = (Vec<&'static str>, Vec<Vec<String>>, Vec<Constraint>);

fn table_columns(rows: &ViewRows) -> TableColumns {
    match rows {
        ViewRows::Groups(rows) => (
            vec!["#", "beneficiary mobile", "details"],
            rows.iter()
                .map(|row| {
                    vec![
                        row.index.to_string(),
                        row.key.clone(),
                        "enter to see details".to_owned(),
                    ]
                })
                .collect(),
            vec![
                Constraint::Length(5),
                Constraint::Min(16),
                Constraint::Min(20),
            ],
        ),
        ViewRows::Records(rows) => (
            vec![
                "#",
                "beneficiary id",
                "beneficiary mobile",
                "trxid",
                "timestamp",
                "last sync",
            ],
            rows.iter()
                .map(|row| {
                    vec![
                        row.index.to_string(),
                        row.record.beneficiary_id.clone().unwrap_or_default(),
                        row.record.beneficiary_mobile.clone().unwrap_or_default(),
                        row.record.trxid.clone().unwrap_or_default(),
                        row.timestamp_text.clone().unwrap_or_default(),
                        row.elapsed.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
            vec![
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Min(14),
                Constraint::Min(12),
                Constraint::Min(22),
                Constraint::Min(16),
            ],
        ),
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let projection = &view_data.projection;
    let (headers, rows, widths) = table_columns(&projection.rows);

    let header = Row::new(headers.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let body = rows.into_iter().enumerate().map(|(row_index, cells)| {
        let style = if row_index == view_data.cursor {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(cells.into_iter().map(Cell::from)).style(style)
    });

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(projection))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn render_query_text(view_data: &ViewData) -> String {
    let projection = &view_data.projection;
    if let Some(group) = &projection.selected_group {
        return format!("group {group} | esc: home");
    }
    let caret = if view_data.editing_search { "_" } else { "" };
    if projection.search_term.is_empty() && !view_data.editing_search {
        return "search by any parameter (press /)".to_owned();
    }
    format!("search: {}{caret}", projection.search_term)
}

fn table_title(projection: &ViewProjection) -> String {
    match projection.mode {
        BrowseMode::GroupList => format!("beneficiaries ({})", projection.total_groups),
        BrowseMode::RecordDetail => format!("transactions ({})", projection.total_records),
    }
}

fn pagination_spans(nav: &PageNav) -> Vec<Span<'static>> {
    let arrow = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let mut spans = vec![arrow(PAGE_PREV, nav.has_previous)];
    for page in &nav.window {
        spans.push(Span::raw(" "));
        if *page == nav.current_page {
            spans.push(Span::styled(
                format!("[{page}]"),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(page.to_string()));
        }
    }
    spans.push(Span::raw(" "));
    spans.push(arrow(PAGE_NEXT, nav.has_next));
    spans
}

fn status_text(view_data: &ViewData) -> String {
    let hints = if view_data.editing_search {
        "type to search | enter/esc done"
    } else {
        match view_data.projection.mode {
            BrowseMode::GroupList => {
                "j/k move | enter open | / search | [/] page | 1-9 jump | r reload | q quit"
            }
            BrowseMode::RecordDetail => {
                "j/k move | esc home | [/] page | 1-9 jump | r reload | q quit"
            }
        }
    };
    match &view_data.status {
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}
