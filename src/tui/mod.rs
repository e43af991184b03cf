// src/tui/mod.rs
// Terminal dashboard over the refresh controller's snapshots

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem,
    Paragraph, Row, Table, Tabs,
};
use futures::StreamExt;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::constants::tui::{MAX_LOG_LINES, TICK_MS};
use crate::dashboard::{DashboardSnapshot, RefreshController};
use crate::series::{ChartPoint, GasUsagePoint};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub fn color(self) -> Color {
        match self {
            LogLevel::Info => Color::Cyan,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Debug => Color::Green,
        }
    }

    /// Level of a formatted log line, from the level tag it carries
    pub fn of_line(line: &str) -> Self {
        if line.contains("ERROR") {
            LogLevel::Error
        } else if line.contains("WARN") {
            LogLevel::Warn
        } else if line.contains("DEBUG") || line.contains("TRACE") {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

pub type LogEntry = (String, LogLevel);

// --- Log Channel ---

/// `io::Write` sink that forwards formatted log lines to the log pane
///
/// Lines are dropped when the pane falls behind.
#[derive(Clone)]
pub struct LogWriter(mpsc::Sender<LogEntry>);

impl LogWriter {
    pub fn new(tx: mpsc::Sender<LogEntry>) -> Self {
        Self(tx)
    }
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).trim_end().to_string();
        if !msg.is_empty() {
            let level = LogLevel::of_line(&msg);
            let _ = self.0.try_send((msg, level));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Channel feeding a [`LogWriter`] into the dashboard
pub fn log_channel() -> (LogWriter, mpsc::Receiver<LogEntry>) {
    let (tx, rx) = mpsc::channel(MAX_LOG_LINES);
    (LogWriter::new(tx), rx)
}

// --- UI State ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Volume,
    BaseFee,
    GasUsage,
    Logs,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Volume, Panel::BaseFee, Panel::GasUsage, Panel::Logs];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Volume => "Volume",
            Panel::BaseFee => "Base Fee",
            Panel::GasUsage => "Gas Usage",
            Panel::Logs => "Logs",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Presentation state owned by the dashboard loop
#[derive(Debug)]
pub struct UiState {
    pub panel: Panel,
    pub logs: VecDeque<LogEntry>,
    pub log_scroll: usize,
    pub token_symbol: String,
}

impl UiState {
    pub fn new(token_symbol: &str) -> Self {
        Self {
            panel: Panel::Volume,
            logs: VecDeque::new(),
            log_scroll: 0,
            token_symbol: token_symbol.to_string(),
        }
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        if self.logs.len() >= MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);
    }
}

/// Restores the terminal even when the dashboard loop panics
struct TerminalCleanup;

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

// --- TUI Main Entry ---

/// Runs the dashboard until the user quits
pub async fn start_tui_dashboard(
    controller: Arc<RefreshController>,
    token_symbol: &str,
    mut log_rx: mpsc::Receiver<LogEntry>,
) -> io::Result<()> {
    let _cleanup = TerminalCleanup;
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = UiState::new(token_symbol);
    let res = run_app(&mut terminal, &controller, &mut ui, &mut log_rx).await;

    terminal.show_cursor()?;
    res
}

// --- TUI Event Loop ---

/// What the event loop does after a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Refresh,
    Quit,
}

/// Applies a key press to the UI state
pub fn handle_key(ui: &mut UiState, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Continue;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('r') => return KeyAction::Refresh,
        KeyCode::Tab => ui.panel = ui.panel.next(),
        KeyCode::Up => ui.log_scroll = ui.log_scroll.saturating_sub(1),
        KeyCode::Down => ui.log_scroll += 1,
        _ => {}
    }
    KeyAction::Continue
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &Arc<RefreshController>,
    ui: &mut UiState,
    log_rx: &mut mpsc::Receiver<LogEntry>,
) -> io::Result<()> {
    let mut tick = tokio::time::interval(Duration::from_millis(TICK_MS));
    let mut events = EventStream::new();

    loop {
        while let Ok(entry) = log_rx.try_recv() {
            ui.push_log(entry);
        }

        let snapshot = controller.snapshot().await;
        terminal.draw(|f| draw_dashboard(f, &snapshot, ui))?;

        tokio::select! {
            _ = tick.tick() => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => match handle_key(ui, key) {
                    KeyAction::Quit => break,
                    KeyAction::Refresh => {
                        // The cycle applies its own result; nothing to await here
                        let _ = controller.manual_refresh();
                    }
                    KeyAction::Continue => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
        }
    }
    Ok(())
}

// --- Rendering ---

pub fn draw_dashboard(f: &mut Frame, snapshot: &DashboardSnapshot, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], snapshot, ui);

    let titles: Vec<Line> = Panel::ALL.iter().map(|p| Line::from(p.title())).collect();
    let tabs = Tabs::new(titles)
        .select(ui.panel.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[1]);

    match ui.panel {
        Panel::Volume => render_volume(f, chunks[2], snapshot, &ui.token_symbol),
        Panel::BaseFee => render_line_chart(
            f,
            chunks[2],
            "Base Fee (Gwei)",
            &snapshot.base_fee,
            Color::Yellow,
            !snapshot.loading,
        ),
        Panel::GasUsage => render_gas_usage(f, chunks[2], snapshot),
        Panel::Logs => render_logs(f, chunks[2], ui),
    }

    let help = Paragraph::new("[Tab] Switch Panel  [R]efresh  [↑/↓] Scroll Logs  [Q]uit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);
}

/// One-line status: loading/refreshing state, countdown, last update
pub fn status_line(snapshot: &DashboardSnapshot) -> String {
    let status = if snapshot.loading {
        "Loading"
    } else if snapshot.refreshing {
        "Refreshing"
    } else {
        "Idle"
    };
    let latest = snapshot
        .latest_block()
        .map(|b| format!("#{b}"))
        .unwrap_or_else(|| "-".to_string());
    let updated = snapshot
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    format!(
        "{status}  |  latest block {latest}  |  next refresh in {}s  |  updated {updated}",
        snapshot.countdown
    )
}

fn render_header(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, ui: &UiState) {
    let color = if snapshot.refreshing || snapshot.loading {
        Color::Yellow
    } else {
        Color::Green
    };
    let header = Paragraph::new(Line::from(Span::styled(
        status_line(snapshot),
        Style::default().fg(color),
    )))
    .block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            format!("BlockPulse · {}", ui.token_symbol),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    );
    f.render_widget(header, area);
}

fn render_placeholder(f: &mut Frame, area: Rect, title: &str, loaded: bool) {
    let msg = if loaded { "No data" } else { "Waiting for first refresh..." };
    let placeholder = Paragraph::new(msg)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")));
    f.render_widget(placeholder, area);
}

fn render_volume(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, symbol: &str) {
    let title = format!("{symbol} Transfer Volume");
    if snapshot.volume.is_empty() {
        render_placeholder(f, area, &title, !snapshot.loading);
        return;
    }

    let bars: Vec<Bar> = snapshot
        .volume
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.y().max(0.0).round() as u64)
                .text_value(format!("{:.2}", p.y()))
                .label(Line::from(block_label(p.x())))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = (inner_width / bars.len().max(1)).saturating_sub(1).max(1) as u16;

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    f.render_widget(chart, area);
}

fn render_line_chart<P: ChartPoint>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    series: &[P],
    color: Color,
    loaded: bool,
) {
    if series.is_empty() {
        render_placeholder(f, area, title, loaded);
        return;
    }

    let data = chart_data(series);
    let [x_min, x_max] = x_bounds(series);
    let [y_min, y_max] = y_bounds(series);

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")))
        .x_axis(
            Axis::default()
                .title("Block")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.0}")),
                    Span::raw(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{y_min:.2}")),
                    Span::raw(format!("{y_max:.2}")),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_gas_usage(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_line_chart(
        f,
        chunks[0],
        "Gas Usage (%)",
        &snapshot.gas_usage,
        Color::Blue,
        !snapshot.loading,
    );

    let rows: Vec<Row> = snapshot.gas_usage.iter().rev().map(gas_usage_row).collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Min(8),
        ],
    )
    .header(
        Row::new(vec!["Block", "Usage", "Base Fee", "Fee ≤ Prev", "Usage ≤ 50%"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Blocks "));
    f.render_widget(table, chunks[1]);
}

fn gas_usage_row(point: &GasUsagePoint) -> Row<'static> {
    let flag = |set: bool| {
        if set {
            Cell::from("yes").style(Style::default().fg(Color::Green))
        } else {
            Cell::from("no").style(Style::default().fg(Color::Red))
        }
    };
    Row::new(vec![
        Cell::from(point.x.to_string()),
        Cell::from(format!("{:.2}%", point.y)),
        Cell::from(format!("{:.3} Gwei", point.base_fee_gwei)),
        flag(point.base_fee_increase),
        flag(point.gas_usage_increase),
    ])
}

fn render_logs(f: &mut Frame, area: Rect, ui: &UiState) {
    let items: Vec<ListItem> = ui
        .logs
        .iter()
        .rev()
        .skip(ui.log_scroll)
        .take(area.height as usize)
        .map(|(msg, level)| {
            ListItem::new(Line::from(Span::styled(
                msg.as_str(),
                Style::default().fg(level.color()),
            )))
        })
        .collect();
    let logs = List::new(items).block(Block::default().borders(Borders::ALL).title(Span::styled(
        "Logs",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(logs, area);
}

// --- Chart Helpers ---

/// Last four digits, enough to tell adjacent blocks apart under a bar
pub fn block_label(number: u64) -> String {
    format!("…{:04}", number % 10_000)
}

pub fn chart_data<P: ChartPoint>(series: &[P]) -> Vec<(f64, f64)> {
    series.iter().map(|p| (p.x() as f64, p.y())).collect()
}

pub fn x_bounds<P: ChartPoint>(series: &[P]) -> [f64; 2] {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if first.x() < last.x() => [first.x() as f64, last.x() as f64],
        (Some(only), _) => [only.x() as f64 - 0.5, only.x() as f64 + 0.5],
        _ => [0.0, 1.0],
    }
}

/// Value range padded by 10% so flat series stay visible
pub fn y_bounds<P: ChartPoint>(series: &[P]) -> [f64; 2] {
    if series.is_empty() {
        return [0.0, 1.0];
    }
    let min = series.iter().map(|p| p.y()).fold(f64::INFINITY, f64::min);
    let max = series.iter().map(|p| p.y()).fold(f64::NEG_INFINITY, f64::max);
    let margin = ((max - min) * 0.1).max(0.1);
    [(min - margin).max(0.0), max + margin]
}
