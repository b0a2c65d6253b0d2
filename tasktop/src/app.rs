//! App state and main loop: input handling, fetching metrics, updating history, and drawing.

use std::{
    io,
    time::{Duration, Instant},
};

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::api::{Api, FetchError};
use crate::history::{CpuChartWindow, HistoryMetric, HistoryStore};
use crate::types::MetricsSnapshot;
use crate::ui::{
    cpu::draw_cpu_chart,
    disk::{draw_disk_gauge, draw_partitions},
    gpu::draw_gpu,
    header::draw_header,
    history::draw_history,
    ram::draw_ram,
    system::draw_system,
};

/// Cadence of metrics fetches. A tick is skipped while a fetch is still in
/// flight, so a slow agent stretches the interval instead of stacking
/// requests.
const REFRESH: Duration = Duration::from_secs(5);

/// Notices dismiss themselves after this long on screen.
const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    shown_at: Instant,
}

impl Notice {
    fn info(text: String) -> Self {
        Self {
            text,
            kind: NoticeKind::Info,
            shown_at: Instant::now(),
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            kind: NoticeKind::Error,
            shown_at: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.shown_at.elapsed() >= NOTICE_TTL
    }
}

pub struct App {
    /// Agent base URL, shown in the header.
    pub url: String,

    // Latest snapshot + histories
    pub snapshot: Option<MetricsSnapshot>,
    pub histories: HistoryStore,
    pub cpu_window: CpuChartWindow,

    /// Which trend the history panel shows; `m` cycles it.
    pub selected_metric: HistoryMetric,

    /// Transient status line, self-dismissing.
    pub notice: Option<Notice>,

    // In-flight work; at most one of each kind at a time
    fetch: Option<JoinHandle<Result<MetricsSnapshot, FetchError>>>,
    report: Option<JoinHandle<Result<String, FetchError>>>,
    last_tick: Option<Instant>,

    should_quit: bool,
}

impl App {
    pub fn new(url: String) -> Self {
        Self {
            url,
            snapshot: None,
            histories: HistoryStore::default(),
            cpu_window: CpuChartWindow::default(),
            selected_metric: HistoryMetric::Memory,
            notice: None,
            fetch: None,
            report: None,
            last_tick: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let api = Api::new(&self.url)?;

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, &api).await;

        // Teardown
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        api: &Api,
    ) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    match k.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.should_quit = true;
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') => {
                            self.selected_metric = self.selected_metric.next();
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => self.request_report(api),
                        _ => {}
                    }
                }
            }
            if self.should_quit {
                break;
            }

            // Kick off a fetch when the interval elapsed and none is running
            if self.due_for_fetch() {
                let api = api.clone();
                self.fetch = Some(tokio::spawn(async move { api.fetch_metrics().await }));
                self.last_tick = Some(Instant::now());
            }
            self.harvest_fetch().await;
            self.harvest_report().await;

            if self.notice.as_ref().is_some_and(Notice::expired) {
                self.notice = None;
            }

            // Draw
            terminal.draw(|f| self.draw(f))?;

            // Tick rate
            sleep(Duration::from_millis(100)).await;
        }

        Ok(())
    }

    fn due_for_fetch(&self) -> bool {
        if self.fetch.is_some() {
            return false;
        }
        match self.last_tick {
            None => true,
            Some(at) => at.elapsed() >= REFRESH,
        }
    }

    async fn harvest_fetch(&mut self) {
        if !self.fetch.as_ref().is_some_and(JoinHandle::is_finished) {
            return;
        }
        let Some(handle) = self.fetch.take() else {
            return;
        };
        match handle.await {
            Ok(Ok(snapshot)) => self.apply_snapshot(snapshot),
            Ok(Err(e)) => self.notice = Some(Notice::error(format!("fetch failed: {e}"))),
            Err(e) => self.notice = Some(Notice::error(format!("fetch task died: {e}"))),
        }
    }

    /// Stores the snapshot and appends one sample to every history window.
    pub fn apply_snapshot(&mut self, snapshot: MetricsSnapshot) {
        let now = Local::now();
        self.histories.record(now, &snapshot);
        self.cpu_window.record(now, &snapshot);
        self.snapshot = Some(snapshot);
    }

    fn request_report(&mut self, api: &Api) {
        if self.report.is_some() {
            return;
        }
        let api = api.clone();
        self.report = Some(tokio::spawn(async move { api.fetch_report().await }));
        self.notice = Some(Notice::info("Generating report...".to_string()));
    }

    async fn harvest_report(&mut self) {
        if !self.report.as_ref().is_some_and(JoinHandle::is_finished) {
            return;
        }
        let Some(handle) = self.report.take() else {
            return;
        };
        match handle.await {
            Ok(Ok(text)) => match save_report(&text) {
                Ok(name) => self.notice = Some(Notice::info(format!("Report saved to {name}"))),
                Err(e) => {
                    self.notice = Some(Notice::error(format!("could not save report: {e}")));
                }
            },
            Ok(Err(e)) => self.notice = Some(Notice::error(format!("report failed: {e}"))),
            Err(e) => self.notice = Some(Notice::error(format!("report task died: {e}"))),
        }
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, cpu chart + gpu, gauges, bottom panels
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),   // header
                Constraint::Ratio(1, 3), // cpu chart (left) + gpu (right)
                Constraint::Length(3),   // ram gauge (left) + disk gauge (right)
                Constraint::Min(10),     // system + partitions (left), history (right)
            ])
            .split(area);

        draw_header(f, rows[0], self);

        let top_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        draw_cpu_chart(f, top_lr[0], &self.cpu_window);
        draw_gpu(f, top_lr[1], self.snapshot.as_ref());

        let gauge_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        draw_ram(f, gauge_lr[0], self.snapshot.as_ref());
        draw_disk_gauge(f, gauge_lr[1], self.snapshot.as_ref());

        let bottom_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[3]);
        let left_stack = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(13), Constraint::Min(4)])
            .split(bottom_lr[0]);
        draw_system(f, left_stack[0], self.snapshot.as_ref());
        draw_partitions(f, left_stack[1], self.snapshot.as_ref());
        draw_history(f, bottom_lr[1], &self.histories, self.selected_metric);
    }
}

/// Writes the report next to wherever tasktop was launched, named by save
/// time so repeated saves never clobber each other.
fn save_report(text: &str) -> io::Result<String> {
    let name = format!(
        "system-report-{}.txt",
        Local::now().format("%Y-%m-%dT%H-%M-%S")
    );
    std::fs::write(&name, text)?;
    Ok(name)
}
