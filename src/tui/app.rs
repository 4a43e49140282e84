//! Main TUI application integrating all components

use super::{
    canvas::group_colors, input::InputPanel, CanvasGraphRenderer, EventLoop, NotificationManager,
    StatusBar, TerminalManager, TuiEvent,
};
use crate::config::FactGraphConfig;
use crate::graph::{GraphHints, GraphRenderer, ViewportContent};
use crate::session::AnalysisSession;
use crate::summary::{legend_line, summary_spans, summary_text};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tracing::debug;

/// Which panel receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Summary,
}

/// Main TUI application
pub struct FactGraphApp<R: GraphRenderer = CanvasGraphRenderer> {
    session: AnalysisSession,
    input: InputPanel,
    focus: Focus,
    /// Sentence whose hint is shown
    selected: Option<usize>,
    /// Result revision `selected` refers to
    selected_revision: u64,
    notifications: NotificationManager,
    renderer: R,
    hints: GraphHints,
    endpoint: String,
    tick: usize,
    quitting: bool,
}

impl FactGraphApp<CanvasGraphRenderer> {
    pub fn new(session: AnalysisSession, config: &FactGraphConfig) -> Self {
        Self::with_renderer(session, config, CanvasGraphRenderer::new())
    }
}

impl<R: GraphRenderer> FactGraphApp<R> {
    pub fn with_renderer(session: AnalysisSession, config: &FactGraphConfig, renderer: R) -> Self {
        Self {
            session,
            input: InputPanel::new(config.input.max_chars),
            focus: Focus::Input,
            selected: None,
            selected_revision: 0,
            notifications: NotificationManager::new(Duration::from_secs(config.tui.notification_ttl_secs)),
            renderer,
            hints: config.graph.clone(),
            endpoint: config.endpoint.clone(),
            tick: 0,
            quitting: false,
        }
    }

    /// Run until the user quits, then hand the terminal back
    pub async fn run<B: Backend>(
        mut self,
        terminal: &mut TerminalManager<B>,
        event_loop: &EventLoop,
    ) -> Result<()> {
        loop {
            self.sync();
            terminal.terminal_mut().draw(|frame| self.draw(frame))?;

            if self.quitting {
                break;
            }

            if let Some(event) = event_loop.poll_event()? {
                self.handle_event(event);
            }

            // Let spawned requests make progress on this worker too
            tokio::task::yield_now().await;
        }

        debug!("Quitting, cancelling outstanding requests");
        self.session.shutdown();
        terminal.restore()
    }

    /// Apply arrived completions and surface their notices
    pub fn sync(&mut self) {
        self.session.poll_completions();
        for notice in self.session.state_mut().take_notices() {
            self.notifications.notify_notice(notice);
        }
        self.notifications.tick();

        let revision = self.session.state().result_revision();
        if revision != self.selected_revision {
            self.selected = None;
            self.selected_revision = revision;
        }
    }

    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Quit => self.quitting = true,
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Paste(text) => {
                self.focus = Focus::Input;
                self.input.paste(&text);
                self.session.set_input(self.input.text());
            }
            TuiEvent::Tick => self.tick = self.tick.wrapping_add(1),
            // The graph is measured per result, not per resize
            TuiEvent::Resize(..) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::F(5) => self.submit(),
            KeyCode::Char('l') if ctrl => {
                self.input.clear();
                self.session.set_input(String::new());
            }
            KeyCode::Esc => {
                if let Some(seq) = self.session.cancel() {
                    debug!("User cancelled request {}", seq);
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Summary,
                    Focus::Summary => Focus::Input,
                };
            }
            _ => match self.focus {
                Focus::Input => {
                    if self.input.handle_key(key) {
                        self.session.set_input(self.input.text());
                    }
                }
                Focus::Summary => self.move_selection(key.code),
            },
        }
    }

    fn submit(&mut self) {
        self.session.set_input(self.input.text());
        let superseding = self.session.state().in_flight();
        if let Some(seq) = self.session.submit() {
            if let Some(previous) = superseding {
                debug!("Request {} supersedes {}", seq, previous);
            }
        }
    }

    fn move_selection(&mut self, code: KeyCode) {
        let count = self
            .session
            .state()
            .result()
            .map(|r| r.summary.len())
            .unwrap_or(0);
        if count == 0 {
            self.selected = None;
            return;
        }

        let last = count - 1;
        self.selected = match (code, self.selected) {
            (KeyCode::Right | KeyCode::Down, None) => Some(0),
            (KeyCode::Right | KeyCode::Down, Some(i)) => Some((i + 1).min(last)),
            (KeyCode::Left | KeyCode::Up, None) => Some(last),
            (KeyCode::Left | KeyCode::Up, Some(i)) => Some(i.saturating_sub(1)),
            (KeyCode::Home, _) => Some(0),
            (KeyCode::End, _) => Some(last),
            (_, current) => current,
        };
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Render the whole interface
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Panels
                Constraint::Length(1), // Footer
            ])
            .split(size);

        self.draw_header(frame, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(5, 12), Constraint::Ratio(7, 12)])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(6)])
            .split(columns[0]);

        self.input.render(
            frame,
            left[0],
            self.session.state(),
            self.focus == Focus::Input,
            self.tick,
        );
        self.draw_summary(frame, left[1]);
        self.draw_graph(frame, columns[1]);
        self.draw_footer(frame, rows[2]);

        frame.render_widget(&self.notifications, size);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let status = match self.session.state().in_flight() {
            Some(seq) => Span::styled(
                format!("analyzing {}", seq),
                Style::default().fg(Color::Yellow),
            ),
            None => Span::styled("idle", Style::default().fg(Color::Green)),
        };

        let title = Line::from(vec![
            Span::styled(
                "◆ FactGraph",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  AI Summarizer & Knowledge Verification  ",
                Style::default().fg(Color::LightBlue),
            ),
            Span::styled(self.endpoint.as_str(), Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            status,
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );
        frame.render_widget(header, area);
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focus == Focus::Summary {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(Span::styled(
                " Verified Summary ",
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(result) = self.session.state().result() else {
            frame.render_widget(
                Paragraph::new("No analysis yet.").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1), // Hint
                Constraint::Length(1), // Legend
            ])
            .split(inner);

        let text = summary_text(summary_spans(&result.summary), self.selected);
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), chunks[0]);

        let hint = match self.selected.and_then(|i| summary_spans(&result.summary).nth(i)) {
            Some(span) => Line::from(Span::styled(span.hint, Style::default().fg(Color::White))),
            None if result.summary.is_empty() => Line::default(),
            None => Line::from(Span::styled(
                "Tab, then arrows, to inspect a sentence",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(hint), chunks[1]);
        frame.render_widget(Paragraph::new(legend_line()), chunks[2]);
    }

    fn draw_graph(&mut self, frame: &mut Frame, area: Rect) {
        let mut title = vec![Span::styled(
            " Entity Knowledge Graph ",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(graph) = self
            .session
            .state()
            .result()
            .and_then(|r| r.graph_data.as_ref())
        {
            for (group, color) in group_colors(&graph.nodes) {
                title.push(Span::styled(format!(" {} ", group), Style::default().fg(color)));
            }
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.session.state().needs_viewport_measure() {
            self.session.state_mut().viewport_resize(inner.into());
        }

        let state = self.session.state();
        match state.viewport().content(state.result(), &self.hints) {
            ViewportContent::Graph(scene) => {
                self.renderer.render(&scene, inner, frame.buffer_mut());
            }
            ViewportContent::Placeholder(placeholder) => {
                let top = inner.height.saturating_sub(3) / 2;
                let mut lines = vec![Line::default(); top as usize];
                lines.push(Line::from(Span::styled(
                    placeholder.icon,
                    Style::default().fg(Color::DarkGray),
                )));
                lines.push(Line::from(Span::styled(
                    placeholder.headline,
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    placeholder.guidance,
                    Style::default().fg(Color::DarkGray),
                )));
                frame.render_widget(
                    Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
                    inner,
                );
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let state = if self.session.state().loading() {
            "loading"
        } else {
            "ready"
        };
        let bar = StatusBar::new()
            .left_item("^S", "submit")
            .left_item("Esc", "cancel")
            .left_item("Tab", "focus")
            .left_item("^L", "clear")
            .left_item("^Q", "quit")
            .right_item("state", state);
        frame.render_widget(bar, area);
    }
}
