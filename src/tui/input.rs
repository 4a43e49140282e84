//! Input panel - source text editor and submit line

use crate::state::UiState;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

const INDIGO: Color = Color::Rgb(79, 70, 229);

/// Multi-line editor for the text to analyze
pub struct InputPanel {
    textarea: TextArea<'static>,
    max_chars: usize,
}

impl InputPanel {
    pub fn new(max_chars: usize) -> Self {
        Self {
            textarea: Self::fresh_textarea(max_chars),
            max_chars,
        }
    }

    fn fresh_textarea(max_chars: usize) -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(format!(
            "Paste your news article or document here (max {} chars)...",
            max_chars
        ));
        textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
        textarea.set_cursor_line_style(Style::default());
        textarea
    }

    /// Feed a key to the editor; true when the text changed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.textarea.input(key)
    }

    pub fn paste(&mut self, text: &str) {
        // Normalize CRLF from clipboard managers
        self.textarea.insert_str(text.replace("\r\n", "\n"));
    }

    pub fn clear(&mut self) {
        self.textarea = Self::fresh_textarea(self.max_chars);
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &UiState, focused: bool, tick: usize) {
        let chars = state.input_chars();
        let counter_style = if state.over_limit() {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" Source Text ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("{}/{} ", chars, self.max_chars), counter_style),
            ]))
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(&self.textarea, chunks[0]);
        frame.render_widget(Paragraph::new(submit_line(state.loading(), tick)), chunks[1]);
    }
}

/// The "button": idle call to action, or a spinner while loading
pub fn submit_line(loading: bool, tick: usize) -> Line<'static> {
    if loading {
        Line::from(vec![
            Span::styled(
                format!("{} Running analysis...", SPINNER[tick % SPINNER.len()]),
                Style::default().fg(Color::Gray),
            ),
            Span::styled("  Esc cancel", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                "⚡ Summarize & Verify",
                Style::default()
                    .fg(Color::White)
                    .bg(INDIGO)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Ctrl+S", Style::default().fg(Color::DarkGray)),
        ])
    }
}
