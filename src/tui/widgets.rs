//! Shared widget components

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Status bar widget
pub struct StatusBar<'a> {
    /// Left-aligned items
    left_items: Vec<(&'a str, &'a str)>,

    /// Right-aligned items
    right_items: Vec<(&'a str, &'a str)>,

    /// Style
    style: Style,
}

impl<'a> StatusBar<'a> {
    /// Create new status bar
    pub fn new() -> Self {
        Self {
            left_items: Vec::new(),
            right_items: Vec::new(),
            style: Style::default().bg(Color::DarkGray).fg(Color::White),
        }
    }

    /// Add left-aligned item
    pub fn left_item(mut self, label: &'a str, value: &'a str) -> Self {
        self.left_items.push((label, value));
        self
    }

    /// Add right-aligned item
    pub fn right_item(mut self, label: &'a str, value: &'a str) -> Self {
        self.right_items.push((label, value));
        self
    }

    fn spans(items: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        for (i, (label, value)) in items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*label, Style::default().add_modifier(Modifier::BOLD)));
            spans.push(Span::raw(" "));
            spans.push(Span::raw(*value));
        }
        spans
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left_spans = Self::spans(&self.left_items);
        let right_spans = Self::spans(&self.right_items);

        let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
        let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
        let padding = (area.width as usize).saturating_sub(left_width + right_width);

        let mut spans = left_spans;
        if right_width > 0 && padding > 0 {
            spans.push(Span::raw(" ".repeat(padding)));
            spans.extend(right_spans);
        }

        Paragraph::new(Line::from(spans))
            .style(self.style)
            .render(area, buf);
    }
}
