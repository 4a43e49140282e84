use crate::state::{Notice, NoticeLevel};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use std::time::{Duration, Instant};

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn color(&self) -> Color {
        match self {
            NotificationKind::Info => Color::Blue,
            NotificationKind::Warning => Color::Yellow,
            NotificationKind::Error => Color::Red,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Info => "ℹ",
            NotificationKind::Warning => "⚠",
            NotificationKind::Error => "✗",
        }
    }
}

impl From<NoticeLevel> for NotificationKind {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => NotificationKind::Info,
            NoticeLevel::Warning => NotificationKind::Warning,
            NoticeLevel::Error => NotificationKind::Error,
        }
    }
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: Instant,
    pub ttl: Duration,
}

/// Manages active notifications
#[derive(Debug)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
    ttl: Duration,
}

impl NotificationManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            ttl,
        }
    }

    pub fn notify(&mut self, kind: NotificationKind, message: String) {
        self.notifications.push(Notification {
            message,
            kind,
            timestamp: Instant::now(),
            ttl: self.ttl,
        });
    }

    pub fn notify_notice(&mut self, notice: Notice) {
        self.notify(notice.level.into(), notice.message);
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.timestamp) < n.ttl);
    }

    pub fn active(&self) -> &[Notification] {
        &self.notifications
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Widget for &NotificationManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Top-right corner, newest on top
        let width = 48.min(area.width);
        let right_margin = 2;
        let top_margin = 1;

        let mut y = area.y + top_margin;

        for notification in self.notifications.iter().rev() {
            // Border plus up to two wrapped lines
            let height = 4;
            if area.bottom().saturating_sub(y) < height {
                break;
            }

            let x = area.x + area.width.saturating_sub(width + right_margin);
            let notif_area = Rect::new(x, y, width, height);

            // Clear background to ensure text is readable over other widgets
            Clear.render(notif_area, buf);

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(notification.kind.color()));

            let text = format!("{}  {}", notification.kind.icon(), notification.message);
            Paragraph::new(text)
                .block(block)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::White))
                .render(notif_area, buf);

            y += height;
        }
    }
}
