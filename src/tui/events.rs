//! Event handling system

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// TUI events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Key press event
    Key(KeyEvent),

    /// Bracketed paste
    Paste(String),

    /// Window resize event
    Resize(u16, u16),

    /// Tick event (periodic update)
    Tick,

    /// Quit event
    Quit,
}

/// Event loop for TUI applications
pub struct EventLoop {
    /// Tick rate in milliseconds
    tick_rate: u64,
}

impl EventLoop {
    /// Create new event loop
    pub fn new(tick_rate: u64) -> Self {
        Self { tick_rate }
    }

    /// Poll for next event, yielding a tick when nothing arrives
    pub fn poll_event(&self) -> Result<Option<TuiEvent>> {
        if event::poll(Duration::from_millis(self.tick_rate))? {
            return Ok(Self::translate(event::read()?));
        }

        Ok(Some(TuiEvent::Tick))
    }

    fn translate(event: Event) -> Option<TuiEvent> {
        match event {
            // Some platforms also report releases and repeats
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if Self::is_quit_key(&key) {
                    Some(TuiEvent::Quit)
                } else {
                    Some(TuiEvent::Key(key))
                }
            }
            Event::Paste(text) => Some(TuiEvent::Paste(text)),
            Event::Resize(w, h) => Some(TuiEvent::Resize(w, h)),
            _ => None,
        }
    }

    /// Check if key event is a quit shortcut
    fn is_quit_key(key: &KeyEvent) -> bool {
        // Ctrl+C or Ctrl+Q
        matches!(
            (key.code, key.modifiers),
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
                | (KeyCode::Char('q'), KeyModifiers::CONTROL)
        )
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(100) // 100ms tick rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_quit_shortcuts() {
        let event = key(KeyCode::Char('q'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(EventLoop::translate(event), Some(TuiEvent::Quit));
        let event = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(EventLoop::translate(event), Some(TuiEvent::Quit));
    }

    #[test]
    fn test_plain_q_is_text() {
        let event = key(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Press);
        assert!(matches!(EventLoop::translate(event), Some(TuiEvent::Key(_))));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let event = key(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(EventLoop::translate(event), None);
    }

    #[test]
    fn test_paste_passes_through() {
        assert_eq!(
            EventLoop::translate(Event::Paste("Alice founded Acme.".to_string())),
            Some(TuiEvent::Paste("Alice founded Acme.".to_string()))
        );
    }
}
