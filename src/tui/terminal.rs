//! Terminal setup and teardown
//!
//! Every mode switched on at startup is switched off again exactly once:
//! explicitly through [`TerminalManager::restore`] when the app quits, or
//! from `Drop` when the app bails out with an error.

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, Stdout};
use tracing::{debug, warn};

/// Terminal modes the app switches on
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Deliver pasted text as one event instead of a key storm
    pub bracketed_paste: bool,

    /// Use alternate screen
    pub alternate_screen: bool,

    /// Enable raw mode
    pub raw_mode: bool,
}

impl TerminalConfig {
    /// No mode switches; the backend is drawn to as is
    pub fn passive() -> Self {
        Self {
            bracketed_paste: false,
            alternate_screen: false,
            raw_mode: false,
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            bracketed_paste: true,
            alternate_screen: true,
            raw_mode: true,
        }
    }
}

/// Owns the ratatui terminal and the modes enabled for it
pub struct TerminalManager<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    config: TerminalConfig,
    restored: bool,
}

impl TerminalManager {
    /// Switch the configured modes on and draw to stdout
    pub fn new(config: TerminalConfig) -> Result<Self> {
        if config.raw_mode {
            enable_raw_mode()?;
        }

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.bracketed_paste {
            execute!(stdout, EnableBracketedPaste)?;
        }

        Self::with_backend(CrosstermBackend::new(stdout), config)
    }
}

impl<B: Backend> TerminalManager<B> {
    /// Wrap an already prepared backend
    pub fn with_backend(backend: B, config: TerminalConfig) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            config,
            restored: false,
        })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Switch every configured mode off; later calls do nothing
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        debug!("Restoring terminal");

        if self.config.raw_mode {
            disable_raw_mode()?;
        }
        if self.config.bracketed_paste {
            execute!(io::stdout(), DisableBracketedPaste)?;
        }
        if self.config.alternate_screen {
            execute!(io::stdout(), LeaveAlternateScreen)?;
        }
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl<B: Backend> Drop for TerminalManager<B> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!("Failed to restore terminal: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_default_enables_paste_and_screen() {
        let config = TerminalConfig::default();
        assert!(config.bracketed_paste && config.alternate_screen && config.raw_mode);
    }

    #[test]
    fn test_restore_runs_once() {
        let mut manager =
            TerminalManager::with_backend(TestBackend::new(20, 5), TerminalConfig::passive()).unwrap();
        manager.terminal_mut().hide_cursor().unwrap();
        assert!(!manager.is_restored());

        manager.restore().unwrap();
        assert!(manager.is_restored());
        manager.restore().unwrap();
    }
}
