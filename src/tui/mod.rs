//! Terminal user interface
//!
//! A single screen: source text and verified summary on the left, the
//! entity knowledge graph on the right.

pub mod app;
pub mod canvas;
pub mod events;
pub mod input;
pub mod notifications;
pub mod terminal;
pub mod widgets;

pub use app::{FactGraphApp, Focus};
pub use canvas::CanvasGraphRenderer;
pub use events::{EventLoop, TuiEvent};
pub use notifications::{NotificationKind, NotificationManager};
pub use terminal::{TerminalConfig, TerminalManager};
pub use widgets::StatusBar;
