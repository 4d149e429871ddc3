//! The interactive console view and its rendering.
pub mod clipboard;
pub mod event;
pub mod render;
pub mod runner;
pub mod state;
pub mod terminal;

pub use event::{UIAction, UIEvent};
pub use runner::run_console;
pub use state::ConsoleState;
pub use terminal::TerminalUI;
