use crossterm::event::KeyEvent;

use crate::console::StoreChange;

/// Input to the terminal UI loop.
#[derive(Debug)]
pub enum UIEvent {
    Store(StoreChange),
    KeyPress(KeyEvent),
    Resize(u16, u16),
}

/// Work the UI hands off to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UIAction {
    /// Reload the whole source, as on activation.
    Refresh,
    /// Drop every entry from the store.
    Clear,
}
