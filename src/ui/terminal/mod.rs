//! The full-screen console: terminal setup, key handling and drawing.
mod controller;
mod events;
mod lifecycle;
mod render;

pub use controller::TerminalUI;
