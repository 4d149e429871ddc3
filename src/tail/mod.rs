//! This module contains the tailing machinery for the console.
//!
//! It includes the file source, the high-water-mark poller and the
//! periodic task that drives polling while the console is active.
pub mod poller;
pub mod schedule;
pub mod source;

pub use poller::TailPoller;
pub use source::FileSource;
