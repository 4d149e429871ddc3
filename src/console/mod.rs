//! The console data model: entries, classification, the shared store and
//! the copy-all report.
pub mod classify;
pub mod entry;
pub mod report;
pub mod store;

pub use classify::classify;
pub use entry::{LogEntry, Severity};
pub use report::{copy_all_text, DeviceInfo};
pub use store::{LogStore, StoreChange, DEFAULT_MAX_ENTRIES};
