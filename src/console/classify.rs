//! Severity classification for raw log lines.
use super::entry::Severity;

/// Lines written by the producer's header block. They carry device details,
/// not log output, and are never shown as entries.
const HEADER_MARKERS: &[&str] = &[
    "=== DEVICE INFORMATION ===",
    "=== LOG ENTRIES ===",
    "Version:",
    "Name:",
    "Model:",
];

/// Returns `true` if the line belongs to the header block.
pub fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Classifies a raw line.
///
/// Returns `None` for empty lines and header lines. Otherwise the first
/// case-insensitive match wins, in the order error, warning, debug; anything
/// else is info.
pub fn classify(line: &str) -> Option<Severity> {
    if line.trim().is_empty() || is_header_line(line) {
        return None;
    }

    let lowered = line.to_lowercase();
    let severity = if lowered.contains("error") {
        Severity::Error
    } else if lowered.contains("warning") {
        Severity::Warning
    } else if lowered.contains("debug") {
        Severity::Debug
    } else {
        Severity::Info
    };

    Some(severity)
}
