//! Builds the plain-text export of the console used by copy-all and `dump`.
use super::entry::LogEntry;
use sysinfo::System;

const DEVICE_HEADER: &str = "=== DEVICE INFORMATION ===";
const UNKNOWN: &str = "unknown";
pub const ENTRIES_HEADER: &str = "=== LOG ENTRIES ===";

/// Details about the device the log belongs to, printed above the entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub os_version: String,
    pub name: String,
    pub model: String,
}

impl DeviceInfo {
    /// Describes the host the console is running on.
    ///
    /// Fields that cannot be determined read `unknown`.
    pub fn detect() -> Self {
        let name = hostname::get()
            .map(|s| s.to_string_lossy().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let os_version = System::long_os_version()
            .or_else(System::os_version)
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            os_version,
            name,
            model: std::env::consts::ARCH.to_string(),
        }
    }

    /// The header lines, in the same layout the log producer writes.
    pub fn header_lines(&self) -> Vec<String> {
        vec![
            DEVICE_HEADER.to_string(),
            format!("Version: {}", self.os_version),
            format!("Name: {}", self.name),
            format!("Model: {}", self.model),
            format!("Console Version: {}", env!("CARGO_PKG_VERSION")),
        ]
    }
}

/// Renders the copy-all text: the device header block, a blank line, the
/// entries header and then one formatted line per entry in store order.
pub fn copy_all_text(device: &DeviceInfo, entries: &[LogEntry]) -> String {
    let mut text = device.header_lines().join("\n");
    text.push_str("\n\n");
    text.push_str(ENTRIES_HEADER);
    text.push('\n');

    let lines: Vec<String> = entries.iter().map(LogEntry::format_line).collect();
    text.push_str(&lines.join("\n"));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{classify, Severity};

    fn device() -> DeviceInfo {
        DeviceInfo {
            os_version: "17.4".to_string(),
            name: "bench-phone".to_string(),
            model: "iPhone".to_string(),
        }
    }

    #[test]
    fn header_block_precedes_entries_in_store_order() {
        let entries = vec![
            LogEntry::new(Severity::Info, "first"),
            LogEntry::new(Severity::Error, "second"),
        ];

        let text = copy_all_text(&device(), &entries);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=== DEVICE INFORMATION ===");
        assert_eq!(lines[1], "Version: 17.4");
        assert_eq!(lines[2], "Name: bench-phone");
        assert_eq!(lines[3], "Model: iPhone");
        assert!(lines[4].starts_with("Console Version: "));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "=== LOG ENTRIES ===");
        assert_eq!(lines[7], entries[0].format_line());
        assert_eq!(lines[8], entries[1].format_line());
        assert_eq!(lines.len(), 9);
        assert!(lines[8].ends_with("[ERROR] second"));
    }

    #[test]
    fn empty_store_still_has_header() {
        let text = copy_all_text(&device(), &[]);
        assert!(text.ends_with("=== LOG ENTRIES ===\n"));
    }

    #[test]
    fn exported_header_is_ignored_when_tailed_back() {
        for line in device().header_lines() {
            assert_eq!(classify(&line), None, "{line}");
        }
    }

    #[test]
    fn detected_device_reports_the_host_name_and_os_release() {
        let detected = DeviceInfo::detect();

        let expected_name = hostname::get()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if expected_name.is_empty() {
            assert_eq!(detected.name, "unknown");
        } else {
            assert_eq!(detected.name, expected_name);
        }

        assert!(!detected.os_version.is_empty());
        assert_ne!(detected.os_version, std::env::consts::OS);
        assert_eq!(detected.model, std::env::consts::ARCH);
    }
}
