//! This module turns console entries into styled text lines.
//!
//! Nothing here touches the terminal; `TerminalUI` queues the resulting
//! lines with crossterm and `follow` prints them with `colored`.
use crate::console::report::ENTRIES_HEADER;
use crate::console::{DeviceInfo, LogEntry, Severity};
use colored::Colorize;
use crossterm::style::Color;
use unicode_width::UnicodeWidthChar;

const ELLIPSIS: &str = "...";

/// A run of text drawn in a single color. `None` uses the terminal default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub color: Option<Color>,
}

impl StyledSpan {
    fn new(text: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// One rendered line of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![StyledSpan::new(text, None)],
        }
    }

    /// The line without styling.
    #[cfg(test)]
    fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Cuts the line down to what is visible in a window of `width` columns
    /// after skipping `skip` characters from the left.
    ///
    /// Lines that do not fit end in `...`, cut short if the window is
    /// narrower than the marker.
    pub fn clip(&self, skip: usize, width: usize) -> StyledLine {
        let overflow = display_width(self.spans.iter().flat_map(|s| s.text.chars()).skip(skip))
            > width;
        let marker = if overflow {
            &ELLIPSIS[..ELLIPSIS.len().min(width)]
        } else {
            ""
        };
        let budget = width - marker.len();

        let mut remaining_skip = skip;
        let mut used = 0;
        let mut spans = Vec::new();
        let mut full = false;
        for span in &self.spans {
            let mut text = String::new();
            for c in span.text.chars() {
                if remaining_skip > 0 {
                    remaining_skip -= 1;
                    continue;
                }
                let w = UnicodeWidthChar::width(c).unwrap_or(0);
                if used + w > budget {
                    full = true;
                    break;
                }
                used += w;
                text.push(c);
            }
            if !text.is_empty() {
                spans.push(StyledSpan::new(text, span.color));
            }
            if full {
                break;
            }
        }

        if !marker.is_empty() {
            spans.push(StyledSpan::new(marker, None));
        }
        StyledLine { spans }
    }

    /// The line with ANSI color codes, for plain stdout output.
    ///
    /// Honours `colored`'s global override, so `--no-color` yields the bare
    /// text.
    pub fn to_ansi(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span.color.and_then(ansi_color) {
                Some(color) => span.text.as_str().color(color).to_string(),
                None => span.text.clone(),
            })
            .collect()
    }
}

fn ansi_color(color: Color) -> Option<colored::Color> {
    match color {
        Color::Green => Some(colored::Color::Green),
        Color::DarkYellow => Some(colored::Color::Yellow),
        Color::Red => Some(colored::Color::Red),
        Color::Blue => Some(colored::Color::Blue),
        Color::DarkGrey => Some(colored::Color::BrightBlack),
        _ => None,
    }
}

fn display_width(chars: impl Iterator<Item = char>) -> usize {
    chars.map(|c| UnicodeWidthChar::width(c).unwrap_or(0)).sum()
}

/// The color used for a severity tag.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Green,
        Severity::Warning => Color::DarkYellow,
        Severity::Error => Color::Red,
        Severity::Debug => Color::Blue,
    }
}

/// Renders a single entry as `[HH:mm:ss] [SEVERITY] message`.
pub fn entry_line(entry: &LogEntry) -> StyledLine {
    StyledLine {
        spans: vec![
            StyledSpan::new(
                format!("[{}]", entry.timestamp.format("%H:%M:%S")),
                Some(Color::DarkGrey),
            ),
            StyledSpan::new(" ", None),
            StyledSpan::new(
                format!("[{}]", entry.severity),
                Some(severity_color(entry.severity)),
            ),
            StyledSpan::new(" ", None),
            StyledSpan::new(entry.message.as_str(), None),
        ],
    }
}

/// The device block drawn above the entries.
pub fn header_lines(device: &DeviceInfo) -> Vec<StyledLine> {
    device
        .header_lines()
        .into_iter()
        .chain(std::iter::once(ENTRIES_HEADER.to_string()))
        .map(StyledLine::plain)
        .collect()
}

/// Lazily renders the header block followed by every entry.
///
/// Entries are formatted only as the iterator is advanced, so a caller that
/// skips to the visible window does not pay for the rest.
pub fn render_lines<'a>(
    device: &DeviceInfo,
    entries: &'a [LogEntry],
) -> impl Iterator<Item = StyledLine> + 'a {
    header_lines(device)
        .into_iter()
        .chain(entries.iter().map(entry_line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use uuid::Uuid;

    fn entry(severity: Severity, message: &str) -> LogEntry {
        LogEntry {
            id: Uuid::new_v4(),
            timestamp: Local.with_ymd_and_hms(2025, 3, 29, 23, 59, 1).unwrap(),
            severity,
            message: message.to_string(),
        }
    }

    fn device() -> DeviceInfo {
        DeviceInfo {
            os_version: "17.4".to_string(),
            name: "bench".to_string(),
            model: "iPhone".to_string(),
        }
    }

    #[test]
    fn entry_line_text_and_colors() {
        let line = entry_line(&entry(Severity::Error, "disk full"));

        assert_eq!(line.text(), "[23:59:01] [ERROR] disk full");
        assert_eq!(line.spans[0].color, Some(Color::DarkGrey));
        assert_eq!(line.spans[2].color, Some(Color::Red));
        assert_eq!(line.spans[4].color, None);
    }

    #[test]
    fn each_severity_has_its_own_color() {
        let colors = [
            severity_color(Severity::Info),
            severity_color(Severity::Warning),
            severity_color(Severity::Error),
            severity_color(Severity::Debug),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn header_comes_first_then_entries_in_order() {
        let entries = vec![entry(Severity::Info, "a"), entry(Severity::Debug, "b")];
        let lines: Vec<String> = render_lines(&device(), &entries).map(|l| l.text()).collect();

        assert_eq!(lines[0], "=== DEVICE INFORMATION ===");
        assert_eq!(lines[5], "=== LOG ENTRIES ===");
        assert_eq!(lines[6], "[23:59:01] [INFO] a");
        assert_eq!(lines[7], "[23:59:01] [DEBUG] b");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn clip_truncates_with_ellipsis() {
        let line = entry_line(&entry(Severity::Info, "a long message"));

        assert_eq!(line.clip(0, 15).text(), "[23:59:01] [...");
        assert_eq!(line.clip(0, 200).text(), line.text());
        assert_eq!(line.clip(11, 200).text(), "[INFO] a long message");
    }

    #[test]
    fn clip_keeps_span_colors() {
        let line = entry_line(&entry(Severity::Warning, "x"));
        let clipped = line.clip(11, 11);

        assert_eq!(clipped.text(), "[WARNING] x");
        assert_eq!(clipped.spans[0].color, Some(Color::DarkYellow));
    }

    #[test]
    fn ansi_output_keeps_the_text() {
        let line = entry_line(&entry(Severity::Error, "disk full"));
        let ansi = line.to_ansi();

        assert!(ansi.contains("[ERROR]"));
        assert!(ansi.ends_with("disk full"));
    }

    #[test]
    fn clip_never_exceeds_a_narrow_window() {
        let line = entry_line(&entry(Severity::Info, "a long message"));

        assert_eq!(line.clip(0, 3).text(), "...");
        assert_eq!(line.clip(0, 2).text(), "..");
        assert_eq!(line.clip(0, 1).text(), ".");
        assert_eq!(line.clip(0, 0).text(), "");
        assert_eq!(line.clip(0, 4).text(), "[...");
    }

    #[test]
    fn clip_past_end_is_empty() {
        let line = StyledLine::plain("short");
        assert_eq!(line.clip(10, 20).text(), "");
    }
}
