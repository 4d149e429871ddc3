use chrono::{DateTime, Local};
use std::ops::Range;

use crate::console::StoreChange;

/// View state of the console screen.
///
/// `scroll_offset` counts lines from the bottom of the content: 0 means the
/// newest entry is on the last visible row.
#[derive(Debug)]
pub struct ConsoleState {
    pub auto_scroll: bool,
    pub scroll_offset: usize,
    pub horizontal_scroll_offset: usize,
    pub is_at_bottom: bool,
    pub terminal_size: (u16, u16),
    pub notice: Option<(DateTime<Local>, String)>,
    pub should_quit: bool,
}

impl ConsoleState {
    pub fn new(auto_scroll: bool) -> Self {
        Self {
            auto_scroll,
            scroll_offset: 0,
            horizontal_scroll_offset: 0,
            is_at_bottom: true,
            terminal_size: (80, 24),
            notice: None,
            should_quit: false,
        }
    }

    /// Adjusts scrolling after the store changed.
    ///
    /// New entries pull the view down only when auto-scroll is on and the
    /// viewer is already at the bottom. Otherwise the offset grows with the
    /// content so the same lines stay on screen.
    pub fn apply_store_change(&mut self, change: StoreChange) {
        match change {
            StoreChange::Appended(count) => {
                if self.auto_scroll && self.is_at_bottom {
                    self.scroll_offset = 0;
                } else {
                    self.scroll_offset = self.scroll_offset.saturating_add(count);
                    self.is_at_bottom = false;
                }
            }
            // Evictions happen at the top and do not move the bottom anchor.
            StoreChange::Evicted(_) => {}
            StoreChange::Reset | StoreChange::Cleared => self.jump_to_bottom(),
        }
    }

    /// Keeps the offset inside the content and refreshes `is_at_bottom`.
    pub fn clamp_scroll(&mut self, total_lines: usize, visible_lines: usize) {
        let max_scroll = total_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll);
        self.is_at_bottom = self.scroll_offset == 0;
    }

    /// Clamps the offset, then returns the range of content lines that fit
    /// on screen.
    pub fn visible_range(&mut self, total_lines: usize, visible_lines: usize) -> Range<usize> {
        self.clamp_scroll(total_lines, visible_lines);
        let start = total_lines.saturating_sub(visible_lines.saturating_add(self.scroll_offset));
        let end = start.saturating_add(visible_lines).min(total_lines);
        start..end
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.is_at_bottom = self.scroll_offset == 0;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.is_at_bottom = self.scroll_offset == 0;
    }

    pub fn jump_to_bottom(&mut self) {
        self.scroll_offset = 0;
        self.is_at_bottom = true;
    }

    /// Scrolls to the first line; `clamp_scroll` trims the offset on the
    /// next draw.
    pub fn jump_to_top(&mut self) {
        self.scroll_offset = usize::MAX;
        self.is_at_bottom = false;
    }

    pub fn scroll_left(&mut self, columns: usize) {
        self.horizontal_scroll_offset = self.horizontal_scroll_offset.saturating_sub(columns);
    }

    pub fn scroll_right(&mut self, columns: usize) {
        self.horizontal_scroll_offset = self.horizontal_scroll_offset.saturating_add(columns);
    }

    /// Flips auto-scroll. Turning it on also snaps back to the newest entry.
    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
        if self.auto_scroll {
            self.jump_to_bottom();
        }
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some((Local::now(), message.into()));
    }

    /// Returns the notice if it was set less than `max_age_secs` ago.
    pub fn current_notice(&self, max_age_secs: i64) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|(at, _)| (Local::now() - *at).num_seconds() < max_age_secs)
            .map(|(_, message)| message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_new_entries_when_at_bottom() {
        let mut state = ConsoleState::new(true);
        state.apply_store_change(StoreChange::Appended(5));

        assert_eq!(state.scroll_offset, 0);
        assert!(state.is_at_bottom);
    }

    #[test]
    fn stays_put_when_scrolled_away() {
        let mut state = ConsoleState::new(true);
        state.scroll_up(3);
        state.apply_store_change(StoreChange::Appended(5));

        assert_eq!(state.scroll_offset, 8);
        assert!(!state.is_at_bottom);
    }

    #[test]
    fn stays_put_when_auto_scroll_is_off() {
        let mut state = ConsoleState::new(false);
        state.apply_store_change(StoreChange::Appended(2));

        assert_eq!(state.scroll_offset, 2);
        assert!(!state.is_at_bottom);
    }

    #[test]
    fn scrolling_back_down_resumes_following() {
        let mut state = ConsoleState::new(true);
        state.scroll_up(4);
        state.scroll_down(10);
        state.apply_store_change(StoreChange::Appended(1));

        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn reset_and_clear_return_to_bottom() {
        let mut state = ConsoleState::new(false);
        state.scroll_up(7);
        state.apply_store_change(StoreChange::Cleared);
        assert!(state.is_at_bottom);

        state.scroll_up(7);
        state.apply_store_change(StoreChange::Reset);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn clamp_limits_offset_to_content() {
        let mut state = ConsoleState::new(true);
        state.jump_to_top();
        state.clamp_scroll(30, 10);
        assert_eq!(state.scroll_offset, 20);

        state.clamp_scroll(5, 10);
        assert_eq!(state.scroll_offset, 0);
        assert!(state.is_at_bottom);
    }

    #[test]
    fn window_at_bottom_shows_the_newest_lines() {
        let mut state = ConsoleState::new(true);
        assert_eq!(state.visible_range(30, 10), 20..30);
        assert!(state.is_at_bottom);
    }

    #[test]
    fn window_at_top_starts_at_the_first_line() {
        let mut state = ConsoleState::new(true);
        state.jump_to_top();
        assert_eq!(state.visible_range(30, 10), 0..10);
        assert_eq!(state.scroll_offset, 20);
    }

    #[test]
    fn window_scrolled_part_way_up() {
        let mut state = ConsoleState::new(true);
        state.scroll_up(5);
        assert_eq!(state.visible_range(30, 10), 15..25);
    }

    #[test]
    fn short_content_fits_entirely() {
        let mut state = ConsoleState::new(true);
        state.scroll_up(3);
        assert_eq!(state.visible_range(4, 10), 0..4);
        assert_eq!(state.scroll_offset, 0);
        assert!(state.is_at_bottom);

        assert_eq!(state.visible_range(0, 10), 0..0);
        assert_eq!(state.visible_range(5, 0), 5..5);
    }

    #[test]
    fn enabling_auto_scroll_snaps_to_bottom() {
        let mut state = ConsoleState::new(false);
        state.scroll_up(3);
        state.toggle_auto_scroll();

        assert!(state.auto_scroll);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn fresh_notice_is_shown() {
        let mut state = ConsoleState::new(true);
        assert_eq!(state.current_notice(3), None);

        state.set_notice("Logs copied");
        assert_eq!(state.current_notice(3), Some("Logs copied"));
    }
}
