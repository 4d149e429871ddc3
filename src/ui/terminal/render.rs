use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write};
use unicode_width::UnicodeWidthStr;

use crate::ui::render::{header_lines, render_lines, StyledLine};

use super::TerminalUI;

const NOTICE_SECONDS: i64 = 3;
const HELP_TEXT: &str =
    " q: quit | c: clear | r: refresh | y: copy | a: auto scroll | ↑↓ PgUp/PgDn: scroll | ←→: h-scroll";

impl TerminalUI {
    pub(super) fn render(&mut self) -> Result<()> {
        let mut stdout = stdout();

        queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let (width, height) = self.state.terminal_size;
        let visible = self.visible_lines();
        let status_row = visible as u16;

        self.render_logs(&mut stdout, width, visible)?;
        self.render_status_line(&mut stdout, status_row, width)?;
        if height > 1 {
            self.render_help_line(&mut stdout, height - 1, width)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn render_logs(&mut self, stdout: &mut impl Write, width: u16, visible: usize) -> Result<()> {
        let entries = self.store.snapshot();
        let total = header_lines(&self.device).len() + entries.len();
        let range = self.state.visible_range(total, visible);
        let window = render_lines(&self.device, &entries)
            .skip(range.start)
            .take(range.len());

        for (row, line) in window.enumerate() {
            queue!(stdout, cursor::MoveTo(0, row as u16))?;
            let clipped = line.clip(self.state.horizontal_scroll_offset, width as usize);
            draw_line(stdout, &clipped)?;
        }

        if self.state.scroll_offset > 0 {
            let indicator = format!("↓ {} newer", self.state.scroll_offset);
            let x = width.saturating_sub(indicator.width() as u16);
            queue!(
                stdout,
                cursor::MoveTo(x, 0),
                SetForegroundColor(Color::Yellow),
                Print(indicator),
                ResetColor
            )?;
        }

        if self.state.horizontal_scroll_offset > 0 {
            queue!(
                stdout,
                cursor::MoveTo(0, 0),
                SetForegroundColor(Color::Yellow),
                Print(format!("← +{}", self.state.horizontal_scroll_offset)),
                ResetColor
            )?;
        }

        Ok(())
    }

    fn render_status_line(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        let errors = format!(" {} Errors ", self.store.error_count());
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            SetBackgroundColor(Color::Red),
            SetForegroundColor(Color::White),
            Print(&errors),
            SetBackgroundColor(Color::DarkGrey)
        )?;

        let mut status_text = format!(
            " Auto scroll: {} | Entries: {} | {}",
            if self.state.auto_scroll { "on" } else { "off" },
            self.store.len(),
            self.source_name
        );
        if let Some(notice) = self.state.current_notice(NOTICE_SECONDS) {
            status_text.push_str(" | ");
            status_text.push_str(notice);
        }

        let room = (width as usize).saturating_sub(errors.width());
        let display_text: String = status_text.chars().take(room).collect();
        queue!(stdout, Print(&display_text))?;

        let padding = room.saturating_sub(display_text.width());
        if padding > 0 {
            queue!(stdout, Print(" ".repeat(padding)))?;
        }

        queue!(stdout, ResetColor)?;
        Ok(())
    }

    fn render_help_line(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        let help: String = HELP_TEXT.chars().take(width as usize).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            SetForegroundColor(Color::DarkGrey),
            Print(help),
            ResetColor
        )?;
        Ok(())
    }
}

fn draw_line(stdout: &mut impl Write, line: &StyledLine) -> Result<()> {
    for span in &line.spans {
        match span.color {
            Some(color) => queue!(stdout, SetForegroundColor(color))?,
            None => queue!(stdout, ResetColor)?,
        }
        queue!(stdout, Print(&span.text))?;
    }
    queue!(stdout, ResetColor)?;
    Ok(())
}
