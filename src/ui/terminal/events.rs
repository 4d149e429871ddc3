use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use crate::console::copy_all_text;
use crate::ui::{UIAction, UIEvent};

use super::TerminalUI;

const HORIZONTAL_STEP: usize = 10;

impl TerminalUI {
    pub(super) fn handle_event(&mut self, event: UIEvent) -> Result<()> {
        match event {
            UIEvent::Store(change) => {
                self.state.apply_store_change(change);
            }
            UIEvent::KeyPress(key_event) => {
                self.handle_key_event(key_event)?;
            }
            UIEvent::Resize(width, height) => {
                self.state.terminal_size = (width, height);
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        let page = self.visible_lines().max(1);
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                self.state.should_quit = true;
            }
            (KeyCode::Char('c'), _) => {
                self.send_action(UIAction::Clear);
                self.state.set_notice("Logs cleared");
            }
            (KeyCode::Char('r'), _) => {
                self.send_action(UIAction::Refresh);
                self.state.set_notice("Reloading logs");
            }
            (KeyCode::Char('a'), _) => {
                self.state.toggle_auto_scroll();
                let label = if self.state.auto_scroll { "on" } else { "off" };
                self.state.set_notice(format!("Auto scroll {}", label));
            }
            (KeyCode::Char('y'), _) => {
                self.copy_logs();
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.state.scroll_up(1),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.state.scroll_down(1),
            (KeyCode::PageUp, _) => self.state.scroll_up(page),
            (KeyCode::PageDown, _) => self.state.scroll_down(page),
            (KeyCode::Home, _) | (KeyCode::Char('g'), _) => self.state.jump_to_top(),
            (KeyCode::End, _) | (KeyCode::Char('G'), _) => self.state.jump_to_bottom(),
            (KeyCode::Left, _) => self.state.scroll_left(HORIZONTAL_STEP),
            (KeyCode::Right, _) => self.state.scroll_right(HORIZONTAL_STEP),
            _ => {}
        }

        Ok(())
    }

    fn send_action(&self, action: UIAction) {
        if let Err(e) = self.action_tx.send(action) {
            warn!("Dropped UI action {:?}: {}", action, e);
        }
    }

    fn copy_logs(&mut self) {
        let entries = self.store.snapshot();
        let text = copy_all_text(&self.device, &entries);

        match self.clipboard.copy(&text) {
            Ok(()) => {
                info!(entries = entries.len(), "Logs copied to clipboard");
                self.state.set_notice("Logs copied");
            }
            Err(e) => {
                debug!("Clipboard copy failed: {}", e);
                self.state.set_notice(format!("Copy failed: {}", e));
            }
        }
    }

    /// Rows available for log lines, below which sit the status and help
    /// lines.
    pub(super) fn visible_lines(&self) -> usize {
        self.state.terminal_size.1.saturating_sub(2) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{DeviceInfo, LogStore, StoreChange};
    use crate::ui::clipboard::ClipboardSink;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

    impl ClipboardSink for RecordingClipboard {
        fn copy(&mut self, text: &str) -> Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Harness {
        ui: TerminalUI,
        store: Arc<LogStore>,
        actions: mpsc::UnboundedReceiver<UIAction>,
        copied: Arc<Mutex<Vec<String>>>,
        _events: mpsc::UnboundedSender<UIEvent>,
    }

    fn harness(auto_scroll: bool) -> Harness {
        let store = Arc::new(LogStore::new(500));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (action_tx, actions) = mpsc::unbounded_channel();
        let copied = Arc::new(Mutex::new(Vec::new()));
        let device = DeviceInfo {
            os_version: "17.4".to_string(),
            name: "bench".to_string(),
            model: "iPhone".to_string(),
        };
        let ui = TerminalUI::new(
            store.clone(),
            device,
            "idevice_log.txt".to_string(),
            auto_scroll,
            event_rx,
            action_tx,
            Box::new(RecordingClipboard(copied.clone())),
        );
        Harness {
            ui,
            store,
            actions,
            copied,
            _events: event_tx,
        }
    }

    fn press(ui: &mut TerminalUI, code: KeyCode) {
        ui.handle_event(UIEvent::KeyPress(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    #[test]
    fn clear_and_refresh_are_forwarded() {
        let mut h = harness(true);
        press(&mut h.ui, KeyCode::Char('c'));
        press(&mut h.ui, KeyCode::Char('r'));

        assert_eq!(h.actions.try_recv().unwrap(), UIAction::Clear);
        assert_eq!(h.actions.try_recv().unwrap(), UIAction::Refresh);
    }

    #[test]
    fn copy_sends_report_to_clipboard() {
        let mut h = harness(true);
        h.store.add_info("hello");
        press(&mut h.ui, KeyCode::Char('y'));

        let copied = h.copied.lock().unwrap();
        assert_eq!(copied.len(), 1);
        assert!(copied[0].starts_with("=== DEVICE INFORMATION ==="));
        assert!(copied[0].ends_with("[INFO] hello"));
        assert_eq!(h.ui.state.current_notice(5), Some("Logs copied"));
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut h = harness(true);
        press(&mut h.ui, KeyCode::Char('q'));
        assert!(h.ui.state.should_quit);

        let mut h = harness(true);
        h.ui.handle_event(UIEvent::KeyPress(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
        .unwrap();
        assert!(h.ui.state.should_quit);
        assert!(h.actions.try_recv().is_err());
    }

    #[test]
    fn manual_scroll_suppresses_auto_scroll() {
        let mut h = harness(true);
        press(&mut h.ui, KeyCode::Up);
        h.ui.handle_event(UIEvent::Store(StoreChange::Appended(2))).unwrap();
        assert_eq!(h.ui.state.scroll_offset, 3);

        press(&mut h.ui, KeyCode::End);
        h.ui.handle_event(UIEvent::Store(StoreChange::Appended(2))).unwrap();
        assert_eq!(h.ui.state.scroll_offset, 0);
    }

    #[test]
    fn toggle_auto_scroll_key() {
        let mut h = harness(true);
        press(&mut h.ui, KeyCode::Char('a'));
        assert!(!h.ui.state.auto_scroll);
        assert_eq!(h.ui.state.current_notice(5), Some("Auto scroll off"));
    }

    #[test]
    fn resize_updates_page_size() {
        let mut h = harness(true);
        h.ui.handle_event(UIEvent::Resize(100, 40)).unwrap();
        assert_eq!(h.ui.visible_lines(), 38);

        press(&mut h.ui, KeyCode::PageUp);
        assert_eq!(h.ui.state.scroll_offset, 38);
    }
}
