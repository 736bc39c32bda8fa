//! Event Handling
//!
//! Handles keyboard and timer events for the TUI.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit
    ForceQuit,
    /// Submit current input (Enter key)
    Submit,
    /// Prompt for a document path
    OpenDocument,
    /// Run the analysis pass over the loaded document
    ProcessDocument,
    ToggleHelp,
    /// Escape - close modals, cancel
    Escape,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    /// Regular input character
    Input(KeyEvent),
    /// Timer tick for animations
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = Self::map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }

    fn map_event(event: Event) -> Option<AppAction> {
        match event {
            // Windows reports releases too; only act on presses.
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::map_key_event(key),
            _ => None,
        }
    }

    /// Map a key event to an app action
    pub(crate) fn map_key_event(key: KeyEvent) -> Option<AppAction> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),

            (KeyModifiers::CONTROL, KeyCode::Char('o')) => Some(AppAction::OpenDocument),
            (KeyModifiers::CONTROL, KeyCode::Char('p')) => Some(AppAction::ProcessDocument),
            (KeyModifiers::CONTROL, KeyCode::Char('h')) => Some(AppAction::ToggleHelp),

            (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => Some(AppAction::Escape),
                KeyCode::Enter => Some(AppAction::Submit),
                KeyCode::F(1) => Some(AppAction::ToggleHelp),

                KeyCode::Up => Some(AppAction::ScrollUp),
                KeyCode::Down => Some(AppAction::ScrollDown),
                KeyCode::PageUp | KeyCode::Home => Some(AppAction::ScrollPageUp),
                KeyCode::PageDown | KeyCode::End => Some(AppAction::ScrollPageDown),

                _ => Some(AppAction::Input(key)),
            },

            _ => Some(AppAction::Input(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_control_shortcuts() {
        assert!(matches!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('o'))),
            Some(AppAction::OpenDocument)
        ));
        assert!(matches!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('p'))),
            Some(AppAction::ProcessDocument)
        ));
        assert!(matches!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(AppAction::ForceQuit)
        ));
    }

    #[test]
    fn test_plain_characters_are_input() {
        assert!(matches!(
            EventHandler::map_key_event(key(KeyModifiers::NONE, KeyCode::Char('p'))),
            Some(AppAction::Input(_))
        ));
        assert!(matches!(
            EventHandler::map_key_event(key(KeyModifiers::SHIFT, KeyCode::Char('?'))),
            Some(AppAction::Input(_))
        ));
        assert!(matches!(
            EventHandler::map_key_event(key(KeyModifiers::NONE, KeyCode::Enter)),
            Some(AppAction::Submit)
        ));
    }
}
