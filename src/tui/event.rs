//! Event Handling
//!
//! Handles keyboard, paste, and timer events for the TUI. A path dragged
//! onto the terminal arrives as a bracketed paste.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application; in-flight requests are abandoned
    Quit,
    /// Ctrl+C
    ForceQuit,
    /// Enter: select the typed path, or run the analysis
    Submit,
    /// Text pasted into the terminal, usually a dropped file
    Paste(String),
    /// Load the server's sample data
    LoadSample,
    /// Clear the current file and everything derived from it
    ClearFile,
    /// Upload the current file again
    Reupload,
    /// Toggle help view
    ToggleHelp,
    /// Escape - close modals, dismiss alerts
    Escape,
    /// Move focus to the next panel (Tab)
    NextFocus,
    /// Move focus to the previous panel (Shift+Tab)
    PrevFocus,
    Up,
    Down,
    Left,
    Right,
    /// Previous page of charts
    PageUp,
    /// Next page of charts
    PageDown,
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

        // Spawn event polling task
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

    /// Try to get the next action without blocking
    pub async fn try_next(&mut self) -> Option<AppAction> {
        self.rx.try_recv().ok()
    }

    /// Map a crossterm event to an app action
    fn map_event(event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) => Self::map_key_event(key),
            Event::Paste(text) => Some(AppAction::Paste(text)),
            Event::Resize(_, _) => None, // Terminal handles resize
            _ => None,
        }
    }

    /// Map a key event to an app action
    fn map_key_event(key: KeyEvent) -> Option<AppAction> {
        match (key.modifiers, key.code) {
            // Quit shortcuts
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),

            // File commands
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(AppAction::LoadSample),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(AppAction::ClearFile),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(AppAction::Reupload),

            (KeyModifiers::CONTROL, KeyCode::Char('h')) => Some(AppAction::ToggleHelp),

            // Navigation with modifiers
            (KeyModifiers::SHIFT, KeyCode::BackTab) => Some(AppAction::PrevFocus),

            (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => Some(AppAction::Escape),
                KeyCode::Enter => Some(AppAction::Submit),
                KeyCode::F(1) => Some(AppAction::ToggleHelp),

                KeyCode::Tab => Some(AppAction::NextFocus),
                KeyCode::BackTab => Some(AppAction::PrevFocus),
                KeyCode::Up => Some(AppAction::Up),
                KeyCode::Down => Some(AppAction::Down),
                KeyCode::Left => Some(AppAction::Left),
                KeyCode::Right => Some(AppAction::Right),
                KeyCode::PageUp => Some(AppAction::PageUp),
                KeyCode::PageDown => Some(AppAction::PageDown),

                // All other characters are input
                _ => Some(AppAction::Input(key)),
            },

            // Pass through other key combinations as input
            _ => Some(AppAction::Input(key)),
        }
    }
}
