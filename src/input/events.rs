//! Key events consumed by the keyboard backend and produced by gamepad
//! key forwarding
//!
//! Forwarded events use the same [`KeyEvent`] type as physical key presses,
//! so a consumer cannot tell the two apart.

use std::fmt;
use tokio::sync::mpsc;
use tracing::warn;

/// Key transition direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    Down,
    Up,
}

impl fmt::Display for KeyEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEventKind::Down => f.write_str("keydown"),
            KeyEventKind::Up => f.write_str("keyup"),
        }
    }
}

/// Modifier keys held when the event fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A key-down or key-up event identified by its key string
/// (`"a"`, `"ArrowUp"`, `" "`, `"Enter"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: String,
    pub kind: KeyEventKind,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: KeyEventKind::Down,
            modifiers: Modifiers::default(),
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: KeyEventKind::Up,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.key)
    }
}

/// Receiver of synthesized key events
pub trait KeyEventSink {
    fn dispatch(&mut self, event: KeyEvent);
}

impl KeyEventSink for mpsc::UnboundedSender<KeyEvent> {
    fn dispatch(&mut self, event: KeyEvent) {
        if let Err(e) = self.send(event) {
            warn!("Key event receiver dropped: {}", e);
        }
    }
}

impl KeyEventSink for Vec<KeyEvent> {
    fn dispatch(&mut self, event: KeyEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let down = KeyEvent::down("ArrowUp");
        assert_eq!(down.kind, KeyEventKind::Down);
        assert_eq!(down.key, "ArrowUp");
        assert_eq!(down.modifiers, Modifiers::default());

        let up = KeyEvent::up(" ").with_modifiers(Modifiers { shift: true, ..Default::default() });
        assert_eq!(up.kind, KeyEventKind::Up);
        assert!(up.modifiers.shift);
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyEvent::down("a").to_string(), "keydown \"a\"");
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_events() {
        let (mut tx, mut rx) = mpsc::unbounded_channel::<KeyEvent>();
        tx.dispatch(KeyEvent::down("ArrowLeft"));
        assert_eq!(rx.recv().await, Some(KeyEvent::down("ArrowLeft")));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (mut tx, rx) = mpsc::unbounded_channel::<KeyEvent>();
        drop(rx);
        tx.dispatch(KeyEvent::up("a"));
    }
}
