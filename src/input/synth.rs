//! Forward primary-pad activity as synthetic key events
//!
//! Lets keyboard-only consumers react to the gamepad unchanged:
//!
//! - D-pad presses/releases become arrow key down/up
//! - configured buttons become one or more keys (A -> space, "a", "A")
//! - left-stick deflection past the stick threshold becomes arrow keys,
//!   tracked per direction so diagonals raise and drop each axis key on
//!   their own

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

use super::button::{ButtonName, StickName};
use super::events::{KeyEvent, KeyEventSink};
use super::gamepad::PadFrames;
use crate::config::{DirectionKeys, GamepadConfig};

/// Turns pad edges into key events
pub struct KeyForwarder {
    direction_keys: DirectionKeys,
    button_keys: BTreeMap<ButtonName, Vec<String>>,
    stick_threshold: f32,
    /// Stick directions currently held down as keys
    stick_directions: HashSet<ButtonName>,
    sink: Option<Box<dyn KeyEventSink>>,
}

impl KeyForwarder {
    pub fn new(config: &GamepadConfig) -> Self {
        Self {
            direction_keys: config.direction_keys.clone(),
            button_keys: config.button_keys.clone(),
            stick_threshold: config.stick_threshold,
            stick_directions: HashSet::new(),
            sink: None,
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn KeyEventSink>) {
        self.sink = Some(sink);
    }

    /// Stick directions currently forwarded as held keys
    pub fn active_stick_directions(&self) -> impl Iterator<Item = ButtonName> + '_ {
        ButtonName::DPAD
            .into_iter()
            .filter(|d| self.stick_directions.contains(d))
    }

    fn emit(&mut self, event: KeyEvent) {
        match self.sink.as_mut() {
            Some(sink) => {
                trace!("Forwarding {}", event);
                sink.dispatch(event);
            },
            None => trace!("No key sink, dropping {}", event),
        }
    }

    /// Run all three forwarding passes for this tick
    pub fn forward(&mut self, pad: &PadFrames<'_>) {
        self.forward_dpad(pad);
        self.forward_buttons(pad);
        self.forward_stick(pad);
    }

    fn forward_dpad(&mut self, pad: &PadFrames<'_>) {
        for direction in ButtonName::DPAD {
            let Some(key) = self.direction_keys.for_button(direction).map(str::to_string) else {
                continue;
            };
            if pad.just_pressed(direction) {
                debug!("🎮 D-pad {} pressed, forwarding {} keydown", direction, key);
                self.emit(KeyEvent::down(key.clone()));
            }
            if pad.just_released(direction) {
                debug!("🎮 D-pad {} released, forwarding {} keyup", direction, key);
                self.emit(KeyEvent::up(key));
            }
        }
    }

    fn forward_buttons(&mut self, pad: &PadFrames<'_>) {
        let mut events = Vec::new();
        for (button, keys) in &self.button_keys {
            if pad.just_pressed(*button) {
                debug!("🎮 Button {} pressed, forwarding {:?}", button, keys);
                events.extend(keys.iter().map(|k| KeyEvent::down(k.clone())));
            }
            if pad.just_released(*button) {
                debug!("🎮 Button {} released, forwarding {:?}", button, keys);
                events.extend(keys.iter().map(|k| KeyEvent::up(k.clone())));
            }
        }
        for event in events {
            self.emit(event);
        }
    }

    fn forward_stick(&mut self, pad: &PadFrames<'_>) {
        let stick = pad.stick(StickName::Left);
        let threshold = self.stick_threshold;

        for direction in ButtonName::DPAD {
            let active = match direction {
                ButtonName::Up => stick.y > threshold,
                ButtonName::Down => stick.y < -threshold,
                ButtonName::Left => stick.x < -threshold,
                ButtonName::Right => stick.x > threshold,
                _ => false,
            };
            let Some(key) = self.direction_keys.for_button(direction).map(str::to_string) else {
                continue;
            };

            if active && self.stick_directions.insert(direction) {
                debug!("🎮 Left stick {}, forwarding {} keydown", direction, key);
                self.emit(KeyEvent::down(key));
            } else if !active && self.stick_directions.remove(&direction) {
                debug!("🎮 Left stick {} released, forwarding {} keyup", direction, key);
                self.emit(KeyEvent::up(key));
            }
        }
    }
}
