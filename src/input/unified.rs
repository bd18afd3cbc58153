//! Keyboard + gamepad behind one polling interface
//!
//! Both backends are updated every tick so a switch between them always
//! reflects live state. Queries then go entirely to the gamepad while one is
//! connected in slot 0, otherwise entirely to the keyboard; readings are
//! never blended.

use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use super::backend::InputBackend;
use super::button::{ButtonName, StickName};
use super::events::KeyEvent;
use super::gamepad::{GamepadBackend, PRIMARY_PAD};
use super::keyboard::KeyboardBackend;
use super::snapshot::GamepadSource;
use super::stick::StickReading;
use crate::config::InputConfig;

/// Which backend currently answers queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveInputMethod {
    Gamepad,
    Keyboard,
}

impl ActiveInputMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveInputMethod::Gamepad => "gamepad",
            ActiveInputMethod::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for ActiveInputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified input facade
pub struct UnifiedInput<S> {
    keyboard: KeyboardBackend,
    gamepad: GamepadBackend<S>,
    prefer_gamepad: bool,
}

impl<S: GamepadSource> UnifiedInput<S> {
    pub fn new(keyboard: KeyboardBackend, gamepad: GamepadBackend<S>) -> Self {
        Self {
            keyboard,
            gamepad,
            prefer_gamepad: false,
        }
    }

    /// Build both backends from configuration, without hooks, haptics or key sink
    pub fn from_config(config: &InputConfig, source: S) -> Self {
        Self::new(
            KeyboardBackend::new(&config.keyboard),
            GamepadBackend::new(source, &config.gamepad),
        )
    }

    fn active(&self) -> &dyn InputBackend {
        if self.prefer_gamepad {
            &self.gamepad
        } else {
            &self.keyboard
        }
    }

    /// Whether the last update selected the gamepad
    pub fn prefers_gamepad(&self) -> bool {
        self.prefer_gamepad
    }

    pub fn is_gamepad_connected(&self) -> bool {
        self.gamepad.is_connected(PRIMARY_PAD)
    }

    /// Backend answering queries, from the connection state alone
    pub fn active_input_method(&self) -> ActiveInputMethod {
        if self.is_gamepad_connected() {
            ActiveInputMethod::Gamepad
        } else {
            ActiveInputMethod::Keyboard
        }
    }

    /// Rumble the primary pad; resolves immediately when none is connected
    pub fn rumble(&self, intensity: f32, duration: Duration) -> impl Future<Output = ()> + 'static {
        let request = self
            .is_gamepad_connected()
            .then(|| self.gamepad.rumble(intensity, duration, PRIMARY_PAD));

        async move {
            if let Some(request) = request {
                request.await;
            }
        }
    }

    pub fn keyboard_controls(&self) -> &'static [(&'static str, &'static str)] {
        self.keyboard.keyboard_controls()
    }

    pub fn keyboard_map(&self) -> &'static [(&'static str, &'static str)] {
        self.keyboard.keyboard_map()
    }

    pub fn keyboard(&self) -> &KeyboardBackend {
        &self.keyboard
    }

    /// Keyboard backend, e.g. to feed it key events
    pub fn keyboard_mut(&mut self) -> &mut KeyboardBackend {
        &mut self.keyboard
    }

    pub fn gamepad(&self) -> &GamepadBackend<S> {
        &self.gamepad
    }

    /// Feed keys forwarded from the gamepad back into the keyboard backend
    ///
    /// Synthetic events reach the same key listener as physical ones, so
    /// they take effect on the next update. Returns the events consumed.
    pub fn route_forwarded_keys(&mut self, rx: &mut mpsc::UnboundedReceiver<KeyEvent>) -> Vec<KeyEvent> {
        let mut routed = Vec::new();
        while let Ok(event) = rx.try_recv() {
            self.keyboard.handle_key_event(&event);
            routed.push(event);
        }
        routed
    }
}

impl<S: GamepadSource> InputBackend for UnifiedInput<S> {
    /// Keyboard first, then gamepad, then backend selection
    fn update(&mut self) {
        self.keyboard.update();
        self.gamepad.update();
        self.prefer_gamepad = self.gamepad.is_connected(PRIMARY_PAD);
    }

    fn is_button_down(&self, button: ButtonName) -> bool {
        self.active().is_button_down(button)
    }

    fn just_pressed(&self, button: ButtonName) -> bool {
        self.active().just_pressed(button)
    }

    fn just_released(&self, button: ButtonName) -> bool {
        self.active().just_released(button)
    }

    fn stick(&self, stick: StickName) -> StickReading {
        self.active().stick(stick)
    }

    fn trigger(&self, trigger: ButtonName) -> f32 {
        self.active().trigger(trigger)
    }

    fn pressed_buttons(&self) -> Vec<ButtonName> {
        self.active().pressed_buttons()
    }
}
