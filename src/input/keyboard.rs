//! Keyboard backend: logical buttons, sticks and triggers from raw keys
//!
//! Key events update a *held* set as they arrive. [`KeyboardBackend::update`]
//! then freezes that set into the current tick and keeps the previous tick
//! for edge detection, so `just_pressed` / `just_released` work at frame
//! granularity no matter how many events landed in between.

use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, trace};

use super::backend::InputBackend;
use super::button::{ButtonName, StickName};
use super::events::{KeyEvent, KeyEventKind};
use super::keymap::KeyMap;
use super::navigation::{NavigationHooks, TabStep, TabSwitcher};
use super::stick::{clamp_to_unit, StickReading};
use crate::config::KeyboardConfig;

/// Human-readable keyboard legend, in display order
pub const KEYBOARD_CONTROLS: [(&str, &str); 6] = [
    ("Navigation", "Arrow Keys (↑↓←→)"),
    ("Selection", "A key, S key, or Spacebar"),
    ("Alternative Navigation", "WASD or IJKL"),
    ("Menu", "Enter (MENU), Tab (VIEW), Esc (HOME)"),
    ("Shoulders", "Q (LB), E (RB)"),
    ("Triggers", "Z (LT), C (RT)"),
];

/// Full key-to-control reference for the default layout, in display order
pub const KEYBOARD_MAP: [(&str, &str); 8] = [
    ("ABXY", "W/A/S/D (Y/A/A/B)"),
    ("D-Pad", "Arrow Keys"),
    ("Shoulders", "Q/E (LB/RB)"),
    ("Triggers", "Z/C or 3/4 (LT/RT)"),
    ("Left Stick", "I/J/K/L"),
    ("Right Stick", "T/F/G/H or Numpad 8/4/5/6"),
    ("Stick Clicks", "R/F (LS/RS)"),
    ("Menu", "Tab/Enter/Esc (VIEW/MENU/HOME)"),
];

/// Keyboard input backend
pub struct KeyboardBackend {
    keymap: KeyMap,
    /// Keys down right now, updated per event
    held: HashSet<String>,
    /// Keys down at the latest tick
    current: HashSet<String>,
    /// Keys down at the tick before
    previous: HashSet<String>,
    left_stick: (f32, f32),
    right_stick: (f32, f32),
    tabs: Option<TabSwitcher>,
}

impl KeyboardBackend {
    /// Create a backend without tab-switch hooks
    pub fn new(config: &KeyboardConfig) -> Self {
        Self {
            keymap: KeyMap::from_config(config),
            held: HashSet::new(),
            current: HashSet::new(),
            previous: HashSet::new(),
            left_stick: (0.0, 0.0),
            right_stick: (0.0, 0.0),
            tabs: None,
        }
    }

    /// Create a backend whose LB/RB presses drive the navigation UI's tabs
    ///
    /// The hooks are ignored when `tab_switch.enabled` is off.
    pub fn with_navigation(config: &KeyboardConfig, hooks: Box<dyn NavigationHooks>) -> Self {
        let mut backend = Self::new(config);
        if config.tab_switch.enabled {
            backend.tabs = Some(TabSwitcher::new(hooks, &config.tab_switch));
        }
        backend
    }

    /// Feed a platform key event.
    ///
    /// Returns `true` when the key means something to this backend, in which
    /// case the caller should suppress the platform's default action.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        match event.kind {
            KeyEventKind::Down => self.key_down(&event.key),
            KeyEventKind::Up => self.key_up(&event.key),
        }
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        trace!("Key down: {:?}", key);
        self.held.insert(key.to_string());
        self.keymap.is_mapped(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        trace!("Key up: {:?}", key);
        self.held.remove(key);
        self.keymap.is_mapped(key)
    }

    /// Drop every held key (window lost focus, etc.)
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            debug!("Releasing {} held key(s)", self.held.len());
            self.held.clear();
        }
    }

    /// Advance one tick using an explicit clock
    pub fn update_at(&mut self, now: Instant) {
        self.previous = std::mem::replace(&mut self.current, self.held.clone());
        self.left_stick = self.keymap.stick_axes(StickName::Left, &self.current);
        self.right_stick = self.keymap.stick_axes(StickName::Right, &self.current);

        if self.tabs.is_some() {
            let step = if self.just_pressed(ButtonName::Lb) {
                Some(TabStep::Previous)
            } else if self.just_pressed(ButtonName::Rb) {
                Some(TabStep::Next)
            } else {
                None
            };

            if let Some(tabs) = self.tabs.as_mut() {
                tabs.tick(now);
                if let Some(step) = step {
                    tabs.step(step, now);
                }
            }
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn keyboard_controls(&self) -> &'static [(&'static str, &'static str)] {
        &KEYBOARD_CONTROLS
    }

    pub fn keyboard_map(&self) -> &'static [(&'static str, &'static str)] {
        &KEYBOARD_MAP
    }

    fn was_down(&self, button: ButtonName) -> bool {
        self.keymap.any_held(button, &self.previous)
    }
}

impl InputBackend for KeyboardBackend {
    fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn is_button_down(&self, button: ButtonName) -> bool {
        self.keymap.any_held(button, &self.current)
    }

    fn just_pressed(&self, button: ButtonName) -> bool {
        self.is_button_down(button) && !self.was_down(button)
    }

    fn just_released(&self, button: ButtonName) -> bool {
        !self.is_button_down(button) && self.was_down(button)
    }

    fn stick(&self, stick: StickName) -> StickReading {
        let (x, y) = match stick {
            StickName::Left => self.left_stick,
            StickName::Right => self.right_stick,
        };
        clamp_to_unit(x, y)
    }

    fn trigger(&self, trigger: ButtonName) -> f32 {
        self.keymap.trigger_value(trigger, &self.current)
    }
}
