//! Gamepad backend: polled snapshots with per-tick edge detection
//!
//! Each [`GamepadBackend::update`] moves the current snapshots into
//! "previous" and re-polls the [`GamepadSource`]. Queries compare the two,
//! so they only make sense after the tick's `update`.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::backend::InputBackend;
use super::button::{ButtonName, StickName};
use super::events::KeyEventSink;
use super::haptics::{DualRumble, HapticsHandle};
use super::snapshot::{ButtonState, GamepadSource, PadSnapshot};
use super::stick::{apply_radial_deadzone, StickReading};
use super::synth::KeyForwarder;
use crate::config::GamepadConfig;

/// Pad that queries without an explicit index refer to
pub const PRIMARY_PAD: usize = 0;

/// Current/previous view of one pad slot
#[derive(Debug, Clone, Copy)]
pub struct PadFrames<'a> {
    pub current: Option<&'a PadSnapshot>,
    pub previous: Option<&'a PadSnapshot>,
    deadzone: f32,
    trigger_threshold: f32,
}

impl<'a> PadFrames<'a> {
    pub fn new(
        current: Option<&'a PadSnapshot>,
        previous: Option<&'a PadSnapshot>,
        config: &GamepadConfig,
    ) -> Self {
        Self {
            current,
            previous,
            deadzone: config.deadzone,
            trigger_threshold: config.trigger_threshold,
        }
    }

    /// Digital state of a reading; LT/RT use the analog threshold
    fn reads_down(&self, button: ButtonName, state: &ButtonState) -> bool {
        if button.is_trigger() {
            state.value >= self.trigger_threshold
        } else {
            state.pressed
        }
    }

    fn down_in(&self, pad: Option<&PadSnapshot>, button: ButtonName) -> Option<bool> {
        pad.and_then(|p| p.button(button))
            .map(|state| self.reads_down(button, state))
    }

    pub fn is_down(&self, button: ButtonName) -> bool {
        self.down_in(self.current, button).unwrap_or(false)
    }

    pub fn just_pressed(&self, button: ButtonName) -> bool {
        match self.down_in(self.current, button) {
            Some(now) => now && !self.down_in(self.previous, button).unwrap_or(false),
            None => false,
        }
    }

    pub fn just_released(&self, button: ButtonName) -> bool {
        match self.down_in(self.previous, button) {
            Some(before) => before && !self.down_in(self.current, button).unwrap_or(false),
            None => false,
        }
    }

    pub fn stick(&self, stick: StickName) -> StickReading {
        let Some(pad) = self.current else {
            return StickReading::ZERO;
        };
        let (x, y) = pad.stick_axes(stick);
        // Platform reports "up" as negative
        apply_radial_deadzone(x, -y, self.deadzone)
    }

    pub fn trigger(&self, trigger: ButtonName) -> f32 {
        if !trigger.is_trigger() {
            return 0.0;
        }
        self.current
            .and_then(|p| p.button(trigger))
            .map(|state| state.value)
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

/// Gamepad input backend
pub struct GamepadBackend<S> {
    source: S,
    config: GamepadConfig,
    current: BTreeMap<usize, PadSnapshot>,
    previous: BTreeMap<usize, PadSnapshot>,
    haptics: Option<HapticsHandle>,
    forwarder: KeyForwarder,
}

impl<S: GamepadSource> GamepadBackend<S> {
    pub fn new(source: S, config: &GamepadConfig) -> Self {
        Self {
            source,
            forwarder: KeyForwarder::new(config),
            config: config.clone(),
            current: BTreeMap::new(),
            previous: BTreeMap::new(),
            haptics: None,
        }
    }

    /// Attach the rumble capability
    pub fn with_haptics(mut self, haptics: HapticsHandle) -> Self {
        self.haptics = Some(haptics);
        self
    }

    /// Attach the receiver for forwarded key events
    pub fn with_key_sink(mut self, sink: Box<dyn KeyEventSink>) -> Self {
        self.forwarder.set_sink(sink);
        self
    }

    /// Poll the source and run key forwarding for the primary pad
    pub fn update(&mut self) {
        self.previous = std::mem::take(&mut self.current);

        for pad in self.source.poll() {
            if !pad.connected {
                continue;
            }
            if pad.index >= self.config.max_gamepads {
                debug!("Ignoring gamepad in slot {} (max {})", pad.index, self.config.max_gamepads);
                continue;
            }
            self.current.insert(pad.index, pad);
        }

        self.log_connection_changes();

        // Also runs on the tick the pad disappears so forwarded keys are released
        if self.current.contains_key(&PRIMARY_PAD) || self.previous.contains_key(&PRIMARY_PAD) {
            let frames = PadFrames::new(
                self.current.get(&PRIMARY_PAD),
                self.previous.get(&PRIMARY_PAD),
                &self.config,
            );
            self.forwarder.forward(&frames);
        }
    }

    fn log_connection_changes(&self) {
        for (index, pad) in &self.current {
            if !self.previous.contains_key(index) {
                info!("🎮 Gamepad {} connected: {} (mapping: {:?})", index, pad.id, pad.mapping);
            }
        }
        for (index, pad) in &self.previous {
            if !self.current.contains_key(index) {
                info!("🎮 Gamepad {} disconnected: {}", index, pad.id);
            }
        }
    }

    /// Edge/level view of one pad for this tick
    pub fn frames(&self, pad_index: usize) -> PadFrames<'_> {
        PadFrames::new(
            self.current.get(&pad_index),
            self.previous.get(&pad_index),
            &self.config,
        )
    }

    pub fn is_connected(&self, pad_index: usize) -> bool {
        self.current.contains_key(&pad_index)
    }

    /// `(index, id)` of every pad seen in the latest update
    pub fn gamepad_ids(&self) -> Vec<(usize, String)> {
        self.current
            .iter()
            .map(|(index, pad)| (*index, pad.id.clone()))
            .collect()
    }

    pub fn is_button_down_on(&self, button: ButtonName, pad_index: usize) -> bool {
        self.frames(pad_index).is_down(button)
    }

    pub fn just_pressed_on(&self, button: ButtonName, pad_index: usize) -> bool {
        self.frames(pad_index).just_pressed(button)
    }

    pub fn just_released_on(&self, button: ButtonName, pad_index: usize) -> bool {
        self.frames(pad_index).just_released(button)
    }

    pub fn stick_on(&self, stick: StickName, pad_index: usize) -> StickReading {
        self.frames(pad_index).stick(stick)
    }

    pub fn trigger_on(&self, trigger: ButtonName, pad_index: usize) -> f32 {
        self.frames(pad_index).trigger(trigger)
    }

    pub fn pressed_buttons_on(&self, pad_index: usize) -> Vec<ButtonName> {
        let frames = self.frames(pad_index);
        ButtonName::ALL
            .into_iter()
            .filter(|b| frames.is_down(*b))
            .collect()
    }

    /// Rumble a pad.
    ///
    /// The returned future owns everything it needs, so it can be awaited or
    /// spawned as fire-and-forget. It resolves once the platform call settles.
    /// Missing hardware is a no-op; platform failures are logged, never
    /// returned.
    pub fn rumble(
        &self,
        intensity: f32,
        duration: Duration,
        pad_index: usize,
    ) -> impl Future<Output = ()> + 'static {
        let target = self
            .haptics
            .clone()
            .filter(|_| self.is_connected(pad_index));
        let effect = DualRumble::new(intensity, duration);

        async move {
            let Some(haptics) = target else {
                debug!("Rumble skipped: no haptics for gamepad {}", pad_index);
                return;
            };
            if let Err(e) = haptics.play_dual_rumble(pad_index, effect).await {
                warn!("Rumble not supported: {}", e);
            }
        }
    }
}

impl<S: GamepadSource> InputBackend for GamepadBackend<S> {
    fn update(&mut self) {
        GamepadBackend::update(self);
    }

    fn is_button_down(&self, button: ButtonName) -> bool {
        self.is_button_down_on(button, PRIMARY_PAD)
    }

    fn just_pressed(&self, button: ButtonName) -> bool {
        self.just_pressed_on(button, PRIMARY_PAD)
    }

    fn just_released(&self, button: ButtonName) -> bool {
        self.just_released_on(button, PRIMARY_PAD)
    }

    fn stick(&self, stick: StickName) -> StickReading {
        self.stick_on(stick, PRIMARY_PAD)
    }

    fn trigger(&self, trigger: ButtonName) -> f32 {
        self.trigger_on(trigger, PRIMARY_PAD)
    }

    fn pressed_buttons(&self) -> Vec<ButtonName> {
        self.pressed_buttons_on(PRIMARY_PAD)
    }
}
