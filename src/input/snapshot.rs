//! Point-in-time gamepad snapshots and the platform source trait
//!
//! A [`GamepadSource`] stands in for the platform's "read all gamepads"
//! call. Each poll returns one [`PadSnapshot`] per connected pad, laid out in
//! the standard mapping (see [`ButtonName`](super::button::ButtonName)).

use super::button::{ButtonName, StickName};

/// Mapping type reported for pads whose layout matches the standard one
pub const STANDARD_MAPPING: &str = "standard";

/// A single button reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonState {
    pub pressed: bool,
    /// Analog value in `[0, 1]` (0/1 for purely digital buttons)
    pub value: f32,
}

impl ButtonState {
    pub fn digital(pressed: bool) -> Self {
        Self {
            pressed,
            value: if pressed { 1.0 } else { 0.0 },
        }
    }

    pub fn analog(value: f32) -> Self {
        Self {
            pressed: value > 0.0,
            value,
        }
    }
}

/// Everything observed on one pad at one polling instant
#[derive(Debug, Clone, PartialEq)]
pub struct PadSnapshot {
    /// Slot index of the pad
    pub index: usize,
    /// Identifying product string
    pub id: String,
    pub connected: bool,
    /// Layout type, `"standard"` when buttons follow the standard slots
    pub mapping: String,
    pub buttons: Vec<ButtonState>,
    pub axes: Vec<f32>,
}

impl PadSnapshot {
    /// Create an idle standard-layout snapshot (17 buttons, 4 axes)
    pub fn standard(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            connected: true,
            mapping: STANDARD_MAPPING.to_string(),
            buttons: vec![ButtonState::default(); ButtonName::ALL.len()],
            axes: vec![0.0; 4],
        }
    }

    /// Reading for a logical button, if the pad exposes that slot
    pub fn button(&self, name: ButtonName) -> Option<&ButtonState> {
        self.buttons.get(name.standard_index())
    }

    /// Raw `(x, y)` axis pair for a stick; missing axes read as 0
    pub fn stick_axes(&self, stick: StickName) -> (f32, f32) {
        let (xi, yi) = stick.axis_indices();
        (
            self.axes.get(xi).copied().unwrap_or(0.0),
            self.axes.get(yi).copied().unwrap_or(0.0),
        )
    }

    pub fn set_button(&mut self, name: ButtonName, state: ButtonState) {
        let idx = name.standard_index();
        if idx >= self.buttons.len() {
            self.buttons.resize(idx + 1, ButtonState::default());
        }
        self.buttons[idx] = state;
    }

    pub fn set_stick(&mut self, stick: StickName, x: f32, y: f32) {
        let (xi, yi) = stick.axis_indices();
        let needed = xi.max(yi) + 1;
        if self.axes.len() < needed {
            self.axes.resize(needed, 0.0);
        }
        self.axes[xi] = x;
        self.axes[yi] = y;
    }
}

/// Platform gamepad reader
///
/// Implementations return only pads that are present right now; absence of
/// an index in the result means "no gamepad in that slot".
pub trait GamepadSource {
    fn poll(&mut self) -> Vec<PadSnapshot>;
}

impl<S: GamepadSource + ?Sized> GamepadSource for Box<S> {
    fn poll(&mut self) -> Vec<PadSnapshot> {
        (**self).poll()
    }
}

/// A source that never reports a gamepad
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGamepads;

impl GamepadSource for NoGamepads {
    fn poll(&mut self) -> Vec<PadSnapshot> {
        Vec::new()
    }
}
