//! Unified keyboard + gamepad input
//!
//! Two backends answer the same polling contract ([`InputBackend`]):
//!
//! - [`KeyboardBackend`]: raw key state mapped onto logical buttons, with
//!   emulated sticks and triggers
//! - [`GamepadBackend`]: polled pad snapshots with deadzone handling, rumble
//!   and forwarding of pad activity as synthetic key events
//!
//! [`UnifiedInput`] drives both once per frame and routes queries to the
//! gamepad while one is connected, otherwise to the keyboard.

pub mod backend;
pub mod button;
pub mod diagnostics;
pub mod events;
pub mod gamepad;
pub mod gilrs_source;
pub mod haptics;
pub mod keyboard;
pub mod keymap;
pub mod navigation;
pub mod snapshot;
pub mod stick;
pub mod synth;
pub mod unified;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use backend::InputBackend;
pub use button::{ButtonName, ParseNameError, StickName};
pub use events::{KeyEvent, KeyEventKind, KeyEventSink, Modifiers};
pub use gamepad::{GamepadBackend, PRIMARY_PAD};
pub use gilrs_source::{GilrsHaptics, GilrsSource};
pub use haptics::{
    DualRumble, Haptics, HapticsError, HapticsHandle, DEFAULT_RUMBLE_DURATION,
    DEFAULT_RUMBLE_INTENSITY,
};
pub use keyboard::KeyboardBackend;
pub use navigation::NavigationHooks;
pub use snapshot::{ButtonState, GamepadSource, NoGamepads, PadSnapshot};
pub use stick::StickReading;
pub use unified::{ActiveInputMethod, UnifiedInput};
