//! Ally Input - unified keyboard + gamepad polling for a handheld console UI
//!
//! The [`input`] module holds both backends and the [`UnifiedInput`] facade
//! that picks between them each frame; [`config`] loads the YAML settings
//! they are built from.

pub mod config;
pub mod input;

pub use config::InputConfig;
pub use input::{
    ActiveInputMethod, ButtonName, GamepadBackend, InputBackend, KeyEvent, KeyboardBackend,
    StickName, StickReading, UnifiedInput,
};
