//! Polling contract shared by the keyboard and gamepad backends

use super::button::{ButtonName, StickName};
use super::stick::StickReading;

/// Per-tick input queries
///
/// `update` is called once per frame; every query afterwards answers for
/// that tick. None of the queries fail: an absent device or unmapped name
/// reads as released / zero.
pub trait InputBackend {
    fn update(&mut self);

    fn is_button_down(&self, button: ButtonName) -> bool;

    /// Down this tick and not down the tick before
    fn just_pressed(&self, button: ButtonName) -> bool;

    /// Down the tick before and not down this tick
    fn just_released(&self, button: ButtonName) -> bool;

    fn stick(&self, stick: StickName) -> StickReading;

    /// Trigger value in `[0, 1]`; 0 for anything other than LT/RT
    fn trigger(&self, trigger: ButtonName) -> f32;

    /// Held buttons in enumeration order
    fn pressed_buttons(&self) -> Vec<ButtonName> {
        ButtonName::ALL
            .into_iter()
            .filter(|b| self.is_button_down(*b))
            .collect()
    }
}
