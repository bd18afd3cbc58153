//! gilrs-backed gamepad source and haptics
//!
//! gilrs reports buttons by physical position. The ROG Ally uses the Xbox
//! layout, so positions map onto standard slots directly:
//!
//! ```text
//!        [Y/North]
//!   [X/West]   [B/East]
//!        [A/South]
//! ```
//!
//! gilrs reports stick "up" as positive while the standard layout uses
//! negative, so Y axes are flipped here and flipped back by the backend.

use async_trait::async_trait;
use gilrs::ff::{BaseEffect, BaseEffectType, EffectBuilder, Replay, Ticks};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs, MappingSource};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

use super::button::{ButtonName, StickName};
use super::haptics::{DualRumble, Haptics, HapticsError};
use super::snapshot::{ButtonState, GamepadSource, PadSnapshot, STANDARD_MAPPING};

/// gilrs button for each standard slot, in slot order
pub const GILRS_BUTTONS: [(Button, ButtonName); 17] = [
    (Button::South, ButtonName::A),
    (Button::East, ButtonName::B),
    (Button::West, ButtonName::X),
    (Button::North, ButtonName::Y),
    (Button::LeftTrigger, ButtonName::Lb),
    (Button::RightTrigger, ButtonName::Rb),
    (Button::LeftTrigger2, ButtonName::Lt),
    (Button::RightTrigger2, ButtonName::Rt),
    (Button::Select, ButtonName::View),
    (Button::Start, ButtonName::Menu),
    (Button::LeftThumb, ButtonName::Ls),
    (Button::RightThumb, ButtonName::Rs),
    (Button::DPadUp, ButtonName::Up),
    (Button::DPadDown, ButtonName::Down),
    (Button::DPadLeft, ButtonName::Left),
    (Button::DPadRight, ButtonName::Right),
    (Button::Mode, ButtonName::Home),
];

/// Map a gilrs button to its logical name
///
/// Returns `None` for buttons with no standard slot (C, Z, Unknown).
pub fn gilrs_button_to_name(button: Button) -> Option<ButtonName> {
    GILRS_BUTTONS
        .iter()
        .find(|(b, _)| *b == button)
        .map(|(_, name)| *name)
}

/// gilrs axes for a stick
pub fn gilrs_stick_axes(stick: StickName) -> (Axis, Axis) {
    match stick {
        StickName::Left => (Axis::LeftStickX, Axis::LeftStickY),
        StickName::Right => (Axis::RightStickX, Axis::RightStickY),
    }
}

fn mapping_name(source: MappingSource) -> &'static str {
    match source {
        MappingSource::SdlMappings | MappingSource::Driver => STANDARD_MAPPING,
        MappingSource::None => "",
    }
}

/// Build a standard-layout snapshot from a gilrs gamepad
pub fn snapshot_gamepad(id: GamepadId, gamepad: &Gamepad<'_>) -> PadSnapshot {
    let mut pad = PadSnapshot::standard(usize::from(id), gamepad.name());
    pad.connected = gamepad.is_connected();
    pad.mapping = mapping_name(gamepad.mapping_source()).to_string();

    for (button, name) in GILRS_BUTTONS {
        let state = match gamepad.button_data(button) {
            Some(data) => ButtonState {
                pressed: data.is_pressed(),
                value: data.value(),
            },
            None => ButtonState::digital(gamepad.is_pressed(button)),
        };
        pad.set_button(name, state);
    }

    for stick in [StickName::Left, StickName::Right] {
        let (x_axis, y_axis) = gilrs_stick_axes(stick);
        pad.set_stick(stick, gamepad.value(x_axis), -gamepad.value(y_axis));
    }

    pad
}

/// [`GamepadSource`] over gilrs
///
/// gilrs is not thread-safe, so the context is shared with [`GilrsHaptics`]
/// through `Rc<RefCell<_>>` on the polling thread.
pub struct GilrsSource {
    gilrs: Rc<RefCell<Gilrs>>,
}

impl GilrsSource {
    pub fn new() -> anyhow::Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| anyhow::anyhow!("gilrs initialization failed: {}", e))?;
        debug!("gilrs initialized");
        Ok(Self {
            gilrs: Rc::new(RefCell::new(gilrs)),
        })
    }

    /// Rumble capability sharing this source's gilrs context
    pub fn haptics(&self) -> GilrsHaptics {
        GilrsHaptics {
            gilrs: self.gilrs.clone(),
        }
    }
}

impl GamepadSource for GilrsSource {
    fn poll(&mut self) -> Vec<PadSnapshot> {
        let mut gilrs = self.gilrs.borrow_mut();

        // Pump the event queue so gilrs refreshes its cached state
        while let Some(Event { id, event, .. }) = gilrs.next_event() {
            match event {
                EventType::Connected => info!("🎮 gilrs gamepad connected: {:?}", id),
                EventType::Disconnected => info!("🎮 gilrs gamepad disconnected: {:?}", id),
                _ => {},
            }
        }

        gilrs
            .gamepads()
            .filter(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, gamepad)| snapshot_gamepad(id, &gamepad))
            .collect()
    }
}

/// Dual-rumble through gilrs force feedback
pub struct GilrsHaptics {
    gilrs: Rc<RefCell<Gilrs>>,
}

fn motor_magnitude(strength: f32) -> u16 {
    (strength.clamp(0.0, 1.0) * f32::from(u16::MAX)).round() as u16
}

fn motor_effect(kind: BaseEffectType, play_for: Ticks) -> BaseEffect {
    BaseEffect {
        kind,
        scheduling: Replay {
            play_for,
            ..Default::default()
        },
        envelope: Default::default(),
    }
}

#[async_trait(?Send)]
impl Haptics for GilrsHaptics {
    async fn play_dual_rumble(&self, pad_index: usize, effect: DualRumble) -> Result<(), HapticsError> {
        // Dropping the effect stops it, so keep it alive until it has run
        let _playing = {
            let mut gilrs = self.gilrs.borrow_mut();

            let (id, supported) = gilrs
                .gamepads()
                .find(|(id, _)| usize::from(*id) == pad_index)
                .map(|(id, gamepad)| (id, gamepad.is_ff_supported()))
                .ok_or(HapticsError::NoGamepad(pad_index))?;

            if !supported {
                return Err(HapticsError::Unsupported(pad_index));
            }

            let millis = u32::try_from(effect.duration.as_millis()).unwrap_or(u32::MAX);
            let play_for = Ticks::from_ms(millis);

            let ff = EffectBuilder::new()
                .add_effect(motor_effect(
                    BaseEffectType::Strong {
                        magnitude: motor_magnitude(effect.strong),
                    },
                    play_for,
                ))
                .add_effect(motor_effect(
                    BaseEffectType::Weak {
                        magnitude: motor_magnitude(effect.weak),
                    },
                    play_for,
                ))
                .gamepads(&[id])
                .finish(&mut gilrs)
                .map_err(|e| HapticsError::Device(e.to_string()))?;

            ff.play().map_err(|e| HapticsError::Device(e.to_string()))?;
            ff
        };

        tokio::time::sleep(effect.duration).await;
        Ok(())
    }
}
