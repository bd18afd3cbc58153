//! Rumble capability
//!
//! Haptics are optional hardware. A backend holds an
//! `Option<HapticsHandle>` decided once at construction instead of probing
//! for an actuator on every call.

use async_trait::async_trait;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Weak motor strength relative to the strong one
pub const WEAK_MOTOR_RATIO: f32 = 0.7;

/// Default rumble intensity
pub const DEFAULT_RUMBLE_INTENSITY: f32 = 0.5;

/// Default rumble length
pub const DEFAULT_RUMBLE_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum HapticsError {
    #[error("no gamepad at index {0}")]
    NoGamepad(usize),
    #[error("gamepad {0} does not support force feedback")]
    Unsupported(usize),
    #[error("haptics device error: {0}")]
    Device(String),
}

/// Dual-motor rumble effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualRumble {
    /// Strong (low-frequency) motor magnitude in `[0, 1]`
    pub strong: f32,
    /// Weak (high-frequency) motor magnitude in `[0, 1]`
    pub weak: f32,
    pub duration: Duration,
}

impl DualRumble {
    pub fn new(intensity: f32, duration: Duration) -> Self {
        let strong = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            strong,
            weak: strong * WEAK_MOTOR_RATIO,
            duration,
        }
    }
}

/// Platform haptics call
///
/// The returned future resolves once the effect has finished playing or the
/// platform rejected it.
#[async_trait(?Send)]
pub trait Haptics {
    async fn play_dual_rumble(&self, pad_index: usize, effect: DualRumble) -> Result<(), HapticsError>;
}

/// Shared handle to the haptics capability
pub type HapticsHandle = Rc<dyn Haptics>;
