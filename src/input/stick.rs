//! Analog stick readings and normalization
//!
//! Both backends report sticks as a [`StickReading`], but they shape raw
//! values differently:
//!
//! - [`apply_radial_deadzone`]: gamepad sticks. Circular deadzone, then the
//!   remaining travel is rescaled so the magnitude fills `[0, 1]`.
//! - [`clamp_to_unit`]: keyboard-emulated sticks. Axis values are already
//!   -1/0/+1, so there is no deadzone band; diagonals are pulled back onto
//!   the unit circle.

use serde::Serialize;

/// Smallest magnitude treated as a real deflection when dividing
const MIN_MAGNITUDE: f32 = 1e-6;

/// A normalized stick position with "up" positive on `y`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StickReading {
    pub x: f32,
    pub y: f32,
    pub magnitude: f32,
}

impl StickReading {
    /// Centered stick
    pub const ZERO: StickReading = StickReading {
        x: 0.0,
        y: 0.0,
        magnitude: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0.0
    }
}

/// Treat missing or non-finite axis values as centered
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Normalize a gamepad stick with a radial deadzone and radial rescaling.
///
/// Magnitudes below `deadzone` collapse to [`StickReading::ZERO`]. Above it,
/// `[deadzone, 1]` is mapped onto `[0, 1]` (clamped at 1) and both components
/// are scaled by the same factor, so direction is preserved.
///
/// # Arguments
/// * `x`, `y` - Stick values with "up" already positive on `y`
/// * `deadzone` - Circular deadzone radius in `[0, 1)`
///
/// # Example
/// ```
/// use ally_input::input::stick::apply_radial_deadzone;
///
/// assert!(apply_radial_deadzone(0.1, 0.0, 0.15).is_zero());
///
/// let full = apply_radial_deadzone(1.0, 0.0, 0.15);
/// assert!((full.x - 1.0).abs() < 1e-6);
/// assert!((full.magnitude - 1.0).abs() < 1e-6);
/// ```
pub fn apply_radial_deadzone(x: f32, y: f32, deadzone: f32) -> StickReading {
    let x = sanitize(x);
    let y = sanitize(y);
    let magnitude = x.hypot(y);

    if magnitude < deadzone || magnitude < MIN_MAGNITUDE || deadzone >= 1.0 {
        return StickReading::ZERO;
    }

    let normalized = ((magnitude - deadzone) / (1.0 - deadzone)).min(1.0);
    let scale = normalized / magnitude;

    StickReading {
        x: x * scale,
        y: y * scale,
        magnitude: normalized,
    }
}

/// Clamp a stick position to the unit circle.
///
/// Positions inside the circle are kept exactly; a diagonal such as `(1, 1)`
/// becomes `(0.707, 0.707)` with magnitude 1.
pub fn clamp_to_unit(x: f32, y: f32) -> StickReading {
    let x = sanitize(x);
    let y = sanitize(y);
    let magnitude = x.hypot(y);

    if magnitude > 1.0 {
        StickReading {
            x: x / magnitude,
            y: y / magnitude,
            magnitude: 1.0,
        }
    } else {
        StickReading { x, y, magnitude }
    }
}
