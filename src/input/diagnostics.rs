//! Gamepad diagnostics for troubleshooting detection and mapping

use std::time::{Duration, Instant};
use tracing::info;

use super::button::{ButtonName, StickName};
use super::snapshot::{GamepadSource, PadSnapshot, STANDARD_MAPPING};

const AXIS_REPORT_THRESHOLD: f32 = 0.01;

/// Describe one pad as log lines: identity, layout and live state
pub fn describe_pad(pad: &PadSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("📋 Gamepad {}: \"{}\"", pad.index, pad.id),
        format!(
            "   Mapping: {}",
            if pad.mapping == STANDARD_MAPPING {
                "standard"
            } else {
                "non-standard (buttons may be misplaced)"
            }
        ),
        format!("   Buttons: {}, axes: {}", pad.buttons.len(), pad.axes.len()),
    ];

    let pressed: Vec<&str> = ButtonName::ALL
        .iter()
        .filter(|b| pad.button(**b).is_some_and(|s| s.pressed))
        .map(|b| b.as_str())
        .collect();
    if pressed.is_empty() {
        lines.push("   🎮 (no buttons currently pressed)".to_string());
    } else {
        lines.push(format!("   🎮 Pressed: {}", pressed.join(" ")));
    }

    for trigger in [ButtonName::Lt, ButtonName::Rt] {
        let value = pad.button(trigger).map_or(0.0, |s| s.value);
        if value > AXIS_REPORT_THRESHOLD {
            lines.push(format!("   {}: {:.3}", trigger, value));
        }
    }

    let mut centered = true;
    for stick in [StickName::Left, StickName::Right] {
        let (x, y) = pad.stick_axes(stick);
        if x.abs() > AXIS_REPORT_THRESHOLD || y.abs() > AXIS_REPORT_THRESHOLD {
            lines.push(format!("   🕹️  {} stick: x={:.3} y={:.3}", stick, x, y));
            centered = false;
        }
    }
    if centered {
        lines.push("   🕹️  (sticks centered, move them to see values)".to_string());
    }

    lines
}

/// Poll `source` for `wait` so slow (Bluetooth) pads can show up, then log
/// every connected pad
pub fn print_gamepad_diagnostics<S: GamepadSource>(source: &mut S, wait: Duration) {
    info!("=== Gamepad Diagnostics ===");
    info!("Platform: {}", std::env::consts::OS);
    info!("⏳ Waiting {:?} for gamepads to connect...", wait);

    let start = Instant::now();
    let mut pads = source.poll();
    while start.elapsed() < wait {
        std::thread::sleep(Duration::from_millis(100));
        pads = source.poll();
    }

    let connected: Vec<_> = pads.into_iter().filter(|p| p.connected).collect();
    if connected.is_empty() {
        info!("⚠️  No gamepads detected");
        info!("   Keyboard controls remain available");
        return;
    }

    info!("✅ Found {} gamepad(s):", connected.len());
    for pad in &connected {
        for line in describe_pad(pad) {
            info!("{}", line);
        }
    }
    info!("=== End Diagnostics ===");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::snapshot::ButtonState;

    #[test]
    fn test_describe_idle_standard_pad() {
        let pad = PadSnapshot::standard(0, "ROG Ally");
        let lines = describe_pad(&pad);

        assert_eq!(lines[0], "📋 Gamepad 0: \"ROG Ally\"");
        assert_eq!(lines[1], "   Mapping: standard");
        assert_eq!(lines[2], "   Buttons: 17, axes: 4");
        assert!(lines.iter().any(|l| l.contains("no buttons currently pressed")));
        assert!(lines.iter().any(|l| l.contains("sticks centered")));
    }

    #[test]
    fn test_describe_live_state() {
        let mut pad = PadSnapshot::standard(1, "Pad");
        pad.set_button(ButtonName::A, ButtonState::digital(true));
        pad.set_button(ButtonName::Lb, ButtonState::digital(true));
        pad.set_button(ButtonName::Rt, ButtonState::analog(0.5));
        pad.set_stick(StickName::Right, 0.25, -1.0);

        let lines = describe_pad(&pad);
        assert!(lines.contains(&"   🎮 Pressed: A LB RT".to_string()));
        assert!(lines.contains(&"   RT: 0.500".to_string()));
        assert!(lines.contains(&"   🕹️  RIGHT stick: x=0.250 y=-1.000".to_string()));
    }

    #[test]
    fn test_describe_non_standard_mapping() {
        let mut pad = PadSnapshot::standard(0, "Generic");
        pad.mapping = String::new();
        assert!(describe_pad(&pad)[1].contains("non-standard"));
    }
}
