//! Scenario tests for the unified input facade

use super::*;
use crate::config::InputConfig;
use crate::input::testing::{RecordingHaptics, ScriptedSource, SharedSink};
use std::rc::Rc;
use std::time::Duration;

fn make_input(source: &ScriptedSource) -> UnifiedInput<ScriptedSource> {
    UnifiedInput::from_config(&InputConfig::default(), source.clone())
}

#[test]
fn test_keyboard_is_default_method() {
    let source = ScriptedSource::new();
    let mut input = make_input(&source);
    input.update();

    assert_eq!(input.active_input_method(), ActiveInputMethod::Keyboard);
    assert_eq!(input.active_input_method().to_string(), "keyboard");
    assert!(!input.prefers_gamepad());
}

#[test]
fn test_gamepad_connect_mid_session_switches_backend() {
    let source = ScriptedSource::new();
    let mut input = make_input(&source);

    input.keyboard_mut().key_down("ArrowRight");
    input.update();
    assert!(input.just_pressed(ButtonName::Right));
    assert!(input.is_button_down(ButtonName::Right));

    // Pad arrives with nothing pressed; the held arrow key no longer counts
    source.connect(0, "ROG Ally");
    input.update();
    assert_eq!(input.active_input_method(), ActiveInputMethod::Gamepad);
    assert!(input.prefers_gamepad());
    assert!(!input.is_button_down(ButtonName::Right));
    assert!(input.keyboard().is_button_down(ButtonName::Right));

    source.press(0, ButtonName::Right);
    input.update();
    assert!(input.is_button_down(ButtonName::Right));
    assert!(input.just_pressed(ButtonName::Right));
}

#[test]
fn test_gamepad_disconnect_falls_back_to_live_keyboard_state() {
    let source = ScriptedSource::new();
    source.connect(0, "ROG Ally");
    let mut input = make_input(&source);
    input.update();

    // Keyboard keeps updating while the gamepad is active
    input.keyboard_mut().key_down("q");
    input.update();
    assert!(!input.is_button_down(ButtonName::Lb));

    source.disconnect(0);
    input.update();
    assert_eq!(input.active_input_method(), ActiveInputMethod::Keyboard);
    assert!(input.is_button_down(ButtonName::Lb));
    // Pressed two ticks ago on the keyboard, so no fresh edge
    assert!(!input.just_pressed(ButtonName::Lb));
}

#[test]
fn test_method_ignores_button_activity() {
    let source = ScriptedSource::new();
    source.connect(0, "ROG Ally");
    let mut input = make_input(&source);
    input.update();

    assert_eq!(input.active_input_method(), ActiveInputMethod::Gamepad);
    assert!(input.pressed_buttons().is_empty());
}

#[test]
fn test_only_primary_slot_selects_gamepad() {
    let source = ScriptedSource::new();
    source.connect(1, "Second pad");
    let mut input = make_input(&source);
    input.update();

    assert_eq!(input.active_input_method(), ActiveInputMethod::Keyboard);
}

#[test]
fn test_queries_are_not_blended() {
    let source = ScriptedSource::new();
    source.connect(0, "ROG Ally");
    source.set_stick(0, StickName::Left, 0.05, 0.0);
    let mut input = make_input(&source);

    input.keyboard_mut().key_down("l");
    input.keyboard_mut().key_down("z");
    input.update();

    // Gamepad stick is inside its deadzone, keyboard stick would be full right
    assert_eq!(input.stick(StickName::Left), StickReading::ZERO);
    assert_eq!(input.trigger(ButtonName::Lt), 0.0);
}

#[test]
fn test_keyboard_stick_scenarios() {
    let source = ScriptedSource::new();
    let mut input = make_input(&source);

    input.keyboard_mut().key_down("j");
    input.keyboard_mut().key_down("l");
    input.update();
    assert_eq!(input.stick(StickName::Left), StickReading::ZERO);

    input.keyboard_mut().key_up("j");
    input.keyboard_mut().key_down("i");
    input.update();
    let reading = input.stick(StickName::Left);
    assert!((reading.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert!((reading.y - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert_eq!(reading.magnitude, 1.0);
}

#[test]
fn test_edge_properties_hold_across_a_session() {
    let source = ScriptedSource::new();
    let mut input = make_input(&source);
    let script: [&[&str]; 6] = [&["a"], &["a", "e"], &["e"], &[], &["ArrowUp"], &["ArrowUp", "Tab"]];

    let mut prev_down: Vec<bool> = Vec::new();
    for (tick, keys) in script.iter().enumerate() {
        if tick == 3 {
            source.connect(0, "ROG Ally");
        }
        if tick == 4 {
            source.disconnect(0);
        }
        input.keyboard_mut().release_all();
        for key in keys.iter() {
            input.keyboard_mut().key_down(key);
        }
        input.update();

        let down: Vec<_> = ButtonName::ALL.iter().map(|b| input.is_button_down(*b)).collect();
        if tick > 0 {
            for (i, button) in ButtonName::ALL.iter().enumerate() {
                if input.just_pressed(*button) {
                    assert!(down[i] && !prev_down[i], "tick {} {}", tick, button);
                }
                if input.just_released(*button) {
                    assert!(!down[i] && prev_down[i], "tick {} {}", tick, button);
                }
            }
        }
        prev_down = down;
    }
}

#[test]
fn test_gamepad_forwarding_reaches_key_sink() {
    let source = ScriptedSource::new();
    source.connect(0, "ROG Ally");
    let sink = SharedSink::default();
    let config = InputConfig::default();
    let mut input = UnifiedInput::new(
        KeyboardBackend::new(&config.keyboard),
        GamepadBackend::new(source.clone(), &config.gamepad).with_key_sink(Box::new(sink.clone())),
    );

    source.press(0, ButtonName::Down);
    input.update();

    assert_eq!(sink.events(), vec![KeyEvent::down("ArrowDown")]);
}

#[test]
fn test_forwarded_keys_reach_keyboard_backend() {
    let source = ScriptedSource::new();
    source.connect(0, "ROG Ally");
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<KeyEvent>();
    let config = InputConfig::default();
    let mut input = UnifiedInput::new(
        KeyboardBackend::new(&config.keyboard),
        GamepadBackend::new(source.clone(), &config.gamepad).with_key_sink(Box::new(tx)),
    );

    source.press(0, ButtonName::Up);
    input.update();
    let routed = input.route_forwarded_keys(&mut rx);
    assert_eq!(routed, vec![KeyEvent::down("ArrowUp")]);

    input.update();
    assert!(input.keyboard().is_button_down(ButtonName::Up));
    assert!(input.keyboard().just_pressed(ButtonName::Up));

    // Pad loss releases the forwarded key on the keyboard side too
    source.disconnect(0);
    input.update();
    assert_eq!(input.route_forwarded_keys(&mut rx), vec![KeyEvent::up("ArrowUp")]);
    input.update();
    assert!(!input.is_button_down(ButtonName::Up));
    assert!(input.route_forwarded_keys(&mut rx).is_empty());
}

#[tokio::test]
async fn test_rumble_without_gamepad_resolves() {
    let source = ScriptedSource::new();
    let haptics = Rc::new(RecordingHaptics::default());
    let config = InputConfig::default();
    let mut input = UnifiedInput::new(
        KeyboardBackend::new(&config.keyboard),
        GamepadBackend::new(source.clone(), &config.gamepad).with_haptics(haptics.clone()),
    );
    input.update();

    input.rumble(0.5, Duration::from_millis(200)).await;
    assert!(haptics.played().is_empty());
}

#[tokio::test]
async fn test_rumble_with_gamepad_uses_haptics() {
    let source = ScriptedSource::new();
    source.connect(0, "ROG Ally");
    let haptics = Rc::new(RecordingHaptics::default());
    let config = InputConfig::default();
    let mut input = UnifiedInput::new(
        KeyboardBackend::new(&config.keyboard),
        GamepadBackend::new(source.clone(), &config.gamepad).with_haptics(haptics.clone()),
    );
    input.update();

    input.rumble(DEFAULT_RUMBLE_INTENSITY, DEFAULT_RUMBLE_DURATION).await;

    let played = haptics.played();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].1.strong, 0.5);
    assert!((played[0].1.weak - 0.35).abs() < 1e-6);
}

#[tokio::test]
async fn test_rumble_is_fire_and_forget() {
    let source = ScriptedSource::new();
    source.connect(0, "ROG Ally");
    let haptics = Rc::new(RecordingHaptics::failing());
    let config = InputConfig::default();
    let mut input = UnifiedInput::new(
        KeyboardBackend::new(&config.keyboard),
        GamepadBackend::new(source.clone(), &config.gamepad).with_haptics(haptics.clone()),
    );
    input.update();

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let task = tokio::task::spawn_local(input.rumble(1.0, Duration::from_millis(10)));
            // Polling keeps going while the effect is in flight
            input.update();
            assert!(input.prefers_gamepad());
            task.await.unwrap();
        })
        .await;

    assert_eq!(haptics.attempts(), 1);
}
