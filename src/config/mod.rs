//! Configuration management for the input layer
//!
//! Handles loading, validating and saving the YAML configuration file. Every
//! field has a default, so an empty file (or no file) yields the reference
//! ROG Ally layout.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::fs;

use crate::input::ButtonName;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub gamepad: GamepadConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    /// Driver loop frame interval
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

/// Gamepad backend configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GamepadConfig {
    /// Radial stick deadzone
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    /// Analog value at which LT/RT count as pressed
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: f32,
    /// Left stick deflection that forwards an arrow key
    #[serde(default = "default_stick_threshold")]
    pub stick_threshold: f32,
    /// Number of pad slots retained per snapshot
    #[serde(default = "default_max_gamepads")]
    pub max_gamepads: usize,
    /// Keys forwarded for D-pad / left stick directions
    #[serde(default)]
    pub direction_keys: DirectionKeys,
    /// Keys forwarded when a button is pressed on pad 0
    #[serde(default = "default_button_keys")]
    pub button_keys: BTreeMap<ButtonName, Vec<String>>,
}

/// Key identifiers for the four directions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DirectionKeys {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

/// Keyboard backend configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeyboardConfig {
    /// Keys bound to each logical button (a key may appear under one button only)
    #[serde(default = "default_bindings")]
    pub bindings: BTreeMap<ButtonName, Vec<String>>,
    #[serde(default = "default_left_stick_keys")]
    pub left_stick: StickKeys,
    #[serde(default = "default_right_stick_keys")]
    pub right_stick: StickKeys,
    #[serde(default = "default_trigger_keys")]
    pub triggers: TriggerKeys,
    #[serde(default)]
    pub tab_switch: TabSwitchConfig,
}

/// Keys that push an emulated stick to each edge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StickKeys {
    #[serde(default)]
    pub up: Vec<String>,
    #[serde(default)]
    pub down: Vec<String>,
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

/// Keys that hold an emulated trigger fully down
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TriggerKeys {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

/// LB/RB tab switching through the injected navigation hooks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TabSwitchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Restore the focus-mode flag after switching tabs
    #[serde(default = "default_true")]
    pub preserve_focus: bool,
    #[serde(default = "default_restore_delay")]
    pub restore_delay_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            gamepad: GamepadConfig::default(),
            keyboard: KeyboardConfig::default(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            trigger_threshold: default_trigger_threshold(),
            stick_threshold: default_stick_threshold(),
            max_gamepads: default_max_gamepads(),
            direction_keys: DirectionKeys::default(),
            button_keys: default_button_keys(),
        }
    }
}

impl Default for DirectionKeys {
    fn default() -> Self {
        Self {
            up: "ArrowUp".to_string(),
            down: "ArrowDown".to_string(),
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
        }
    }
}

impl DirectionKeys {
    /// Forwarded key for a D-pad direction button
    pub fn for_button(&self, button: ButtonName) -> Option<&str> {
        match button {
            ButtonName::Up => Some(&self.up),
            ButtonName::Down => Some(&self.down),
            ButtonName::Left => Some(&self.left),
            ButtonName::Right => Some(&self.right),
            _ => None,
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
            left_stick: default_left_stick_keys(),
            right_stick: default_right_stick_keys(),
            triggers: default_trigger_keys(),
            tab_switch: TabSwitchConfig::default(),
        }
    }
}

impl Default for TabSwitchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preserve_focus: true,
            restore_delay_ms: default_restore_delay(),
        }
    }
}

impl InputConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_yaml_str(&contents).with_context(|| format!("Invalid config file: {}", path))
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        // An empty document deserializes as null, not as an empty map
        let config: InputConfig = if contents.trim().is_empty() {
            InputConfig::default()
        } else {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        };

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be greater than 0");
        }

        let gamepad = &self.gamepad;
        if !(0.0..1.0).contains(&gamepad.deadzone) {
            anyhow::bail!("gamepad.deadzone {} is invalid (must be in [0, 1))", gamepad.deadzone);
        }
        for (name, value) in [
            ("trigger_threshold", gamepad.trigger_threshold),
            ("stick_threshold", gamepad.stick_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                anyhow::bail!("gamepad.{} {} is invalid (must be in (0, 1])", name, value);
            }
        }
        if gamepad.max_gamepads == 0 {
            anyhow::bail!("gamepad.max_gamepads must be at least 1");
        }
        for (button, keys) in &gamepad.button_keys {
            if keys.iter().any(|k| k.is_empty()) {
                anyhow::bail!("gamepad.button_keys.{} contains an empty key", button);
            }
        }
        for (direction, key) in [
            ("up", &gamepad.direction_keys.up),
            ("down", &gamepad.direction_keys.down),
            ("left", &gamepad.direction_keys.left),
            ("right", &gamepad.direction_keys.right),
        ] {
            if key.is_empty() {
                anyhow::bail!("gamepad.direction_keys.{} is empty", direction);
            }
        }

        let keyboard = &self.keyboard;
        for (stick, keys) in [("left_stick", &keyboard.left_stick), ("right_stick", &keyboard.right_stick)] {
            for (direction, list) in [
                ("up", &keys.up),
                ("down", &keys.down),
                ("left", &keys.left),
                ("right", &keys.right),
            ] {
                if list.iter().any(|k| k.is_empty()) {
                    anyhow::bail!("keyboard.{}.{} contains an empty key", stick, direction);
                }
            }
        }
        for (side, list) in [("left", &keyboard.triggers.left), ("right", &keyboard.triggers.right)] {
            if list.iter().any(|k| k.is_empty()) {
                anyhow::bail!("keyboard.triggers.{} contains an empty key", side);
            }
        }

        // Each physical key resolves to exactly one logical button
        let mut owners: HashMap<&str, ButtonName> = HashMap::new();
        for (button, keys) in &self.keyboard.bindings {
            for key in keys {
                if key.is_empty() {
                    anyhow::bail!("keyboard.bindings.{} contains an empty key", button);
                }
                if let Some(previous) = owners.insert(key.as_str(), *button) {
                    anyhow::bail!(
                        "Key {:?} is bound to both {} and {} (a key may map to one button only)",
                        key,
                        previous,
                        button
                    );
                }
            }
        }

        Ok(())
    }
}

/// Both letter cases of each key, in order (`["w"]` -> `["w", "W"]`)
fn both_cases(keys: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(keys.len() * 2);
    for key in keys {
        out.push(key.to_string());
        let upper = key.to_uppercase();
        if upper != *key {
            out.push(upper);
        }
    }
    out
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

// Default value functions
fn default_tick_interval() -> u64 { 16 }
fn default_deadzone() -> f32 { 0.15 }
fn default_trigger_threshold() -> f32 { 0.1 }
fn default_stick_threshold() -> f32 { 0.5 }
fn default_max_gamepads() -> usize { 4 }
fn default_true() -> bool { true }
fn default_restore_delay() -> u64 { 50 }

fn default_button_keys() -> BTreeMap<ButtonName, Vec<String>> {
    BTreeMap::from([(ButtonName::A, keys(&[" ", "a", "A"]))])
}

/// Reference ROG Ally keyboard layout
fn default_bindings() -> BTreeMap<ButtonName, Vec<String>> {
    let mut a = both_cases(&["a", "s"]);
    a.push(" ".to_string());
    let mut lb = both_cases(&["q"]);
    lb.push("1".to_string());
    let mut rb = both_cases(&["e"]);
    rb.push("2".to_string());
    let mut lt = both_cases(&["z"]);
    lt.push("3".to_string());
    let mut rt = both_cases(&["c"]);
    rt.push("4".to_string());

    BTreeMap::from([
        (ButtonName::A, a),
        (ButtonName::B, both_cases(&["d", "b"])),
        (ButtonName::X, both_cases(&["x"])),
        (ButtonName::Y, both_cases(&["w", "y"])),
        (ButtonName::Lb, lb),
        (ButtonName::Rb, rb),
        (ButtonName::Lt, lt),
        (ButtonName::Rt, rt),
        (ButtonName::View, keys(&["Tab"])),
        (ButtonName::Menu, keys(&["Enter"])),
        (ButtonName::Ls, both_cases(&["r"])),
        (ButtonName::Rs, both_cases(&["f"])),
        (ButtonName::Up, keys(&["ArrowUp"])),
        (ButtonName::Down, keys(&["ArrowDown"])),
        (ButtonName::Left, keys(&["ArrowLeft"])),
        (ButtonName::Right, keys(&["ArrowRight"])),
        (ButtonName::Home, keys(&["Escape"])),
    ])
}

fn default_left_stick_keys() -> StickKeys {
    StickKeys {
        up: both_cases(&["i"]),
        down: both_cases(&["k"]),
        left: both_cases(&["j"]),
        right: both_cases(&["l"]),
    }
}

fn default_right_stick_keys() -> StickKeys {
    let mut up = both_cases(&["t"]);
    up.push("8".to_string());
    let mut down = both_cases(&["g"]);
    down.push("5".to_string());
    let mut left = both_cases(&["f"]);
    left.push("4".to_string());
    let mut right = both_cases(&["h"]);
    right.push("6".to_string());
    StickKeys { up, down, left, right }
}

fn default_trigger_keys() -> TriggerKeys {
    let mut left = both_cases(&["z"]);
    left.push("3".to_string());
    let mut right = both_cases(&["c"]);
    right.push("4".to_string());
    TriggerKeys { left, right }
}
