//! Immutable physical-key to logical-button table
//!
//! Built once from [`KeyboardConfig`]. Lookups go both ways: key -> button
//! for incoming events, button -> keys for edge checks.

use std::collections::{HashMap, HashSet};

use super::button::{ButtonName, StickName};
use crate::config::{KeyboardConfig, StickKeys};

/// Resolved key table for the keyboard backend
#[derive(Debug, Clone)]
pub struct KeyMap {
    by_key: HashMap<String, ButtonName>,
    by_button: HashMap<ButtonName, Vec<String>>,
    left_stick: StickKeys,
    right_stick: StickKeys,
    left_trigger: Vec<String>,
    right_trigger: Vec<String>,
}

impl KeyMap {
    pub fn from_config(config: &KeyboardConfig) -> Self {
        let mut by_key = HashMap::new();
        let mut by_button: HashMap<ButtonName, Vec<String>> = HashMap::new();

        for (button, keys) in &config.bindings {
            for key in keys {
                // Validation rejects duplicates; keep the first owner regardless
                if by_key.contains_key(key) {
                    continue;
                }
                by_key.insert(key.clone(), *button);
                by_button.entry(*button).or_default().push(key.clone());
            }
        }

        Self {
            by_key,
            by_button,
            left_stick: config.left_stick.clone(),
            right_stick: config.right_stick.clone(),
            left_trigger: config.triggers.left.clone(),
            right_trigger: config.triggers.right.clone(),
        }
    }

    /// Logical button bound to a physical key
    pub fn button_for(&self, key: &str) -> Option<ButtonName> {
        self.by_key.get(key).copied()
    }

    /// Physical keys bound to a logical button
    pub fn keys_for(&self, button: ButtonName) -> &[String] {
        self.by_button.get(&button).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the key has any meaning for the backend (button, stick or trigger)
    pub fn is_mapped(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
            || [&self.left_stick, &self.right_stick].iter().any(|s| {
                [&s.up, &s.down, &s.left, &s.right]
                    .iter()
                    .any(|keys| keys.iter().any(|k| k == key))
            })
            || self.left_trigger.iter().chain(&self.right_trigger).any(|k| k == key)
    }

    /// Whether any key bound to `button` is in `held`
    pub fn any_held(&self, button: ButtonName, held: &HashSet<String>) -> bool {
        self.keys_for(button).iter().any(|k| held.contains(k))
    }

    /// Discrete `(x, y)` stick position for the keys in `held`.
    ///
    /// Each axis is -1, 0 or +1; opposite edges held together cancel.
    pub fn stick_axes(&self, stick: StickName, held: &HashSet<String>) -> (f32, f32) {
        let keys = match stick {
            StickName::Left => &self.left_stick,
            StickName::Right => &self.right_stick,
        };
        let pressed = |keys: &[String]| keys.iter().any(|k| held.contains(k));
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };

        (
            axis(pressed(&keys.left), pressed(&keys.right)),
            axis(pressed(&keys.down), pressed(&keys.up)),
        )
    }

    /// Emulated trigger value: 1.0 while any of its keys is held
    pub fn trigger_value(&self, trigger: ButtonName, held: &HashSet<String>) -> f32 {
        let keys = match trigger {
            ButtonName::Lt => &self.left_trigger,
            ButtonName::Rt => &self.right_trigger,
            _ => return 0.0,
        };
        if keys.iter().any(|k| held.contains(k)) {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_config(&KeyboardConfig::default())
    }
}
