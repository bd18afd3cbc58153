//! Logical button and stick names shared by every backend
//!
//! Both backends resolve the same closed set of names. A backend that cannot
//! physically represent a name simply reports it as released / zero.
//!
//! # Standard Layout
//!
//! Gamepad snapshots use the browser "standard" button layout, so each name
//! has a fixed slot index:
//!
//! ```text
//!  0 A     1 B     2 X     3 Y
//!  4 LB    5 RB    6 LT    7 RT
//!  8 VIEW  9 MENU 10 LS   11 RS
//! 12 UP   13 DOWN 14 LEFT 15 RIGHT
//! 16 HOME
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a button or stick name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNameError {
    #[error("unknown button name: {0:?}")]
    UnknownButton(String),
    #[error("unknown stick name: {0:?}")]
    UnknownStick(String),
}

/// Logical controller button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ButtonName {
    A,
    B,
    X,
    Y,
    Lb,
    Rb,
    Lt,
    Rt,
    View,
    Menu,
    Ls,
    Rs,
    Up,
    Down,
    Left,
    Right,
    Home,
}

impl ButtonName {
    /// Every button, in enumeration order
    pub const ALL: [ButtonName; 17] = [
        ButtonName::A,
        ButtonName::B,
        ButtonName::X,
        ButtonName::Y,
        ButtonName::Lb,
        ButtonName::Rb,
        ButtonName::Lt,
        ButtonName::Rt,
        ButtonName::View,
        ButtonName::Menu,
        ButtonName::Ls,
        ButtonName::Rs,
        ButtonName::Up,
        ButtonName::Down,
        ButtonName::Left,
        ButtonName::Right,
        ButtonName::Home,
    ];

    /// D-pad directions, in the order they are forwarded as arrow keys
    pub const DPAD: [ButtonName; 4] = [
        ButtonName::Up,
        ButtonName::Down,
        ButtonName::Left,
        ButtonName::Right,
    ];

    /// Slot of this button in a standard-layout gamepad snapshot
    pub fn standard_index(self) -> usize {
        self as usize
    }

    /// Whether the button is an analog trigger (LT/RT)
    pub fn is_trigger(self) -> bool {
        matches!(self, ButtonName::Lt | ButtonName::Rt)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ButtonName::A => "A",
            ButtonName::B => "B",
            ButtonName::X => "X",
            ButtonName::Y => "Y",
            ButtonName::Lb => "LB",
            ButtonName::Rb => "RB",
            ButtonName::Lt => "LT",
            ButtonName::Rt => "RT",
            ButtonName::View => "VIEW",
            ButtonName::Menu => "MENU",
            ButtonName::Ls => "LS",
            ButtonName::Rs => "RS",
            ButtonName::Up => "UP",
            ButtonName::Down => "DOWN",
            ButtonName::Left => "LEFT",
            ButtonName::Right => "RIGHT",
            ButtonName::Home => "HOME",
        }
    }
}

impl fmt::Display for ButtonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonName {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ButtonName::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::UnknownButton(s.to_string()))
    }
}

/// Analog stick selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StickName {
    Left,
    Right,
}

impl StickName {
    /// Standard-layout axis indices `(x, y)` for this stick
    pub fn axis_indices(self) -> (usize, usize) {
        match self {
            StickName::Left => (0, 1),
            StickName::Right => (2, 3),
        }
    }
}

impl fmt::Display for StickName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StickName::Left => f.write_str("LEFT"),
            StickName::Right => f.write_str("RIGHT"),
        }
    }
}

impl FromStr for StickName {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEFT" => Ok(StickName::Left),
            "RIGHT" => Ok(StickName::Right),
            _ => Err(ParseNameError::UnknownStick(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_indices_follow_enumeration_order() {
        for (idx, button) in ButtonName::ALL.iter().enumerate() {
            assert_eq!(button.standard_index(), idx);
        }
        assert_eq!(ButtonName::Lt.standard_index(), 6);
        assert_eq!(ButtonName::Home.standard_index(), 16);
    }

    #[test]
    fn test_parse_button_names() {
        assert_eq!("A".parse::<ButtonName>(), Ok(ButtonName::A));
        assert_eq!("rb".parse::<ButtonName>(), Ok(ButtonName::Rb));
        assert_eq!(" VIEW ".parse::<ButtonName>(), Ok(ButtonName::View));
        assert!(matches!(
            "SELECT".parse::<ButtonName>(),
            Err(ParseNameError::UnknownButton(_))
        ));
    }

    #[test]
    fn test_parse_stick_names() {
        assert_eq!("left".parse::<StickName>(), Ok(StickName::Left));
        assert_eq!("RIGHT".parse::<StickName>(), Ok(StickName::Right));
        assert!("middle".parse::<StickName>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for button in ButtonName::ALL {
            assert_eq!(button.to_string().parse::<ButtonName>(), Ok(button));
        }
    }

    #[test]
    fn test_serde_uses_uppercase_names() {
        let yaml = serde_yaml::to_string(&vec![ButtonName::Lb, ButtonName::Menu]).unwrap();
        assert!(yaml.contains("LB"));
        assert!(yaml.contains("MENU"));

        let parsed: ButtonName = serde_yaml::from_str("RT").unwrap();
        assert_eq!(parsed, ButtonName::Rt);
    }

    #[test]
    fn test_only_lt_rt_are_triggers() {
        let triggers: Vec<_> = ButtonName::ALL.into_iter().filter(|b| b.is_trigger()).collect();
        assert_eq!(triggers, vec![ButtonName::Lt, ButtonName::Rt]);
    }
}
