//! # Bumper Equipment Communications Module
//!
//! Events raised by the mobile base's three-segment collision bumper.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use std::str::FromStr;
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A change in state of one bumper zone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, StructOpt)]
pub struct BumperEvent {
    /// The zone which changed state (`left`, `center` or `right`)
    pub zone: BumperZone,

    /// The new state of the zone (`pressed` or `released`)
    pub state: BumperState,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The collision zones of the bumper, as seen from above facing forwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BumperZone {
    Left,
    Center,
    Right,
}

/// Physical state of a bumper zone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BumperState {
    Released,
    Pressed,
}

/// Error produced when parsing a zone or state from a string.
#[derive(Debug, thiserror::Error)]
pub enum BumperParseError {
    #[error("Unknown bumper zone \"{0}\", expected left, center, or right")]
    UnknownZone(String),

    #[error("Unknown bumper state \"{0}\", expected pressed or released")]
    UnknownState(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BumperEvent {
    pub fn pressed(zone: BumperZone) -> Self {
        Self {
            zone,
            state: BumperState::Pressed,
        }
    }

    pub fn released(zone: BumperZone) -> Self {
        Self {
            zone,
            state: BumperState::Released,
        }
    }
}

impl FromStr for BumperZone {
    type Err = BumperParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(BumperZone::Left),
            "center" | "centre" | "c" => Ok(BumperZone::Center),
            "right" | "r" => Ok(BumperZone::Right),
            _ => Err(BumperParseError::UnknownZone(s.into())),
        }
    }
}

impl FromStr for BumperState {
    type Err = BumperParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pressed" | "press" => Ok(BumperState::Pressed),
            "released" | "release" => Ok(BumperState::Released),
            _ => Err(BumperParseError::UnknownState(s.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("left".parse::<BumperZone>().unwrap(), BumperZone::Left);
        assert_eq!("Centre".parse::<BumperZone>().unwrap(), BumperZone::Center);
        assert_eq!("R".parse::<BumperZone>().unwrap(), BumperZone::Right);
        assert!("up".parse::<BumperZone>().is_err());

        assert_eq!("pressed".parse::<BumperState>().unwrap(), BumperState::Pressed);
        assert_eq!("RELEASED".parse::<BumperState>().unwrap(), BumperState::Released);
        assert!("held".parse::<BumperState>().is_err());
    }
}
