//! # Follower event module
//!
//! Everything the follower reacts to arrives as a [`FollowerEvent`], whether it comes from the
//! network or from a replay script.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use structopt::StructOpt;
use thiserror::Error;

use crate::eqpt::{bumper::BumperEvent, vision::BoundingBox};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An event delivered to the follower.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
pub enum FollowerEvent {
    /// A new bounding box from the object tracker.
    #[structopt(name = "track")]
    Tracking(BoundingBox),

    /// A bumper zone has been pressed or released.
    #[structopt(name = "bumper")]
    Bumper(BumperEvent),

    /// Forget the reference area, the next tracking update will be used to calibrate.
    #[structopt(name = "recal")]
    Recalibrate,

    /// Stop the robot and end the follower's execution.
    #[structopt(name = "shutdown")]
    Shutdown,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("Event contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Could not serialise the event: {0}")]
    SerialiseError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FollowerEvent {
    /// Parse an event from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, EventParseError> {
        serde_json::from_str(json_str.trim()).map_err(EventParseError::InvalidJson)
    }

    /// Serialise the event into a JSON string.
    pub fn to_json(&self) -> Result<String, EventParseError> {
        serde_json::to_string(self).map_err(EventParseError::SerialiseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eqpt::bumper::{BumperState, BumperZone};

    #[test]
    fn test_from_json() {
        let ev = FollowerEvent::from_json(
            r#"{"Tracking": {"x": 100, "y": 100, "width": 50, "height": 40}}"#
        ).unwrap();
        assert_eq!(ev, FollowerEvent::Tracking(BoundingBox::new(100, 100, 50, 40)));

        let ev = FollowerEvent::from_json(
            r#" {"Bumper": {"zone": "Center", "state": "Pressed"}} "#
        ).unwrap();
        assert_eq!(
            ev,
            FollowerEvent::Bumper(BumperEvent {
                zone: BumperZone::Center,
                state: BumperState::Pressed
            })
        );

        assert_eq!(FollowerEvent::from_json("\"Shutdown\"").unwrap(), FollowerEvent::Shutdown);
        assert!(FollowerEvent::from_json("{\"Tracking\": {}}").is_err());
    }
}
