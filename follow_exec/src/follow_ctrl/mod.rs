//! Follow control module
//!
//! Converts the tracker's bounding box into a velocity command which keeps the
//! target centred horizontally in the frame and at a fixed standoff distance.
//! The distance is approximated by the area of the bounding box, compared to a
//! reference area captured from the first box seen after (re)calibration.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during FollowCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum FollowCtrlError {
    #[error("Failed to load FollowCtrl parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Failed to open the FollowCtrl archive: {0}")]
    ArchiveError(util::archive::ArchiveError),
}

/// Which branch of the turn law produced the turn demand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum TurnZone {
    /// No turn law applied (calibrating, or target lost)
    None,

    /// Target strictly inside the horizontal dead-zone
    Dead,

    /// Target at or left of the dead-zone's left edge, turning left
    Left,

    /// Target at or right of the dead-zone's right edge, turning right
    Right,
}

/// Which branch of the speed law produced the speed demand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum RangeZone {
    /// No speed law applied (calibrating, or target lost)
    None,

    /// Area strictly inside the tolerance band around the reference
    Dead,

    /// Area at or below the band, the target is too far away and we drive forwards
    TooFar,

    /// Area at or above the band, the target is too close and we reverse
    TooClose,
}

impl Default for TurnZone {
    fn default() -> Self {
        TurnZone::None
    }
}

impl Default for RangeZone {
    fn default() -> Self {
        RangeZone::None
    }
}
