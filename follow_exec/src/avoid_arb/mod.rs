//! Avoidance arbiter module
//!
//! Latches the bumper zones and, on a new collision, takes over the command
//! output to run a short scripted recovery manouvre (reverse while turning
//! away from the obstacle). Control goes back to the follower once the
//! manouvre's steps have all been emitted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AvoidArb initialisation.
#[derive(Debug, thiserror::Error)]
pub enum AvoidArbError {
    #[error("Failed to load AvoidArb parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Failed to open the AvoidArb archive: {0}")]
    ArchiveError(util::archive::ArchiveError),
}
