//! # Follower library.
//!
//! This library allows other crates in the workspace to access items defined inside the follower
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Avoidance arbiter - runs recovery manouvres when the bumper is hit
pub mod avoid_arb;

/// Velocity command server - publishes commands to the mobile base
pub mod cmd_server;

/// Global data store of the executable
pub mod data_store;

/// Event client - recieves events from the tracker and the bumper
pub mod event_client;

/// Event processor - passes events to the relevant module
pub mod event_processor;

/// Follow control - turns the tracker's bounding box into velocity commands
pub mod follow_ctrl;

/// Executable parameters
pub mod params;
