//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the follower software: the messages flowing
//! between the tracker, the bumpers, the follower and the mobile base.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Events consumed by the follower
pub mod event;

/// Message definitions for equipment (tracker, bumpers, mobile base)
pub mod eqpt;

/// Network module
pub mod net;
