//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with the robot's equipment.

/// Tracker output
pub mod vision;

/// Collision sensor events
pub mod bumper;

/// Mobile base demands
pub mod base;
