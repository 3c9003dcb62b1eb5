//! # Mobile Base Equipment Communications Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Velocity demand sent to the mobile base.
///
/// The base is a planar differential-drive robot so only the forward linear rate (`linear.x`) and
/// the yaw rate (`angular.z`) are ever non-zero.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityCommand {
    /// Linear velocity in the robot body frame.
    ///
    /// Units: meters/second
    pub linear: Vector3<f64>,

    /// Angular velocity about the robot body axes. Follows the right hand rule about Z+ (upwards)
    /// so a positive `z` turns the robot to the left.
    ///
    /// Units: radians/second
    pub angular: Vector3<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VelocityCommand {
    /// Build a planar command from a forward speed and a turn rate.
    pub fn planar(speed_ms: f64, turn_rads: f64) -> Self {
        Self {
            linear: Vector3::new(speed_ms, 0.0, 0.0),
            angular: Vector3::new(0.0, 0.0, turn_rads),
        }
    }

    /// A command which brings the base to a stop.
    pub fn stop() -> Self {
        Self::planar(0.0, 0.0)
    }

    /// Forward speed of the command.
    pub fn speed_ms(&self) -> f64 {
        self.linear.x
    }

    /// Turn rate of the command.
    pub fn turn_rads(&self) -> f64 {
        self.angular.z
    }

    pub fn is_stop(&self) -> bool {
        self.linear == Vector3::zeros() && self.angular == Vector3::zeros()
    }
}

impl Default for VelocityCommand {
    fn default() -> Self {
        Self::stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar() {
        let cmd = VelocityCommand::planar(-0.2, 0.4);

        assert_eq!(cmd.speed_ms(), -0.2);
        assert_eq!(cmd.turn_rads(), 0.4);
        assert_eq!(cmd.linear.y, 0.0);
        assert_eq!(cmd.linear.z, 0.0);
        assert_eq!(cmd.angular.x, 0.0);
        assert_eq!(cmd.angular.y, 0.0);
        assert!(!cmd.is_stop());
        assert!(VelocityCommand::default().is_stop());
    }
}
