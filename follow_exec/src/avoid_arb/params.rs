//! Parameters structure for AvoidArb

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use comms_if::eqpt::{base::VelocityCommand, bumper::BumperZone};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the avoidance arbiter, one recovery script per bumper zone.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub left: RecoveryScript,
    pub center: RecoveryScript,
    pub right: RecoveryScript,
}

/// A fixed command repeated for a number of control cycles.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RecoveryScript {
    /// Forward speed during the manouvre, negative to reverse.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Turn rate during the manouvre, positive to the left.
    ///
    /// Units: radians/second
    pub turn_rads: f64,

    /// Number of control cycles the command is emitted for.
    pub num_steps: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Get the recovery script for the given zone.
    pub fn script(&self, zone: BumperZone) -> &RecoveryScript {
        match zone {
            BumperZone::Left => &self.left,
            BumperZone::Center => &self.center,
            BumperZone::Right => &self.right,
        }
    }
}

impl RecoveryScript {
    pub fn cmd(&self) -> VelocityCommand {
        VelocityCommand::planar(self.speed_ms, self.turn_rads)
    }
}

/// A hit on the left turns right, a hit on the right turns left, a head on hit
/// turns right a little harder and for longer.
impl Default for Params {
    fn default() -> Self {
        Self {
            left: RecoveryScript {
                speed_ms: -0.2,
                turn_rads: -0.4,
                num_steps: 15,
            },
            center: RecoveryScript {
                speed_ms: -0.2,
                turn_rads: -0.5,
                num_steps: 20,
            },
            right: RecoveryScript {
                speed_ms: -0.2,
                turn_rads: 0.4,
                num_steps: 15,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_file_matches_defaults() {
        let p: Params = util::params::from_str(
            include_str!("../../../params/avoid_arb.toml")
        ).unwrap();
        let d = Params::default();

        for zone in [BumperZone::Left, BumperZone::Center, BumperZone::Right].iter() {
            assert_eq!(p.script(*zone), d.script(*zone));
        }
    }
}
