//! # Follower Executable Parameters
//!
//! This module provide parameters for the follower executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct FollowExecParams {

    /// Frequency of the main loop. Recovery manouvres advance one step per
    /// cycle.
    ///
    /// Units: Hertz
    pub cycle_frequency_hz: f64,

    /// Number of consecutive cycle overruns after which a warning is repeated.
    pub overrun_warn_limit: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for FollowExecParams {
    fn default() -> Self {
        Self {
            cycle_frequency_hz: 10.0,
            overrun_warn_limit: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_file() {
        let p: FollowExecParams = util::params::from_str(
            include_str!("../../params/follow_exec.toml")
        ).unwrap();
        assert_eq!(p.cycle_frequency_hz, FollowExecParams::default().cycle_frequency_hz);
    }
}
