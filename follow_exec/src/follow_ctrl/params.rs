//! Parameters structure for FollowCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Follow control.
///
/// The effective gains of the control laws are the product of the base unit
/// and the ratio, i.e. `turn_unit_rads * turn_ratio` per pixel of horizontal
/// error and `speed_unit_ms * speed_ratio` per square pixel of area error.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- FRAME ----

    /// Centre of the video frame, `[x, y]`.
    ///
    /// Units: pixels
    pub video_centre_px: [i32; 2],

    /// Half-width of the horizontal dead-zone around the frame centre.
    ///
    /// Units: pixels
    pub error_offset_x_px: i32,

    /// Half-width of the area dead-zone as a ratio of the reference area.
    pub area_tolerance_ratio: f64,

    /// Bounding box area reported by the tracker when the target is lost.
    ///
    /// Units: pixels^2
    pub target_lost_area_px2: i64,

    // ---- SPEED LAW ----

    /// Base linear speed unit.
    ///
    /// Units: meters/second
    pub speed_unit_ms: f64,

    /// Ratio between the speed demand and the area error.
    pub speed_ratio: f64,

    /// Maximum magnitude of the speed demand.
    ///
    /// Units: meters/second
    pub speed_max_ms: f64,

    // ---- TURN LAW ----

    /// Base turn rate unit.
    ///
    /// Units: radians/second
    pub turn_unit_rads: f64,

    /// Ratio between the turn demand and the horizontal error.
    pub turn_ratio: f64,

    /// Maximum magnitude of the turn demand.
    ///
    /// Units: radians/second
    pub turn_max_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Effective proportional gain of the speed law.
    pub fn speed_gain(&self) -> f64 {
        self.speed_unit_ms * self.speed_ratio
    }

    /// Effective proportional gain of the turn law.
    pub fn turn_gain(&self) -> f64 {
        self.turn_unit_rads * self.turn_ratio
    }

    /// Left edge of the horizontal dead-zone.
    pub fn dead_zone_left_px(&self) -> i64 {
        self.video_centre_px[0] as i64 - self.error_offset_x_px as i64
    }

    /// Right edge of the horizontal dead-zone.
    pub fn dead_zone_right_px(&self) -> i64 {
        self.video_centre_px[0] as i64 + self.error_offset_x_px as i64
    }
}

/// Defaults are tuned for a 640x480 tracker feed.
impl Default for Params {
    fn default() -> Self {
        Self {
            video_centre_px: [320, 240],
            error_offset_x_px: 2,
            area_tolerance_ratio: 0.2,
            target_lost_area_px2: 1,
            speed_unit_ms: 0.1,
            speed_ratio: 0.0003,
            speed_max_ms: 0.3,
            turn_unit_rads: 0.1,
            turn_ratio: 0.1,
            turn_max_rads: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_file_matches_defaults() {
        let p: Params = util::params::from_str(
            include_str!("../../../params/follow_ctrl.toml")
        ).unwrap();
        let d = Params::default();

        assert_eq!(p.video_centre_px, d.video_centre_px);
        assert_eq!(p.error_offset_x_px, d.error_offset_x_px);
        assert_eq!(p.target_lost_area_px2, d.target_lost_area_px2);
        assert_eq!(p.speed_gain(), d.speed_gain());
        assert_eq!(p.turn_gain(), d.turn_gain());
        assert_eq!(p.speed_max_ms, d.speed_max_ms);
        assert_eq!(p.turn_max_rads, d.turn_max_rads);
    }

    #[test]
    fn test_derived() {
        let p = Params::default();
        assert_eq!(p.dead_zone_left_px(), 318);
        assert_eq!(p.dead_zone_right_px(), 322);
        assert!((p.turn_gain() - 0.01).abs() < 1e-12);
        assert!((p.speed_gain() - 0.00003).abs() < 1e-12);
    }
}
