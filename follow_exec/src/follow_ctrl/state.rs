//! Implementations for the FollowCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{FollowCtrlError, Params, RangeZone, TurnZone};
use comms_if::eqpt::{base::VelocityCommand, vision::BoundingBox};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    maths::limit_max,
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Follow control module state
#[derive(Default)]
pub struct FollowCtrl {

    pub(crate) params: Params,

    /// Reference captured from the first box after (re)calibration, `None`
    /// until then.
    pub(crate) calib: Option<Calibration>,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// The standoff reference of the follower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Area of the first bounding box.
    ///
    /// Units: pixels^2
    pub ref_area_px2: i64,

    /// Half-width of the area dead-zone around the reference.
    ///
    /// Units: pixels^2
    pub area_tolerance_px2: f64,
}

/// Status report for FollowCtrl processing.
///
/// Flat so that it can be archived as a csv record.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// The update was used to capture the reference area, no command was
    /// produced.
    pub calibrating: bool,

    /// The tracker reported the target as lost, a stop command was produced.
    pub target_lost: bool,

    /// Horizontal centre of the box.
    pub centre_x_px: i64,

    /// Area of the box.
    pub area_px2: i64,

    /// Branch of the turn law taken.
    pub turn_zone: TurnZone,

    /// Branch of the speed law taken.
    pub range_zone: RangeZone,

    /// The turn demand hit `turn_max_rads`.
    pub turn_limited: bool,

    /// The speed demand hit `speed_max_ms`.
    pub speed_limited: bool,

    pub speed_ms: f64,
    pub turn_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for FollowCtrl {
    type InitData = &'static str;
    type InitError = FollowCtrlError;

    type InputData = BoundingBox;
    type OutputData = Option<VelocityCommand>;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the FollowCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)
            .map_err(FollowCtrlError::ParamLoadError)?;

        self.arch_report = Archiver::from_path(session, "follow_ctrl/status_report.csv")
            .map_err(FollowCtrlError::ArchiveError)?;

        // Calibration happens on the first tracking update
        self.calib = None;

        Ok(())
    }

    /// Process one tracking update.
    ///
    /// Returns `None` as the output if the update was used for calibration,
    /// otherwise the velocity command to send to the base.
    fn proc(&mut self, bbox: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport {
            centre_x_px: bbox.centre_x(),
            area_px2: bbox.area(),
            ..Default::default()
        };

        // The first box after (re)calibration sets the reference and produces
        // no command.
        let calib = match self.calib {
            Some(c) => c,
            None => {
                self.calibrate(bbox);
                return Ok((None, self.report))
            }
        };

        if self.report.area_px2 == self.params.target_lost_area_px2 {
            trace!("Target lost, stopping");
            self.report.target_lost = true;
            return Ok((Some(VelocityCommand::stop()), self.report))
        }

        let turn_rads = self.calc_turn(self.report.centre_x_px);
        let speed_ms = self.calc_speed(self.report.area_px2, &calib);

        self.report.speed_ms = speed_ms;
        self.report.turn_rads = turn_rads;

        trace!(
            "FollowCtrl output: speed {:.4} m/s ({:?}), turn {:.4} rad/s ({:?})",
            speed_ms, self.report.range_zone,
            turn_rads, self.report.turn_zone
        );

        Ok((Some(VelocityCommand::planar(speed_ms, turn_rads)), self.report))
    }

    /// Forget the reference area so that the next tracking update
    /// recalibrates.
    fn reset(&mut self) {
        if self.calib.is_some() {
            info!("FollowCtrl reference cleared, will recalibrate on next tracking update");
        }
        self.calib = None;
        self.report = StatusReport::default();
    }
}

impl Archived for FollowCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

impl FollowCtrl {

    /// Create a new instance with the given parameters, without any archive.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Get the current calibration, or `None` if not calibrated yet.
    pub fn calibration(&self) -> Option<Calibration> {
        self.calib
    }

    pub fn is_calibrated(&self) -> bool {
        self.calib.is_some()
    }

    /// Capture the reference area from the given box.
    ///
    /// This assumes the target is at the desired following distance in the
    /// box.
    fn calibrate(&mut self, bbox: &BoundingBox) {
        let ref_area_px2 = bbox.area();
        let calib = Calibration {
            ref_area_px2,
            area_tolerance_px2: self.params.area_tolerance_ratio * ref_area_px2 as f64,
        };

        info!(
            "FollowCtrl calibrated: reference area {} px^2, tolerance {} px^2",
            calib.ref_area_px2, calib.area_tolerance_px2
        );

        self.calib = Some(calib);
        self.report.calibrating = true;
    }

    /// Calculate the turn demand for the given horizontal centre.
    ///
    /// Positions exactly on a dead-zone edge belong to the proportional
    /// branch, not the dead-zone.
    fn calc_turn(&mut self, centre_x_px: i64) -> f64 {
        let left_px = self.params.dead_zone_left_px();
        let right_px = self.params.dead_zone_right_px();

        if centre_x_px > left_px && centre_x_px < right_px {
            self.report.turn_zone = TurnZone::Dead;
            0.0
        }
        else if centre_x_px <= left_px {
            self.report.turn_zone = TurnZone::Left;
            let (turn, limited) = limit_max(
                self.params.turn_gain() * (left_px - centre_x_px) as f64,
                self.params.turn_max_rads
            );
            self.report.turn_limited = limited;
            turn
        }
        else {
            self.report.turn_zone = TurnZone::Right;
            let (turn, limited) = limit_max(
                self.params.turn_gain() * (centre_x_px - right_px) as f64,
                self.params.turn_max_rads
            );
            self.report.turn_limited = limited;
            -turn
        }
    }

    /// Calculate the speed demand for the given box area.
    ///
    /// Areas exactly on a tolerance band edge belong to the proportional
    /// branch, not the dead-zone.
    fn calc_speed(&mut self, area_px2: i64, calib: &Calibration) -> f64 {
        let area = area_px2 as f64;
        let lower = calib.ref_area_px2 as f64 - calib.area_tolerance_px2;
        let upper = calib.ref_area_px2 as f64 + calib.area_tolerance_px2;

        if area > lower && area < upper {
            self.report.range_zone = RangeZone::Dead;
            0.0
        }
        else if area >= upper {
            self.report.range_zone = RangeZone::TooClose;
            let (speed, limited) = limit_max(
                self.params.speed_gain() * (area - upper),
                self.params.speed_max_ms
            );
            self.report.speed_limited = limited;
            -speed
        }
        else {
            self.report.range_zone = RangeZone::TooFar;
            let (speed, limited) = limit_max(
                self.params.speed_gain() * (lower - area),
                self.params.speed_max_ms
            );
            self.report.speed_limited = limited;
            speed
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    /// A controller calibrated on a 50x50 box, R = 2500, tolerance = 500
    fn calibrated() -> FollowCtrl {
        let mut fc = FollowCtrl::new(Params::default());
        let (out, rpt) = fc.proc(&BoundingBox::new(100, 100, 50, 50)).unwrap();
        assert!(out.is_none());
        assert!(rpt.calibrating);
        fc
    }

    /// Box of the reference area with the given horizontal centre
    fn centred_at(centre_x: i32) -> BoundingBox {
        BoundingBox::new(centre_x - 25, 100, 50, 50)
    }

    #[test]
    fn test_first_update_only_calibrates() {
        let mut fc = FollowCtrl::new(Params::default());
        assert!(!fc.is_calibrated());

        // Even a box far off centre produces no command on the first update
        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 10, 10)).unwrap();
        assert!(out.is_none());
        assert!(rpt.calibrating);
        assert_eq!(rpt.turn_zone, TurnZone::None);
        assert_eq!(rpt.range_zone, RangeZone::None);

        let calib = fc.calibration().unwrap();
        assert_eq!(calib.ref_area_px2, 100);
        assert!((calib.area_tolerance_px2 - 20.0).abs() < EPS);

        // The second update with the same box is a real command
        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 10, 10)).unwrap();
        assert!(out.is_some());
        assert!(!rpt.calibrating);
    }

    #[test]
    fn test_reset_recalibrates() {
        let mut fc = calibrated();
        fc.reset();
        assert!(!fc.is_calibrated());

        let (out, _) = fc.proc(&BoundingBox::new(0, 0, 20, 20)).unwrap();
        assert!(out.is_none());
        assert_eq!(fc.calibration().unwrap().ref_area_px2, 400);
    }

    #[test]
    fn test_speed_dead_zone() {
        let mut fc = calibrated();

        // Everything strictly within (2000, 3000) holds position
        for (w, h) in &[(50, 50), (41, 49), (59, 50), (2001, 1), (2999, 1)] {
            let (out, rpt) = fc.proc(&BoundingBox::new(295 - w / 2, 0, *w, *h)).unwrap();
            assert_eq!(rpt.range_zone, RangeZone::Dead, "{}x{}", w, h);
            assert_eq!(out.unwrap().speed_ms(), 0.0);
        }
    }

    #[test]
    fn test_speed_band_edges() {
        let mut fc = calibrated();

        // Exactly on the upper edge is already "too close"
        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 3000, 1)).unwrap();
        assert_eq!(rpt.range_zone, RangeZone::TooClose);
        assert_eq!(out.unwrap().speed_ms(), 0.0);

        // Exactly on the lower edge is already "too far"
        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 2000, 1)).unwrap();
        assert_eq!(rpt.range_zone, RangeZone::TooFar);
        assert_eq!(out.unwrap().speed_ms(), 0.0);
    }

    #[test]
    fn test_speed_proportional() {
        let mut fc = calibrated();

        // Too far: 1000 px^2 below the band gives 0.1 * 0.0003 * 1000 forwards
        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 1000, 1)).unwrap();
        assert_eq!(rpt.range_zone, RangeZone::TooFar);
        assert!((out.unwrap().speed_ms() - 0.03).abs() < EPS);
        assert!(!rpt.speed_limited);

        // Too close: 1000 px^2 above the band gives the same speed backwards
        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 4000, 1)).unwrap();
        assert_eq!(rpt.range_zone, RangeZone::TooClose);
        assert!((out.unwrap().speed_ms() + 0.03).abs() < EPS);
    }

    #[test]
    fn test_turn_dead_zone() {
        let mut fc = calibrated();

        for cx in 319..=321 {
            let (out, rpt) = fc.proc(&centred_at(cx)).unwrap();
            assert_eq!(rpt.centre_x_px, cx as i64);
            assert_eq!(rpt.turn_zone, TurnZone::Dead);
            assert_eq!(out.unwrap().turn_rads(), 0.0);
        }
    }

    #[test]
    fn test_turn_edges_are_proportional() {
        let mut fc = calibrated();

        // The edges route to the proportional branches, which give no turn
        // exactly on the edge
        let (out, rpt) = fc.proc(&centred_at(318)).unwrap();
        assert_eq!(rpt.turn_zone, TurnZone::Left);
        assert_eq!(out.unwrap().turn_rads(), 0.0);
        assert!(!rpt.turn_limited);

        let (out, rpt) = fc.proc(&centred_at(322)).unwrap();
        assert_eq!(rpt.turn_zone, TurnZone::Right);
        assert_eq!(out.unwrap().turn_rads(), 0.0);
        assert!(!rpt.turn_limited);

        // One pixel past each edge gives one pixel's worth of turn
        let (out, _) = fc.proc(&centred_at(317)).unwrap();
        assert!((out.unwrap().turn_rads() - 0.01).abs() < EPS);

        let (out, _) = fc.proc(&centred_at(323)).unwrap();
        assert!((out.unwrap().turn_rads() + 0.01).abs() < EPS);
    }

    #[test]
    fn test_saturation() {
        let mut fc = calibrated();

        let boxes = [
            BoundingBox::new(-5000, 0, 10, 10),
            BoundingBox::new(5000, 0, 10, 10),
            BoundingBox::new(0, 0, 640, 480),
            BoundingBox::new(600, 0, 2, 2),
            BoundingBox::new(0, 0, -300, 200),
            BoundingBox::new(0, 0, i32::MAX, i32::MAX),
            BoundingBox::new(i32::MAX, 0, 10, 10),
            BoundingBox::new(i32::MIN, 0, 10, 10),
            BoundingBox::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX),
            BoundingBox::new(i32::MIN, i32::MIN, i32::MIN, i32::MIN),
        ];

        for bb in boxes.iter() {
            let (out, _) = fc.proc(bb).unwrap();
            let cmd = out.unwrap();
            assert!(cmd.speed_ms().abs() <= 0.3, "{:?}", bb);
            assert!(cmd.turn_rads().abs() <= 0.5, "{:?}", bb);
        }

        // Far left is limited to a full left turn, the approach speed stays
        // proportional
        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 10, 10)).unwrap();
        assert!(rpt.turn_limited);
        assert!(!rpt.speed_limited);
        assert_eq!(out.unwrap().turn_rads(), 0.5);
        assert!((out.unwrap().speed_ms() - 0.00003 * 1900.0).abs() < EPS);

        // Boxes at the ends of the coordinate range turn towards their own
        // side
        let (out, rpt) = fc.proc(&BoundingBox::new(i32::MAX, 0, 10, 10)).unwrap();
        assert_eq!(rpt.turn_zone, TurnZone::Right);
        assert_eq!(out.unwrap().turn_rads(), -0.5);

        let (out, rpt) = fc.proc(&BoundingBox::new(i32::MIN, 0, 10, 10)).unwrap();
        assert_eq!(rpt.turn_zone, TurnZone::Left);
        assert_eq!(out.unwrap().turn_rads(), 0.5);

        // Far right and very close is limited to a full right turn in reverse
        let (out, _) = fc.proc(&BoundingBox::new(400, 0, 600, 400)).unwrap();
        assert_eq!(out.unwrap().turn_rads(), -0.5);
        assert_eq!(out.unwrap().speed_ms(), -0.3);
    }

    #[test]
    fn test_target_lost() {
        let mut fc = calibrated();

        // Move first so that a non-zero command has been produced
        let (out, _) = fc.proc(&BoundingBox::new(0, 0, 10, 10)).unwrap();
        assert!(!out.unwrap().is_stop());

        let (out, rpt) = fc.proc(&BoundingBox::new(0, 0, 1, 1)).unwrap();
        assert!(rpt.target_lost);
        assert!(out.unwrap().is_stop());

        // Position of a lost box doesn't matter
        let (out, _) = fc.proc(&BoundingBox::new(600, 400, 1, 1)).unwrap();
        assert!(out.unwrap().is_stop());
    }

    #[test]
    fn test_approach_scenario() {
        let mut fc = calibrated();
        let calib = fc.calibration().unwrap();
        assert_eq!(calib.ref_area_px2, 2500);
        assert!((calib.area_tolerance_px2 - 500.0).abs() < EPS);

        // Area 6400 is above R + tol = 3000, centre 140 is left of 318
        let (out, rpt) = fc.proc(&BoundingBox::new(100, 100, 80, 80)).unwrap();
        let cmd = out.unwrap();

        assert_eq!(rpt.range_zone, RangeZone::TooClose);
        assert!((cmd.speed_ms() + 0.1 * 0.0003 * 3400.0).abs() < EPS);

        assert_eq!(rpt.turn_zone, TurnZone::Left);
        assert!(rpt.turn_limited);
        assert_eq!(cmd.turn_rads(), 0.5);

        assert_eq!(cmd.linear.y, 0.0);
        assert_eq!(cmd.linear.z, 0.0);
        assert_eq!(cmd.angular.x, 0.0);
        assert_eq!(cmd.angular.y, 0.0);
    }
}
