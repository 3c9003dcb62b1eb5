//! # Event processor module
//!
//! The event processor handles the events coming from any source, network or
//! script.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use comms_if::event::FollowerEvent;
use util::module::State;
use crate::data_store::DataStore;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute an event.
///
/// Mutates the datastore to pass the event to the relevant module.
pub fn exec(ds: &mut DataStore, event: &FollowerEvent) {

    match event {
        FollowerEvent::Tracking(bbox) => {
            ds.process_tracking(bbox);
        },
        FollowerEvent::Bumper(b) => {
            debug!("Recieved bumper event: {:?} {:?}", b.zone, b.state);
            if ds.avoid_arb.handle_bumper(b) {
                info!("Collision on {:?} bumper, avoidance triggered", b.zone);
            }
        },
        FollowerEvent::Recalibrate => {
            debug!("Recieved Recalibrate event");
            ds.follow_ctrl.reset();
        },
        FollowerEvent::Shutdown => {
            debug!("Recieved Shutdown event");
            ds.request_shutdown();
        }
    }

}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use comms_if::eqpt::{
        base::VelocityCommand,
        bumper::{BumperEvent, BumperZone},
        vision::BoundingBox
    };
    use crate::{avoid_arb::AvoidArb, follow_ctrl::FollowCtrl};

    fn data_store() -> DataStore {
        DataStore::with_modules(
            FollowCtrl::new(Default::default()),
            AvoidArb::new(Default::default())
        )
    }

    /// Run a full cycle with the given events, returning the commands
    /// produced.
    fn cycle(ds: &mut DataStore, events: &[FollowerEvent]) -> Vec<VelocityCommand> {
        ds.cycle_start();
        for e in events {
            exec(ds, e);
        }
        ds.step_avoidance();
        ds.write_archives();
        ds.cycle_end();
        ds.cmd_out.clone()
    }

    fn track(x: i32, y: i32, w: i32, h: i32) -> FollowerEvent {
        FollowerEvent::Tracking(BoundingBox::new(x, y, w, h))
    }

    #[test]
    fn test_follow() {
        let mut ds = data_store();

        // Calibration produces nothing
        assert!(cycle(&mut ds, &[track(100, 100, 50, 50)]).is_empty());
        assert!(ds.follow_ctrl_status_rpt.calibrating);

        // One command per processed update
        let cmds = cycle(&mut ds, &[track(100, 100, 80, 80), track(295, 100, 50, 50)]);
        assert_eq!(cmds.len(), 2);
        assert!((cmds[0].speed_ms() + 0.102).abs() < 1e-9);
        assert_eq!(cmds[0].turn_rads(), 0.5);
        assert!(cmds[1].is_stop());

        assert_eq!(ds.last_cmd, Some(cmds[1]));
        assert_eq!(ds.num_tracks_processed, 3);
        assert_eq!(ds.num_cycles, 2);
    }

    #[test]
    fn test_avoidance_owns_output() {
        let mut ds = data_store();
        cycle(&mut ds, &[track(100, 100, 50, 50)]);

        // The press takes effect immediately, so the tracking update in the
        // same cycle is dropped, and the first recovery step is emitted
        let cmds = cycle(&mut ds, &[
            FollowerEvent::Bumper(BumperEvent::pressed(BumperZone::Left)),
            track(0, 0, 10, 10),
        ]);
        assert_eq!(cmds, vec![VelocityCommand::planar(-0.2, -0.4)]);
        assert_eq!(ds.num_tracks_dropped, 1);

        // 14 more steps, tracking still dropped
        for _ in 0..14 {
            let cmds = cycle(&mut ds, &[track(0, 0, 10, 10)]);
            assert_eq!(cmds, vec![VelocityCommand::planar(-0.2, -0.4)]);
        }
        assert_eq!(ds.num_tracks_dropped, 15);
        assert_eq!(ds.num_mnvrs_completed, 1);
        assert!(!ds.avoid_arb.is_active());

        // Control returns to the follower on the next tracking update
        let cmds = cycle(&mut ds, &[track(295, 100, 50, 50)]);
        assert_eq!(cmds.len(), 1);
        assert!(cmds[0].is_stop());
        assert_eq!(ds.num_tracks_processed, 2);
    }

    #[test]
    fn test_recalibrate() {
        let mut ds = data_store();
        cycle(&mut ds, &[track(100, 100, 50, 50)]);

        let cmds = cycle(&mut ds, &[
            FollowerEvent::Recalibrate,
            track(100, 100, 80, 80),
            track(100, 100, 80, 80),
        ]);

        // The first box after recalibrating sets the new reference
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].speed_ms(), 0.0);
        assert_eq!(ds.follow_ctrl.calibration().unwrap().ref_area_px2, 6400);
    }

    #[test]
    fn test_shutdown() {
        let mut ds = data_store();
        cycle(&mut ds, &[track(100, 100, 50, 50)]);
        cycle(&mut ds, &[FollowerEvent::Bumper(BumperEvent::pressed(BumperZone::Center))]);

        assert!(!ds.shutdown_requested);
        cycle(&mut ds, &[FollowerEvent::Shutdown]);
        assert!(ds.shutdown_requested);

        ds.cycle_start();
        ds.shutdown();
        assert_eq!(ds.cmd_out, vec![VelocityCommand::stop()]);
        assert!(!ds.avoid_arb.is_active());
        assert_eq!(ds.num_mnvrs_completed, 0);
    }
}
