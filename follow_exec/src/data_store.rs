//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{base::VelocityCommand, vision::BoundingBox};
use log::{debug, info, trace, warn};
use util::{archive::Archived, module::State};

use crate::{avoid_arb, follow_ctrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Set once a shutdown has been requested, the main loop exits at the end
    /// of the cycle.
    pub shutdown_requested: bool,

    // FollowCtrl
    pub follow_ctrl: follow_ctrl::FollowCtrl,
    pub follow_ctrl_status_rpt: follow_ctrl::StatusReport,

    // AvoidArb
    pub avoid_arb: avoid_arb::AvoidArb,
    pub avoid_arb_status_rpt: avoid_arb::StatusReport,

    // Output
    /// Commands to publish at the end of this cycle, in the order they were
    /// produced.
    pub cmd_out: Vec<VelocityCommand>,

    /// The last command produced, across all cycles.
    pub last_cmd: Option<VelocityCommand>,

    // Monitoring Counters
    /// Tracking updates passed to FollowCtrl
    pub num_tracks_processed: u64,

    /// Tracking updates dropped because avoidance was in progress
    pub num_tracks_dropped: u64,

    /// Recovery manouvres run to completion
    pub num_mnvrs_completed: u64,

    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Create a data store around already initialised modules.
    pub fn with_modules(
        follow_ctrl: follow_ctrl::FollowCtrl,
        avoid_arb: avoid_arb::AvoidArb
    ) -> Self {
        Self {
            follow_ctrl,
            avoid_arb,
            ..Default::default()
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle.
    pub fn cycle_start(&mut self) {
        self.cmd_out.clear();
        self.follow_ctrl_status_rpt = follow_ctrl::StatusReport::default();
        self.avoid_arb_status_rpt = avoid_arb::StatusReport::default();
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }

    /// Queue a command for publishing.
    pub fn emit(&mut self, cmd: VelocityCommand) {
        trace!(
            "Command out: speed {:.4} m/s, turn {:.4} rad/s",
            cmd.speed_ms(), cmd.turn_rads()
        );
        self.cmd_out.push(cmd);
        self.last_cmd = Some(cmd);
    }

    /// Handle a tracking update.
    ///
    /// The update is dropped if the avoidance arbiter owns the output,
    /// otherwise FollowCtrl processes it and its command (if any) is queued.
    pub fn process_tracking(&mut self, bbox: &BoundingBox) {
        if self.avoid_arb.is_active() {
            debug!("Avoidance in progress, dropping tracking update {:?}", bbox);
            self.num_tracks_dropped += 1;
            return
        }

        let (output, rpt) = match self.follow_ctrl.proc(bbox) {
            Ok(r) => r,
            Err(e) => match e {}
        };

        self.follow_ctrl_status_rpt = rpt;
        self.num_tracks_processed += 1;

        if let Some(cmd) = output {
            self.emit(cmd);
        }

        // One record per processed update
        if let Err(e) = self.follow_ctrl.write() {
            warn!("Could not write FollowCtrl archive: {}", e);
        }
    }

    /// Advance the avoidance arbiter by one cycle, queueing its command if a
    /// manouvre is running.
    pub fn step_avoidance(&mut self) {
        let (output, rpt) = match self.avoid_arb.proc(&()) {
            Ok(r) => r,
            Err(e) => match e {}
        };

        self.avoid_arb_status_rpt = rpt;

        if rpt.mnvr_complete {
            self.num_mnvrs_completed += 1;
        }

        if let Some(cmd) = output {
            self.emit(cmd);
        }
    }

    /// Write the per-cycle archives.
    pub fn write_archives(&mut self) {
        if let Err(e) = self.avoid_arb.write() {
            warn!("Could not write AvoidArb archive: {}", e);
        }
    }

    /// Request that execution ends at the end of this cycle.
    pub fn request_shutdown(&mut self) {
        if !self.shutdown_requested {
            info!("Shutdown requested");
            self.shutdown_requested = true;
        }
    }

    /// Abort any manouvre and queue a stop command so the base is left
    /// stationary.
    pub fn shutdown(&mut self) {
        self.avoid_arb.reset();
        self.emit(VelocityCommand::stop());
    }

    /// Log the statistics of this run.
    pub fn log_stats(&self) {
        info!("Run statistics:");
        info!("    Cycles executed:             {}", self.num_cycles);
        info!("    Tracking updates processed:  {}", self.num_tracks_processed);
        info!("    Tracking updates dropped:    {}", self.num_tracks_dropped);
        info!("    Recovery manouvres complete: {}", self.num_mnvrs_completed);
    }
}
