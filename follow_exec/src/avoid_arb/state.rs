//! Implementations for the AvoidArb state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{AvoidArbError, Params};
use comms_if::eqpt::{
    base::VelocityCommand,
    bumper::{BumperEvent, BumperState, BumperZone},
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Order in which latched zones are considered when a manouvre starts.
const ZONE_PRIORITY: [BumperZone; 3] = [
    BumperZone::Left,
    BumperZone::Center,
    BumperZone::Right
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Avoidance arbiter module state
#[derive(Default)]
pub struct AvoidArb {
    pub(crate) params: Params,

    latches: BumperLatches,

    /// Presses not yet served by a manouvre, always a subset of the latches.
    pending: BumperLatches,

    flags: AvoidFlags,

    /// The manouvre being executed, `None` while idle or before the first
    /// step of a triggered manouvre.
    mnvr: Option<RecoveryMnvr>,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Latched state of each bumper zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BumperLatches {
    pub left: bool,
    pub center: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvoidFlags {
    /// Set while the arbiter owns the command output. Tracking updates are
    /// dropped while this is set.
    pub enable_avoidance: bool,

    /// Set while the recovery steps are still being emitted.
    pub change_direction: bool,
}

/// A running recovery manouvre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryMnvr {
    /// Zone whose script is being executed, fixed when the manouvre starts.
    pub zone: BumperZone,

    /// Number of steps emitted so far.
    pub step: u32,
}

/// Status report for AvoidArb processing.
///
/// Flat so that it can be archived as a csv record.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    pub enable_avoidance: bool,
    pub change_direction: bool,

    pub left_latched: bool,
    pub center_latched: bool,
    pub right_latched: bool,

    /// Zone of the running manouvre
    pub active_zone: Option<BumperZone>,

    /// Steps emitted by the running manouvre, including this cycle's
    pub step: u32,

    /// A press is waiting for the running manouvre to finish
    pub press_queued: bool,

    /// The manouvre finished on this cycle
    pub mnvr_complete: bool,

    pub speed_ms: f64,
    pub turn_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for AvoidArb {
    type InitData = &'static str;
    type InitError = AvoidArbError;

    type InputData = ();
    type OutputData = Option<VelocityCommand>;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the AvoidArb module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)
            .map_err(AvoidArbError::ParamLoadError)?;

        self.arch_report = Archiver::from_path(session, "avoid_arb/status_report.csv")
            .map_err(AvoidArbError::ArchiveError)?;

        Ok(())
    }

    /// Advance the recovery manouvre by one control cycle.
    ///
    /// Returns the recovery command for this cycle, or `None` if no manouvre
    /// is in progress.
    fn proc(&mut self, _: &())
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();

        let output = if self.flags.enable_avoidance {
            self.step()
        }
        else {
            None
        };

        self.update_report(output);

        Ok((output, self.report))
    }

    /// Abort any manouvre and clear all latches.
    fn reset(&mut self) {
        if let Some(m) = self.mnvr {
            info!("Aborting {:?} recovery manouvre at step {}", m.zone, m.step);
        }

        self.latches = BumperLatches::default();
        self.pending = BumperLatches::default();
        self.flags = AvoidFlags::default();
        self.mnvr = None;
        self.report = StatusReport::default();
    }
}

impl Archived for AvoidArb {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

impl AvoidArb {

    /// Create a new instance with the given parameters, without any archive.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Update the latches from a bumper event.
    ///
    /// Presses are edge-triggered: only a press on a zone which isn't
    /// already latched does anything. If no manouvre is pending or running
    /// it triggers one, which starts on the next call to `proc`. Presses
    /// during a manouvre are queued, and trigger a new manouvre once the
    /// current one completes.
    ///
    /// Releases always clear the latch, and drop the zone's queued press if
    /// it has not been served yet. They never affect a running manouvre.
    ///
    /// Returns `true` if a manouvre was triggered immediately.
    pub fn handle_bumper(&mut self, event: &BumperEvent) -> bool {
        match event.state {
            BumperState::Pressed => {
                if self.latches.get(event.zone) {
                    trace!("{:?} bumper already latched", event.zone);
                    return false
                }

                self.latches.set(event.zone, true);
                self.pending.set(event.zone, true);
                debug!("{:?} bumper latched", event.zone);

                if self.flags.enable_avoidance {
                    info!(
                        "Avoidance already in progress, {:?} press queued \
                        until the current manouvre completes",
                        event.zone
                    );
                    false
                }
                else {
                    self.flags = AvoidFlags {
                        enable_avoidance: true,
                        change_direction: true
                    };
                    true
                }
            },
            BumperState::Released => {
                self.latches.set(event.zone, false);
                self.pending.set(event.zone, false);
                debug!("{:?} bumper released", event.zone);
                false
            }
        }
    }

    /// True while the arbiter owns the command output.
    pub fn is_active(&self) -> bool {
        self.flags.enable_avoidance
    }

    pub fn flags(&self) -> AvoidFlags {
        self.flags
    }

    pub fn latches(&self) -> BumperLatches {
        self.latches
    }

    pub fn mnvr(&self) -> Option<RecoveryMnvr> {
        self.mnvr
    }

    /// Emit the next step of the manouvre, starting it if needed.
    fn step(&mut self) -> Option<VelocityCommand> {
        let mut mnvr = match self.mnvr {
            Some(m) => m,
            None => {
                if !self.flags.change_direction {
                    self.finish();
                    return None
                }

                // The zone may have been released between the press and this
                // cycle, in which case there is nothing to recover from. One
                // manouvre serves every press queued so far.
                let zone = self.pending.highest_priority();
                self.pending = BumperLatches::default();

                match zone {
                    Some(zone) => {
                        info!("Starting {:?} recovery manouvre", zone);
                        RecoveryMnvr { zone, step: 0 }
                    },
                    None => {
                        info!("No bumper latched at manouvre start, resuming tracking");
                        self.finish();
                        return None
                    }
                }
            }
        };

        let script = *self.params.script(mnvr.zone);

        if script.num_steps == 0 {
            self.finish();
            return None
        }

        mnvr.step += 1;
        let cmd = script.cmd();

        trace!(
            "{:?} recovery step {}/{}: speed {} m/s, turn {} rad/s",
            mnvr.zone, mnvr.step, script.num_steps,
            script.speed_ms, script.turn_rads
        );

        self.report.active_zone = Some(mnvr.zone);
        self.report.step = mnvr.step;

        if mnvr.step >= script.num_steps {
            info!(
                "{:?} recovery manouvre complete after {} steps",
                mnvr.zone, mnvr.step
            );
            self.report.mnvr_complete = true;
            self.finish();
        }
        else {
            self.mnvr = Some(mnvr);
        }

        Some(cmd)
    }

    /// End the manouvre and hand control back to the follower, unless a
    /// press was queued during it.
    fn finish(&mut self) {
        self.mnvr = None;

        if let Some(zone) = self.pending.highest_priority() {
            info!("{:?} press queued, recovering again on the next cycle", zone);
            self.flags = AvoidFlags {
                enable_avoidance: true,
                change_direction: true
            };
        }
        else {
            self.flags = AvoidFlags::default();
        }
    }

    fn update_report(&mut self, output: Option<VelocityCommand>) {
        self.report.enable_avoidance = self.flags.enable_avoidance;
        self.report.change_direction = self.flags.change_direction;
        self.report.left_latched = self.latches.left;
        self.report.center_latched = self.latches.center;
        self.report.right_latched = self.latches.right;
        self.report.press_queued = self.pending.highest_priority().is_some();

        if let Some(cmd) = output {
            self.report.speed_ms = cmd.speed_ms();
            self.report.turn_rads = cmd.turn_rads();
        }
    }
}

impl BumperLatches {
    pub fn get(&self, zone: BumperZone) -> bool {
        match zone {
            BumperZone::Left => self.left,
            BumperZone::Center => self.center,
            BumperZone::Right => self.right,
        }
    }

    pub fn set(&mut self, zone: BumperZone, latched: bool) {
        match zone {
            BumperZone::Left => self.left = latched,
            BumperZone::Center => self.center = latched,
            BumperZone::Right => self.right = latched,
        }
    }

    /// The highest priority latched zone, if any.
    pub fn highest_priority(&self) -> Option<BumperZone> {
        ZONE_PRIORITY.iter().copied().find(|z| self.get(*z))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
