//! Main follower executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Event processing, from the network or a replay script:
//!             - Tracking updates go to FollowCtrl, unless avoidance is active
//!             - Bumper events go to AvoidArb
//!         - AvoidArb processing, one recovery step per cycle
//!         - Command publishing
//!         - Archiving
//!     - On shutdown publish a stop command
//!
//! # Modules
//!
//! All modules (e.g. `follow_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use comms_if::net::NetParams;
use follow_lib::{
    cmd_server::CmdServer,
    data_store::DataStore,
    event_client::{EventClient, EventClientError},
    event_processor,
    params::FollowExecParams,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info, warn};
use std::env;
use std::thread;
use std::time::Instant;
use color_eyre::{Report, eyre::{WrapErr, eyre}};

// Internal
use util::{
    host,
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
    script_interpreter::{ScriptInterpreter, PendingEvents},
    time::period_from_frequency,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new(
        "follow_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Follower Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: FollowExecParams = util::params::load(
        "follow_exec.toml"
    ).wrap_err("Could not load exec params")?;

    let net_params: NetParams = util::params::load(
        "net.toml"
    ).wrap_err("Could not load net params")?;

    let cycle_period = period_from_frequency(exec_params.cycle_frequency_hz)
        .ok_or_else(|| eyre!(
            "Invalid cycle frequency: {} Hz", exec_params.cycle_frequency_hz
        ))?;

    info!("Exec parameters loaded");

    // ---- INITIALISE EVENT SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // If we have a single argument use it as the script path
    let script = if args.len() == 2 {

        info!("Loading script from \"{}\"", &args[1]);

        let si = ScriptInterpreter::new(&args[1])
            .wrap_err("Failed to load script")?;

        info!(
            "Loaded script lasts {:.02} s and contains {} events\n",
            si.get_duration(),
            si.get_num_events()
        );

        Some(si)
    }
    // If no arguments then setup the event client
    else if args.len() == 1 {
        info!("No script provided, events will be recieved via the EventClient\n");
        None
    }
    else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}", args.len() - 1)
        );
    };

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.follow_ctrl.init("follow_ctrl.toml", &session)
        .wrap_err("Failed to initialise FollowCtrl")?;
    info!("FollowCtrl init complete");

    ds.avoid_arb.init("avoid_arb.toml", &session)
        .wrap_err("Failed to initialise AvoidArb")?;
    info!("AvoidArb init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = comms_if::net::zmq::Context::new();

    let mut event_source = match script {
        Some(si) => EventSource::Script(si),
        None => {
            let c = EventClient::new(&zmq_ctx, &net_params)
                .wrap_err("Failed to initialise the EventClient")?;
            info!("EventClient initialised");
            EventSource::Remote(c)
        }
    };

    let cmd_server = {
        let s = CmdServer::new(&zmq_ctx, &net_params)
            .wrap_err("Failed to initialise CmdServer")?;
        info!("CmdServer initialised");
        s
    };

    info!("Network initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- EVENT PROCESSING ----

        match event_source {
            EventSource::Remote(ref client) => {
                // Get events until none remain
                loop {
                    match client.recieve_event() {
                        Ok(Some(event)) => event_processor::exec(&mut ds, &event),
                        Ok(None) => break,
                        Err(EventClientError::EventParseError(e)) => {
                            warn!("Could not parse recieved event: {}", e);
                        },
                        Err(EventClientError::NonUtf8Message) => {
                            warn!("Recieved an event which was not valid UTF-8");
                        },
                        Err(e) => {
                            error!("Fatal error while recieving events: {}", e);
                            ds.request_shutdown();
                            break
                        }
                    }
                }
            },

            EventSource::Script(ref mut si) =>
                match si.get_pending_events() {
                    PendingEvents::None => (),
                    PendingEvents::Some(event_vec) => {
                        for event in event_vec.iter() {
                            event_processor::exec(&mut ds, event);
                        }
                    }
                    // Exit if end of script reached
                    PendingEvents::EndOfScript => {
                        info!("End of event script reached, stopping");
                        ds.request_shutdown();
                    }
                }
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        if !ds.shutdown_requested {
            ds.step_avoidance();
        }

        // ---- COMMAND OUTPUT ----

        if let Err(e) = cmd_server.send_all(&ds.cmd_out) {
            warn!("CmdServer error: {}", e);
        }

        // ---- WRITE ARCHIVES ----

        ds.write_archives();

        if ds.shutdown_requested {
            ds.cycle_end();
            break
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;

                if ds.num_consec_cycle_overruns % exec_params.overrun_warn_limit.max(1) == 0 {
                    error!(
                        "{} consecutive cycle overruns, recovery manouvres are running slow",
                        ds.num_consec_cycle_overruns
                    );
                }
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    ds.cycle_start();
    ds.shutdown();

    match cmd_server.send_all(&ds.cmd_out) {
        Ok(_) => info!("Stop command sent"),
        Err(e) => error!("Could not send the stop command: {}", e)
    }

    ds.log_stats();

    info!("End of execution");

    Ok(())
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the events incoming to the exec.
enum EventSource {
    Remote(EventClient),
    Script(ScriptInterpreter)
}
