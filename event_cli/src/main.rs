//! # Event command line tool
//!
//! Publishes a single event to the follower, for manual testing or for
//! bridging from shell scripts. For example
//!
//! ```text
//! event_cli track 100 100 50 50
//! event_cli bumper left pressed
//! event_cli shutdown
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use color_eyre::{Report, eyre::WrapErr};
use std::time::Duration;
use structopt::StructOpt;

use comms_if::{
    event::FollowerEvent,
    net::{create_socket, zmq, NetParams, SocketOptions}
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "event_cli", about = "Publish a single event to the follower")]
struct Opts {
    /// Endpoint to publish on, defaults to `event_endpoint` from `net.toml`
    #[structopt(short, long)]
    endpoint: Option<String>,

    /// Time to wait for the connection to the follower before publishing
    #[structopt(short, long, default_value = "200")]
    wait_ms: u64,

    #[structopt(subcommand)]
    event: FollowerEvent,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    let endpoint = match opts.endpoint {
        Some(e) => e,
        None => {
            let net_params: NetParams = util::params::load("net.toml")
                .wrap_err("Could not load net params, pass --endpoint to skip them")?;
            net_params.event_endpoint
        }
    };

    let event_str = opts.event.to_json()
        .wrap_err("Could not serialise the event")?;

    let ctx = zmq::Context::new();

    let socket_options = SocketOptions {
        linger: 1000,
        send_timeout: 1000,
        ..Default::default()
    };

    let socket = create_socket(&ctx, zmq::PUB, &socket_options, &endpoint)
        .wrap_err("Could not connect to the follower")?;

    // PUB drops anything sent before the subscriber has connected
    std::thread::sleep(Duration::from_millis(opts.wait_ms));

    socket.send(&event_str, 0)
        .wrap_err("Could not publish the event")?;

    println!("Sent {} to {}", event_str, endpoint);

    Ok(())
}
