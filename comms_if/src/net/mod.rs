//! # Network Module
//!
//! This module provides networking abstractions over ZMQ, the networking library chosen for the
//! software.
//!
//! The follower binds two sockets:
//! - a SUB socket on which trackers, bumper bridges, or the `event_cli` publish [`FollowerEvent`]s,
//! - a PUB socket on which it publishes [`VelocityCommand`]s to the mobile base driver.
//!
//! [`FollowerEvent`]: crate::event::FollowerEvent
//! [`VelocityCommand`]: crate::eqpt::base::VelocityCommand

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use serde::Deserialize;
use zmq::{Context, Socket, SocketType};

// Export zmq
pub use zmq;

// ------------------------------------------------------------------------------------------------
// MACROS
// ------------------------------------------------------------------------------------------------

macro_rules! set_sockopts {
    ($socket:expr, $(($opt:ident, $val:expr)),+) => {
        $(
            $socket.$opt($val)
                .map_err(|e| SocketError::SocketOptionError(stringify!($opt).into(), e))?;
        )+
    };
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Network parameters shared by all executables.
#[derive(Debug, Clone, Deserialize)]
pub struct NetParams {
    /// Endpoint on which the follower receives events
    pub event_endpoint: String,

    /// Endpoint on which the follower publishes velocity commands
    pub cmd_endpoint: String,
}

/// Represents options which can be set on a socket.
///
/// Most options here correspond to those found in the
/// [`zmq_setsockopt`](http://api.zeromq.org/4-2:zmq-setsockopt) documentation.
pub struct SocketOptions {
    /// Indicates if the socket should bind itself to the endpoint. Servers should have this value
    /// set as `true`, clients should have it set as `false`.
    ///
    /// The default value is `false`.
    pub bind: bool,

    /// Topic prefix to subscribe to, only used by SUB sockets. An empty prefix receives all
    /// messages.
    pub subscribe: Vec<u8>,

    /// `ZMQ_LINGER`: Set linger period for socket shutdown
    pub linger: i32,

    /// `ZMQ_RCVHWM`: Set high water mark for inbound messages
    pub recv_hwm: i32,

    /// `ZMQ_SNDHWM`: Set high water mark for outbound messages
    pub send_hwm: i32,

    /// `ZMQ_RCVTIMEO`: Maximum time before a recv operation returns with `EAGAIN`
    pub recv_timeout: i32,

    /// `ZMQ_SNDTIMEO`: Maximum time before a send operation returns with `EAGAIN`
    pub send_timeout: i32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum SocketError {
    #[error("Error creating the socket: {0}")]
    CreateSocketError(zmq::Error),

    #[error("Could not bind or connect the socket to {0}: {1}")]
    CouldNotConnect(String, zmq::Error),

    #[error("Could not set the {0} socket option: {1}")]
    SocketOptionError(String, zmq::Error),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Create a new socket, set its options, and bind or connect it to the endpoint.
///
/// ## Arguments
/// - `ctx`: the zmq context which will be used to create the socket
/// - `socket_type`: the type of zmq socket to create
/// - `socket_options`: a [`SocketOptions`] struct specifying how to configure the socket
/// - `endpoint`: a zmq endpoint string, such as `"tcp://127.0.0.1:5100"`
pub fn create_socket(
    ctx: &Context,
    socket_type: SocketType,
    socket_options: &SocketOptions,
    endpoint: &str
) -> Result<Socket, SocketError> {
    let socket = ctx.socket(socket_type)
        .map_err(SocketError::CreateSocketError)?;

    socket_options.set(&socket)?;

    match socket_options.bind {
        false => socket.connect(endpoint),
        true => socket.bind(endpoint)
    }.map_err(|e| SocketError::CouldNotConnect(endpoint.into(), e))?;

    debug!(
        "{:?} socket {} {}",
        socket_type,
        if socket_options.bind { "bound to" } else { "connected to" },
        endpoint
    );

    Ok(socket)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SocketOptions {
    /// Set these options on the given socket.
    pub fn set(&self, socket: &Socket) -> Result<(), SocketError> {
        set_sockopts!(
            socket,
            (set_linger, self.linger),
            (set_rcvhwm, self.recv_hwm),
            (set_sndhwm, self.send_hwm),
            (set_rcvtimeo, self.recv_timeout),
            (set_sndtimeo, self.send_timeout)
        );

        if let Ok(SocketType::SUB) = socket.get_socket_type() {
            set_sockopts!(socket, (set_subscribe, &self.subscribe));
        }

        Ok(())
    }
}

impl Default for SocketOptions {
    fn default() -> Self {
        // Defaults for sockopts taken from http://api.zeromq.org/4-2:zmq-setsockopt
        Self {
            bind: false,
            subscribe: Vec::new(),
            linger: 30_000,
            recv_hwm: 1000,
            send_hwm: 1000,
            recv_timeout: -1,
            send_timeout: -1,
        }
    }
}
