//! # Command Server
//!
//! Publishes the follower's [`VelocityCommand`]s to the mobile base driver.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::base::VelocityCommand,
    net::{create_socket, zmq, NetParams, SocketError, SocketOptions}
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Velocity command server
pub struct CmdServer {
    socket: zmq::Socket
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CmdServerError {
    #[error("Socket error: {0}")]
    SocketError(SocketError),

    #[error("Could not send the command: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the command: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CmdServer {
    /// Create a new instance of the command server.
    ///
    /// This function will not block until a subscriber connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, CmdServerError> {
        // Keep the final stop command long enough for it to go out on exit
        let socket_options = SocketOptions {
            bind: true,
            linger: 500,
            send_timeout: 10,
            ..Default::default()
        };

        let socket = create_socket(
            ctx,
            zmq::PUB,
            &socket_options,
            &params.cmd_endpoint
        ).map_err(CmdServerError::SocketError)?;

        Ok(Self {
            socket
        })
    }

    /// Publish a single command.
    pub fn send(&self, cmd: &VelocityCommand) -> Result<(), CmdServerError> {
        let cmd_str = serde_json::to_string(cmd)
            .map_err(CmdServerError::SerializationError)?;

        self.socket.send(&cmd_str, 0)
            .map_err(CmdServerError::SendError)
    }

    /// Publish all the given commands in order, stopping at the first error.
    pub fn send_all(&self, cmds: &[VelocityCommand]) -> Result<(), CmdServerError> {
        for cmd in cmds {
            self.send(cmd)?;
        }

        Ok(())
    }
}
