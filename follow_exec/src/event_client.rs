//! # Event Client
//!
//! Receives [`FollowerEvent`]s published by the tracker, the bumper bridge,
//! or the `event_cli`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    event::{EventParseError, FollowerEvent},
    net::{create_socket, zmq, NetParams, SocketError, SocketOptions}
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Event client
pub struct EventClient {
    socket: zmq::Socket
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EventClientError {
    #[error("Socket error: {0}")]
    SocketError(SocketError),

    #[error("Could not recieve a message: {0}")]
    RecvError(zmq::Error),

    #[error("Could not parse the recieved event: {0}")]
    EventParseError(EventParseError),

    #[error("Recieved a message which was not valid UTF-8")]
    NonUtf8Message
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl EventClient {

    /// Create a new instance of the event client.
    ///
    /// The socket is bound so that any number of publishers can connect to
    /// it. This function does not wait for any publisher.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, EventClientError> {
        let socket_options = SocketOptions {
            bind: true,
            linger: 1,
            recv_timeout: 10,
            ..Default::default()
        };

        let socket = create_socket(
            ctx,
            zmq::SUB,
            &socket_options,
            &params.event_endpoint
        ).map_err(EventClientError::SocketError)?;

        Ok(Self {
            socket
        })
    }

    /// Recieve a single event.
    ///
    /// Call in a loop until `Ok(None)` is returned, indicating there are no
    /// more pending events right now. Never blocks.
    pub fn recieve_event(&self) -> Result<Option<FollowerEvent>, EventClientError> {
        let event_str = match self.socket.recv_string(zmq::DONTWAIT) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => return Err(EventClientError::NonUtf8Message),
            // Nothing pending
            Err(zmq::Error::EAGAIN) => return Ok(None),
            Err(e) => return Err(EventClientError::RecvError(e))
        };

        FollowerEvent::from_json(&event_str)
            .map(Some)
            .map_err(EventClientError::EventParseError)
    }
}
